//! Payload shape checks for the dashboard endpoints.
//!
//! The backend is loose about envelopes, so bodies are decoded into
//! `serde_json::Value` first and checked against each endpoint's contract here.

use crate::api::error::ApiError;
use crate::consts::cli_consts::KPI_CHANGE_SUFFIX;
use crate::models::{Kpi, KpiReport};
use crate::status::{ConnectionState, SubStatus};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A collection body is either a bare array or an object with an `items` array.
pub fn collection_items(body: Value) -> Result<Vec<Value>, ApiError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(ApiError::Shape("`items` is not an array".to_string())),
            None => Err(ApiError::Shape(
                "expected an array or an object with `items`".to_string(),
            )),
        },
        other => Err(ApiError::Shape(format!(
            "expected an array, got {}",
            type_name(&other)
        ))),
    }
}

pub fn parse_collection<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ApiError> {
    collection_items(body)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

/// One sub-status per key, in key order.
pub fn parse_status(body: Value) -> Result<Vec<SubStatus>, ApiError> {
    let Value::Object(entries) = body else {
        return Err(ApiError::Shape(format!(
            "status body must be an object, got {}",
            type_name(&body)
        )));
    };

    Ok(entries
        .into_iter()
        .map(|(name, entry)| match entry {
            Value::Object(fields) => sub_status(name, fields),
            other => SubStatus::new(name, ConnectionState::Error)
                .with_detail("message", format!("malformed entry: {}", type_name(&other))),
        })
        .collect())
}

fn sub_status(name: String, mut fields: Map<String, Value>) -> SubStatus {
    let state = ConnectionState::from_status_field(
        fields.remove("status").as_ref().and_then(Value::as_str),
    );
    fields
        .into_iter()
        .fold(SubStatus::new(name, state), |status, (key, value)| {
            status.with_detail(key, stringify(value))
        })
}

/// KPIs in key order. `<kpi>Change` fields attach to `<kpi>` instead of
/// standing alone; a change without its base is reported as a KPI of its own.
pub fn parse_metrics(body: Value) -> Result<KpiReport, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::Shape(format!(
            "metrics body must be an object, got {}",
            type_name(&body)
        )));
    };

    let numeric = |key: &str| fields.get(key).and_then(Value::as_f64);
    let kpis = fields
        .iter()
        .filter_map(|(name, value)| {
            let value = value.as_f64()?;
            if let Some(base) = name.strip_suffix(KPI_CHANGE_SUFFIX) {
                if !base.is_empty() && numeric(base).is_some() {
                    return None;
                }
            }
            Some(Kpi {
                name: name.clone(),
                value,
                change_pct: numeric(&format!("{}{}", name, KPI_CHANGE_SUFFIX)),
            })
        })
        .collect();

    Ok(KpiReport { range: None, kpis })
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cashier;
    use serde_json::json;

    #[test]
    fn test_collection_accepts_array_and_items_envelope() {
        assert_eq!(collection_items(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(collection_items(json!({"items": [1]})).unwrap().len(), 1);
        assert!(collection_items(json!({"items": []})).unwrap().is_empty());
    }

    #[test]
    fn test_collection_rejects_other_shapes() {
        for body in [json!({"data": []}), json!({"items": {}}), json!("x"), json!(null)] {
            assert!(matches!(collection_items(body), Err(ApiError::Shape(_))));
        }
    }

    #[test]
    fn test_parse_collection_decodes_items() {
        let cashiers: Vec<Cashier> =
            parse_collection(json!({"items": [{"id": "a", "name": "Ana"}]})).unwrap();
        assert_eq!(cashiers[0].id, "a");

        let bad = parse_collection::<Cashier>(json!([{"name": "no id"}]));
        assert!(matches!(bad, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_status_entries_map_through_the_closed_table() {
        let statuses = parse_status(json!({
            "payments": {"status": "connected", "latencyMs": 41},
            "accounting": {"status": "degraded"},
            "ecommerce": {"lastSync": null},
            "loyalty": "down"
        }))
        .unwrap();

        let by_name = |name: &str| statuses.iter().find(|s| s.name == name).unwrap();
        assert_eq!(by_name("payments").state, ConnectionState::Connected);
        assert_eq!(by_name("payments").detail["latencyMs"], "41");
        assert_eq!(by_name("accounting").state, ConnectionState::Error);
        assert_eq!(by_name("ecommerce").state, ConnectionState::Error);
        assert_eq!(by_name("ecommerce").detail["lastSync"], "");
        assert_eq!(by_name("loyalty").state, ConnectionState::Error);
    }

    #[test]
    fn test_status_body_must_be_object() {
        assert!(matches!(parse_status(json!([])), Err(ApiError::Shape(_))));
        assert!(parse_status(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_metrics_pair_changes_with_their_kpi() {
        let report = parse_metrics(json!({
            "totalSales": 1250.5,
            "totalSalesChange": -3.5,
            "transactions": 88,
            "currency": "EUR",
            "refundsChange": 12
        }))
        .unwrap();

        let names: Vec<&str> = report.kpis.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["refundsChange", "totalSales", "transactions"]);
        assert_eq!(report.get("totalSales").unwrap().change_pct, Some(-3.5));
        assert_eq!(report.get("transactions").unwrap().change_pct, None);
        assert!(report.get("currency").is_none());
    }

    #[test]
    fn test_metrics_body_must_be_object() {
        assert!(matches!(parse_metrics(json!([1])), Err(ApiError::Shape(_))));
    }
}
