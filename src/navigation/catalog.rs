//! Built-in navigation definition for the store back office.

use super::{NavigationItem, NavigationSection, Role};
use std::{fs, path::Path};

use Role::*;

fn section(id: &str, label: &str, items: Vec<NavigationItem>) -> NavigationSection {
    NavigationSection {
        id: id.to_string(),
        label: label.to_string(),
        items,
        expanded: true,
    }
}

pub fn default_sections() -> Vec<NavigationSection> {
    vec![
        section(
            "overview",
            "Overview",
            vec![NavigationItem::new(
                "Dashboard",
                "/",
                &[Cashier, Manager, Admin],
                "Store KPIs and integration health",
            )],
        ),
        section(
            "sales",
            "Sales",
            vec![
                NavigationItem::new(
                    "Transactions",
                    "/transactions",
                    &[Cashier, Manager, Admin],
                    "Receipts rung up today",
                ),
                NavigationItem::new("Refunds", "/refunds", &[Manager, Admin], "Approve and audit refunds"),
                NavigationItem::new("Reports", "/reports", &[Manager, Admin], "Period sales reports"),
            ],
        ),
        section(
            "staff",
            "Staff",
            vec![
                NavigationItem::new("Cashiers", "/cashiers", &[Manager, Admin], "Roster and shift status"),
                NavigationItem::new("My shift", "/shift", &[Cashier], "Clock in, breaks, clock out"),
            ],
        ),
        section(
            "inventory",
            "Inventory",
            vec![
                NavigationItem::new("Products", "/products", &[Manager, Admin], "Catalog and pricing"),
                NavigationItem::new(
                    "Stock lookup",
                    "/stock",
                    &[Cashier, Manager, Admin],
                    "On-hand counts per store",
                ),
            ],
        ),
        section(
            "system",
            "System",
            vec![
                NavigationItem::new(
                    "Integrations",
                    "/integrations",
                    &[Manager, Admin],
                    "Payment, accounting and e-commerce links",
                ),
                NavigationItem::new("Settings", "/settings", &[Admin], "Store configuration"),
            ],
        ),
    ]
}

/// Load an alternative navigation definition from a JSON file.
///
/// # Errors
/// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
pub fn load_sections(path: &Path) -> Result<Vec<NavigationSection>, std::io::Error> {
    let buf = fs::read(path)?;
    serde_json::from_slice(&buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::visible_sections;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn test_every_path_is_unique() {
        let sections = default_sections();
        let mut seen = HashSet::new();
        for item in sections.iter().flat_map(|s| s.items.iter()) {
            assert!(seen.insert(item.path.clone()), "duplicate {}", item.path);
        }
    }

    #[test]
    fn test_every_role_sees_the_dashboard() {
        for role in [Cashier, Manager, Admin] {
            let visible = visible_sections(&default_sections(), Some(role));
            assert_eq!(visible[0].items[0].path, "/");
        }
    }

    #[test]
    fn test_load_sections_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navigation.json");
        fs::write(
            &path,
            r#"[{"id":"ops","label":"Ops","items":[
                {"label":"Floor","path":"/floor","requiredRoles":["manager"]},
                {"label":"Stockroom","path":"/stockroom","required_roles":["admin"]}
            ]}]"#,
        )
        .unwrap();

        let sections = load_sections(&path).unwrap();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].expanded);
        assert_eq!(sections[0].items[0].required_roles, vec![Manager]);
        assert_eq!(sections[0].items[1].required_roles, vec![Admin]);
        assert_eq!(sections[0].items[0].description, "");
    }

    #[test]
    fn test_sections_serialize_camel_case() {
        let json = serde_json::to_value(default_sections()).unwrap();
        let item = &json[0]["items"][0];
        assert_eq!(item["requiredRoles"][0], "cashier");
        assert!(item.get("required_roles").is_none());
    }

    #[test]
    fn test_load_sections_rejects_unknown_roles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navigation.json");
        fs::write(
            &path,
            r#"[{"id":"ops","label":"Ops","items":[
                {"label":"Floor","path":"/floor","requiredRoles":["owner"]}
            ]}]"#,
        )
        .unwrap();
        assert!(load_sections(&path).is_err());
    }
}
