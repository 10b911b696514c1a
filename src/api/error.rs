//! Error handling for the api module

use crate::polling::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not valid JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// Valid JSON that does not match the endpoint contract.
    #[error("Unexpected payload: {0}")]
    Shape(String),
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    /// Transport problems are network failures; everything the server actually
    /// said, but said wrongly, is a protocol failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Reqwest(e) if e.is_decode() || e.is_status() => ErrorKind::ProtocolFailure,
            ApiError::Reqwest(_) => ErrorKind::NetworkFailure,
            ApiError::Decode(_) | ApiError::Http { .. } | ApiError::Shape(_) => {
                ErrorKind::ProtocolFailure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_payload_errors_are_protocol_failures() {
        let http = ApiError::Http {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(http.kind(), ErrorKind::ProtocolFailure);

        let decode = ApiError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(decode.kind(), ErrorKind::ProtocolFailure);

        let shape = ApiError::Shape("expected an array".to_string());
        assert_eq!(shape.kind(), ErrorKind::ProtocolFailure);
        assert_eq!(shape.to_string(), "Unexpected payload: expected an array");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        // port 9 on loopback has nothing listening
        let error = reqwest::Client::new()
            .get("http://127.0.0.1:9/api/cashiers")
            .send()
            .await
            .unwrap_err();
        assert_eq!(ApiError::from(error).kind(), ErrorKind::NetworkFailure);
    }
}
