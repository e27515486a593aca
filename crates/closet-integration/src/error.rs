use closet_core::InputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by server: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Server is offline or unreachable")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Input(#[from] InputError),
}

impl IntegrationError {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => IntegrationError::NotFound(message),
            400 | 422 => IntegrationError::Validation(message),
            _ => IntegrationError::ServerError { status, message },
        }
    }

    /// Whether the failure says the server could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, IntegrationError::Offline | IntegrationError::Timeout)
    }
}

impl From<reqwest::Error> for IntegrationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IntegrationError::Timeout
        } else if err.is_connect() {
            IntegrationError::Offline
        } else if err.is_decode() {
            IntegrationError::Serialization(err.to_string())
        } else {
            IntegrationError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IntegrationError {
    fn from(err: serde_json::Error) -> Self {
        IntegrationError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            IntegrationError::from_status(404, "Item not found".into()),
            IntegrationError::NotFound(_)
        ));
        assert!(matches!(
            IntegrationError::from_status(422, "bad".into()),
            IntegrationError::Validation(_)
        ));
        assert!(matches!(
            IntegrationError::from_status(400, "not an image".into()),
            IntegrationError::Validation(_)
        ));
        assert!(matches!(
            IntegrationError::from_status(500, "boom".into()),
            IntegrationError::ServerError { status: 500, .. }
        ));
    }

    #[test]
    fn test_error_display() {
        assert!(IntegrationError::Offline.to_string().contains("offline"));
        assert!(IntegrationError::Timeout.to_string().contains("timed out"));
        let server = IntegrationError::ServerError { status: 503, message: "down".into() };
        assert!(server.to_string().contains("503"));
        let input: IntegrationError = InputError::NoFiles.into();
        assert_eq!(input.to_string(), "No files selected");
        assert!(IntegrationError::Timeout.is_connectivity());
        assert!(!input.is_connectivity());
    }
}
