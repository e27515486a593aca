//! Frame-polled state of a fetched value

use closet_integration::{IntegrationError, PendingRequest};

pub enum Remote<T> {
    Loading(PendingRequest<T>),
    Loaded(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn from_request(request: PendingRequest<T>) -> Self {
        Self::Loading(request)
    }

    /// Check the pending request. Returns whether the state changed.
    pub fn poll(&mut self) -> bool {
        let Remote::Loading(pending) = self else {
            return false;
        };
        match pending.try_recv() {
            Some(Ok(value)) => *self = Remote::Loaded(value),
            Some(Err(e)) => *self = Remote::Failed(describe(&e)),
            None => return false,
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Remote::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// User-facing text for a failed request
pub fn describe(error: &IntegrationError) -> String {
    match error {
        IntegrationError::Offline => "Cannot reach the closet server".to_string(),
        IntegrationError::Timeout => "The server took too long to answer".to_string(),
        other => other.to_string(),
    }
}
