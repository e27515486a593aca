use thiserror::Error;

/// Problems with user input caught before any request is sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("No files selected")]
    NoFiles,

    #[error("Purchase price must be a number, got \"{0}\"")]
    InvalidPrice(String),

    #[error("Purchase price cannot be negative")]
    NegativePrice,

    #[error("Purchase date must look like YYYY-MM-DD, got \"{0}\"")]
    InvalidDate(String),
}
