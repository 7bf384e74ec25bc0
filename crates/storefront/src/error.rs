use thiserror::Error;

/// Failure talking to the storefront endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorefrontError {
    #[error("network error: {0}")]
    Network(String),
    /// Non-success status; `description` is the endpoint's own explanation when it sent one.
    #[error("storefront error ({status}): {description}")]
    Api { status: u16, description: String },
    #[error("parse error: {0}")]
    Parse(String),
    /// The response decoded but can't be used (e.g. a product without variants).
    #[error("unusable data: {0}")]
    Data(String),
}

impl StorefrontError {
    pub fn api(status: u16, description: impl Into<String>) -> Self {
        Self::Api {
            status,
            description: description.into(),
        }
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Text fit for showing to a shopper, when the endpoint provided one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Api { description, .. } if !description.is_empty() => Some(description),
            _ => None,
        }
    }
}
