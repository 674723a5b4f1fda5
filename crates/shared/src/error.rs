use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the delivery service attaches to rejected requests. Depending on the
/// backend framework the text arrives as `message`, `detail` or `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .or(self.error.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    #[error("coordinate '{0}' is not of the form 'x, y'")]
    MissingSeparator(String),
    #[error("coordinate '{raw}' has a non-numeric component '{component}'")]
    InvalidComponent { raw: String, component: String },
}
