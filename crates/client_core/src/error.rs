use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum ErrorClass {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("invalid grid size '{0}': must be a whole number in 1..=20")]
    InvalidGridSize(String),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("invalid speed limit {0}: must be a positive number")]
    InvalidSpeedLimit(f64),
    #[error("start point ({x}, {y}) is not a known delivery point")]
    UnknownStartPoint { x: u32, y: u32 },
    #[error("delivery service unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("delivery service rejected the request (status {status}): {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("no route from start point: {0}")]
    RouteUnreachable(String),
    #[error("malformed response from delivery service: {0}")]
    MalformedResponse(String),
}

impl RouteError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidGridSize(_)
            | Self::InvalidCoordinate(_)
            | Self::InvalidSpeedLimit(_)
            | Self::UnknownStartPoint { .. } => ErrorClass::Local,
            Self::RemoteUnavailable(_)
            | Self::RemoteRejected { .. }
            | Self::RouteUnreachable(_)
            | Self::MalformedResponse(_) => ErrorClass::Remote,
        }
    }

    pub fn is_local(&self) -> bool {
        self.class() == ErrorClass::Local
    }

    pub fn is_remote(&self) -> bool {
        self.class() == ErrorClass::Remote
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::MalformedResponse(value.to_string())
        } else {
            Self::RemoteUnavailable(value.to_string())
        }
    }
}

impl From<shared::error::CoordinateParseError> for RouteError {
    fn from(value: shared::error::CoordinateParseError) -> Self {
        Self::MalformedResponse(value.to_string())
    }
}
