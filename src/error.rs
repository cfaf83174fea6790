use std::fmt;

use crate::types::DomainKind;

#[derive(Debug)]
pub enum Error {
    UnsupportedHvacMode(String),
    UnsupportedFanMode(String),
    UnsupportedIntent {
        kind: DomainKind,
        intent: &'static str,
    },
    OutOfRange {
        field: &'static str,
        value: f64,
    },
    UnknownDevice(String),
    UnknownEntity {
        device_id: String,
        entity_id: String,
    },
    Protocol(String),
    TransportClosed,
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedHvacMode(mode) => write!(f, "unsupported hvac mode: {mode}"),
            Error::UnsupportedFanMode(mode) => write!(f, "unsupported fan mode: {mode}"),
            Error::UnsupportedIntent { kind, intent } => {
                write!(f, "intent {intent} not supported by {} entity", kind.as_str())
            }
            Error::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            Error::UnknownDevice(id) => write!(f, "unknown device: {id}"),
            Error::UnknownEntity {
                device_id,
                entity_id,
            } => write!(f, "unknown entity {entity_id} on device {device_id}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::TransportClosed => write!(f, "transport closed"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
