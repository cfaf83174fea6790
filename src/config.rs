use serde::Deserialize;

use crate::Result;

/// Host capabilities, fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Host accepts explicit climate turn on / turn off.
    pub climate_turn_on_off: bool,
    /// Host supports event entities for key-bearing devices.
    pub event_entities: bool,
}

impl EngineConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.climate_turn_on_off);
        assert!(!config.event_entities);
    }

    #[test]
    fn partial_json() {
        let config = EngineConfig::from_json(r#"{"event_entities": true}"#).unwrap();
        assert!(config.event_entities);
        assert!(!config.climate_turn_on_off);
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(crate::Error::Json(_))
        ));
    }
}
