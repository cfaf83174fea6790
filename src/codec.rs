//! Single-attribute decode/encode between hub codes and domain values.

use crate::types::*;
use crate::{Error, Result};

/// Hub attribute names.
pub mod attr {
    pub const AC_MODE: &str = "acMode";
    pub const AC_FAN_SPEED: &str = "acFanSpeed";
    pub const AC_CURRENT_TEMPERATURE: &str = "acCurrentTemperature";
    pub const AC_TARGET_TEMPERATURE: &str = "acTargetTemperature";
    pub const AC_RUNNING: &str = "acRunning";
    pub const TEMP_UNIT: &str = "tempUnit";

    pub const ON: &str = "on";
    pub const PURE_INPUT: &str = "pureInput";
    pub const DISABLE_RELAY: &str = "disableRelay";
    pub const DISABLED_RELAY_STATUS: &str = "disabledRelayStatus";

    pub const BRIGHTNESS: &str = "brightness";
    pub const COLOR_TEMPERATURE: &str = "colorTemperature";
    pub const HUE: &str = "hue";
    pub const SATURATION: &str = "sat";

    pub const CURTAIN_PERCENT: &str = "curtainPercent";

    pub const LOCK_STATE: &str = "lockState";
    pub const IAS_ZONE_STATUS: &str = "iasZoneStatus";
    pub const PRESENCE_STATUS: &str = "presenceStatus";
    pub const CONTACT: &str = "contact";
    pub const MOTION: &str = "motion";
    pub const MOTION_LEFT: &str = "motionL";
    pub const MOTION_RIGHT: &str = "motionR";

    pub const BATTERY: &str = "battery";
    pub const ILLUMINANCE: &str = "illuminance";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
}

/// `acCurrentTemperature` value meaning "no reading".
pub const NO_READING: i64 = 255;

// acMode: cool 1, dry 2, fan 4, heat 8
const MODE_CODES: [(i64, HvacMode); 4] = [
    (1, HvacMode::Cool),
    (2, HvacMode::Dry),
    (4, HvacMode::FanOnly),
    (8, HvacMode::Heat),
];

// acFanSpeed: the hub calls 1 "fast" and 4 "slow".
const FAN_CODES: [(i64, FanMode); 3] = [
    (1, FanMode::High),
    (2, FanMode::Medium),
    (4, FanMode::Low),
];

pub fn decode_mode(code: i64) -> Option<HvacMode> {
    MODE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, m)| *m)
}

/// `acMode` code for a running mode. `Off` has none, it is expressed through `acRunning`.
pub fn encode_mode(mode: HvacMode) -> Option<i64> {
    MODE_CODES
        .iter()
        .find(|(_, m)| *m == mode)
        .map(|(c, _)| *c)
}

pub fn decode_fan_speed(code: i64) -> Option<FanMode> {
    FAN_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, m)| *m)
}

pub fn encode_fan_speed(mode: FanMode) -> i64 {
    match mode {
        FanMode::High => 1,
        FanMode::Medium => 2,
        FanMode::Low => 4,
    }
}

pub fn decode_precision(temp_unit: i64) -> Precision {
    if temp_unit == 1 {
        Precision::Tenth
    } else {
        Precision::Whole
    }
}

/// Current temperature in degrees, `None` for the no-reading sentinel.
pub fn decode_current_temperature(raw: i64, precision: Precision) -> Option<f64> {
    if raw == NO_READING {
        return None;
    }
    Some(precision.scale(raw))
}

pub fn decode_target_temperature(raw: i64, precision: Precision) -> f64 {
    precision.scale(raw)
}

pub fn encode_target_temperature(degrees: f64, precision: Precision) -> i64 {
    precision.unscale(degrees)
}

/// Table lookup with no fallback: unmapped codes are unknown.
pub fn lookup(map: &[(i64, bool)], code: i64) -> Option<bool> {
    map.iter().find(|(c, _)| *c == code).map(|(_, v)| *v)
}

pub fn fan_mode_from_name(name: &str) -> Result<FanMode> {
    FanMode::parse(name).ok_or_else(|| Error::UnsupportedFanMode(name.to_string()))
}

pub fn hvac_mode_from_name(name: &str) -> Result<HvacMode> {
    HvacMode::parse(name).ok_or_else(|| Error::UnsupportedHvacMode(name.to_string()))
}

/// Writes that put the unit into `mode`: `acRunning` first, then `acMode` when running.
pub fn hvac_mode_writes(mode: HvacMode) -> Vec<RawAttribute> {
    match encode_mode(mode) {
        Some(code) => vec![
            RawAttribute::new(attr::AC_RUNNING, 1),
            RawAttribute::new(attr::AC_MODE, code),
        ],
        None => vec![RawAttribute::new(attr::AC_RUNNING, 0)],
    }
}

// Hub hue and saturation are 0..=255.
pub fn decode_hue(raw: i64) -> f64 {
    raw.clamp(0, 255) as f64 * 360.0 / 255.0
}

pub fn encode_hue(degrees: f64) -> i64 {
    (degrees.clamp(0.0, 360.0) * 255.0 / 360.0).round() as i64
}

pub fn decode_saturation(raw: i64) -> f64 {
    raw.clamp(0, 255) as f64 * 100.0 / 255.0
}

pub fn encode_saturation(percent: f64) -> i64 {
    (percent.clamp(0.0, 100.0) * 255.0 / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes() {
        assert_eq!(decode_mode(1), Some(HvacMode::Cool));
        assert_eq!(decode_mode(2), Some(HvacMode::Dry));
        assert_eq!(decode_mode(4), Some(HvacMode::FanOnly));
        assert_eq!(decode_mode(8), Some(HvacMode::Heat));
        for code in [0, 3, 5, 7, 9, 16, -1, 255] {
            assert_eq!(decode_mode(code), None, "code {code}");
        }
    }

    #[test]
    fn fan_speed_is_inverted() {
        assert_eq!(decode_fan_speed(1), Some(FanMode::High));
        assert_eq!(decode_fan_speed(2), Some(FanMode::Medium));
        assert_eq!(decode_fan_speed(4), Some(FanMode::Low));
        assert_eq!(decode_fan_speed(3), None);
        for mode in [FanMode::Low, FanMode::Medium, FanMode::High] {
            assert_eq!(decode_fan_speed(encode_fan_speed(mode)), Some(mode));
        }
    }

    #[test]
    fn off_has_no_mode_code() {
        assert_eq!(encode_mode(HvacMode::Off), None);
        assert_eq!(encode_mode(HvacMode::Heat), Some(8));
    }

    #[test]
    fn precision_from_unit() {
        assert_eq!(decode_precision(1), Precision::Tenth);
        assert_eq!(decode_precision(0), Precision::Whole);
        assert_eq!(decode_precision(2), Precision::Whole);
    }

    #[test]
    fn current_temperature_sentinel() {
        assert_eq!(decode_current_temperature(255, Precision::Tenth), None);
        assert_eq!(decode_current_temperature(255, Precision::Whole), None);
        assert_eq!(decode_current_temperature(200, Precision::Tenth), Some(20.0));
        assert_eq!(decode_current_temperature(26, Precision::Whole), Some(26.0));
    }

    #[test]
    fn target_temperature_encoding() {
        assert_eq!(encode_target_temperature(22.5, Precision::Tenth), 225);
        assert_eq!(encode_target_temperature(22.0, Precision::Whole), 22);
        assert_eq!(decode_target_temperature(225, Precision::Tenth), 22.5);
    }

    #[test]
    fn lookup_has_no_default() {
        let map = [(32, false), (33, true)];
        assert_eq!(lookup(&map, 32), Some(false));
        assert_eq!(lookup(&map, 33), Some(true));
        assert_eq!(lookup(&map, 0), None);
        assert_eq!(lookup(&map, 1), None);
    }

    #[test]
    fn hvac_writes() {
        let writes = hvac_mode_writes(HvacMode::Heat);
        assert_eq!(
            writes,
            vec![
                RawAttribute::new("acRunning", 1),
                RawAttribute::new("acMode", 8)
            ]
        );
        assert_eq!(
            hvac_mode_writes(HvacMode::Off),
            vec![RawAttribute::new("acRunning", 0)]
        );
    }

    #[test]
    fn unknown_names_rejected() {
        assert!(matches!(
            fan_mode_from_name("turbo"),
            Err(Error::UnsupportedFanMode(m)) if m == "turbo"
        ));
        assert!(matches!(
            hvac_mode_from_name("auto"),
            Err(Error::UnsupportedHvacMode(_))
        ));
        assert_eq!(hvac_mode_from_name("fan_only").unwrap(), HvacMode::FanOnly);
    }

    #[test]
    fn hue_saturation_scaling() {
        assert_eq!(decode_hue(255), 360.0);
        assert_eq!(decode_hue(0), 0.0);
        assert_eq!(encode_hue(180.0), 128);
        assert_eq!(decode_saturation(255), 100.0);
        assert_eq!(encode_saturation(50.0), 128);
    }
}
