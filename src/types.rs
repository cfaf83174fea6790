use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::DomainState;

/// A raw attribute value as the hub reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl RawValue {
    /// Integer view of the value. Booleans map to 0/1, floats only when integral.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            RawValue::Bool(b) => Some(b as i64),
            RawValue::Int(i) => Some(i),
            RawValue::Float(f) if f.fract() == 0.0 => Some(f as i64),
            RawValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            RawValue::Bool(b) => b as i64 as f64,
            RawValue::Int(i) => i as f64,
            RawValue::Float(f) => f,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match *self {
            RawValue::Bool(b) => b,
            RawValue::Int(i) => i != 0,
            RawValue::Float(f) => f != 0.0,
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One `{attr, value}` pair of the hub protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttribute {
    #[serde(rename = "attr")]
    pub name: String,
    pub value: RawValue,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Latest value for `name` in a delta. Later entries win.
pub(crate) fn delta_value<'a>(delta: &'a [RawAttribute], name: &str) -> Option<&'a RawValue> {
    delta.iter().rev().find(|a| a.name == name).map(|a| &a.value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Climate,
    Switch,
    Light,
    Cover,
    BinarySensor,
    Sensor,
    Event,
}

impl DomainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Climate => "climate",
            DomainKind::Switch => "switch",
            DomainKind::Light => "light",
            DomainKind::Cover => "cover",
            DomainKind::BinarySensor => "binary_sensor",
            DomainKind::Sensor => "sensor",
            DomainKind::Event => "event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Off,
    Cool,
    Dry,
    FanOnly,
    Heat,
}

impl HvacMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Off => "off",
            HvacMode::Cool => "cool",
            HvacMode::Dry => "dry",
            HvacMode::FanOnly => "fan_only",
            HvacMode::Heat => "heat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(HvacMode::Off),
            "cool" => Some(HvacMode::Cool),
            "dry" => Some(HvacMode::Dry),
            "fan_only" => Some(HvacMode::FanOnly),
            "heat" => Some(HvacMode::Heat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    High,
    Medium,
    Low,
}

impl FanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FanMode::High => "high",
            FanMode::Medium => "medium",
            FanMode::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(FanMode::High),
            "medium" => Some(FanMode::Medium),
            "low" => Some(FanMode::Low),
            _ => None,
        }
    }
}

/// Temperature resolution selected by the `tempUnit` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Whole,
    Tenth,
}

impl Precision {
    /// Raw hub integer to degrees.
    pub fn scale(&self, raw: i64) -> f64 {
        match self {
            Precision::Whole => raw as f64,
            Precision::Tenth => raw as f64 / 10.0,
        }
    }

    /// Degrees to the raw hub integer.
    pub fn unscale(&self, degrees: f64) -> i64 {
        match self {
            Precision::Whole => degrees.round() as i64,
            Precision::Tenth => (degrees * 10.0).round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Brightness,
    ColorTemp,
    Hs,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Brightness => "brightness",
            ColorMode::ColorTemp => "color_temp",
            ColorMode::Hs => "hs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Motion,
    Lock,
    Moisture,
    Gas,
    Presence,
    Outlet,
    Switch,
    Curtain,
    Temperature,
    Humidity,
    Illuminance,
    Battery,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Motion => "motion",
            DeviceClass::Lock => "lock",
            DeviceClass::Moisture => "moisture",
            DeviceClass::Gas => "gas",
            DeviceClass::Presence => "presence",
            DeviceClass::Outlet => "outlet",
            DeviceClass::Switch => "switch",
            DeviceClass::Curtain => "curtain",
            DeviceClass::Temperature => "temperature",
            DeviceClass::Humidity => "humidity",
            DeviceClass::Illuminance => "illuminance",
            DeviceClass::Battery => "battery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

/// Key actions reported by buttons, switches and dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    SinglePress,
    DoublePress,
    TriplePress,
    QuadruplePress,
    QuintuplePress,
    SextuplePress,
    SeptuplePress,
    OctuplePress,
    NonuplePress,
    LongPress,
    Rotation,
}

impl PressAction {
    const CLICKS: [PressAction; 9] = [
        PressAction::SinglePress,
        PressAction::DoublePress,
        PressAction::TriplePress,
        PressAction::QuadruplePress,
        PressAction::QuintuplePress,
        PressAction::SextuplePress,
        PressAction::SeptuplePress,
        PressAction::OctuplePress,
        PressAction::NonuplePress,
    ];

    /// Press action for a multi-click count (1..=9).
    pub fn from_click_times(times: u32) -> Option<Self> {
        let idx = usize::try_from(times).ok()?.checked_sub(1)?;
        Self::CLICKS.get(idx).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PressAction::SinglePress => "single_press",
            PressAction::DoublePress => "double_press",
            PressAction::TriplePress => "triple_press",
            PressAction::QuadruplePress => "quadruple_press",
            PressAction::QuintuplePress => "quintuple_press",
            PressAction::SextuplePress => "sextuple_press",
            PressAction::SeptuplePress => "septuple_press",
            PressAction::OctuplePress => "octuple_press",
            PressAction::NonuplePress => "nonuple_press",
            PressAction::LongPress => "long_press",
            PressAction::Rotation => "rotation",
        }
    }
}

/// Notifications emitted to the host platform.
#[derive(Debug, Clone)]
pub enum Event {
    EntitiesResolved {
        device_id: String,
        profile_id: u32,
        count: usize,
    },
    EntityMaterialized {
        device_id: String,
        entity_id: String,
        kind: DomainKind,
    },
    StateChanged {
        device_id: String,
        entity_id: String,
        state: DomainState,
    },
    /// An entity dropped because its device was re-registered with another profile.
    EntityRemoved {
        device_id: String,
        entity_id: String,
    },
    DeviceRemoved {
        device_id: String,
    },
}
