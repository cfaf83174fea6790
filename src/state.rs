//! Decoded per-entity state and incremental delta application.

use crate::codec::{self, attr};
use crate::profile::*;
use crate::types::*;

/// Climate fields. `hvac_mode` is derived: a stopped unit is `Off` whatever its mode code says.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateState {
    mode: Option<HvacMode>,
    running: Option<bool>,
    fan_mode: Option<FanMode>,
    current_temperature: Option<f64>,
    target_temperature: Option<f64>,
    precision: Option<Precision>,
}

type ClimateView = (
    Option<HvacMode>,
    Option<FanMode>,
    Option<f64>,
    Option<f64>,
    Option<Precision>,
);

impl ClimateState {
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        match self.running {
            Some(false) => Some(HvacMode::Off),
            _ => self.mode,
        }
    }

    pub fn fan_mode(&self) -> Option<FanMode> {
        self.fan_mode
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.current_temperature
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Active precision; whole degrees until `tempUnit` says otherwise.
    pub fn precision(&self) -> Precision {
        self.precision.unwrap_or_default()
    }

    fn view(&self) -> ClimateView {
        (
            self.hvac_mode(),
            self.fan_mode,
            self.current_temperature,
            self.target_temperature,
            self.precision,
        )
    }

    fn apply(&mut self, delta: &[RawAttribute]) -> bool {
        let before = self.view();

        // precision first so temperatures in the same delta scale with it
        if let Some(unit) = delta_value(delta, attr::TEMP_UNIT).and_then(RawValue::as_i64) {
            self.precision = Some(codec::decode_precision(unit));
        }
        if let Some(v) = delta_value(delta, attr::AC_MODE) {
            self.mode = v.as_i64().and_then(codec::decode_mode);
        }
        if let Some(v) = delta_value(delta, attr::AC_RUNNING) {
            self.running = v.as_i64().map(|r| r != 0);
        }
        if let Some(v) = delta_value(delta, attr::AC_FAN_SPEED) {
            self.fan_mode = v.as_i64().and_then(codec::decode_fan_speed);
        }
        let precision = self.precision();
        if let Some(t) = delta_value(delta, attr::AC_CURRENT_TEMPERATURE)
            .and_then(RawValue::as_i64)
            .and_then(|raw| codec::decode_current_temperature(raw, precision))
        {
            self.current_temperature = Some(t);
        }
        if let Some(raw) =
            delta_value(delta, attr::AC_TARGET_TEMPERATURE).and_then(RawValue::as_i64)
        {
            self.target_temperature = Some(codec::decode_target_temperature(raw, precision));
        }

        self.view() != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchState {
    pub is_on: Option<bool>,
}

impl SwitchState {
    fn apply(&mut self, spec: &SwitchSpec, delta: &[RawAttribute]) -> bool {
        let before = self.clone();
        if let Some(v) = delta_value(delta, spec.value_attr) {
            self.is_on = Some(v.is_truthy());
        }
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightState {
    pub is_on: Option<bool>,
    /// 0..=255
    pub brightness: Option<u8>,
    /// Mireds.
    pub color_temp: Option<u16>,
    /// Degrees, 0..=360.
    pub hue: Option<f64>,
    /// Percent, 0..=100.
    pub saturation: Option<f64>,
    pub color_mode: Option<ColorMode>,
}

impl LightState {
    fn new(spec: &LightSpec) -> Self {
        Self {
            color_mode: Some(spec.color_mode),
            ..Default::default()
        }
    }

    pub fn hs_color(&self) -> Option<(f64, f64)> {
        Some((self.hue?, self.saturation?))
    }

    fn apply(&mut self, spec: &LightSpec, delta: &[RawAttribute]) -> bool {
        let before = self.clone();
        if let Some(v) = delta_value(delta, attr::ON) {
            self.is_on = Some(v.is_truthy());
        }
        if let Some(raw) = delta_value(delta, attr::BRIGHTNESS).and_then(RawValue::as_i64) {
            self.brightness = Some(raw.clamp(0, 255) as u8);
        }
        if let Some(raw) = delta_value(delta, attr::COLOR_TEMPERATURE).and_then(RawValue::as_i64) {
            self.color_temp = Some(raw.clamp(0, u16::MAX as i64) as u16);
            if spec.supports(ColorMode::ColorTemp) {
                self.color_mode = Some(ColorMode::ColorTemp);
            }
        }
        let hue = delta_value(delta, attr::HUE).and_then(RawValue::as_i64);
        let sat = delta_value(delta, attr::SATURATION).and_then(RawValue::as_i64);
        if let Some(raw) = hue {
            self.hue = Some(codec::decode_hue(raw));
        }
        if let Some(raw) = sat {
            self.saturation = Some(codec::decode_saturation(raw));
        }
        if (hue.is_some() || sat.is_some()) && spec.supports(ColorMode::Hs) {
            self.color_mode = Some(ColorMode::Hs);
        }
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverState {
    /// Percent open, 0..=100.
    pub position: Option<u8>,
}

impl CoverState {
    pub fn is_closed(&self) -> Option<bool> {
        self.position.map(|p| p == 0)
    }

    fn apply(&mut self, spec: &CoverSpec, delta: &[RawAttribute]) -> bool {
        let before = self.clone();
        if let Some(raw) = delta_value(delta, spec.position_attr).and_then(RawValue::as_i64) {
            self.position = Some(raw.clamp(0, 100) as u8);
        }
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinarySensorState {
    pub is_on: Option<bool>,
}

impl BinarySensorState {
    fn apply(&mut self, spec: &BinarySensorSpec, delta: &[RawAttribute]) -> bool {
        let before = self.clone();
        if let Some(v) = delta_value(delta, spec.value_attr) {
            self.is_on = match spec.value_map {
                Some(map) => v.as_i64().and_then(|code| codec::lookup(map, code)),
                None => Some(v.is_truthy()),
            };
        }
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorState {
    pub value: Option<f64>,
}

impl SensorState {
    fn apply(&mut self, spec: &SensorSpec, delta: &[RawAttribute]) -> bool {
        let before = self.clone();
        if let Some(v) = delta_value(delta, spec.value_attr) {
            let scaled = v.as_f64() / spec.divisor;
            self.value = Some(match spec.value_fn {
                Some(f) => f.apply(scaled),
                None => scaled,
            });
        }
        *self != before
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventState {
    pub last_event: Option<PressAction>,
    /// Number of events seen; repeated identical presses still count as changes.
    pub count: u64,
}

impl EventState {
    pub(crate) fn record(&mut self, spec: &EventSpec, action: PressAction) -> bool {
        if !spec.event_types.contains(&action) {
            return false;
        }
        self.last_event = Some(action);
        self.count += 1;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainState {
    Climate(ClimateState),
    Switch(SwitchState),
    Light(LightState),
    Cover(CoverState),
    BinarySensor(BinarySensorState),
    Sensor(SensorState),
    Event(EventState),
}

impl DomainState {
    /// Empty state for a freshly instantiated entity.
    pub fn new(spec: &EntitySpec) -> Self {
        match &spec.kind {
            SpecKind::Climate(_) => DomainState::Climate(ClimateState::default()),
            SpecKind::Switch(_) => DomainState::Switch(SwitchState::default()),
            SpecKind::Light(l) => DomainState::Light(LightState::new(l)),
            SpecKind::Cover(_) => DomainState::Cover(CoverState::default()),
            SpecKind::BinarySensor(_) => DomainState::BinarySensor(BinarySensorState::default()),
            SpecKind::Sensor(_) => DomainState::Sensor(SensorState::default()),
            SpecKind::Event(_) => DomainState::Event(EventState::default()),
        }
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            DomainState::Climate(_) => DomainKind::Climate,
            DomainState::Switch(_) => DomainKind::Switch,
            DomainState::Light(_) => DomainKind::Light,
            DomainState::Cover(_) => DomainKind::Cover,
            DomainState::BinarySensor(_) => DomainKind::BinarySensor,
            DomainState::Sensor(_) => DomainKind::Sensor,
            DomainState::Event(_) => DomainKind::Event,
        }
    }
}

/// Decode the attributes of `delta` this entity reads and overwrite only those fields.
/// Returns whether any decoded field changed.
pub fn apply_delta(spec: &EntitySpec, state: &mut DomainState, delta: &[RawAttribute]) -> bool {
    match (&spec.kind, state) {
        (SpecKind::Climate(_), DomainState::Climate(s)) => s.apply(delta),
        (SpecKind::Switch(k), DomainState::Switch(s)) => s.apply(k, delta),
        (SpecKind::Light(k), DomainState::Light(s)) => s.apply(k, delta),
        (SpecKind::Cover(k), DomainState::Cover(s)) => s.apply(k, delta),
        (SpecKind::BinarySensor(k), DomainState::BinarySensor(s)) => s.apply(k, delta),
        (SpecKind::Sensor(k), DomainState::Sensor(s)) => s.apply(k, delta),
        (SpecKind::Event(_), DomainState::Event(_)) => false,
        (_, state) => {
            tracing::debug!(
                spec = spec.domain_kind().as_str(),
                state = state.kind().as_str(),
                "state kind does not match entity"
            );
            false
        }
    }
}
