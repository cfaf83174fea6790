//! Entity description table: which entities a device exposes, keyed by profile id.

use crate::codec::attr;
use crate::config::EngineConfig;
use crate::types::*;

pub const PIR: u32 = 0;
pub const PLUG: u32 = 1;
pub const ONOFF_LIGHT: u32 = 2;
pub const DOOR_SENSOR: u32 = 3;
pub const SWITCH: u32 = 4;
pub const CURTAIN: u32 = 5;
pub const BUTTON: u32 = 6;
pub const SMART_DIAL: u32 = 7;
pub const COLOR_LIGHT: u32 = 8;
pub const AC_UNIT: u32 = 10;
pub const LOCK: u32 = 11;
pub const EXTENDED_COLOR_LIGHT: u32 = 12;
pub const COLOR_TEMPERATURE_LIGHT: u32 = 13;
pub const TEMPERATURE_HUMIDITY: u32 = 15;
pub const DIMMABLE_COLOR_TEMPERATURE_LIGHT: u32 = 17;
pub const OCCUPANCY_SENSOR: u32 = 18;
pub const DIMMABLE_LIGHT: u32 = 19;
pub const DIMMABLE_LIGHT2: u32 = 20;
pub const RH3020: u32 = 22;
pub const GAS: u32 = 24;
pub const COLOR_DIMMABLE_LIGHT: u32 = 26;
pub const EXTENDED_COLOR_LIGHT2: u32 = 27;
pub const HA_THERMOSTAT: u32 = 34;
pub const SINGLE_AIR_CONDITIONER: u32 = 36;
pub const PRESENCE_SENSOR: u32 = 43;

/// Display name of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityName {
    /// Primary function of the device: use the device's own name.
    Device,
    Label(&'static str),
}

/// Monotonic transform applied after scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFn {
    ClampMax(f64),
}

impl ValueFn {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ValueFn::ClampMax(max) => value.min(max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSpec {
    pub min_temp: f64,
    pub max_temp: f64,
    pub target_step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchSpec {
    pub value_attr: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpec {
    pub color_mode: ColorMode,
    pub supported_color_modes: &'static [ColorMode],
}

impl LightSpec {
    pub fn supports(&self, mode: ColorMode) -> bool {
        self.supported_color_modes.contains(&mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverSpec {
    pub position_attr: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinarySensorSpec {
    pub value_attr: &'static str,
    /// Explicit code table. Without one, any non-zero value is on.
    pub value_map: Option<&'static [(i64, bool)]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSpec {
    pub value_attr: &'static str,
    pub divisor: f64,
    pub value_fn: Option<ValueFn>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSpec {
    pub event_types: &'static [PressAction],
}

/// Kind-specific decode rules, one variant per domain kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecKind {
    Climate(ClimateSpec),
    Switch(SwitchSpec),
    Light(LightSpec),
    Cover(CoverSpec),
    BinarySensor(BinarySensorSpec),
    Sensor(SensorSpec),
    Event(EventSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySpec {
    pub key: &'static str,
    pub sub_key: Option<&'static str>,
    pub name: EntityName,
    pub entity_category: Option<EntityCategory>,
    pub icon: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    /// Attributes that must have been seen before the entity is exposed.
    pub required_attrs: &'static [&'static str],
    pub enabled_by_default: bool,
    pub kind: SpecKind,
}

impl EntitySpec {
    const fn new(key: &'static str, kind: SpecKind) -> Self {
        Self {
            key,
            sub_key: None,
            name: EntityName::Device,
            entity_category: None,
            icon: None,
            device_class: None,
            required_attrs: &[],
            enabled_by_default: true,
            kind,
        }
    }

    const fn sub_key(mut self, sub_key: &'static str) -> Self {
        self.sub_key = Some(sub_key);
        self
    }

    const fn named(mut self, label: &'static str) -> Self {
        self.name = EntityName::Label(label);
        self
    }

    const fn class(mut self, class: DeviceClass) -> Self {
        self.device_class = Some(class);
        self
    }

    const fn category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    const fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    const fn requires(mut self, attrs: &'static [&'static str]) -> Self {
        self.required_attrs = attrs;
        self
    }

    const fn disabled(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }

    pub fn domain_kind(&self) -> DomainKind {
        match self.kind {
            SpecKind::Climate(_) => DomainKind::Climate,
            SpecKind::Switch(_) => DomainKind::Switch,
            SpecKind::Light(_) => DomainKind::Light,
            SpecKind::Cover(_) => DomainKind::Cover,
            SpecKind::BinarySensor(_) => DomainKind::BinarySensor,
            SpecKind::Sensor(_) => DomainKind::Sensor,
            SpecKind::Event(_) => DomainKind::Event,
        }
    }

    /// Identifier unique within one device.
    pub fn entity_id(&self) -> &'static str {
        self.sub_key.unwrap_or(self.key)
    }
}

const fn climate() -> EntitySpec {
    EntitySpec::new(
        "climate",
        SpecKind::Climate(ClimateSpec {
            min_temp: 16.0,
            max_temp: 30.0,
            target_step: 1.0,
        }),
    )
}

const fn switch(key: &'static str, value_attr: &'static str) -> EntitySpec {
    EntitySpec::new(key, SpecKind::Switch(SwitchSpec { value_attr }))
}

const fn light(color_mode: ColorMode, supported_color_modes: &'static [ColorMode]) -> EntitySpec {
    EntitySpec::new(
        "light",
        SpecKind::Light(LightSpec {
            color_mode,
            supported_color_modes,
        }),
    )
}

const fn binary_sensor(key: &'static str, value_attr: &'static str) -> EntitySpec {
    EntitySpec::new(
        key,
        SpecKind::BinarySensor(BinarySensorSpec {
            value_attr,
            value_map: None,
        }),
    )
}

const fn mapped_binary_sensor(
    key: &'static str,
    value_attr: &'static str,
    value_map: &'static [(i64, bool)],
) -> EntitySpec {
    EntitySpec::new(
        key,
        SpecKind::BinarySensor(BinarySensorSpec {
            value_attr,
            value_map: Some(value_map),
        }),
    )
}

const fn sensor(value_attr: &'static str, divisor: f64, unit: &'static str) -> EntitySpec {
    EntitySpec::new(
        value_attr,
        SpecKind::Sensor(SensorSpec {
            value_attr,
            divisor,
            value_fn: None,
            unit,
        }),
    )
}

const fn temperature() -> EntitySpec {
    sensor(attr::TEMPERATURE, 10.0, "°C")
        .named("Temperature")
        .class(DeviceClass::Temperature)
}

const fn humidity() -> EntitySpec {
    sensor(attr::HUMIDITY, 10.0, "%")
        .named("Humidity")
        .class(DeviceClass::Humidity)
}

const fn illuminance() -> EntitySpec {
    sensor(attr::ILLUMINANCE, 1.0, "lx")
        .named("Illuminance")
        .class(DeviceClass::Illuminance)
}

const fn battery() -> EntitySpec {
    sensor(attr::BATTERY, 1.0, "%")
        .named("Battery")
        .class(DeviceClass::Battery)
        .category(EntityCategory::Diagnostic)
}

const fn clamped_battery() -> EntitySpec {
    EntitySpec::new(
        attr::BATTERY,
        SpecKind::Sensor(SensorSpec {
            value_attr: attr::BATTERY,
            divisor: 1.0,
            value_fn: Some(ValueFn::ClampMax(100.0)),
            unit: "%",
        }),
    )
    .named("Battery")
    .class(DeviceClass::Battery)
    .category(EntityCategory::Diagnostic)
}

const fn events(event_types: &'static [PressAction]) -> EntitySpec {
    EntitySpec::new("event", SpecKind::Event(EventSpec { event_types })).named("Key")
}

const IAS_ZONE_MAP: &[(i64, bool)] = &[(32, false), (33, true)];
const LOCK_STATE_MAP: &[(i64, bool)] = &[(1, false), (2, true)];

const HS_ONLY: &[ColorMode] = &[ColorMode::Hs];
const HS_AND_COLOR_TEMP: &[ColorMode] = &[ColorMode::ColorTemp, ColorMode::Hs];
const COLOR_TEMP_ONLY: &[ColorMode] = &[ColorMode::ColorTemp];
const BRIGHTNESS_ONLY: &[ColorMode] = &[ColorMode::Brightness];

const KEY_ACTIONS: &[PressAction] = &[
    PressAction::LongPress,
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

const DIAL_ACTIONS: &[PressAction] = &[
    PressAction::LongPress,
    PressAction::SinglePress,
    PressAction::DoublePress,
    PressAction::TriplePress,
    PressAction::QuadruplePress,
    PressAction::QuintuplePress,
    PressAction::SextuplePress,
    PressAction::SeptuplePress,
    PressAction::OctuplePress,
    PressAction::NonuplePress,
    PressAction::Rotation,
];

static KEY_EVENTS: EntitySpec = events(KEY_ACTIONS);
static DIAL_EVENTS: EntitySpec = events(DIAL_ACTIONS);

static PIR_ENTITIES: &[EntitySpec] = &[
    temperature(),
    illuminance(),
    battery(),
    binary_sensor("motion", attr::MOTION_LEFT)
        .sub_key("motionl")
        .named("Motion Left")
        .class(DeviceClass::Motion),
    binary_sensor("motion", attr::MOTION_RIGHT)
        .sub_key("motionr")
        .named("Motion Right")
        .class(DeviceClass::Motion),
    binary_sensor("motion", attr::MOTION)
        .sub_key("motion")
        .named("Motion")
        .class(DeviceClass::Motion)
        .disabled(),
];

static PLUG_ENTITIES: &[EntitySpec] = &[switch("switch", attr::ON).class(DeviceClass::Outlet)];

static ONOFF_LIGHT_ENTITIES: &[EntitySpec] = &[
    switch("wallswitch", attr::ON).class(DeviceClass::Switch),
    switch("switch", attr::PURE_INPUT)
        .sub_key("pure_input")
        .category(EntityCategory::Config)
        .icon("mdi:remote")
        .named("Wireless Switch Enabled"),
    switch("disable_relay", attr::DISABLE_RELAY)
        .sub_key("disable_relay")
        .category(EntityCategory::Config)
        .named("Relay Disabled"),
    switch("disabled_relay_status", attr::DISABLED_RELAY_STATUS)
        .sub_key("disabled_relay_status")
        .category(EntityCategory::Config)
        .named("Relay is always on"),
];

static DOOR_SENSOR_ENTITIES: &[EntitySpec] = &[
    binary_sensor("contact", attr::CONTACT),
    temperature(),
    battery(),
];

static SWITCH_ENTITIES: &[EntitySpec] = &[switch("switch", attr::ON).class(DeviceClass::Switch)];

static CURTAIN_ENTITIES: &[EntitySpec] = &[EntitySpec::new(
    "cover",
    SpecKind::Cover(CoverSpec {
        position_attr: attr::CURTAIN_PERCENT,
    }),
)
.class(DeviceClass::Curtain)];

static SMART_DIAL_ENTITIES: &[EntitySpec] = &[battery()];

static CLIMATE_ENTITIES: &[EntitySpec] = &[climate()];

static LOCK_ENTITIES: &[EntitySpec] = &[
    mapped_binary_sensor("lock", attr::LOCK_STATE, LOCK_STATE_MAP).class(DeviceClass::Lock),
    battery(),
];

static HS_LIGHT_ENTITIES: &[EntitySpec] = &[light(ColorMode::Hs, HS_ONLY)];
static EXTENDED_COLOR_LIGHT_ENTITIES: &[EntitySpec] = &[light(ColorMode::Hs, HS_AND_COLOR_TEMP)];
static COLOR_TEMP_LIGHT_ENTITIES: &[EntitySpec] = &[light(ColorMode::ColorTemp, COLOR_TEMP_ONLY)];
static DIMMABLE_LIGHT_ENTITIES: &[EntitySpec] = &[light(ColorMode::Brightness, BRIGHTNESS_ONLY)];

static TEMPERATURE_HUMIDITY_ENTITIES: &[EntitySpec] = &[temperature(), humidity(), battery()];

static OCCUPANCY_ENTITIES: &[EntitySpec] = &[
    binary_sensor("motion", attr::MOTION)
        .sub_key("motion")
        .named("Motion")
        .class(DeviceClass::Motion),
    battery().requires(&[attr::BATTERY]),
    binary_sensor("motion", attr::MOTION_LEFT)
        .sub_key("motionl")
        .named("Motion Left")
        .class(DeviceClass::Motion)
        .requires(&[attr::MOTION_LEFT]),
    binary_sensor("motion", attr::MOTION_RIGHT)
        .sub_key("motionr")
        .named("Motion Right")
        .class(DeviceClass::Motion)
        .requires(&[attr::MOTION_RIGHT]),
];

static RH3020_ENTITIES: &[EntitySpec] = &[
    mapped_binary_sensor("moisture", attr::IAS_ZONE_STATUS, IAS_ZONE_MAP)
        .sub_key("moisture")
        .class(DeviceClass::Moisture),
    clamped_battery(),
];

static GAS_ENTITIES: &[EntitySpec] = &[
    mapped_binary_sensor("gas", attr::IAS_ZONE_STATUS, IAS_ZONE_MAP)
        .sub_key("gas")
        .class(DeviceClass::Gas),
];

static PRESENCE_ENTITIES: &[EntitySpec] = &[
    binary_sensor("presenceStatus", attr::PRESENCE_STATUS).class(DeviceClass::Presence),
];

/// Static entity list for a profile, `None` when the profile is unknown.
pub fn profile_entities(profile_id: u32) -> Option<&'static [EntitySpec]> {
    let entities = match profile_id {
        PIR => PIR_ENTITIES,
        PLUG => PLUG_ENTITIES,
        ONOFF_LIGHT => ONOFF_LIGHT_ENTITIES,
        DOOR_SENSOR => DOOR_SENSOR_ENTITIES,
        SWITCH => SWITCH_ENTITIES,
        CURTAIN => CURTAIN_ENTITIES,
        BUTTON => &[],
        SMART_DIAL => SMART_DIAL_ENTITIES,
        COLOR_LIGHT => HS_LIGHT_ENTITIES,
        AC_UNIT | HA_THERMOSTAT | SINGLE_AIR_CONDITIONER => CLIMATE_ENTITIES,
        LOCK => LOCK_ENTITIES,
        EXTENDED_COLOR_LIGHT | COLOR_DIMMABLE_LIGHT | EXTENDED_COLOR_LIGHT2 => {
            EXTENDED_COLOR_LIGHT_ENTITIES
        }
        COLOR_TEMPERATURE_LIGHT | DIMMABLE_COLOR_TEMPERATURE_LIGHT => COLOR_TEMP_LIGHT_ENTITIES,
        TEMPERATURE_HUMIDITY => TEMPERATURE_HUMIDITY_ENTITIES,
        OCCUPANCY_SENSOR => OCCUPANCY_ENTITIES,
        DIMMABLE_LIGHT | DIMMABLE_LIGHT2 => DIMMABLE_LIGHT_ENTITIES,
        RH3020 => RH3020_ENTITIES,
        GAS => GAS_ENTITIES,
        PRESENCE_SENSOR => PRESENCE_ENTITIES,
        _ => return None,
    };
    Some(entities)
}

fn event_entity(profile_id: u32) -> Option<&'static EntitySpec> {
    match profile_id {
        PIR | ONOFF_LIGHT | SWITCH | BUTTON => Some(&KEY_EVENTS),
        SMART_DIAL => Some(&DIAL_EVENTS),
        _ => None,
    }
}

/// Entities to instantiate for a device. Unknown profiles resolve to nothing.
pub fn resolve_entities(profile_id: u32, config: &EngineConfig) -> Vec<&'static EntitySpec> {
    let mut specs: Vec<&'static EntitySpec> = profile_entities(profile_id)
        .unwrap_or_default()
        .iter()
        .collect();
    if config.event_entities
        && let Some(spec) = event_entity(profile_id)
    {
        specs.push(spec);
    }
    specs
}
