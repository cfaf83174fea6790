//! Domain intents to raw attribute writes.

use tracing::warn;

use crate::codec::{self, attr};
use crate::config::EngineConfig;
use crate::profile::*;
use crate::state::DomainState;
use crate::types::*;
use crate::{Error, Result};

/// A user-level request against one entity.
///
/// Mode intents carry the host's mode names and are validated here.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetHvacMode(String),
    SetFanMode(String),
    SetTargetTemperature(f64),
    TurnOn,
    TurnOff,
    TurnOnLight {
        brightness: Option<u8>,
        color_temp: Option<u16>,
        hs_color: Option<(f64, f64)>,
    },
    OpenCover,
    CloseCover,
    SetCoverPosition(u8),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetHvacMode(_) => "set_hvac_mode",
            Intent::SetFanMode(_) => "set_fan_mode",
            Intent::SetTargetTemperature(_) => "set_temperature",
            Intent::TurnOn => "turn_on",
            Intent::TurnOff => "turn_off",
            Intent::TurnOnLight { .. } => "turn_on_light",
            Intent::OpenCover => "open_cover",
            Intent::CloseCover => "close_cover",
            Intent::SetCoverPosition(_) => "set_cover_position",
        }
    }
}

/// Raw writes produced by one intent. More than one write must go out as a single batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBatch {
    pub writes: Vec<RawAttribute>,
}

impl CommandBatch {
    fn single(name: &str, value: impl Into<RawValue>) -> Self {
        Self {
            writes: vec![RawAttribute::new(name, value)],
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.writes.len() > 1
    }
}

fn unsupported(spec: &EntitySpec, intent: &Intent) -> Error {
    Error::UnsupportedIntent {
        kind: spec.domain_kind(),
        intent: intent.name(),
    }
}

/// Translate `intent` into writes. Rejected intents produce no writes at all.
pub fn build_command(
    spec: &EntitySpec,
    state: &DomainState,
    intent: &Intent,
    config: &EngineConfig,
) -> Result<CommandBatch> {
    let result = match &spec.kind {
        SpecKind::Climate(climate) => climate_command(climate, state, intent, config),
        SpecKind::Switch(switch) => match intent {
            Intent::TurnOn => Ok(CommandBatch::single(switch.value_attr, 1)),
            Intent::TurnOff => Ok(CommandBatch::single(switch.value_attr, 0)),
            _ => Err(unsupported(spec, intent)),
        },
        SpecKind::Light(light) => light_command(spec, light, intent),
        SpecKind::Cover(cover) => match intent {
            Intent::OpenCover => Ok(CommandBatch::single(cover.position_attr, 100)),
            Intent::CloseCover => Ok(CommandBatch::single(cover.position_attr, 0)),
            Intent::SetCoverPosition(p) if *p <= 100 => {
                Ok(CommandBatch::single(cover.position_attr, *p as i64))
            }
            Intent::SetCoverPosition(p) => Err(Error::OutOfRange {
                field: "position",
                value: *p as f64,
            }),
            _ => Err(unsupported(spec, intent)),
        },
        SpecKind::BinarySensor(_) | SpecKind::Sensor(_) | SpecKind::Event(_) => {
            Err(unsupported(spec, intent))
        }
    };
    if let Err(e) = &result {
        warn!(
            kind = spec.domain_kind().as_str(),
            intent = intent.name(),
            error = %e,
            "rejected intent"
        );
    }
    result
}

fn climate_command(
    spec: &ClimateSpec,
    state: &DomainState,
    intent: &Intent,
    config: &EngineConfig,
) -> Result<CommandBatch> {
    let precision = match state {
        DomainState::Climate(c) => c.precision(),
        _ => Precision::default(),
    };
    match intent {
        Intent::SetHvacMode(name) => {
            let mode = codec::hvac_mode_from_name(name)?;
            Ok(CommandBatch {
                writes: codec::hvac_mode_writes(mode),
            })
        }
        Intent::SetFanMode(name) => {
            let mode = codec::fan_mode_from_name(name)?;
            Ok(CommandBatch::single(
                attr::AC_FAN_SPEED,
                codec::encode_fan_speed(mode),
            ))
        }
        Intent::SetTargetTemperature(t) => {
            if !(spec.min_temp..=spec.max_temp).contains(t) {
                return Err(Error::OutOfRange {
                    field: "target_temperature",
                    value: *t,
                });
            }
            Ok(CommandBatch::single(
                attr::AC_TARGET_TEMPERATURE,
                codec::encode_target_temperature(*t, precision),
            ))
        }
        Intent::TurnOn if config.climate_turn_on_off => {
            Ok(CommandBatch::single(attr::AC_RUNNING, 1))
        }
        Intent::TurnOff if config.climate_turn_on_off => {
            Ok(CommandBatch::single(attr::AC_RUNNING, 0))
        }
        _ => Err(Error::UnsupportedIntent {
            kind: DomainKind::Climate,
            intent: intent.name(),
        }),
    }
}

fn light_command(spec: &EntitySpec, light: &LightSpec, intent: &Intent) -> Result<CommandBatch> {
    match intent {
        Intent::TurnOn => Ok(CommandBatch::single(attr::ON, 1)),
        Intent::TurnOff => Ok(CommandBatch::single(attr::ON, 0)),
        Intent::TurnOnLight {
            brightness,
            color_temp,
            hs_color,
        } => {
            if (color_temp.is_some() && !light.supports(ColorMode::ColorTemp))
                || (hs_color.is_some() && !light.supports(ColorMode::Hs))
            {
                return Err(unsupported(spec, intent));
            }
            let mut writes = vec![RawAttribute::new(attr::ON, 1)];
            if let Some(b) = brightness {
                writes.push(RawAttribute::new(attr::BRIGHTNESS, *b as i64));
            }
            if let Some(ct) = color_temp {
                writes.push(RawAttribute::new(attr::COLOR_TEMPERATURE, *ct as i64));
            }
            if let Some((hue, sat)) = hs_color {
                writes.push(RawAttribute::new(attr::HUE, codec::encode_hue(*hue)));
                writes.push(RawAttribute::new(attr::SATURATION, codec::encode_saturation(*sat)));
            }
            Ok(CommandBatch { writes })
        }
        _ => Err(unsupported(spec, intent)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::apply_delta;

    fn first(profile: u32) -> &'static EntitySpec {
        resolve_entities(profile, &EngineConfig::default())[0]
    }

    fn build(profile: u32, intent: Intent) -> Result<CommandBatch> {
        let spec = first(profile);
        build_command(spec, &DomainState::new(spec), &intent, &EngineConfig::default())
    }

    #[test]
    fn heat_is_atomic_pair() {
        let batch = build(AC_UNIT, Intent::SetHvacMode("heat".into())).unwrap();
        assert!(batch.is_atomic());
        assert_eq!(
            batch.writes,
            vec![
                RawAttribute::new("acRunning", 1),
                RawAttribute::new("acMode", 8)
            ]
        );
    }

    #[test]
    fn off_is_single_write() {
        let batch = build(HA_THERMOSTAT, Intent::SetHvacMode("off".into())).unwrap();
        assert!(!batch.is_atomic());
        assert_eq!(batch.writes, vec![RawAttribute::new("acRunning", 0)]);
    }

    #[test]
    fn every_running_mode_writes_its_code() {
        for (name, code) in [("cool", 1), ("dry", 2), ("fan_only", 4), ("heat", 8)] {
            let batch = build(SINGLE_AIR_CONDITIONER, Intent::SetHvacMode(name.into())).unwrap();
            assert_eq!(batch.writes[1], RawAttribute::new("acMode", code), "{name}");
        }
    }

    #[test]
    fn unknown_fan_mode_rejected() {
        let err = build(AC_UNIT, Intent::SetFanMode("turbo".into())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFanMode(ref m) if m == "turbo"));
    }

    #[test]
    fn unknown_hvac_mode_rejected() {
        let err = build(AC_UNIT, Intent::SetHvacMode("heat_cool".into())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedHvacMode(_)));
    }

    #[test]
    fn fan_mode_uses_inverted_codes() {
        let batch = build(AC_UNIT, Intent::SetFanMode("high".into())).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acFanSpeed", 1)]);
        let batch = build(AC_UNIT, Intent::SetFanMode("low".into())).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acFanSpeed", 4)]);
    }

    #[test]
    fn target_temperature_follows_precision() {
        let spec = first(AC_UNIT);
        let mut state = DomainState::new(spec);
        let config = EngineConfig::default();
        let intent = Intent::SetTargetTemperature(22.5);

        let batch = build_command(spec, &state, &intent, &config).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acTargetTemperature", 23)]);

        apply_delta(spec, &mut state, &[RawAttribute::new("tempUnit", 1)]);
        let batch = build_command(spec, &state, &intent, &config).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acTargetTemperature", 225)]);
    }

    #[test]
    fn target_temperature_range() {
        assert!(matches!(
            build(AC_UNIT, Intent::SetTargetTemperature(31.0)),
            Err(Error::OutOfRange { .. })
        ));
        assert!(build(AC_UNIT, Intent::SetTargetTemperature(16.0)).is_ok());
    }

    #[test]
    fn climate_turn_on_off_gated() {
        assert!(matches!(
            build(AC_UNIT, Intent::TurnOn),
            Err(Error::UnsupportedIntent {
                kind: DomainKind::Climate,
                ..
            })
        ));
        let spec = first(AC_UNIT);
        let config = EngineConfig {
            climate_turn_on_off: true,
            ..Default::default()
        };
        let state = DomainState::new(spec);
        let batch = build_command(spec, &state, &Intent::TurnOn, &config).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acRunning", 1)]);
        let batch = build_command(spec, &state, &Intent::TurnOff, &config).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("acRunning", 0)]);
    }

    #[test]
    fn sensors_accept_no_commands() {
        assert!(matches!(
            build(GAS, Intent::TurnOn),
            Err(Error::UnsupportedIntent {
                kind: DomainKind::BinarySensor,
                intent: "turn_on"
            })
        ));
        assert!(build(TEMPERATURE_HUMIDITY, Intent::TurnOff).is_err());
    }

    #[test]
    fn switch_writes_its_value_attr() {
        let specs = resolve_entities(ONOFF_LIGHT, &EngineConfig::default());
        let relay = specs.iter().find(|s| s.entity_id() == "disable_relay").unwrap();
        let state = DomainState::new(relay);
        let config = EngineConfig::default();
        let batch = build_command(relay, &state, &Intent::TurnOn, &config).unwrap();
        assert_eq!(batch.writes, vec![RawAttribute::new("disableRelay", 1)]);
    }

    #[test]
    fn light_batches_on_with_color() {
        let batch = build(
            EXTENDED_COLOR_LIGHT,
            Intent::TurnOnLight {
                brightness: Some(200),
                color_temp: None,
                hs_color: Some((180.0, 50.0)),
            },
        )
        .unwrap();
        assert!(batch.is_atomic());
        assert_eq!(
            batch.writes,
            vec![
                RawAttribute::new("on", 1),
                RawAttribute::new("brightness", 200),
                RawAttribute::new("hue", 128),
                RawAttribute::new("sat", 128),
            ]
        );
    }

    #[test]
    fn light_rejects_unsupported_color() {
        let err = build(
            COLOR_LIGHT,
            Intent::TurnOnLight {
                brightness: None,
                color_temp: Some(300),
                hs_color: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedIntent { kind: DomainKind::Light, .. }));
    }

    #[test]
    fn cover_positions() {
        assert_eq!(
            build(CURTAIN, Intent::OpenCover).unwrap().writes,
            vec![RawAttribute::new("curtainPercent", 100)]
        );
        assert_eq!(
            build(CURTAIN, Intent::SetCoverPosition(40)).unwrap().writes,
            vec![RawAttribute::new("curtainPercent", 40)]
        );
        assert!(matches!(
            build(CURTAIN, Intent::SetCoverPosition(101)),
            Err(Error::OutOfRange { field: "position", .. })
        ));
    }
}
