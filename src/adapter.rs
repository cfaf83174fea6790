use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::command::{CommandBatch, Intent};
use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::logger::{MessageLogMode, MessageLogger};
use crate::profile::{profile_entities, resolve_entities, EntitySpec};
use crate::protocol::parse_report;
use crate::transport::Transport;
use crate::types::*;
use crate::{Error, Result};

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

pub struct HubAdapterBuilder {
    transport: Box<dyn Transport>,
    config: EngineConfig,
    event_callbacks: Vec<EventCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl HubAdapterBuilder {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            config: EngineConfig::default(),
            event_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn climate_turn_on_off(mut self, enabled: bool) -> Self {
        self.config.climate_turn_on_off = enabled;
        self
    }

    pub fn event_entities(mut self, enabled: bool) -> Self {
        self.config.event_entities = enabled;
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<HubAdapter> {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        Ok(HubAdapter {
            transport: self.transport,
            config: self.config,
            devices: HashMap::new(),
            event_callbacks: self.event_callbacks,
            logger,
        })
    }
}

struct Device {
    profile_id: u32,
    model: Option<String>,
    entities: Vec<Entity>,
}

/// Routes hub deltas to the entities of each device and entity commands back to the hub.
///
/// Calls for one device must be made in hub delivery order.
pub struct HubAdapter {
    transport: Box<dyn Transport>,
    config: EngineConfig,
    devices: HashMap<String, Device>,
    event_callbacks: Vec<EventCallback>,
    logger: Option<MessageLogger>,
}

impl HubAdapter {
    pub fn builder(transport: impl Transport + 'static) -> HubAdapterBuilder {
        HubAdapterBuilder::new(transport)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register `device_id` with `profile_id` and return the specs of its entities.
    pub fn resolve_entities(
        &mut self,
        device_id: &str,
        profile_id: u32,
    ) -> Vec<&'static EntitySpec> {
        self.register_device(device_id, profile_id, None)
    }

    /// Register or re-register a device. Re-registering with the same profile keeps entity state;
    /// a different profile drops every existing entity (one `EntityRemoved` each) and
    /// rebuilds the set.
    pub fn register_device(
        &mut self,
        device_id: &str,
        profile_id: u32,
        model: Option<&str>,
    ) -> Vec<&'static EntitySpec> {
        if let Some(device) = self.devices.get_mut(device_id)
            && device.profile_id == profile_id
        {
            if model.is_some() {
                device.model = model.map(str::to_string);
            }
            return device.entities.iter().map(Entity::spec).collect();
        }

        if profile_entities(profile_id).is_none() {
            warn!(device_id, profile_id, "unknown profile, no entities exposed");
        }
        let specs = resolve_entities(profile_id, &self.config);
        let entities: Vec<Entity> = specs.iter().map(|s| Entity::new(device_id, *s)).collect();
        debug!(device_id, profile_id, count = entities.len(), "device registered");

        let mut events: Vec<Event> = self
            .devices
            .get(device_id)
            .map(|previous| {
                previous
                    .entities
                    .iter()
                    .map(|e| Event::EntityRemoved {
                        device_id: device_id.to_string(),
                        entity_id: e.id().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        events.push(Event::EntitiesResolved {
            device_id: device_id.to_string(),
            profile_id,
            count: entities.len(),
        });
        events.extend(
            entities
                .iter()
                .filter(|e| e.is_materialized())
                .map(|e| Event::EntityMaterialized {
                    device_id: device_id.to_string(),
                    entity_id: e.id().to_string(),
                    kind: e.kind(),
                }),
        );

        self.devices.insert(
            device_id.to_string(),
            Device {
                profile_id,
                model: model.map(str::to_string),
                entities,
            },
        );
        self.emit(&events);
        specs
    }

    pub fn remove_device(&mut self, device_id: &str) -> bool {
        if self.devices.remove(device_id).is_none() {
            return false;
        }
        if let Some(ref mut logger) = self.logger {
            logger.forget(device_id);
        }
        debug!(device_id, "device removed");
        self.emit(&[Event::DeviceRemoved {
            device_id: device_id.to_string(),
        }]);
        true
    }

    /// Apply an attribute delta to every entity of the device. Returns how many
    /// visible entities changed.
    pub fn on_delta(&mut self, device_id: &str, attrs: &[RawAttribute]) -> usize {
        let Some(device) = self.devices.get_mut(device_id) else {
            debug!(device_id, "delta for unregistered device ignored");
            return 0;
        };
        if let Some(ref mut logger) = self.logger {
            logger.log_delta(device_id, attrs);
        }

        let mut events = Vec::new();
        for entity in &mut device.entities {
            let outcome = entity.apply_delta(attrs);
            if outcome.materialized {
                events.push(Event::EntityMaterialized {
                    device_id: device_id.to_string(),
                    entity_id: entity.id().to_string(),
                    kind: entity.kind(),
                });
            }
            if outcome.changed && entity.is_materialized() {
                events.push(Event::StateChanged {
                    device_id: device_id.to_string(),
                    entity_id: entity.id().to_string(),
                    state: entity.state().clone(),
                });
            }
        }

        let changed = events
            .iter()
            .filter(|e| matches!(e, Event::StateChanged { .. }))
            .count();
        trace!(device_id, attrs = attrs.len(), changed, "delta applied");
        self.emit(&events);
        changed
    }

    /// Apply a raw JSON report covering one or more devices.
    pub fn on_report(&mut self, body: &str) -> Result<usize> {
        let deltas = parse_report(body)?;
        Ok(deltas
            .iter()
            .map(|(device_id, attrs)| self.on_delta(device_id, attrs))
            .sum())
    }

    /// Deliver a key action to the device's event entities.
    pub fn on_key_event(&mut self, device_id: &str, action: PressAction) -> bool {
        let Some(device) = self.devices.get_mut(device_id) else {
            debug!(device_id, "key event for unregistered device ignored");
            return false;
        };
        let events: Vec<Event> = device
            .entities
            .iter_mut()
            .filter_map(|entity| {
                entity.record_event(action).then(|| Event::StateChanged {
                    device_id: device_id.to_string(),
                    entity_id: entity.id().to_string(),
                    state: entity.state().clone(),
                })
            })
            .collect();
        self.emit(&events);
        !events.is_empty()
    }

    /// Deliver a multi-click key event (`click_times` 1..=9). Other counts are dropped.
    pub fn on_key_clicks(&mut self, device_id: &str, click_times: u32) -> bool {
        match PressAction::from_click_times(click_times) {
            Some(action) => self.on_key_event(device_id, action),
            None => {
                debug!(device_id, click_times, "unsupported click count ignored");
                false
            }
        }
    }

    /// Build and send the writes for `intent`. The entity's state is updated before the
    /// hub confirms; a later delta corrects it if the write is lost.
    pub fn command(
        &mut self,
        device_id: &str,
        entity_id: &str,
        intent: &Intent,
    ) -> Result<CommandBatch> {
        let device = self
            .devices
            .get_mut(device_id)
            .ok_or_else(|| Error::UnknownDevice(device_id.to_string()))?;
        let entity = device
            .entities
            .iter_mut()
            .find(|e| e.id() == entity_id)
            .ok_or_else(|| Error::UnknownEntity {
                device_id: device_id.to_string(),
                entity_id: entity_id.to_string(),
            })?;

        let (batch, changed) = entity.command(intent, &self.config)?;
        let state_event = (changed && entity.is_materialized()).then(|| Event::StateChanged {
            device_id: device_id.to_string(),
            entity_id: entity_id.to_string(),
            state: entity.state().clone(),
        });

        if let Some(ref mut logger) = self.logger {
            logger.log_command(device_id, entity_id, &batch.writes);
        }
        if let Some(event) = state_event {
            self.emit(&[event]);
        }

        let sent = match batch.writes.as_slice() {
            [single] => self.transport.set_attribute(device_id, single),
            writes => self.transport.set_attributes(device_id, writes),
        };
        if let Err(e) = sent {
            warn!(device_id, entity_id, error = %e, "failed to send command");
            return Err(e);
        }
        Ok(batch)
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn profile_id(&self, device_id: &str) -> Option<u32> {
        self.devices.get(device_id).map(|d| d.profile_id)
    }

    pub fn model(&self, device_id: &str) -> Option<&str> {
        self.devices.get(device_id).and_then(|d| d.model.as_deref())
    }

    pub fn entities(&self, device_id: &str) -> &[Entity] {
        self.devices
            .get(device_id)
            .map(|d| d.entities.as_slice())
            .unwrap_or_default()
    }

    pub fn entity(&self, device_id: &str, entity_id: &str) -> Option<&Entity> {
        self.entities(device_id).iter().find(|e| e.id() == entity_id)
    }

    fn emit(&self, events: &[Event]) {
        for event in events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
    }
}
