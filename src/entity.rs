use tracing::{debug, trace};

use crate::command::{build_command, CommandBatch, Intent};
use crate::config::EngineConfig;
use crate::profile::{EntitySpec, SpecKind};
use crate::state::{apply_delta, DomainState};
use crate::types::*;
use crate::Result;

/// What a delta did to one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyOutcome {
    /// A decoded field differs from its previous value.
    pub changed: bool,
    /// The entity's required attributes were completed by this delta.
    pub materialized: bool,
}

/// One live entity of a device: its static description plus decoded state.
#[derive(Debug, Clone)]
pub struct Entity {
    device_id: String,
    spec: &'static EntitySpec,
    state: DomainState,
    seen: Vec<bool>,
    materialized: bool,
}

impl Entity {
    pub fn new(device_id: impl Into<String>, spec: &'static EntitySpec) -> Self {
        Self {
            device_id: device_id.into(),
            spec,
            state: DomainState::new(spec),
            seen: vec![false; spec.required_attrs.len()],
            materialized: spec.required_attrs.is_empty(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec.entity_id()
    }

    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.device_id, self.id())
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn spec(&self) -> &'static EntitySpec {
        self.spec
    }

    pub fn kind(&self) -> DomainKind {
        self.spec.domain_kind()
    }

    pub fn state(&self) -> &DomainState {
        &self.state
    }

    /// Whether the host may see this entity. Once true it stays true.
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn apply_delta(&mut self, delta: &[RawAttribute]) -> ApplyOutcome {
        let changed = apply_delta(self.spec, &mut self.state, delta);

        let mut materialized = false;
        if !self.materialized {
            for (seen, name) in self.seen.iter_mut().zip(self.spec.required_attrs) {
                if !*seen && delta.iter().any(|a| a.name == *name) {
                    *seen = true;
                }
            }
            if self.seen.iter().all(|s| *s) {
                debug!(entity = %self.unique_id(), "required attributes observed");
                self.materialized = true;
                materialized = true;
            }
        }

        if changed {
            trace!(entity = %self.unique_id(), state = ?self.state, "state updated");
        }
        ApplyOutcome {
            changed,
            materialized,
        }
    }

    /// Build the writes for `intent` and apply them to the local state ahead of confirmation.
    /// A rejected intent leaves the state untouched.
    pub fn command(
        &mut self,
        intent: &Intent,
        config: &EngineConfig,
    ) -> Result<(CommandBatch, bool)> {
        let batch = build_command(self.spec, &self.state, intent, config)?;
        let changed = apply_delta(self.spec, &mut self.state, &batch.writes);
        debug!(
            entity = %self.unique_id(),
            intent = intent.name(),
            writes = batch.writes.len(),
            "command built"
        );
        Ok((batch, changed))
    }

    /// Record a key action on an event entity. Other kinds ignore it.
    pub fn record_event(&mut self, action: PressAction) -> bool {
        match (&self.spec.kind, &mut self.state) {
            (SpecKind::Event(spec), DomainState::Event(state)) => state.record(spec, action),
            _ => false,
        }
    }
}
