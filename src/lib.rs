mod adapter;
pub mod codec;
mod command;
mod config;
mod diff;
mod entity;
mod error;
mod logger;
pub mod profile;
pub mod protocol;
mod state;
mod transport;
mod types;

pub use adapter::{HubAdapter, HubAdapterBuilder};
pub use command::{build_command, CommandBatch, Intent};
pub use config::EngineConfig;
pub use entity::{ApplyOutcome, Entity};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use profile::{resolve_entities, EntityName, EntitySpec, SpecKind};
pub use state::*;
pub use transport::{ChannelTransport, OutboundMessage, Transport};
pub use types::*;
