use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::diff::{diff_attributes, merge_attributes, Snapshot};
use crate::protocol::attributes_json;
use crate::types::RawAttribute;

pub enum MessageLogMode {
    /// Every delta as received.
    Full,
    /// First delta per device in full, then only changed attributes.
    Diffed,
}

pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    snapshots: HashMap<String, Snapshot>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            mode,
            file,
            snapshots: HashMap::new(),
        })
    }

    pub fn log_delta(&mut self, device_id: &str, attrs: &[RawAttribute]) {
        let entry = match self.mode {
            MessageLogMode::Full => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "delta",
                "device": device_id,
                "attrs": attributes_json(attrs),
            }),
            MessageLogMode::Diffed => match self.snapshots.get_mut(device_id) {
                None => {
                    let mut snapshot = Snapshot::new();
                    merge_attributes(&mut snapshot, attrs);
                    self.snapshots.insert(device_id.to_string(), snapshot);
                    json!({
                        "ts": Utc::now().to_rfc3339(),
                        "dir": "delta",
                        "device": device_id,
                        "full": true,
                        "attrs": attributes_json(attrs),
                    })
                }
                Some(snapshot) => {
                    let changes: Vec<Value> = diff_attributes(snapshot, attrs)
                        .into_iter()
                        .map(|(name, old, new)| json!({ "name": name, "old": old, "new": new }))
                        .collect();
                    merge_attributes(snapshot, attrs);
                    json!({
                        "ts": Utc::now().to_rfc3339(),
                        "dir": "delta",
                        "device": device_id,
                        "changes": changes,
                    })
                }
            },
        };
        self.write_line(&entry);
    }

    pub fn log_command(&mut self, device_id: &str, entity_id: &str, attrs: &[RawAttribute]) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "device": device_id,
            "entity": entity_id,
            "atomic": attrs.len() > 1,
            "attrs": attributes_json(attrs),
        });
        self.write_line(&entry);
    }

    pub fn forget(&mut self, device_id: &str) {
        self.snapshots.remove(device_id);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn read_lines(path: &str) -> Vec<Value> {
        let mut contents = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn full_mode_writes_every_delta() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Full, path).unwrap();
        logger.log_delta("dev-1", &[RawAttribute::new("acMode", 8)]);
        logger.log_delta("dev-1", &[RawAttribute::new("acMode", 8)]);

        let lines = read_lines(path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["dir"], "delta");
        assert_eq!(lines[0]["device"], "dev-1");
        assert_eq!(lines[1]["attrs"][0]["value"], 8);
        assert!(lines[0]["ts"].as_str().is_some());
    }

    #[test]
    fn diffed_mode_logs_full_first_then_changes() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Diffed, path).unwrap();

        logger.log_delta(
            "dev-1",
            &[
                RawAttribute::new("acMode", 1),
                RawAttribute::new("acRunning", 1),
            ],
        );
        logger.log_delta(
            "dev-1",
            &[
                RawAttribute::new("acMode", 8),
                RawAttribute::new("acRunning", 1),
            ],
        );

        let lines = read_lines(path);
        assert_eq!(lines[0]["full"], true);
        let changes = lines[1]["changes"].as_array().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0]["name"], "acMode");
        assert_eq!(changes[0]["old"], 1);
        assert_eq!(changes[0]["new"], 8);
    }

    #[test]
    fn diffed_mode_tracks_devices_separately() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Diffed, path).unwrap();

        logger.log_delta("dev-1", &[RawAttribute::new("on", 1)]);
        logger.log_delta("dev-2", &[RawAttribute::new("on", 1)]);
        logger.log_delta("dev-2", &[RawAttribute::new("on", 1)]);
        logger.forget("dev-1");
        logger.log_delta("dev-1", &[RawAttribute::new("on", 1)]);

        let lines = read_lines(path);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["full"], true);
        assert_eq!(lines[2]["changes"].as_array().unwrap().len(), 0);
        assert_eq!(lines[3]["full"], true);
    }

    #[test]
    fn log_command_captures_batch() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Full, path).unwrap();
        logger.log_command(
            "dev-1",
            "climate",
            &[
                RawAttribute::new("acRunning", 1),
                RawAttribute::new("acMode", 8),
            ],
        );

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "cmd");
        assert_eq!(lines[0]["entity"], "climate");
        assert_eq!(lines[0]["atomic"], true);
        assert_eq!(lines[0]["attrs"].as_array().unwrap().len(), 2);
    }
}
