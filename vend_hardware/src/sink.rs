use crate::error::{LinkError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use vend_traits::{BoxError, CommandSink};

/// Keeps every command in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<u8> {
        self.sent.lock().ok().and_then(|v| v.last().copied())
    }
}

impl CommandSink for MemorySink {
    fn send(&mut self, command: u8) -> std::result::Result<(), BoxError> {
        self.sent
            .lock()
            .map_err(|_| LinkError::Unavailable("memory sink poisoned".into()))?
            .push(command);
        tracing::debug!(command, "command recorded");
        Ok(())
    }
}

/// Appends each command as a JSON line for the machine's store bridge:
/// `{"path": "...", "value": N, "ts_ms": T}`.
#[derive(Debug)]
pub struct OutboxSink {
    path: PathBuf,
    command_path: String,
    file: File,
}

impl OutboxSink {
    /// Open (creating if needed) the outbox file for appending.
    pub fn open(path: impl AsRef<Path>, command_path: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            command_path: command_path.into(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_command(&mut self, command: u8) -> Result<()> {
        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        let line = serde_json::to_string(&serde_json::json!({
            "path": self.command_path,
            "value": command,
            "ts_ms": ts_ms,
        }))?;
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        Ok(())
    }
}

impl CommandSink for OutboxSink {
    fn send(&mut self, command: u8) -> std::result::Result<(), BoxError> {
        self.write_command(command)?;
        tracing::debug!(command, path = %self.path.display(), "command appended to outbox");
        Ok(())
    }
}

/// A store that is never reachable.
#[derive(Debug, Clone, Default)]
pub struct FailingSink {
    reason: Option<String>,
}

impl FailingSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

impl CommandSink for FailingSink {
    fn send(&mut self, _command: u8) -> std::result::Result<(), BoxError> {
        let reason = self
            .reason
            .clone()
            .unwrap_or_else(|| "no connection".to_string());
        Err(Box::new(LinkError::Unavailable(reason)))
    }
}
