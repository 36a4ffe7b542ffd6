// allocation-core/src/infrastructure/notifications.rs

use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::error::AllocationError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::notifications::Notifications;

/// Adapter par défaut : la notification devient une ligne de log structurée.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifications;

impl Notifications for LogNotifications {
    fn send(&self, destination: &str, message: &str) -> Result<(), AllocationError> {
        info!(destination, message, "📨 Notification sent");
        Ok(())
    }
}

#[derive(Serialize)]
struct NotificationRecord<'a> {
    sent_at: String,
    destination: &'a str,
    message: &'a str,
}

/// Ajoute un objet JSON par notification dans un fichier (une ligne chacun).
#[derive(Debug, Clone)]
pub struct JsonlNotifications {
    path: PathBuf,
}

impl JsonlNotifications {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl Notifications for JsonlNotifications {
    #[instrument(skip(self, message), fields(path = ?self.path))]
    fn send(&self, destination: &str, message: &str) -> Result<(), AllocationError> {
        let record = NotificationRecord {
            sent_at: Utc::now().to_rfc3339(),
            destination,
            message,
        };
        let line = serde_json::to_string(&record)?;
        self.append(&line)
            .map_err(|e| InfrastructureError::Notification {
                destination: destination.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_jsonl_appends_one_line_per_notification() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let notifications = JsonlNotifications::new(dir.path().join("out/notifications.jsonl"));

        notifications.send("stock@example.com", "Out of stock for LAMPE")?;
        notifications.send("ops@example.com", "Out of stock for TAPIS")?;

        let content = fs::read_to_string(notifications.path())?;
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["destination"], "stock@example.com");
        assert_eq!(lines[1]["message"], "Out of stock for TAPIS");
        assert!(lines[0]["sent_at"].is_string());
        Ok(())
    }

    #[test]
    fn test_log_notifications_never_fail() -> Result<()> {
        LogNotifications.send("anyone@example.com", "hello")?;
        Ok(())
    }
}
