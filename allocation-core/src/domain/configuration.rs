// src/domain/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Backend de persistance du Unit of Work.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    #[default]
    Json,
}

/// Adapter de notifications.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationsKind {
    #[default]
    Log,
    Jsonl,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[validate(nested)]
    #[serde(default)]
    pub store: StoreConfig,

    #[validate(nested)]
    #[serde(default)]
    pub bus: BusConfig,

    #[validate(nested)]
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            store: StoreConfig::default(),
            bus: BusConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,

    #[validate(length(min = 1, message = "Store path cannot be empty"))]
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            path: default_store_path(),
        }
    }
}

/// Garde-fou contre les cascades infinies (Event -> Command -> Event ...).
/// `max_messages: null` désactive la limite.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq, Eq)]
pub struct BusConfig {
    #[validate(range(min = 1, message = "max_messages must be at least 1"))]
    #[serde(rename = "max-messages", default = "default_max_messages")]
    pub max_messages: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub kind: NotificationsKind,

    #[validate(length(min = 1, message = "Notifications path cannot be empty"))]
    #[serde(default = "default_notifications_path")]
    pub path: String,

    #[validate(email)]
    #[serde(rename = "out-of-stock-recipient", default = "default_recipient")]
    pub out_of_stock_recipient: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            kind: NotificationsKind::default(),
            path: default_notifications_path(),
            out_of_stock_recipient: default_recipient(),
        }
    }
}

pub const DEFAULT_MAX_MESSAGES: usize = 1000;

fn default_name() -> String {
    "allocation".to_string()
}
fn default_store_path() -> String {
    "target/allocation.json".to_string()
}
fn default_notifications_path() -> String {
    "target/notifications.jsonl".to_string()
}
fn default_recipient() -> String {
    "stock@example.com".to_string()
}
fn default_max_messages() -> Option<usize> {
    Some(DEFAULT_MAX_MESSAGES)
}
