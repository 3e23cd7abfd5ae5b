//! Runtime Configuration
//!
//! Read once at startup from an optional JSON block in the page:
//! `<script id="checklist-config" type="application/json">{...}</script>`.
//! Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_ELEMENT_ID: &str = "checklist-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for API paths; empty means same origin
    pub api_base: String,
    pub log_level: String,
    pub sync: SyncConfig,
    pub progress: ProgressConfig,
    pub live: LiveRefresh,
    /// Used when `GET /api/staff` fails
    pub fallback_staff: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            log_level: "info".to_string(),
            sync: SyncConfig::default(),
            progress: ProgressConfig::default(),
            live: LiveRefresh::default(),
            fallback_staff: [
                "Nora", "Josh", "Vaile", "Melissa", "Paddy", "Pero", "Guy", "Dean", "Bethany", "Henry",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Config embedded in the page, or defaults
    pub fn from_page() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match json {
            Some(text) if !text.trim().is_empty() => Self::from_json(&text).unwrap_or_else(|e| {
                web_sys::console::warn_1(&format!("[CONFIG] {}, using defaults", e).into());
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}

/// How outgoing updates are paced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    /// One request in flight, fixed delay between completions
    Serial,
    /// Collect toggles for a window, flush them concurrently in bounded batches
    Batched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub policy: QueuePolicy,
    pub serial_delay_ms: u32,
    pub throttle_window_ms: u32,
    pub batch_size: usize,
    pub inter_batch_delay_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            policy: QueuePolicy::Batched,
            serial_delay_ms: 300,
            throttle_window_ms: 300,
            batch_size: 5,
            inter_batch_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Show a fun fact every N completed chores; 0 disables
    pub fun_fact_every: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { fun_fact_every: 5 }
    }
}

/// Keeping the page in step with other staff's ticks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LiveRefresh {
    #[default]
    Off,
    Poll { interval_ms: u32 },
    #[serde(rename = "websocket")]
    WebSocket { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sync.policy, QueuePolicy::Batched);
        assert_eq!(config.fallback_staff.len(), 10);
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{"sync": {"policy": "serial"}, "live": {"mode": "websocket", "path": "/ws"}, "log_level": "debug"}"#,
        )
        .unwrap();
        assert_eq!(config.sync.policy, QueuePolicy::Serial);
        assert_eq!(config.sync.serial_delay_ms, 300);
        assert_eq!(config.live, LiveRefresh::WebSocket { path: "/ws".into() });
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_poll_mode_and_bad_level() {
        let config = AppConfig::from_json(r#"{"live": {"mode": "poll", "interval_ms": 15000}, "log_level": "loud"}"#).unwrap();
        assert_eq!(config.live, LiveRefresh::Poll { interval_ms: 15000 });
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppConfig::from_json("{not json").is_err());
    }
}
