//! Device/runtime diagnostics attached to every report.
//!
//! Capture is a pure function of an [`EnvironmentSnapshot`] and a timestamp, so
//! the host-specific part lives entirely in whichever
//! [`EnvironmentProvider`](crate::EnvironmentProvider) the caller injects.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::EnvironmentProvider;

const UNKNOWN_DIMENSIONS: &str = "unknown";

/// Raw environment facts; any of them may be unavailable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    /// (width, height)
    pub screen: Option<(u32, u32)>,
    /// (width, height)
    pub viewport: Option<(u32, u32)>,
}

/// Diagnostics snapshot, serialized with the camelCase keys the backend expects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    pub screen_resolution: String,
    pub viewport: String,
    pub timestamp: String,
}

impl DeviceInfo {
    /// Build from a snapshot taken at `at`. Missing values become placeholders.
    pub fn from_snapshot(snapshot: &EnvironmentSnapshot, at: DateTime<Utc>) -> Self {
        Self {
            user_agent: snapshot.user_agent.clone().unwrap_or_default(),
            platform: snapshot.platform.clone().unwrap_or_default(),
            language: snapshot.language.clone().unwrap_or_default(),
            screen_resolution: dimensions(snapshot.screen),
            viewport: dimensions(snapshot.viewport),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Capture now from the given provider
    pub fn capture(provider: &dyn EnvironmentProvider) -> Self {
        Self::from_snapshot(&provider.snapshot(), Utc::now())
    }

    pub fn to_json(&self) -> String {
        // Plain string fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Human-readable multi-line summary
    pub fn summary(&self) -> String {
        format!(
            "Browser: {}\nPlatform: {}\nLanguage: {}\nScreen: {}\nViewport: {}\nTimestamp: {}",
            self.user_agent,
            self.platform,
            self.language,
            self.screen_resolution,
            self.viewport,
            self.timestamp
        )
    }
}

fn dimensions(value: Option<(u32, u32)>) -> String {
    match value {
        Some((width, height)) => format!("{}x{}", width, height),
        None => UNKNOWN_DIMENSIONS.to_string(),
    }
}
