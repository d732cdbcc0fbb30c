//! Third-party account-linking toggles with simulated handshakes.
//!
//! Connectors never perform real OAuth: connecting moves a key through
//! off → connecting → on after a fixed delay. Connector state lives next
//! to, not inside, the answer map and is reconciled into the submission
//! record only at finalize time.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

const DEFAULT_HANDSHAKE: Duration = Duration::from_millis(400);

/// A connectable third-party source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub key: &'static str,
    pub label: &'static str,
}

static CONNECTOR_CATALOG: Lazy<Vec<Connector>> = Lazy::new(|| {
    vec![
        Connector { key: "instagram", label: "Instagram" },
        Connector { key: "youtube", label: "YouTube" },
        Connector { key: "tiktok", label: "TikTok" },
        Connector { key: "spotify", label: "Spotify for Artists" },
        Connector { key: "apple_music", label: "Apple Music for Artists" },
        Connector { key: "meta", label: "Meta Ads" },
        Connector { key: "google_ads", label: "Google Ads" },
    ]
});

/// The built-in set of connectable sources.
pub fn connector_catalog() -> &'static [Connector] {
    &CONNECTOR_CATALOG
}

/// Lifecycle of a single connector key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorStatus {
    Off,
    Connecting { since: Instant },
    On,
}

/// Per-session connector state. Keys are independent: a pending handshake
/// on one connector never blocks another, nor the main wizard flow.
#[derive(Debug, Clone)]
pub struct ConnectorState {
    entries: BTreeMap<String, ConnectorStatus>,
    handshake: Duration,
}

impl Default for ConnectorState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorState {
    pub fn new() -> Self {
        Self::with_handshake(DEFAULT_HANDSHAKE)
    }

    pub fn with_handshake(handshake: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            handshake,
        }
    }

    pub fn status(&self, key: &str) -> ConnectorStatus {
        self.entries
            .get(key)
            .copied()
            .unwrap_or(ConnectorStatus::Off)
    }

    /// Starts the simulated handshake for `key`. Connecting or already-on
    /// keys are left untouched.
    pub fn begin_connect(&mut self, key: &str) {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert(ConnectorStatus::Off);
        if matches!(entry, ConnectorStatus::Off) {
            *entry = ConnectorStatus::Connecting {
                since: Instant::now(),
            };
        }
    }

    pub fn disconnect(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Completes any handshake whose delay has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) {
        let handshake = self.handshake;
        for status in self.entries.values_mut() {
            if let ConnectorStatus::Connecting { since } = *status {
                if now.duration_since(since) >= handshake {
                    *status = ConnectorStatus::On;
                }
            }
        }
    }

    /// Keys currently in the `On` state, in stable order.
    pub fn connected(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, status)| matches!(status, ConnectorStatus::On))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_completes_after_delay() {
        let mut state = ConnectorState::with_handshake(Duration::from_millis(0));
        state.begin_connect("spotify");
        assert!(matches!(
            state.status("spotify"),
            ConnectorStatus::Connecting { .. }
        ));
        state.poll(Instant::now());
        assert_eq!(state.status("spotify"), ConnectorStatus::On);
        assert_eq!(state.connected(), vec!["spotify".to_string()]);
    }

    #[test]
    fn pending_handshakes_are_independent() {
        let mut state = ConnectorState::with_handshake(Duration::from_secs(3600));
        state.begin_connect("instagram");
        state.begin_connect("tiktok");
        state.poll(Instant::now());
        assert!(state.connected().is_empty());
        state.disconnect("instagram");
        assert_eq!(state.status("instagram"), ConnectorStatus::Off);
        assert!(matches!(
            state.status("tiktok"),
            ConnectorStatus::Connecting { .. }
        ));
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = ConnectorState::with_handshake(Duration::from_millis(0));
        state.begin_connect("meta");
        state.poll(Instant::now());
        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.status("meta"), ConnectorStatus::Off);
    }
}
