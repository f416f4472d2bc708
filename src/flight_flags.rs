use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    #[default]
    Idle,
    InFlight,
    /// The checkout redirect was issued; terminal for the page.
    NavigatingAway,
}

/// Per-offering checkout state for one rendered page, keyed by offering name.
#[derive(Clone, Default)]
pub struct FlightFlags {
    inner: Arc<Mutex<HashMap<String, FlightState>>>,
}

impl FlightFlags {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Moves `key` from idle to in flight. Returns false, changing nothing,
    /// when it is already in flight or the page is navigating away.
    pub async fn begin(&self, key: &str) -> bool {
        let mut store = self.inner.lock().await;
        let leaving = store.values().any(|s| *s == FlightState::NavigatingAway);
        if leaving || store.get(key) == Some(&FlightState::InFlight) {
            return false;
        }
        store.insert(key.to_string(), FlightState::InFlight);
        true
    }

    pub async fn clear(&self, key: &str) {
        let mut store = self.inner.lock().await;
        store.insert(key.to_string(), FlightState::Idle);
    }

    pub async fn navigate_away(&self, key: &str) {
        let mut store = self.inner.lock().await;
        store.insert(key.to_string(), FlightState::NavigatingAway);
    }

    pub async fn get(&self, key: &str) -> FlightState {
        let store = self.inner.lock().await;
        store.get(key).copied().unwrap_or_default()
    }

    pub async fn is_in_flight(&self, key: &str) -> bool {
        self.get(key).await == FlightState::InFlight
    }

    /// Names of the offerings whose control is currently disabled.
    pub async fn in_flight(&self) -> Vec<String> {
        let store = self.inner.lock().await;
        store
            .iter()
            .filter(|(_, s)| **s == FlightState::InFlight)
            .map(|(k, _)| k.clone())
            .collect()
    }
}
