//! Sits between the "Buy" controls of a rendered page and the initiator.

use crate::{
    catalog::Offering,
    checkout::{CheckoutInitiator, CheckoutResult},
    config::CheckoutSettings,
    flight_flags::{FlightFlags, FlightState},
};
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::sync::Mutex;

const CHECKOUT_FAILED: &str = "Checkout failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A dismissible toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn checkout_error(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            CHECKOUT_FAILED
        } else {
            message
        };
        Self::error("Checkout Error", message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Leave the page for the provider's hosted checkout.
    Redirect(String),
    Notify(Notification),
    /// The control was disabled: this offering is already in flight or the
    /// page is navigating away.
    Ignored,
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
    initiator: CheckoutInitiator,
    flags: FlightFlags,
}

impl CheckoutOrchestrator {
    pub fn new(initiator: CheckoutInitiator) -> Self {
        Self {
            initiator,
            flags: FlightFlags::new(),
        }
    }

    pub async fn trigger(&self, settings: &CheckoutSettings, offering: &Offering) -> CheckoutOutcome {
        if !self.flags.begin(&offering.name).await {
            debug!("Ignoring checkout for {}: control disabled", offering.name);
            return CheckoutOutcome::Ignored;
        }

        let result = self.initiator.initiate(settings, offering).await;
        match result {
            Ok(CheckoutResult::Success { redirect_url }) => {
                info!("Redirecting to Stripe checkout for {}", offering.name);
                self.flags.navigate_away(&offering.name).await;
                CheckoutOutcome::Redirect(redirect_url)
            }
            Ok(CheckoutResult::Failure { message }) => {
                warn!("Checkout for {} failed: {}", offering.name, message);
                self.flags.clear(&offering.name).await;
                CheckoutOutcome::Notify(Notification::checkout_error(&message))
            }
            Err(e) => {
                error!("Checkout error for {}: {}", offering.name, e);
                self.flags.clear(&offering.name).await;
                CheckoutOutcome::Notify(Notification::checkout_error(&e.to_string()))
            }
        }
    }

    pub async fn state(&self, offering_name: &str) -> FlightState {
        self.flags.get(offering_name).await
    }

    pub async fn is_in_flight(&self, offering_name: &str) -> bool {
        self.flags.is_in_flight(offering_name).await
    }

    pub async fn in_flight(&self) -> Vec<String> {
        self.flags.in_flight().await
    }
}

struct OpenPage {
    orchestrator: Arc<CheckoutOrchestrator>,
    opened_at: DateTime<Utc>,
}

/// Orchestrators of the pricing pages currently rendered in browsers, keyed
/// by the page id embedded in each page's forms.
#[derive(Clone)]
pub struct PageRegistry {
    initiator: CheckoutInitiator,
    ttl: Duration,
    pages: Arc<Mutex<HashMap<String, OpenPage>>>,
    counter: Arc<AtomicU64>,
}

impl PageRegistry {
    pub fn new(initiator: CheckoutInitiator) -> Self {
        Self::with_ttl(initiator, Duration::minutes(30))
    }

    pub fn with_ttl(initiator: CheckoutInitiator, ttl: Duration) -> Self {
        Self {
            initiator,
            ttl,
            pages: Arc::new(Mutex::new(HashMap::new())),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_id(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{:x}-{:x}", nanos, seq)
    }

    /// Starts a new page lifetime and prunes expired ones.
    pub async fn open(&self) -> (String, Arc<CheckoutOrchestrator>) {
        let id = self.next_id();
        let orchestrator = Arc::new(CheckoutOrchestrator::new(self.initiator.clone()));
        let now = Utc::now();

        let mut pages = self.pages.lock().await;
        let before = pages.len();
        pages.retain(|_, page| now - page.opened_at < self.ttl);
        if pages.len() < before {
            debug!("Pruned {} expired pages", before - pages.len());
        }
        pages.insert(
            id.clone(),
            OpenPage {
                orchestrator: orchestrator.clone(),
                opened_at: now,
            },
        );
        (id, orchestrator)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<CheckoutOrchestrator>> {
        let pages = self.pages.lock().await;
        pages
            .get(id)
            .filter(|page| Utc::now() - page.opened_at < self.ttl)
            .map(|page| page.orchestrator.clone())
    }

    /// The page with `id`, or a freshly opened one when it is unknown or expired.
    pub async fn get_or_open(&self, id: Option<&str>) -> (String, Arc<CheckoutOrchestrator>) {
        if let Some(id) = id {
            if let Some(orchestrator) = self.get(id).await {
                return (id.to_string(), orchestrator);
            }
            debug!("Page {} is unknown or expired, opening a new one", id);
        }
        self.open().await
    }

    pub async fn close(&self, id: &str) {
        let mut pages = self.pages.lock().await;
        pages.remove(id);
    }

    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
