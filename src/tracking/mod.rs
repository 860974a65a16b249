//! Fire-and-forget analytics events.
//!
//! [`Tracker::track`] pushes an event to the [`DataLayer`] and waits for the
//! delivery callback or the timeout, whichever comes first. It never fails.

use crate::domain::model::EventPayload;
use crate::domain::ports::DataLayer;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::sync::oneshot;

pub const DEFAULT_TRACKING_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingConfig {
    pub tracking_enabled: bool,
    pub tracking_id: String,
    pub reference_site_url: String,
    pub is_first_admin: bool,
    pub user_id_hash: String,
}

/// Delivery acknowledgment handed to the data layer with every event.
///
/// Firing consumes the callback, so an event settles at most once. Dropping
/// it unfired marks the event as undelivered.
pub struct EventCallback {
    sender: oneshot::Sender<()>,
}

impl EventCallback {
    pub fn fire(self) {
        // 接收端可能已因逾時而放棄等待
        let _ = self.sender.send(());
    }
}

impl fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCallback")
            .field("settled", &self.sender.is_closed())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Tracking is turned off; nothing was pushed.
    Disabled,
    /// The data layer acknowledged delivery.
    Sent,
    /// No acknowledgment arrived in time.
    TimedOut,
    /// The data layer dropped the event without acknowledging it.
    Undelivered,
}

#[async_trait]
pub trait EventTracker: Send + Sync {
    async fn track(
        &self,
        category: &str,
        name: &str,
        label: Option<&str>,
        value: Option<&str>,
    ) -> TrackOutcome;
}

pub struct Tracker<D: DataLayer> {
    config: TrackingConfig,
    data_layer: D,
    timeout: Duration,
}

impl<D: DataLayer> Tracker<D> {
    pub fn new(config: TrackingConfig, data_layer: D) -> Self {
        Self {
            config,
            data_layer,
            timeout: DEFAULT_TRACKING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.tracking_enabled
    }

    fn payload(&self, category: &str, label: Option<&str>, value: Option<&str>) -> EventPayload {
        EventPayload {
            send_to: self.config.tracking_id.clone(),
            event_category: category.to_string(),
            event_label: label.unwrap_or_default().to_string(),
            event_value: value.unwrap_or_default().to_string(),
            dimension1: self.config.reference_site_url.clone(),
            dimension2: if self.config.is_first_admin {
                "true".to_string()
            } else {
                "false".to_string()
            },
            dimension3: self.config.user_id_hash.clone(),
        }
    }
}

#[async_trait]
impl<D: DataLayer> EventTracker for Tracker<D> {
    async fn track(
        &self,
        category: &str,
        name: &str,
        label: Option<&str>,
        value: Option<&str>,
    ) -> TrackOutcome {
        if !self.config.tracking_enabled {
            return TrackOutcome::Disabled;
        }

        let (sender, receiver) = oneshot::channel();
        let payload = self.payload(category, label, value);
        tracing::debug!("📡 Pushing tracking event \"{}\" (category \"{}\")", name, category);
        self.data_layer
            .push(name, payload, EventCallback { sender });

        // 先到先贏；回呼先到時計時器隨 select! 一併被丟棄
        tokio::select! {
            biased;
            acknowledged = receiver => match acknowledged {
                Ok(()) => TrackOutcome::Sent,
                Err(_) => {
                    tracing::warn!(
                        "Tracking event \"{}\" (category \"{}\") was dropped before it was sent.",
                        name,
                        category
                    );
                    TrackOutcome::Undelivered
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                tracing::warn!(
                    "Tracking event \"{}\" (category \"{}\") took too long to fire.",
                    name,
                    category
                );
                TrackOutcome::TimedOut
            }
        }
    }
}
