use crate::domain::model::EventPayload;
use crate::domain::ports::DataLayer;
use crate::tracking::EventCallback;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Beacon<'a> {
    event: &'a str,
    #[serde(flatten)]
    payload: &'a EventPayload,
}

/// Sends each event as a JSON beacon to a collection endpoint.
///
/// A 2xx response acknowledges the event; anything else drops the callback.
#[derive(Debug, Clone)]
pub struct HttpDataLayer {
    client: Client,
    endpoint: String,
}

impl HttpDataLayer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DataLayer for HttpDataLayer {
    fn push(&self, event_name: &str, payload: EventPayload, on_sent: EventCallback) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("No async runtime available for tracking beacon: {}", e);
                return;
            }
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let event_name = event_name.to_string();

        handle.spawn(async move {
            let beacon = Beacon {
                event: &event_name,
                payload: &payload,
            };

            tracing::debug!("Sending beacon \"{}\" to {}", event_name, endpoint);
            match client.post(&endpoint).json(&beacon).send().await {
                Ok(response) if response.status().is_success() => on_sent.fire(),
                Ok(response) => {
                    tracing::debug!(
                        "Beacon \"{}\" rejected with status {}",
                        event_name,
                        response.status()
                    );
                }
                Err(e) => {
                    tracing::debug!("Beacon \"{}\" failed: {}", event_name, e);
                }
            }
        });
    }
}
