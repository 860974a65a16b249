use crate::domain::model::EventPayload;
use crate::domain::ports::DataLayer;
use crate::tracking::EventCallback;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AckMode {
    /// 保留回呼，由呼叫端決定何時確認
    #[default]
    Hold,
    /// 推入時立即確認
    Immediate,
    /// 直接丟棄回呼，模擬送出失敗
    Drop,
}

#[derive(Debug)]
struct RecordedEvent {
    event_name: String,
    payload: EventPayload,
    callback: Option<EventCallback>,
}

/// In-memory data layer that records every pushed event.
#[derive(Debug, Clone, Default)]
pub struct RecordingDataLayer {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
    mode: AckMode,
}

impl RecordingDataLayer {
    /// Keeps callbacks until [`RecordingDataLayer::acknowledge`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_acknowledge() -> Self {
        Self {
            mode: AckMode::Immediate,
            ..Self::default()
        }
    }

    pub fn dropping() -> Self {
        Self {
            mode: AckMode::Drop,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<(String, EventPayload)> {
        self.lock()
            .iter()
            .map(|event| (event.event_name.clone(), event.payload.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fires the held callback of the `index`-th event. Returns `false` when
    /// there is no such event or it was already settled.
    pub fn acknowledge(&self, index: usize) -> bool {
        let callback = self
            .lock()
            .get_mut(index)
            .and_then(|event| event.callback.take());

        match callback {
            Some(callback) => {
                callback.fire();
                true
            }
            None => false,
        }
    }
}

impl DataLayer for RecordingDataLayer {
    fn push(&self, event_name: &str, payload: EventPayload, on_sent: EventCallback) {
        let callback = match self.mode {
            AckMode::Hold => Some(on_sent),
            AckMode::Immediate => {
                on_sent.fire();
                None
            }
            AckMode::Drop => {
                drop(on_sent);
                None
            }
        };

        self.lock().push(RecordedEvent {
            event_name: event_name.to_string(),
            payload,
            callback,
        });
    }
}
