use std::sync::Mutex;

use tablescrape_core::ScraperEvent;
use tokio::sync::mpsc::UnboundedSender;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScraperEvent);
}

pub struct ChannelEventSink {
    tx: UnboundedSender<ScraperEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<ScraperEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ScraperEvent) {
        let _ = self.tx.send(event);
    }
}

/// Keeps every event in memory; handy for tests and one-shot runs.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ScraperEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScraperEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: ScraperEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
