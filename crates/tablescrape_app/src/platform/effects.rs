use std::sync::Arc;

use engine_logging::engine_info;
use tablescrape_core::{Effect, ScraperEvent, Settings};
use tablescrape_engine::{EngineHandle, PageSurface};

/// Executes reducer effects against the engine thread.
pub struct EffectRunner {
    engine: EngineHandle,
    settings: Settings,
}

impl EffectRunner {
    pub fn new(surface: Arc<dyn PageSurface>, settings: Settings) -> Self {
        let engine = EngineHandle::new(surface, !settings.auto_download);
        Self { engine, settings }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { format } => {
                    engine_info!("StartRun format={}", format);
                    self.engine.start(self.settings.scrape_config(format));
                }
                Effect::StopRun => {
                    engine_info!("StopRun");
                    self.engine.stop();
                }
                Effect::ExportAccumulated { format } => {
                    engine_info!("ExportAccumulated format={}", format);
                    self.engine.export(format);
                }
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<ScraperEvent> {
        self.engine.try_recv()
    }
}
