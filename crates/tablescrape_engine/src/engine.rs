use std::sync::Arc;
use std::thread;

use engine_logging::{engine_debug, engine_error};
use tablescrape_core::{ExportFormat, ScrapeConfig, ScraperEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::LocalSet;

use crate::extraction::{ExtractionLoop, RunControl};
use crate::sink::{ChannelEventSink, EventSink};
use crate::surface::PageSurface;
use crate::StartError;

enum EngineCommand {
    Start { config: ScrapeConfig },
    Stop,
    Export { format: ExportFormat },
}

/// Owns the engine thread. Runs execute cooperatively on a single-threaded
/// runtime; events come back through [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: UnboundedSender<EngineCommand>,
    event_rx: UnboundedReceiver<ScraperEvent>,
    control: RunControl,
}

impl EngineHandle {
    pub fn new(surface: Arc<dyn PageSurface>, save_as: bool) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let extraction = Arc::new(ExtractionLoop::new(sink.clone()).with_save_as(save_as));
        let control = extraction.control();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to build engine runtime: {err}");
                    sink.emit(ScraperEvent::Log(engine_logging::LogRecord::now(
                        log::Level::Error,
                        format!("engine unavailable: {err}"),
                    )));
                    return;
                }
            };
            let local = LocalSet::new();
            local.block_on(&runtime, command_loop(cmd_rx, extraction, surface));
        });

        Self {
            cmd_tx,
            event_rx,
            control,
        }
    }

    pub fn start(&self, config: ScrapeConfig) {
        let _ = self.cmd_tx.send(EngineCommand::Start { config });
    }

    pub fn stop(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Stop);
    }

    pub fn export(&self, format: ExportFormat) {
        let _ = self.cmd_tx.send(EngineCommand::Export { format });
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn try_recv(&mut self) -> Option<ScraperEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn command_loop(
    mut cmd_rx: UnboundedReceiver<EngineCommand>,
    extraction: Arc<ExtractionLoop>,
    surface: Arc<dyn PageSurface>,
) {
    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::Start { config } => {
                let extraction = extraction.clone();
                let surface = surface.clone();
                tokio::task::spawn_local(async move {
                    match extraction.start(surface.as_ref(), &config).await {
                        Ok(report) => engine_debug!(
                            "Run finished: {} ({} rows)",
                            report.status,
                            report.row_count
                        ),
                        Err(StartError::AlreadyRunning) => {}
                        Err(err) => engine_error!("Run rejected: {err}"),
                    }
                });
            }
            EngineCommand::Stop => extraction.stop(),
            EngineCommand::Export { format } => {
                extraction.export_accumulated(format);
            }
        }
    }
}
