use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use engine_logging::{engine_debug, engine_error, engine_info, engine_trace, engine_warn, LogRecord};
use log::Level;
use tablescrape_core::{
    Artifact, ExportFormat, PageStep, Phase, Row, RunState, RunStatus, ScrapeConfig,
    ScraperEvent,
};

use crate::export::{ExportMeta, Exporter};
use crate::pagination::PaginationDriver;
use crate::poll::Poller;
use crate::reader::PageReader;
use crate::sink::EventSink;
use crate::surface::PageSurface;
use crate::{ReadError, RunError, RunReport, StartError, SurfaceError};

/// Shared run flags. Clones observe the same run.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl RunControl {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Observed at the next page boundary; the page in flight completes.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn try_begin(&self) -> Option<RunningGuard> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.stop.store(false, Ordering::SeqCst);
        Some(RunningGuard {
            control: self.clone(),
        })
    }
}

/// Releases the running flag on every exit path.
struct RunningGuard {
    control: RunControl,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.control.stop.store(false, Ordering::SeqCst);
        self.control.running.store(false, Ordering::SeqCst);
    }
}

struct LastRun {
    rows: Vec<Row>,
    pages: u32,
    source: String,
    exporter: Exporter,
}

/// Drives one scraping run at a time over a [`PageSurface`].
pub struct ExtractionLoop {
    sink: Arc<dyn EventSink>,
    control: RunControl,
    save_as: bool,
    last_run: Mutex<Option<LastRun>>,
}

impl ExtractionLoop {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            control: RunControl::default(),
            save_as: false,
            last_run: Mutex::new(None),
        }
    }

    /// Whether `download` events ask the platform for a destination.
    pub fn with_save_as(mut self, save_as: bool) -> Self {
        self.save_as = save_as;
        self
    }

    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn stop(&self) {
        if self.control.is_running() {
            self.log(Level::Info, "Stop requested, finishing current page");
        }
        self.control.request_stop();
    }

    /// Runs to completion, stop, or failure.
    ///
    /// Completed runs are exported in `config.export_format` and announced
    /// with a `download` event; stopped and failed runs keep their rows for
    /// [`ExtractionLoop::export_accumulated`].
    pub async fn start(
        &self,
        surface: &dyn PageSurface,
        config: &ScrapeConfig,
    ) -> Result<RunReport, StartError> {
        let Some(guard) = self.control.try_begin() else {
            self.log(Level::Warn, "Scraping already in progress");
            return Err(StartError::AlreadyRunning);
        };
        let parts = PageReader::new(config)
            .and_then(|reader| PaginationDriver::new(config).map(|driver| (reader, driver)));
        let (reader, driver) = match parts {
            Ok(parts) => parts,
            Err(err) => {
                let mut run = RunState::new();
                run.reset();
                run.record_error();
                let stats = run.stats();
                self.log(Level::Error, format!("Invalid configuration: {err}"));
                drop(guard);

                self.sink.emit(ScraperEvent::Finished {
                    status: RunStatus::Failed {
                        reason: err.to_string(),
                    },
                    stats,
                });
                self.sink.emit(ScraperEvent::StatsUpdate {
                    stats,
                    is_running: false,
                });
                return Err(err.into());
            }
        };
        let poller = Poller::new(
            Duration::from_millis(config.load_poll_ms),
            config.load_attempts,
        );

        let mut run = RunState::new();
        run.reset();
        run.enter(Phase::Running(PageStep::AwaitingLoad));
        self.log(
            Level::Info,
            format!("Starting table scraping ({})", config.export_format),
        );
        self.sink.emit(ScraperEvent::StatsUpdate {
            stats: run.stats(),
            is_running: true,
        });

        let status = match self
            .drive(surface, &reader, &driver, &poller, config, &mut run)
            .await
        {
            Ok(status) => status,
            Err(err) => {
                run.record_error();
                self.log(Level::Error, format!("Scraping failed: {err}"));
                RunStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        run.enter(status.phase());
        let stats = run.stats();
        self.log(
            Level::Info,
            format!(
                "Scraping {status}: {} pages, {} rows, {} duplicates",
                stats.pages_processed, stats.rows_scraped, stats.duplicates_found
            ),
        );

        let exporter = Exporter::new(config.file_prefix.clone());
        let source = surface.location();
        let artifact = if status == RunStatus::Completed {
            let meta = ExportMeta {
                pages_scraped: stats.pages_processed,
                source: source.clone(),
                scraped_at: Utc::now(),
            };
            self.export_rows(&exporter, run.rows(), config.export_format, &meta)
        } else {
            None
        };
        let row_count = run.rows().len();
        if let Ok(mut last) = self.last_run.lock() {
            *last = Some(LastRun {
                rows: run.into_rows(),
                pages: stats.pages_processed,
                source,
                exporter,
            });
        }
        drop(guard);

        self.sink.emit(ScraperEvent::Finished {
            status: status.clone(),
            stats,
        });
        self.sink.emit(ScraperEvent::StatsUpdate {
            stats,
            is_running: false,
        });
        if let Some(artifact) = &artifact {
            self.download(artifact.clone());
        }
        Ok(RunReport {
            status,
            stats,
            row_count,
            artifact,
        })
    }

    /// Exports the rows of the most recent finished run.
    pub fn export_accumulated(&self, format: ExportFormat) -> Option<Artifact> {
        let artifact = {
            let guard = self.last_run.lock().ok()?;
            let Some(last) = guard.as_ref() else {
                self.log(Level::Warn, "No data to export");
                return None;
            };
            let meta = ExportMeta {
                pages_scraped: last.pages,
                source: last.source.clone(),
                scraped_at: Utc::now(),
            };
            self.export_rows(&last.exporter, &last.rows, format, &meta)
        };
        if let Some(artifact) = &artifact {
            self.download(artifact.clone());
        }
        artifact
    }

    async fn drive(
        &self,
        surface: &dyn PageSurface,
        reader: &PageReader,
        driver: &PaginationDriver,
        poller: &Poller,
        config: &ScrapeConfig,
        run: &mut RunState,
    ) -> Result<RunStatus, RunError> {
        self.process_page(surface, reader, poller, run).await?;
        loop {
            if self.control.stop_requested() {
                self.log(Level::Info, "Scraping stopped by user");
                return Ok(RunStatus::Stopped);
            }
            run.enter(Phase::Running(PageStep::Advancing));
            let html = surface.snapshot().await?;
            let Some(control) = driver.find_next_control(&html) else {
                self.log(Level::Info, "No more pages to process");
                return Ok(RunStatus::Completed);
            };
            if run.advances() >= config.max_pagination_attempts {
                self.log(
                    Level::Warn,
                    format!(
                        "Reached pagination limit of {} pages",
                        config.max_pagination_attempts
                    ),
                );
                return Ok(RunStatus::Completed);
            }
            match driver.activate(surface, &control, run).await {
                Ok(()) => {}
                Err(SurfaceError::NavigationFailed(reason)) => {
                    self.log(Level::Info, format!("Pagination ended: {reason}"));
                    return Ok(RunStatus::Completed);
                }
                Err(err) => return Err(err.into()),
            }
            self.process_page(surface, reader, poller, run).await?;
        }
    }

    async fn process_page(
        &self,
        surface: &dyn PageSurface,
        reader: &PageReader,
        poller: &Poller,
        run: &mut RunState,
    ) -> Result<(), RunError> {
        let page = run.current_page();
        run.enter(Phase::Running(PageStep::AwaitingLoad));
        self.log(Level::Info, format!("Processing page {page}"));

        let loaded = poller
            .poll(move || async move {
                let html = surface.snapshot().await?;
                Ok::<_, SurfaceError>(reader.is_data_loaded(&html))
            })
            .await?;
        if !loaded {
            return Err(RunError::LoadTimeout {
                page,
                checks: poller.max_checks(),
            });
        }

        run.enter(Phase::Running(PageStep::Extracting));
        let html = surface.snapshot().await?;
        let rows = match reader.extract_rows(&html, run) {
            Ok(rows) => rows,
            Err(err @ ReadError::NoTableFound { .. }) => {
                self.log(Level::Warn, format!("Page {page}: {err}"));
                Vec::new()
            }
        };
        let found = rows.len();
        run.accept_page(rows);
        let stats = run.stats();
        self.log(
            Level::Info,
            format!(
                "Page {page}: {found} new rows ({} total)",
                stats.rows_scraped
            ),
        );
        self.sink.emit(ScraperEvent::Progress {
            current_page: page,
            stats,
        });
        self.sink.emit(ScraperEvent::StatsUpdate {
            stats,
            is_running: true,
        });
        Ok(())
    }

    fn export_rows(
        &self,
        exporter: &Exporter,
        rows: &[Row],
        format: ExportFormat,
        meta: &ExportMeta,
    ) -> Option<Artifact> {
        if rows.is_empty() {
            self.emit_log(Level::Warn, "No data to export");
        }
        match exporter.export(rows, format, meta) {
            Ok(artifact) => artifact,
            Err(err) => {
                self.log(Level::Error, format!("Export failed: {err}"));
                None
            }
        }
    }

    fn download(&self, artifact: Artifact) {
        self.log(
            Level::Info,
            format!("Download ready: {}", artifact.filename),
        );
        self.sink.emit(ScraperEvent::Download {
            artifact,
            save_as: self.save_as,
        });
    }

    fn log(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Error => engine_error!("{message}"),
            Level::Warn => engine_warn!("{message}"),
            Level::Info => engine_info!("{message}"),
            Level::Debug => engine_debug!("{message}"),
            Level::Trace => engine_trace!("{message}"),
        }
        self.emit_log(level, message);
    }

    fn emit_log(&self, level: Level, message: impl Into<String>) {
        self.sink
            .emit(ScraperEvent::Log(LogRecord::now(level, message)));
    }
}
