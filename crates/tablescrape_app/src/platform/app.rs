use std::io::{self, BufRead};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use engine_logging::{engine_debug, engine_error, engine_info, LogRing, SharedLogRing};
use log::LevelFilter;
use tablescrape_core::relay::{MonitorRegistry, TabId};
use tablescrape_core::{update, AppState, Artifact, Msg, ScraperEvent, SessionState, Settings};
use tablescrape_engine::{ArtifactWriter, FetchSettings, HttpPageSurface, PageSurface, StaticPages};

use super::console::{Command, HELP};
use super::effects::EffectRunner;
use super::{logging, render, settings};
use crate::cli::Cli;

/// The console drives a single page context.
const TAB_ID: TabId = 1;
const TICK: Duration = Duration::from_millis(75);
const RECENT_LOGS: usize = 20;

enum Input {
    Line(String),
    Closed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let ring: SharedLogRing = Arc::new(Mutex::new(LogRing::default()));
    logging::initialize(LevelFilter::Debug, cli.log_file.as_deref(), ring.clone());

    if cli.write_settings {
        settings::save_settings(&cli.settings, &Settings::default())
            .with_context(|| format!("writing {}", cli.settings.display()))?;
        println!("Wrote default settings to {}", cli.settings.display());
        return Ok(());
    }

    let settings = settings::load_settings(&cli.settings);
    logging::apply_level(settings.debug_mode);

    let surface = build_surface(&cli)?;
    let source = surface.location();
    let writer = ArtifactWriter::new(cli.output.clone());
    let format = cli.format.unwrap_or(settings.default_format);

    let mut panel = Panel {
        state: AppState::with_format(format),
        runner: EffectRunner::new(surface, settings.clone()),
        show_ui: settings.show_ui,
    };
    let mut registry = MonitorRegistry::new();

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx);

    engine_info!("Table scraper ready for {}", source);
    if panel.show_ui {
        println!("{}", render::render_panel(&panel.state.view()));
        println!("{HELP}");
    }
    if settings.auto_start {
        panel.dispatch(Msg::StartClicked);
    }

    let mut stdin_open = true;
    let mut quitting = false;
    loop {
        match input_rx.recv_timeout(TICK) {
            Ok(Input::Line(line)) if line.trim().is_empty() => {}
            Ok(Input::Line(line)) => {
                match Command::parse(&line) {
                    Ok(Command::Quit) if panel.is_busy() => {
                        quitting = true;
                        panel.dispatch(Msg::StopClicked);
                    }
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Status) => {
                        let logs = registry.logs_for(TAB_ID);
                        let recent = &logs[logs.len().saturating_sub(RECENT_LOGS)..];
                        println!("{}", render::render_status(registry.tab(TAB_ID), recent));
                    }
                    Ok(Command::Logs) => print_recent_logs(&ring),
                    Ok(command) => {
                        for msg in command.into_msgs() {
                            panel.dispatch(msg);
                        }
                    }
                    Err(err) => eprintln!("{err}; {HELP}"),
                }
            }
            Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => stdin_open = false,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        while let Some(event) = panel.runner.try_recv() {
            registry.observe(TAB_ID, &source, &event);
            if let ScraperEvent::Download { artifact, save_as } = &event {
                persist_artifact(&writer, artifact, *save_as);
            }
            panel.dispatch(Msg::Engine(event));
        }
        panel.dispatch(Msg::Tick);

        if (quitting || !stdin_open) && !panel.is_busy() {
            break;
        }
    }

    registry.close_tab(TAB_ID);
    engine_debug!("Console closed");
    Ok(())
}

struct Panel {
    state: AppState,
    runner: EffectRunner,
    show_ui: bool,
}

impl Panel {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty && self.show_ui {
            println!("{}", render::render_panel(&view));
        }
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state.session(),
            SessionState::Running | SessionState::Stopping
        )
    }
}

fn build_surface(cli: &Cli) -> anyhow::Result<Arc<dyn PageSurface>> {
    if let Some(url) = &cli.url {
        let surface = HttpPageSurface::new(url, FetchSettings::default())
            .with_context(|| format!("cannot scrape {url}"))?;
        return Ok(Arc::new(surface));
    }
    if cli.pages.is_empty() {
        bail!("nothing to scrape: pass --url or --pages");
    }
    let pages = StaticPages::from_files(&cli.pages).context("reading saved pages")?;
    Ok(Arc::new(pages))
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
}

fn persist_artifact(writer: &ArtifactWriter, artifact: &Artifact, save_as: bool) {
    if save_as {
        engine_info!(
            "No save dialog in console mode; writing {} to {:?}",
            artifact.filename,
            writer.dir()
        );
    }
    match writer.save(artifact) {
        Ok(path) => engine_info!(
            "Saved {} ({}) to {:?}",
            artifact.filename,
            artifact.mime_type(),
            path
        ),
        Err(err) => engine_error!("Failed to save {}: {}", artifact.filename, err),
    }
}

fn print_recent_logs(ring: &SharedLogRing) {
    let Ok(ring) = ring.lock() else { return };
    let skip = ring.len().saturating_sub(RECENT_LOGS);
    for record in ring.iter().skip(skip) {
        println!("{}", render::render_log(record));
    }
}
