use std::sync::Once;

use pretty_assertions::assert_eq;
use tablescrape_core::{
    update, AppState, Effect, ExportFormat, Msg, RunStats, RunStatus, ScraperEvent, SessionState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn stats(pages: u32, rows: u64) -> RunStats {
    RunStats {
        pages_processed: pages,
        rows_scraped: rows,
        ..RunStats::default()
    }
}

fn finish(state: AppState, status: RunStatus, rows: u64) -> AppState {
    let (state, _) = update(
        state,
        Msg::Engine(ScraperEvent::Finished {
            status,
            stats: stats(1, rows),
        }),
    );
    state
}

#[test]
fn start_from_idle_emits_start_run_with_selected_format() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FormatSelected(ExportFormat::Json));
    let (mut state, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::StartRun {
            format: ExportFormat::Json
        }]
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Running);
    assert_eq!(view.status_text, "Processing page 1...");
    assert!(!view.start_enabled);
    assert!(view.stop_enabled);
    assert!(state.consume_dirty());
}

#[test]
fn start_while_running_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (state, effects) = update(state, Msg::StartClicked);

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Running);
}

#[test]
fn stop_moves_running_to_stopping() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (state, effects) = update(state, Msg::StopClicked);

    assert_eq!(effects, vec![Effect::StopRun]);
    let view = state.view();
    assert_eq!(view.session, SessionState::Stopping);
    assert!(!view.stop_enabled);
    assert!(!view.start_enabled);
}

#[test]
fn stop_when_idle_is_ignored() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StopClicked);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
}

#[test]
fn progress_updates_page_and_rows() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (mut state, _) = update(
        state,
        Msg::Engine(ScraperEvent::Progress {
            current_page: 3,
            stats: stats(3, 42),
        }),
    );

    let view = state.view();
    assert_eq!(view.status_text, "Processing page 3...");
    assert_eq!(
        view.progress_text.as_deref(),
        Some("Page 3 \u{2022} 42 rows collected")
    );
    assert_eq!(view.stats.rows_scraped, 42);
    assert!(state.consume_dirty());
}

#[test]
fn completed_run_reports_and_enables_export() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let state = finish(state, RunStatus::Completed, 10);

    let view = state.view();
    assert_eq!(view.session, SessionState::Finished);
    assert_eq!(view.status_text, "Scraping completed!");
    assert_eq!(
        view.progress_text.as_deref(),
        Some("Complete! 10 rows collected")
    );
    assert!(view.start_enabled);
    assert!(view.export_enabled);
}

#[test]
fn failed_run_shows_reason() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let state = finish(
        state,
        RunStatus::Failed {
            reason: "load timeout".into(),
        },
        0,
    );

    let view = state.view();
    assert_eq!(view.status_text, "Scraping failed: load timeout");
    assert!(!view.export_enabled);
}

#[test]
fn export_of_stopped_run_uses_current_format() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let (state, _) = update(state, Msg::StopClicked);
    let state = finish(state, RunStatus::Stopped, 5);
    let (state, _) = update(state, Msg::FormatSelected(ExportFormat::Json));
    let (_state, effects) = update(state, Msg::ExportClicked);

    assert_eq!(
        effects,
        vec![Effect::ExportAccumulated {
            format: ExportFormat::Json
        }]
    );
}

#[test]
fn export_without_rows_is_ignored() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ExportClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::StartClicked);
    let state = finish(state, RunStatus::Completed, 0);
    let (_state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());
}

#[test]
fn restart_after_finish_resets_stats() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    let state = finish(state, RunStatus::Completed, 10);
    let (state, effects) = update(state, Msg::StartClicked);

    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.stats, RunStats::default());
    assert_eq!(view.status_text, "Processing page 1...");
}
