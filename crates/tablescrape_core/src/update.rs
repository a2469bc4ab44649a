use engine_logging::{engine_debug, engine_warn};

use crate::{AppState, Effect, Msg, ScraperEvent, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormatSelected(format) => {
            state.set_format(format);
            Vec::new()
        }
        Msg::StartClicked => match state.session() {
            SessionState::Idle | SessionState::Finished => {
                state.start_session();
                vec![Effect::StartRun {
                    format: state.format(),
                }]
            }
            SessionState::Running | SessionState::Stopping => {
                engine_warn!("Scraping already in progress");
                Vec::new()
            }
        },
        Msg::StopClicked => {
            if state.session() == SessionState::Running {
                state.request_stop();
                vec![Effect::StopRun]
            } else {
                Vec::new()
            }
        }
        Msg::ExportClicked => {
            if state.has_exportable_rows() {
                vec![Effect::ExportAccumulated {
                    format: state.format(),
                }]
            } else {
                engine_debug!("Export ignored: no finished run with rows");
                Vec::new()
            }
        }
        Msg::Engine(event) => {
            apply_engine_event(&mut state, event);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn apply_engine_event(state: &mut AppState, event: ScraperEvent) {
    match event {
        ScraperEvent::Progress {
            current_page,
            stats,
        } => state.apply_progress(current_page, stats),
        ScraperEvent::StatsUpdate { stats, .. } => state.apply_stats(stats),
        ScraperEvent::Finished { status, stats } => state.finish(status, stats),
        // Logs and downloads are handled by the platform, not the panel.
        ScraperEvent::Log(_) | ScraperEvent::Download { .. } => {}
    }
}
