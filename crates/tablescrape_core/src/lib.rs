//! Tablescrape core: row model, dedup, run state and the control-panel state machine.
mod config;
mod dedup;
mod effect;
mod event;
mod msg;
pub mod relay;
mod row;
mod run;
mod state;
mod update;
mod view_model;

pub use config::{ExportFormat, NextControlSpec, ScrapeConfig, Settings, UnknownFormat};
pub use dedup::{DedupEngine, Fingerprint};
pub use effect::Effect;
pub use event::{Artifact, ScraperEvent};
pub use msg::Msg;
pub use row::Row;
pub use run::{PageStep, Phase, RunState, RunStats, RunStatus};
pub use state::{AppState, SessionState};
pub use update::update;
pub use view_model::PanelView;
