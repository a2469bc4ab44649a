mod app;
mod console;
mod effects;
mod logging;
mod render;
mod settings;

pub use app::run_app;
