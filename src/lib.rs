pub mod app;
pub mod clipboard;
mod config;
pub mod drag;
pub mod error;
pub mod font;
pub mod geometry;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod note;
pub mod pin;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the `tacknote` binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting tacknote");

    let app = app::App::new();
    app.start()?;

    tracing::info!("all notes closed; exiting");
    Ok(())
}
