use std::cell::Cell;
use std::rc::Rc;

use crate::error::{AppError, AppResult};
use crate::lifecycle::WindowLifecycle;
use crate::ui::install_note_icon_theme;
use gtk4::prelude::*;
use gtk4::{gio, glib, Application};

mod bootstrap;
mod dialogs;
mod hypr;
mod input_bridge;
mod note_menu;
mod note_window;
mod platform;
mod runtime_css;
mod worker;

use self::bootstrap::bootstrap_note_runtime;
use self::note_window::{open_note_window, NoteWindowContext};

const APPLICATION_ID: &str = "io.tacknote.Tacknote";

/// Pass only argv[0] to GTK; the binary takes no flags of its own.
fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

#[derive(Debug, Default)]
pub struct App;

impl App {
    pub fn new() -> Self {
        Self
    }

    /// Runs the GTK main loop until the last note window closes.
    pub fn start(&self) -> AppResult<()> {
        let bootstrap = bootstrap_note_runtime();
        let config = Rc::new(bootstrap.config);
        let backend = bootstrap.backend;

        tracing::info!("starting gtk runtime");
        let application =
            Application::new(Some(APPLICATION_ID), gio::ApplicationFlags::NON_UNIQUE);

        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            install_note_icon_theme();

            let app_for_shutdown = app.clone();
            let lifecycle = Rc::new(WindowLifecycle::new(move || app_for_shutdown.quit()));
            let context = Rc::new(NoteWindowContext {
                app: app.clone(),
                lifecycle,
                config: config.clone(),
                backend,
            });
            open_note_window(&context);
        });

        let exit_code = application.run_with_args(&gtk_launch_args());
        if exit_code != glib::ExitCode::SUCCESS {
            return Err(AppError::ExitStatus(format!("{exit_code:?}")));
        }
        Ok(())
    }
}
