#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
// Tell OS to hide the console window when running.
// This attribute is only applied if the target OS is Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod events;
mod loader;
mod ui_centralpanel;
mod ui_filedrop;
mod ui_menubar;
mod ui_popup;
mod ui_sidepanel;

use app::ProgrammerApp;
use eframe::egui;
use simplelog::{Config, LevelFilter, SimpleLogger};

fn main() -> eframe::Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    // A missing logger is not a reason to refuse to start
    let _ = SimpleLogger::init(level, Config::default());

    let options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_resizable(true)
            .with_inner_size([1100.0, 650.0])
            .with_min_inner_size([800.0, 450.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Board Programmer",
        options,
        Box::new(|_cc| Ok(Box::new(ProgrammerApp::new()))),
    )
}

impl eframe::App for ProgrammerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_menu_bar(ctx);
        self.show_side_panel(ctx);

        self.handle_drag_and_drop(ctx);

        // If pop active - show it and return (don't display the records)
        if self.popup.active {
            self.show_popup(ctx);
            return;
        }

        self.show_central_panel(ctx);
    }
}
