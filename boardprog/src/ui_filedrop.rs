use crate::app::ProgrammerApp;
use eframe::egui;

impl ProgrammerApp {
    /// Handle drag and drop events:
    /// - If a file is dropped, load it into the app.
    /// - If a file is dragged over the central panel, display a message.
    /// - If the popup is shown, do not handle drag and drop events.
    pub(crate) fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        // Return if the popup is shown
        if self.popup.active {
            return;
        }

        // Overwrite the central panel with a message when file is dragged over
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if hovering_files {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.heading("Drop HEX file to load");
                });
            });
        }

        // Load the last dropped file, only one can be loaded at a time
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().rev().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.load_file(&path);
        }
    }
}
