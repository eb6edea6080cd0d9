use crate::ProgrammerApp;
use crate::ui_popup::PopupType;
use eframe::egui;

impl ProgrammerApp {
    /// Displays the top menu bar with File and About buttons
    pub(crate) fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| {
            ui.add_space(3.0);

            egui::MenuBar::new().ui(ui, |ui| {
                ui.horizontal(|ui| {
                    // FILE MENU
                    ui.menu_button("File", |ui| {
                        // LOAD BUTTON
                        if ui.button("Load HEX file...").clicked() {
                            self.pick_and_load_file();
                        }

                        // CLOSE BUTTON
                        if ui
                            .add_enabled(self.hex.is_some(), egui::Button::new("Close file"))
                            .clicked()
                        {
                            self.close_file();
                        }
                    });

                    // ABOUT BUTTON
                    if ui.button("About").clicked() {
                        self.popup.open(PopupType::About, "");
                    }
                });
            });

            ui.add_space(2.0);
        });
    }
}
