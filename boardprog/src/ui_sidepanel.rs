use crate::app::{ProgrammerApp, colors};
use ihexline::Board;
use ihexline::transport::BAUD_RATES;
use eframe::egui;

impl ProgrammerApp {
    /// Show the side panel with board selection, UART settings and the programming actions.
    pub(crate) fn show_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("left_panel")
            .exact_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(3.0);

                // TARGET BOARD
                egui::CollapsingHeader::new("Target Board")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_board_contents(ui);
                        ui.add_space(5.0);
                    });

                ui.add_space(3.0);

                // UART SETTINGS
                egui::CollapsingHeader::new("UART Settings")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_uart_contents(ui);
                        ui.add_space(5.0);
                    });

                ui.add_space(3.0);

                // PROGRAMMING
                egui::CollapsingHeader::new("Programming")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_action_contents(ui);
                        ui.add_space(5.0);
                    });
            });
    }

    fn show_board_contents(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("board_combo")
                .width(170.0)
                .selected_text(self.board_choice.map_or("Select a board", |b| b.name()))
                .show_ui(ui, |ui| {
                    for board in Board::ALL {
                        ui.selectable_value(&mut self.board_choice, Some(board), board.name());
                    }
                });

            if ui.button("Select Board").clicked() {
                self.select_board();
            }
        });

        ui.add_space(3.0);

        // Confirmed board and its signature
        let text = self.programmer.board().map_or_else(
            || "No board selected".to_string(),
            |b| format!("Selected: {b} ({})", b.signature()),
        );
        ui.label(egui::RichText::new(text).color(colors::GRAY_160));
    }

    fn show_uart_contents(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("uart_grid")
            .num_columns(2) // two columns: label + value
            .spacing([20.0, 6.0]) // horizontal & vertical spacing
            .show(ui, |ui| {
                ui.label("COM Port");
                egui::ComboBox::from_id_salt("port_combo")
                    .width(190.0)
                    .selected_text(self.port_choice.as_deref().unwrap_or("No ports found"))
                    .show_ui(ui, |ui| {
                        for port in &self.ports {
                            let label = port.label();
                            ui.selectable_value(&mut self.port_choice, Some(label.clone()), label);
                        }
                    });
                ui.end_row();

                ui.label("Baud Rate");
                egui::ComboBox::from_id_salt("baud_combo")
                    .width(190.0)
                    .selected_text(self.baudrate.to_string())
                    .show_ui(ui, |ui| {
                        for baud in BAUD_RATES {
                            ui.selectable_value(&mut self.baudrate, baud, baud.to_string());
                        }
                    });
                ui.end_row();
            });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                self.refresh_ports();
            }

            let connected = self.programmer.is_connected();
            if ui
                .add_enabled(!connected, egui::Button::new("Connect"))
                .clicked()
            {
                self.connect();
            }
            if ui
                .add_enabled(connected, egui::Button::new("Disconnect"))
                .clicked()
            {
                self.disconnect();
            }
        });

        ui.add_space(3.0);

        let status = match self.programmer.port_name() {
            Some(name) if self.programmer.is_connected() => {
                egui::RichText::new(format!("Connected: {name}")).color(colors::GREEN)
            }
            _ if self.programmer.is_connected() => {
                egui::RichText::new("Connected").color(colors::GREEN)
            }
            _ => egui::RichText::new("Not connected").color(colors::GRAY_160),
        };
        ui.label(status);
    }

    fn show_action_contents(&mut self, ui: &mut egui::Ui) {
        let button_size = egui::vec2(ui.available_width(), 28.0);

        if ui
            .add_sized(button_size, egui::Button::new("Check Signature"))
            .clicked()
        {
            self.check_signature();
        }

        ui.add_space(3.0);

        if ui
            .add_sized(button_size, egui::Button::new("Program Device"))
            .clicked()
        {
            self.program_device();
        }
    }
}
