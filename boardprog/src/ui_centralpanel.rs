use crate::app::{ProgrammerApp, colors};
use eframe::egui;
use ihexline::HexRecord;

const COLUMNS: [(&str, f32); 4] = [
    ("Byte Count", 80.0),
    ("Address", 80.0),
    ("Record Type", 200.0),
    ("Checksum", 80.0),
];

impl ProgrammerApp {
    /// Displays the central panel with the loaded file name and its record table.
    pub(crate) fn show_central_panel(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(hex) = self.hex.as_ref() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Drop a HEX file or use 'File > Load HEX file...' to start!");
                });
                return;
            };

            ui.horizontal(|ui| {
                ui.label(format!("Loaded File: {}", hex.name))
                    .on_hover_text(hex.filepath.to_string_lossy().into_owned());
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} records, {} data bytes",
                        hex.len(),
                        hex.data_size()
                    ))
                    .color(colors::GRAY_160),
                );
            });

            ui.separator();

            draw_header(ui);

            // Get row height in pixels (depends on font size)
            let row_height = ui.text_style_height(&egui::TextStyle::Monospace) + 4.0;
            let records = hex.records();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show_rows(ui, row_height, records.len(), |ui, row_range| {
                    for row in row_range {
                        if let Some(record) = records.get(row) {
                            draw_row(ui, row, record, row_height);
                        }
                    }
                });
        });
    }
}

fn draw_header(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        for (title, width) in COLUMNS {
            ui.add_sized([width, 18.0], egui::Label::new(egui::RichText::new(title).strong()));
        }
        ui.label(egui::RichText::new("Data").strong());
    });
}

fn draw_row(ui: &mut egui::Ui, row: usize, record: &HexRecord, row_height: f32) {
    let fill = if row % 2 == 1 {
        colors::STRIPE
    } else {
        egui::Color32::TRANSPARENT
    };

    egui::Frame::new().fill(fill).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.set_height(row_height);

        ui.horizontal(|ui| {
            let cells = [
                record.byte_count().to_string(),
                format!("{:04X}", record.address()),
                record.record_type().to_string(),
                format!("{:02X}", record.checksum()),
            ];

            for (text, (_, width)) in cells.iter().zip(COLUMNS) {
                ui.add_sized(
                    [width, row_height],
                    egui::Label::new(egui::RichText::new(text).monospace()),
                );
            }

            ui.add(egui::Label::new(egui::RichText::new(record.data_hex()).monospace()).truncate());
        });
    });
}
