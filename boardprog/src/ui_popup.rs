use crate::ProgrammerApp;
use crate::app::colors;
use crate::events::{EventState, collect_ui_events};
use eframe::egui;

//  ========================== Popup Type logic ============================= //

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PopupType {
    Error,
    Info,
    About,
}

impl PopupType {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Info => "Info",
            Self::About => "About",
        }
    }
}

//  ========================== Popup logic =================================== //

#[derive(Default)]
pub struct Popup {
    /// Is there a pop-up
    pub(crate) active: bool,
    /// Type of the pop-up. Used to determine the title and content of the window.
    pub(crate) ptype: Option<PopupType>,
    /// Message shown by the Error and Info pop-ups
    message: String,
    /// Keys pressed while the pop-up is shown
    events: EventState,
}

impl Popup {
    /// Open a pop-up of the given type with a message
    pub(crate) fn open(&mut self, ptype: PopupType, message: impl Into<String>) {
        self.active = true;
        self.ptype = Some(ptype);
        self.message = message.into();
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.open(PopupType::Error, message);
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        self.open(PopupType::Info, message);
    }

    /// Clear (aka remove) the pop-up
    pub(crate) fn clear(&mut self) {
        self.active = false;
        self.ptype = None;
        self.message.clear();
    }
}

//  ========================== Programmer logic ============================= //

impl ProgrammerApp {
    fn display_message(ui: &mut egui::Ui, msg: &str) -> bool {
        ui.label(msg);

        // Add space before close button
        ui.add_space(10.0);

        // Close on OK
        ui.vertical_centered(|ui| ui.button("  OK  ").clicked())
            .inner
    }

    fn display_about(ui: &mut egui::Ui) -> bool {
        ui.vertical(|ui| {
            ui.add_space(5.0);

            ui.heading("Board Programmer");
            ui.label("Send Intel HEX firmware to a board over UART");

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(
                "The app is built with egui - immediate-mode GUI library. \
            Record decoding and the serial transfer are handled by the ihexline library, \
            built as part of the same project.\n\nEvery record is sent as a text line, \
            followed by the END terminator. The board is expected to flash the lines itself.",
            );

            ui.label("\nCheck out the source code on GitHub:");
            ui.hyperlink_to(
                "https://github.com/iharhl/hexalyzer",
                "https://github.com/iharhl/hexalyzer",
            );

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(format!(
                "v{} | Copyright (c) 2026 Ihar Hlukhau",
                env!("CARGO_PKG_VERSION")
            ));
            ui.add_space(5.0);
        });

        // Keep the window open
        false
    }

    /// Show the pop-up
    pub(crate) fn show_popup(&mut self, ctx: &egui::Context) {
        let content_rect = ctx.content_rect();

        // Block interaction with the app
        egui::Area::new(egui::Id::from("modal_blocker"))
            .order(egui::Order::Background)
            .fixed_pos(content_rect.left_top())
            .show(ctx, |ui| {
                ui.allocate_rect(content_rect, egui::Sense::click());

                // Collect input events once per frame
                self.popup.events = collect_ui_events(ui);
            });

        // Darken the background
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("modal_bg"),
        ));
        painter.rect_filled(content_rect, 0.0, colors::SHADOW);

        let mut is_open = self.popup.active;

        let Some(popup_type) = self.popup.ptype else {
            self.popup.clear();
            return;
        };

        // Display the pop-up
        let window = egui::Window::new(popup_type.title())
            .open(&mut is_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]);

        // Track OK button or Enter press
        let mut close_confirm = false;

        let message = self.popup.message.clone();
        window.show(ctx, |ui| {
            ui.set_min_width(260.0);
            close_confirm = match popup_type {
                PopupType::Error | PopupType::Info => Self::display_message(ui, &message),
                PopupType::About => Self::display_about(ui),
            };
        });

        let events = self.popup.events;
        let keep_open = !close_confirm
            && is_open
            && !events.escape_pressed
            && !(events.enter_released && popup_type != PopupType::About);

        if !keep_open {
            self.popup.clear();
        }
    }
}
