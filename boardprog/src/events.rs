use eframe::egui;

#[derive(Default, Clone, Copy)]
pub struct EventState {
    pub(crate) escape_pressed: bool,
    pub(crate) enter_released: bool,
}

/// Collect the keys the pop-up reacts to, once per frame
pub fn collect_ui_events(ui: &egui::Ui) -> EventState {
    ui.input(|i| {
        let mut state = EventState::default();

        // Key press events (only consider key releases)
        for event in &i.events {
            if let egui::Event::Key {
                key: egui::Key::Enter,
                pressed: false,
                ..
            } = event
            {
                state.enter_released = true;
            }
        }

        // Direct query for Escape pressed this frame
        state.escape_pressed = i.key_pressed(egui::Key::Escape);

        state
    })
}
