use eframe::egui;
use memviewlib::NavKey;

#[derive(Default, Clone)]
pub struct EventState {
    /// Navigation keys pressed this frame, auto-repeat included
    pub(crate) nav_keys: Vec<NavKey>,
    pub(crate) escape_pressed: bool,
    pub(crate) enter_released: bool,
    /// Wheel / touchpad scroll of this frame
    pub(crate) scroll_delta: egui::Vec2,
}

/// Helper for mapping keys to cursor navigation
const fn key_to_nav(key: egui::Key) -> Option<NavKey> {
    Some(match key {
        egui::Key::ArrowLeft => NavKey::Left,
        egui::Key::ArrowRight => NavKey::Right,
        egui::Key::ArrowUp => NavKey::Up,
        egui::Key::ArrowDown => NavKey::Down,
        egui::Key::PageUp => NavKey::PageUp,
        egui::Key::PageDown => NavKey::PageDown,
        egui::Key::Home => NavKey::Home,
        egui::Key::End => NavKey::End,
        _ => return None,
    })
}

/// Collect events once per frame and return an aggregated state
pub fn collect_ui_events(ctx: &egui::Context) -> EventState {
    ctx.input(|i| {
        let mut state = EventState {
            scroll_delta: i.smooth_scroll_delta,
            ..Default::default()
        };

        for event in &i.events {
            if let egui::Event::Key { key, pressed, .. } = event {
                if *pressed && let Some(nav) = key_to_nav(*key) {
                    state.nav_keys.push(nav);
                }

                if !*pressed && *key == egui::Key::Enter {
                    state.enter_released = true;
                }
            }
        }

        // Direct query for Escape pressed this frame
        state.escape_pressed = i.key_pressed(egui::Key::Escape);

        state
    })
}
