use crate::app::MemViewApp;
use eframe::egui;
use memviewlib::{DisplayEvent, HexDisplay};
use tracing::trace;

/// Texts shown in the status bar. Refreshed from display notifications only.
#[derive(Default)]
pub struct Status {
    cursor: String,
    selection: String,
}

impl Status {
    /// Update the texts for the notifications drained from the display
    pub fn consume(&mut self, events: &[DisplayEvent], display: &HexDisplay) {
        for event in events {
            match event {
                DisplayEvent::CursorChanged(change) => {
                    trace!(
                        from = change.previous.address,
                        to = change.current.address,
                        "cursor changed"
                    );
                    self.cursor = cursor_text(display);
                }
                DisplayEvent::SelectionChanged => {
                    trace!("selection changed");
                    self.selection = selection_text(display);
                    // Buffer changes also move what lives under the cursor
                    self.cursor = cursor_text(display);
                }
            }
        }
    }
}

fn cursor_text(display: &HexDisplay) -> String {
    match display.char_at_cursor() {
        Some((digit, byte)) => {
            let address = display.address_of(display.cursor().address);
            format!("0x{address:X}  nibble '{digit}'  byte 0x{byte:02X} ({byte})")
        }
        None => String::new(),
    }
}

fn selection_text(display: &HexDisplay) -> String {
    match display.selected_bytes() {
        Some(bytes) => format!("Selected: {} bytes", bytes.len()),
        None => String::new(),
    }
}

impl MemViewApp {
    /// Bottom bar with the cursor, the selection and the number of changed bytes
    pub(crate) fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("statusbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.monospace(&self.status.cursor);
                ui.separator();
                ui.monospace(&self.status.selection);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.monospace(format!(
                        "Changed: {}",
                        self.display.dirty().dirty_count()
                    ));
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memviewlib::{DisplayConfig, Nibble};

    #[test]
    fn test_status_follows_notifications() {
        // Arrange
        let mut display = HexDisplay::with_data(DisplayConfig::default(), vec![0xAB; 8], 0x40);
        let mut status = Status::default();

        // Act
        display.move_cursor_to(2, Nibble::Low);
        status.consume(&display.take_events(), &display);

        // Assert
        assert_eq!(status.cursor, "0x42  nibble 'b'  byte 0xAB (171)");
        assert!(status.selection.is_empty());
    }

    #[test]
    fn test_status_ignores_silent_frames() {
        // Arrange
        let mut display = HexDisplay::with_data(DisplayConfig::default(), vec![1, 2], 0);
        let mut status = Status::default();

        // Act: a move to the current position emits nothing
        display.move_cursor_to(0, Nibble::High);
        status.consume(&display.take_events(), &display);

        // Assert
        assert!(status.cursor.is_empty());
    }
}
