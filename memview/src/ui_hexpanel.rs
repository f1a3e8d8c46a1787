use crate::app::MemViewApp;
use crate::canvas::{EguiCanvas, cell_metrics};
use crate::ui_scrollbar::{draw_custom_scrollbar, scrollbar_rect};
use eframe::egui;
use memviewlib::Point;

/// Wheel movement below this is treated as drift
const SCROLL_THRESHOLD: f32 = 0.4;

impl MemViewApp {
    /// Displays the central panel with the hex view and its scrollbar
    pub(crate) fn show_hex_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let font = egui::FontId::monospace(self.settings.display.font_size);
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;

                // Keep the display geometry in sync with the font and the panel
                let metrics = cell_metrics(&painter, &font);
                if metrics != self.display.metrics() {
                    self.display.set_cell_metrics(metrics);
                }
                if self.display.viewport().size() != (rect.width(), rect.height()) {
                    self.display.resize(rect.width(), rect.height());
                }

                self.handle_pointer(ctx, &response);
                self.handle_scroll(&response);
                self.handle_keys(ctx);

                let mut canvas = EguiCanvas::new(&painter, rect.min, font);
                self.display.render(&mut canvas, &self.render_ctx);

                let id = ui.id().with("hex_scrollbar");
                if let Some(top_row) = draw_custom_scrollbar(ui, rect, self.display.viewport(), id)
                {
                    let horizontal = self.display.viewport().horizontal();
                    self.display.set_scroll(horizontal, top_row);
                }
            });
    }

    /// Press, drag and release of the primary button. Positions are panel relative.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;
        let bar = scrollbar_rect(rect);
        let (pressed, down, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let local = Point::new(pos.x - rect.left(), pos.y - rect.top());

        if pressed && response.hovered() && !bar.contains(pos) {
            // Clicking the bytes takes the focus off the side panel fields
            self.search.loose_focus();
            self.jump_to.loose_focus();
            self.display.press(local);
        } else if down {
            self.display.drag(local);
        }

        if released {
            self.display.release(local);
        }
    }

    /// Wheel scrolls one line (or column) per frame
    fn handle_scroll(&mut self, response: &egui::Response) {
        if !response.hovered() {
            return;
        }
        let delta = self.events.scroll_delta;

        if delta.y > SCROLL_THRESHOLD {
            self.display.scroll_lines(-1);
        } else if delta.y < -SCROLL_THRESHOLD {
            self.display.scroll_lines(1);
        }

        if delta.x.abs() > SCROLL_THRESHOLD {
            let viewport = self.display.viewport();
            let horizontal = if delta.x > 0.0 {
                viewport.horizontal().saturating_sub(1)
            } else {
                viewport.horizontal() + 1
            };
            let vertical = viewport.vertical();
            self.display.set_scroll(horizontal, vertical);
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Typing in the side panel fields
        if ctx.wants_keyboard_input() {
            return;
        }

        for key in self.events.nav_keys.clone() {
            self.display.handle_key(key);
        }

        if self.events.escape_pressed {
            self.display.clear_selection();
            self.clear_search();
        }
    }
}
