use crate::app::colors::to_color32;
use eframe::egui;
use memviewlib::{Canvas, CellMetrics, Point, Rect, Rgba};

/// Number of glyphs measured to get the advance width of the monospace font
const MEASURE_GLYPHS: usize = 16;

/// Paints through an egui painter. Canvas coordinates are relative to `origin`.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    font: egui::FontId,
}

impl<'a> EguiCanvas<'a> {
    pub const fn new(painter: &'a egui::Painter, origin: egui::Pos2, font: egui::FontId) -> Self {
        Self {
            painter,
            origin,
            font,
        }
    }

    fn pos(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let min = self.pos(Point::new(rect.x, rect.y));
        self.painter.rect_filled(
            egui::Rect::from_min_size(min, egui::vec2(rect.width, rect.height)),
            0.0,
            to_color32(color),
        );
    }

    fn draw_text(&mut self, pos: Point, text: &str, color: Rgba) {
        self.painter.text(
            self.pos(pos),
            egui::Align2::LEFT_TOP,
            text,
            self.font.clone(),
            to_color32(color),
        );
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            egui::Stroke::new(1.0, to_color32(color)),
        );
    }
}

/// Glyph cell size of the monospace font
#[allow(clippy::cast_precision_loss)]
pub fn cell_metrics(painter: &egui::Painter, font: &egui::FontId) -> CellMetrics {
    let galley = painter.layout_no_wrap(
        "0".repeat(MEASURE_GLYPHS),
        font.clone(),
        egui::Color32::WHITE,
    );
    let size = galley.size();

    CellMetrics {
        width: size.x / MEASURE_GLYPHS as f32,
        height: size.y,
    }
}
