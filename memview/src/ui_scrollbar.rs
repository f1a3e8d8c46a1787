use eframe::egui;
use memviewlib::Viewport;

/// Track area of the vertical scrollbar inside the panel rect
pub fn scrollbar_rect(rect: egui::Rect) -> egui::Rect {
    let margin = 4.0;
    let bottom_margin = 12.0; // extra space from the bottom
    egui::Rect::from_min_max(
        egui::pos2(rect.right() - 14.0, rect.top() + margin),
        egui::pos2(rect.right() - 2.0, rect.bottom() - bottom_margin),
    )
}

/// Draw a custom vertical scrollbar for the viewport.
/// Returns the new top line if the user clicked or dragged the bar.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
pub fn draw_custom_scrollbar(
    ui: &egui::Ui,
    rect: egui::Rect,
    viewport: &Viewport,
    id: egui::Id,
) -> Option<usize> {
    let max_top_row = viewport.vertical_max();
    if max_top_row == 0 {
        return None;
    }
    let top_row = viewport.vertical();
    let visible_rows = viewport.vertical_page().max(1);
    let total_rows = max_top_row + visible_rows;

    let scroll_area_rect = scrollbar_rect(rect);

    // Animation logic (for shrinking / expanding)
    let is_hovered = ui.rect_contains_pointer(scroll_area_rect);
    let expansion = ui.ctx().animate_bool(id.with("anim"), is_hovered);
    let bar_width = egui::lerp(4.0..=10.0, expansion);
    let scrollbar_rect = scroll_area_rect.with_min_x(scroll_area_rect.right() - bar_width);

    // Handle size follows the visible share of the content, with a lower limit
    let handle_height =
        ((visible_rows as f32 / total_rows as f32) * scrollbar_rect.height()).max(20.0);

    // Travel range is the track height minus the handle height
    let travel_range = scrollbar_rect.height() - handle_height;
    let progress = top_row as f32 / max_top_row as f32;
    let handle_y_offset = progress * travel_range;

    // Track scrollbar interactions
    let response = ui.interact(
        scrollbar_rect,
        id.with("bar"),
        egui::Sense::click_and_drag(),
    );
    let mut new_row = None;
    if (response.clicked() || response.dragged())
        && let Some(pointer_pos) = ui.input(|i| i.pointer.hover_pos())
    {
        // Center the handle on the pointer
        let click_y = pointer_pos.y - scrollbar_rect.top() - handle_height / 2.0;
        let t = (click_y / travel_range).clamp(0.0, 1.0);

        new_row = Some((t * max_top_row as f32).round() as usize);
    }

    // Paint the track
    let track_color = ui.visuals().extreme_bg_color;
    ui.painter()
        .rect_filled(scrollbar_rect, 2.0, track_color.gamma_multiply(expansion));

    // Paint the handle
    let handle_rect = egui::Rect::from_min_size(
        egui::pos2(
            scrollbar_rect.left(),
            scrollbar_rect.top() + handle_y_offset,
        ),
        egui::vec2(bar_width, handle_height),
    );
    let handle_color = if response.dragged() {
        ui.visuals().widgets.active.bg_fill
    } else if is_hovered {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };

    ui.painter().rect_filled(handle_rect, 2.0, handle_color);

    new_row
}
