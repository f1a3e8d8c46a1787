use crate::app::{MemViewApp, colors};
use eframe::egui;

/// Format a number with thousands separators, e.g. `1 048 576`
fn format_with_separators(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Label in the left column of an info grid
fn grid_label(ui: &mut egui::Ui, text: &str) {
    ui.with_layout(egui::Layout::left_to_right(egui::Align::LEFT), |ui| {
        ui.label(text);
    });
}

impl MemViewApp {
    /// Show the side panel with the file information, jump to address, search and selection.
    pub(crate) fn show_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("left_panel")
            .exact_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(3.0);

                // FILE INFORMATION
                egui::CollapsingHeader::new("File Information")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_file_info(ui);
                        ui.add_space(5.0);
                    });

                ui.add_space(3.0);

                // JUMP TO ADDRESS
                egui::CollapsingHeader::new("Jump To Address")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_jumpto_contents(ui);
                        ui.add_space(5.0);
                    });

                ui.add_space(3.0);

                // SEARCH
                egui::CollapsingHeader::new("Search")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_search_contents(ui);
                        ui.add_space(5.0);
                    });

                ui.add_space(3.0);

                // SELECTION
                egui::CollapsingHeader::new("Selection")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add_space(5.0);
                        self.show_selection_info(ui);
                        ui.add_space(5.0);
                    });
            });
    }

    fn show_file_info(&mut self, ui: &mut egui::Ui) {
        let (name, path) = self.file.as_ref().map_or_else(
            || (String::new(), String::new()),
            |f| (f.name.clone(), f.path.to_string_lossy().into_owned()),
        );

        egui::Grid::new("file_info_grid")
            .num_columns(2) // two columns: label + value
            .spacing([30.0, 4.0]) // horizontal & vertical spacing
            .show(ui, |ui| {
                grid_label(ui, "File Name");
                // Wrap the name + show the filepath on hover
                let response = ui.add(egui::Label::new(&name).wrap().sense(egui::Sense::hover()));
                if !path.is_empty() {
                    response.on_hover_text(&path);
                }
                ui.end_row();

                grid_label(ui, "Size");
                ui.label(format!(
                    "{} bytes",
                    format_with_separators(self.display.len())
                ));
                ui.end_row();

                grid_label(ui, "Start Address");
                ui.monospace(format!("0x{:X}", self.display.starting_address()));
                ui.end_row();

                grid_label(ui, "Changed");
                ui.label(format!(
                    "{} bytes",
                    format_with_separators(self.display.dirty().dirty_count())
                ));
                ui.end_row();
            });

        // If the file changed on disk -> show warning
        if self.file_changed_on_disk() {
            ui.add_space(3.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("File on disk has been modified!")
                        .color(colors::WARNING)
                        .size(12.0)
                        .strong(),
                )
                .on_hover_text(
                    "This file has been modified on disk since it was loaded.\n\
                    Reloading marks the bytes that differ.",
                );
                if ui.small_button("Reload").clicked() {
                    self.reload_file();
                }
            });
        }
    }

    fn show_selection_info(&self, ui: &mut egui::Ui) {
        let Some(bytes) = self.display.selected_bytes() else {
            ui.label("No selection");
            return;
        };

        let selection = self.display.selection();
        egui::Grid::new("selection_grid")
            .num_columns(2)
            .spacing([30.0, 4.0])
            .show(ui, |ui| {
                grid_label(ui, "From");
                ui.monospace(format!(
                    "0x{:X}",
                    self.display.address_of(selection.start())
                ));
                ui.end_row();

                grid_label(ui, "To");
                ui.monospace(format!("0x{:X}", self.display.address_of(selection.end())));
                ui.end_row();

                grid_label(ui, "Length");
                ui.label(format!("{} bytes", format_with_separators(bytes.len())));
                ui.end_row();
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_separators() {
        // Act & Assert
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1000), "1 000");
        assert_eq!(format_with_separators(1_048_576), "1 048 576");
    }
}
