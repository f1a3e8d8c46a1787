use crate::app::MemViewApp;
use crate::ui_popup::PopupType;
use eframe::egui;

/// Line widths offered in the View menu
const BYTES_PER_LINE_CHOICES: [usize; 3] = [8, 16, 32];

impl MemViewApp {
    /// Displays the top menu bar with File, Edit, View, and About buttons
    pub(crate) fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| {
            ui.add_space(3.0);

            egui::MenuBar::new().ui(ui, |ui| {
                ui.horizontal(|ui| {
                    // FILE MENU
                    ui.menu_button("File", |ui| {
                        if ui.button("Open file...").clicked()
                            && let Some(path) =
                                rfd::FileDialog::new().set_title("Open File").pick_file()
                        {
                            self.load_file(&path);
                        }

                        // Take a new snapshot of the same file
                        if ui
                            .add_enabled(self.file.is_some(), egui::Button::new("Reload"))
                            .clicked()
                        {
                            self.reload_file();
                        }

                        if ui
                            .add_enabled(self.file.is_some(), egui::Button::new("Close file"))
                            .clicked()
                        {
                            self.close_file();
                        }

                        ui.separator();

                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });

                    // EDIT MENU
                    ui.menu_button("Edit", |ui| {
                        let has_data = !self.display.is_empty();

                        if ui
                            .add_enabled(has_data, egui::Button::new("Set starting address..."))
                            .clicked()
                        {
                            self.popup.open(PopupType::ReAddr);
                        }

                        if ui
                            .add_enabled(has_data, egui::Button::new("Mark all bytes unchanged"))
                            .clicked()
                        {
                            self.display.mark_clean();
                        }

                        if ui.button("Clear highlights").clicked() {
                            self.clear_search();
                            self.display.clear_highlights();
                        }
                    });

                    // VIEW MENU
                    ui.menu_button("View", |ui| {
                        ui.label("Select Bytes per Row:");

                        ui.add_space(3.0);

                        let mut bytes_per_line = self.bytes_per_line();
                        for choice in BYTES_PER_LINE_CHOICES {
                            ui.radio_value(&mut bytes_per_line, choice, format!("{choice} bytes"));
                            ui.add_space(1.0);
                        }
                        if bytes_per_line != self.bytes_per_line() {
                            self.set_bytes_per_line(bytes_per_line);
                        }
                    });

                    if ui.button("About").clicked() {
                        self.popup.open(PopupType::About);
                    }
                });
            });

            ui.add_space(2.0);
        });
    }
}
