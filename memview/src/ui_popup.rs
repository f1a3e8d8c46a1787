use crate::app::{MemViewApp, colors};
use eframe::egui;
use tracing::info;

//  ========================== Popup Type logic ============================= //

#[derive(Clone, PartialEq, Eq)]
pub enum PopupType {
    Error,
    About,
    ReAddr,
}

impl PopupType {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::About => "About",
            Self::ReAddr => "Starting Address",
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
    /// Text field content in the pop-up, if present
    text_input: String,
}

impl Popup {
    /// Clear (aka remove) the pop-up
    pub const fn clear(&mut self) {
        self.active = false;
        self.ptype = None;
    }

    /// Open a pop-up of the given type
    pub fn open(&mut self, ptype: PopupType) {
        self.active = true;
        self.ptype = Some(ptype);
    }
}

//  ========================== MemView logic =============================== //

impl MemViewApp {
    fn display_error(ui: &mut egui::Ui, msg: &str) -> bool {
        ui.label(msg);

        // Add space before close button
        ui.add_space(10.0);

        // Keep the window open
        false
    }

    fn display_about(ui: &mut egui::Ui) -> bool {
        ui.vertical(|ui| {
            ui.add_space(5.0);

            ui.heading("MemView");
            ui.label("Hexadecimal memory viewer");

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(
                "Shows a memory snapshot as hex and ASCII columns. Loading a new snapshot \
            compares every byte with the previous one at the same address and paints the \
            changed bytes.",
            );

            ui.add_space(3.0);
            ui.separator();
            ui.add_space(3.0);

            ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
            ui.add_space(5.0);
        });

        // Keep the window open
        false
    }

    fn display_readdr(&mut self, ui: &mut egui::Ui) -> bool {
        ui.vertical(|ui| {
            ui.add_space(3.0);
            ui.label("New starting address:");
            ui.add_space(3.0);

            // Add text field to enter new start address
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.popup.text_input)
                    .desired_width(ui.available_width() - 70.0),
            );

            // Only allow up to 16 hex digits in the text field
            if response.changed() {
                self.popup.text_input.retain(|c| c.is_ascii_hexdigit());
                self.popup.text_input.truncate(16);
            }
        });

        ui.add_space(8.0);

        // Close the window on confirm
        ui.button(" OK ").clicked() || self.events.enter_released
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
            });

        // Darken the background
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("modal_bg"),
        ));
        painter.rect_filled(content_rect, 0.0, colors::SHADOW);

        let mut is_open = self.popup.active;
        let was_open = self.popup.active;

        let Some(popup_type) = self.popup.ptype.clone() else {
            self.popup.clear();
            return;
        };

        let window = egui::Window::new(popup_type.title())
            .open(&mut is_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]);

        // Track OK button or Enter press
        let mut close_confirm = false;

        window.show(ctx, |ui| match popup_type {
            PopupType::Error => {
                let error = self.error.clone().unwrap_or_default();
                close_confirm = Self::display_error(ui, &error);
            }
            PopupType::About => close_confirm = Self::display_about(ui),
            PopupType::ReAddr => close_confirm = self.display_readdr(ui),
        });

        self.popup.active = !close_confirm && is_open && !self.events.escape_pressed;

        // If the window got closed this frame
        if was_open && !self.popup.active {
            self.error = None;

            // Move the buffer to the new starting address
            if self.popup.ptype == Some(PopupType::ReAddr) && close_confirm {
                let addr = u64::from_str_radix(&self.popup.text_input, 16).unwrap_or_default();
                self.popup.text_input.clear();

                info!(address = addr, "starting address changed");
                self.display.set_starting_address(addr);
                self.search.redo();
            }

            self.popup.clear();
        }
    }
}
