use crate::app::MemViewApp;
use eframe::egui;

#[derive(Default)]
pub struct JumpTo {
    /// Is the text edit window in focus
    pub(crate) has_focus: bool,
    /// User input string
    input: String,
    /// Force to loose focus from the text field
    loose_focus: bool,
}

impl JumpTo {
    pub(crate) const fn loose_focus(&mut self) {
        self.loose_focus = true;
    }
}

/// Parse a hex address, `0x` prefix optional
fn parse_address(input: &str) -> Option<u64> {
    let s = input.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

impl MemViewApp {
    /// Displays the `JumpTo` panel for moving the cursor to a specific address.
    pub(crate) fn show_jumpto_contents(&mut self, ui: &mut egui::Ui) {
        let textedit = ui.add(
            egui::TextEdit::singleline(&mut self.jump_to.input)
                .desired_width(ui.available_width() - 30.0),
        );

        if self.jump_to.loose_focus {
            textedit.surrender_focus();
            self.jump_to.loose_focus = false;
        }

        if textedit.has_focus() {
            self.search.has_focus = false;
            self.jump_to.has_focus = true;
        }

        if self.events.enter_released && self.jump_to.has_focus {
            let res = match parse_address(&self.jump_to.input) {
                Some(addr) => self.display.goto(addr).map_err(|err| err.to_string()),
                None => Err(format!("Invalid address: {}", self.jump_to.input)),
            };
            if let Err(err) = res {
                self.error = Some(err);
            }
        }
    }
}
