use crate::events::EventState;
use crate::ui_jumpto::JumpTo;
use crate::ui_popup::Popup;
use crate::ui_search::Search;
use crate::ui_statusbar::Status;
use memviewlib::{HexDisplay, RenderContext, Settings};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "memview.toml";

pub mod colors {
    use eframe::egui::Color32;
    use memviewlib::Rgba;

    pub const SHADOW: Color32 = Color32::from_black_alpha(150);
    pub const WARNING: Color32 = Color32::from_rgb(230, 180, 60);
    pub const SEARCH_HIT: Rgba = Rgba::rgb(35, 83, 48);

    pub fn to_color32(c: Rgba) -> Color32 {
        Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }
}

/// File shown by the viewer
pub struct OpenFile {
    pub path: PathBuf,
    /// File name without the directories
    pub name: String,
    /// Modification time at the last (re)load
    pub last_modified: SystemTime,
}

pub struct MemViewApp {
    /// Widget core: buffer, cursor, selections, dirty mask, scroll state
    pub display: HexDisplay,
    /// Display geometry and color roles
    pub settings: Settings,
    /// Per-frame paint settings derived from `settings`
    pub render_ctx: RenderContext,
    pub file: Option<OpenFile>,
    /// Pop up handler
    pub popup: Popup,
    /// Handler for GUI feature to search for byte string
    pub search: Search,
    /// Handler for GUI feature to jump to an address
    pub jump_to: JumpTo,
    /// Status bar texts, fed by display notifications
    pub status: Status,
    /// Error shown in the pop up
    pub error: Option<String>,
    /// Input events of the current frame
    pub events: EventState,
}

impl MemViewApp {
    pub fn new(path: Option<PathBuf>) -> Self {
        let (settings, error) = load_settings(Path::new(SETTINGS_FILE));

        let mut app = Self {
            display: HexDisplay::new(settings.display.clone()),
            render_ctx: RenderContext::new(settings.palette.clone()),
            settings,
            file: None,
            popup: Popup::default(),
            search: Search::default(),
            jump_to: JumpTo::default(),
            status: Status::default(),
            error,
            events: EventState::default(),
        };

        if let Some(path) = path {
            app.load_file(&path);
        }
        app
    }

    /// Bytes per line currently in use
    pub(crate) const fn bytes_per_line(&self) -> usize {
        self.settings.display.bytes_per_line
    }

    /// Change the line width of the display and remember it
    pub(crate) fn set_bytes_per_line(&mut self, bytes_per_line: usize) {
        match self.display.set_bytes_per_line(bytes_per_line) {
            Ok(()) => self.settings.display.bytes_per_line = bytes_per_line,
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

/// Settings from `path` if the file exists, defaults otherwise.
/// A broken file falls back to defaults and reports the error.
fn load_settings(path: &Path) -> (Settings, Option<String>) {
    if !path.exists() {
        return (Settings::default(), None);
    }

    match Settings::load(path) {
        Ok(settings) => {
            info!(path = %path.display(), "settings loaded");
            (settings, None)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default settings");
            (Settings::default(), Some(err.to_string()))
        }
    }
}
