use crate::app::{MemViewApp, colors};
use eframe::egui;
use memviewlib::{SearchType, parse_hex_pattern};
use tracing::debug;

/// Name of the highlights placed on search hits
const HIGHLIGHT_NAME: &str = "search";
/// Hits beyond this count are listed but not highlighted
const MAX_HIGHLIGHTS: usize = 1000;

#[derive(Debug, Default, PartialEq, Eq, Clone)]
enum SearchMode {
    #[default]
    Hex,
    Ascii,
    Regex,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
struct SearchState {
    /// User input
    input: String,
    /// Search mode: byte / ASCII literals / ASCII regex
    mode: SearchMode,
}

impl SearchState {
    /// Pattern for the input, `None` if it is not valid for the mode
    fn pattern(&self) -> Option<SearchType> {
        if self.input.is_empty() {
            return None;
        }
        match self.mode {
            SearchMode::Hex => parse_hex_pattern(&self.input).map(SearchType::Hex),
            SearchMode::Ascii => Some(SearchType::Ascii(self.input.clone())),
            SearchMode::Regex => Some(SearchType::Regex(self.input.clone())),
        }
    }
}

#[derive(Default)]
pub struct Search {
    /// List of absolute addresses where the match was found
    pub(crate) results: Vec<u64>,
    /// Length of the search pattern in bytes
    pub(crate) length: usize,
    /// Does the search text field have focus
    pub(crate) has_focus: bool,
    /// Index of the current search result
    idx: usize,

    // -- UI control flags
    /// Force the search to be performed even if the input is the same as the last one
    force: bool,
    /// Force to loose focus from the text field
    loose_focus: bool,

    // -- Input states
    /// Current search state
    current: SearchState,
    /// Previous search state. Used to detect if the input changed and the search should be repeated.
    last: SearchState,
}

impl Search {
    /// Clear the search state
    pub(crate) fn clear(&mut self) {
        self.has_focus = false;
        self.results.clear();
        self.length = 0;
        // Do not clear current to preserve text box content
        self.last = SearchState::default();
        self.idx = 0;
        self.force = false;
    }

    /// Redo the last search
    pub(crate) fn redo(&mut self) {
        // In case the current input field is not valid
        self.current = self.last.clone();

        self.clear();
        self.force = true;
    }

    /// Force to loose focus from the text field
    pub(crate) const fn loose_focus(&mut self) {
        self.loose_focus = true;
    }
}

impl MemViewApp {
    /// Show content of the search menu
    pub(crate) fn show_search_contents(&mut self, ui: &mut egui::Ui) {
        // RadioButtons to select between byte and ascii search
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.search.current.mode, SearchMode::Hex, "Hex")
                .on_hover_text("Search for a byte pattern");
            ui.add_space(5.0);
            ui.radio_value(&mut self.search.current.mode, SearchMode::Ascii, "Ascii")
                .on_hover_text("Search ASCII literals");
            ui.add_space(5.0);
            ui.radio_value(&mut self.search.current.mode, SearchMode::Regex, "Regex")
                .on_hover_text(
                    "Search ASCII with regex\n\
                Highlights only the first byte of the match",
                );
        });

        ui.add_space(3.0);

        let textedit = ui.add(
            egui::TextEdit::singleline(&mut self.search.current.input)
                .desired_width(ui.available_width() - 30.0),
        );

        if self.search.loose_focus {
            textedit.surrender_focus();
            self.search.loose_focus = false;
        }

        if textedit.has_focus() {
            self.jump_to.has_focus = false;
            self.search.has_focus = true;
        }

        if (self.events.enter_released && self.search.has_focus) || self.search.force {
            // Same input -> move to next result, otherwise -> search again
            if self.search.current == self.search.last {
                if !self.search.results.is_empty() {
                    self.search.idx = (self.search.idx + 1) % self.search.results.len();
                }
            } else {
                self.run_search();
            }

            // Move the cursor to the current hit (only if not forced)
            if !self.search.force
                && let Some(&addr) = self.search.results.get(self.search.idx)
                && let Err(err) = self.display.goto(addr)
            {
                self.error = Some(err.to_string());
            }

            self.search.force = false;
        }

        ui.add_space(5.0);

        // Show matches count if any
        let label_text = if self.search.results.is_empty() {
            "No results".to_string()
        } else {
            format!(
                "Hits: {} (Current: {})",
                self.search.results.len(),
                self.search.idx + 1
            )
        };

        ui.label(label_text);
    }

    /// Search the current input and highlight the hits
    fn run_search(&mut self) {
        self.display.remove_highlight_named(HIGHLIGHT_NAME);

        match self.search.current.pattern() {
            Some(pattern) => {
                self.search.results = self.display.search(&pattern);
                self.search.length = pattern.match_len();
            }
            None => {
                self.search.results.clear();
                self.search.length = 0;
            }
        }
        debug!(hits = self.search.results.len(), "search finished");

        for &addr in self.search.results.iter().take(MAX_HIGHLIGHTS) {
            self.display.highlight_address(
                HIGHLIGHT_NAME,
                addr,
                self.search.length,
                colors::SEARCH_HIT,
            );
        }

        // Reset the state of search
        self.search.idx = 0;
        self.search.last = self.search.current.clone();
    }

    /// Drop the search results and their highlights
    pub(crate) fn clear_search(&mut self) {
        self.display.remove_highlight_named(HIGHLIGHT_NAME);
        self.search.clear();
    }
}
