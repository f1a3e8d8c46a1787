use regex::bytes::Regex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchType {
    Hex(Vec<u8>),
    Ascii(String),
    Regex(String),
}

impl SearchType {
    /// Number of bytes to highlight for a match. Regex matches highlight only their first byte.
    #[must_use]
    pub fn match_len(&self) -> usize {
        match self {
            Self::Hex(p) => p.len(),
            Self::Ascii(s) => s.len(),
            Self::Regex(_) => 1,
        }
    }
}

/// Searches for a pattern in a buffer starting at `start`.
/// Returns the absolute addresses of all matches.
#[must_use]
pub fn search(data: &[u8], start: u64, search_type: &SearchType) -> Vec<u64> {
    let offsets = match search_type {
        SearchType::Hex(p) => search_bytes(data, p),
        SearchType::Ascii(s) => search_bytes(data, s.as_bytes()),
        SearchType::Regex(p) => search_regex(data, p),
    };
    offsets
        .into_iter()
        .map(|offset| start.saturating_add(u64::try_from(offset).unwrap_or(u64::MAX)))
        .collect()
}

/// Slide window search. Overlapping matches are all reported.
fn search_bytes(data: &[u8], pattern: &[u8]) -> Vec<usize> {
    let size = pattern.len();
    if size == 0 {
        return vec![];
    }

    data.windows(size)
        .enumerate()
        .filter_map(|(offset, window)| (window == pattern).then_some(offset))
        .collect()
}

fn search_regex(data: &[u8], pattern: &str) -> Vec<usize> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(pattern, error = %e, "invalid search regex");
            return vec![];
        }
    };

    re.find_iter(data).map(|m| m.start()).collect()
}

/// Parse a hex byte pattern such as `"deadBEEF"` or `"de ad be ef"`.
/// Returns `None` for empty input, an odd number of digits or a non-hex character.
#[must_use]
pub fn parse_hex_pattern(s: &str) -> Option<Vec<u8>> {
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() || !digits.len().is_multiple_of(2) {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        })
        .collect()
}
