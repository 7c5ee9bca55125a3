//! # Content Scanner
//!
//! Locates the ingredient list in rendered recipe content. The content arrives as a
//! flat sequence of tagged blocks; a heading mentioning "ingredient" opens the
//! ingredient section, and a heading mentioning "instruction" or "direction" closes
//! it. Only the first list inside the section is taken.

use log::debug;

/// A block of rendered content, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Heading text
    Heading(String),
    /// List entries; each entry carries its original text
    List(Vec<String>),
}

/// Whether the scan is currently inside the ingredient section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Outside,
    Inside,
}

impl ScanState {
    /// State after reading a heading
    pub fn on_heading(self, heading: &str) -> ScanState {
        let heading = heading.to_lowercase();
        if heading.contains("ingredient") {
            ScanState::Inside
        } else if heading.contains("instruction") || heading.contains("direction") {
            ScanState::Outside
        } else {
            self
        }
    }
}

/// Extract the original text of each ingredient entry.
///
/// Returns an empty vector when no list follows an ingredient heading.
pub fn extract_ingredient_lines(blocks: &[ContentBlock]) -> Vec<String> {
    let mut state = ScanState::Outside;

    for block in blocks {
        match block {
            ContentBlock::Heading(text) => {
                state = state.on_heading(text);
                debug!("Heading '{}' -> {:?}", text, state);
            }
            ContentBlock::List(entries) if state == ScanState::Inside => {
                return entries
                    .iter()
                    .map(|entry| entry.trim().to_string())
                    .filter(|entry| !entry.is_empty())
                    .collect();
            }
            ContentBlock::List(_) => {}
        }
    }

    Vec::new()
}
