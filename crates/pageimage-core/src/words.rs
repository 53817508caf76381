use std::cmp::Ordering;

use crate::objects::{Char, Word};

/// Default horizontal grouping tolerance.
pub const DEFAULT_X_TOLERANCE: f64 = 3.0;
/// Default vertical grouping tolerance.
pub const DEFAULT_Y_TOLERANCE: f64 = 3.0;

/// Options for word extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WordOptions {
    /// Maximum horizontal distance between characters to group into a word.
    pub x_tolerance: f64,
    /// Maximum vertical distance between characters to group into a word.
    pub y_tolerance: f64,
    /// If true, include blank/space characters in words instead of splitting on them.
    pub keep_blank_chars: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: DEFAULT_X_TOLERANCE,
            y_tolerance: DEFAULT_Y_TOLERANCE,
            keep_blank_chars: false,
        }
    }
}

/// Groups left-to-right characters into words by spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from the given characters using the specified options.
    ///
    /// Characters are sorted top-to-bottom then left-to-right. A word ends
    /// at a blank character (unless `keep_blank_chars`), when the horizontal
    /// gap exceeds `x_tolerance`, or when the tops differ by more than
    /// `y_tolerance`.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let mut sorted: Vec<&Char> = chars.iter().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .top
                .partial_cmp(&b.bbox.top)
                .unwrap_or(Ordering::Equal)
                .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
        });

        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for ch in sorted {
            if ch.is_blank() && !options.keep_blank_chars {
                Self::flush(&mut current, &mut words);
                continue;
            }
            if let Some(last) = current.last() {
                if Self::should_split(last, ch, options) {
                    Self::flush(&mut current, &mut words);
                }
            }
            current.push(ch);
        }
        Self::flush(&mut current, &mut words);

        words
    }

    /// Overlapping characters (gap 0) always stay together.
    fn should_split(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        x_gap > options.x_tolerance || y_diff > options.y_tolerance
    }

    fn flush(current: &mut Vec<&Char>, words: &mut Vec<Word>) {
        let Some(bbox) = current.iter().map(|c| c.bbox).reduce(|a, b| a.union(&b)) else {
            return;
        };
        let text = current.iter().map(|c| c.text.as_str()).collect();
        words.push(Word { text, bbox });
        current.clear();
    }
}
