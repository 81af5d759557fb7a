//! Deterministic word-window segmentation of narration scripts.

mod accumulator;


use crate::types::{Language, Segment};

use accumulator::SegmentAccumulator;

/// Split `text` on whitespace runs. Words keep their punctuation.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Number of whitespace-separated words in a script
pub fn word_count(text: &str) -> usize {
    tokenize(text).count()
}

/// Pure function chunking a script into fixed windows of `words_per_segment` words.
/// The last window may be shorter; no window is ever empty. A window size of
/// zero is treated as one.
pub fn segment_script(text: &str, words_per_segment: usize) -> Vec<Segment> {
    let mut accumulator = SegmentAccumulator::new(words_per_segment.max(1));
    for word in tokenize(text) {
        accumulator.handle_word(word);
    }
    accumulator.finish_segment();
    accumulator.into_segments()
}

/// Segment a script using the word rate of its declared language
pub fn segment_for_language(text: &str, language: Language) -> Vec<Segment> {
    segment_script(text, language.words_per_segment())
}
