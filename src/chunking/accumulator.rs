use crate::types::Segment;

pub(super) struct SegmentAccumulator<'a> {
    segments: Vec<Segment>,
    current_words: Vec<&'a str>,
    words_per_segment: usize,
}

impl<'a> SegmentAccumulator<'a> {
    pub(super) fn new(words_per_segment: usize) -> Self {
        Self {
            segments: Vec::new(),
            current_words: Vec::with_capacity(words_per_segment),
            words_per_segment,
        }
    }

    pub(super) fn handle_word(&mut self, word: &'a str) {
        self.current_words.push(word);
        // Window is full, close it before the next word arrives
        if self.current_words.len() >= self.words_per_segment {
            self.finish_segment();
        }
    }

    pub(super) fn finish_segment(&mut self) {
        if self.current_words.is_empty() {
            return;
        }
        let id = self.segments.len() as u32 + 1;
        self.segments
            .push(Segment::new(id, self.current_words.join(" ")));
        self.current_words.clear();
    }

    pub(super) fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}
