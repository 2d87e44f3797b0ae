//! Structure-aware segmentation of legal document text.
//!
//! The [`Segmenter`] splits contract and regulation text into chunks small
//! enough to embed meaningfully, preferring boundaries at legal structure
//! units (章/节/条/款/...) and falling back to a sliding character window
//! only when a structural unit is itself too long.
//!
//! All lengths and offsets are measured in characters, not bytes; the
//! corpus is predominantly Chinese legal text.

/// Markers denoting legal-document structure units. A line containing any
/// of these starts a new structural chunk.
const STRUCTURE_MARKERS: [char; 8] = ['第', '章', '节', '条', '款', '项', '目', '、'];

/// Sentence/clause-ending punctuation used to snap window boundaries.
const BREAK_PUNCTUATION: [char; 11] =
    ['。', '；', '.', '！', '!', '？', '?', ';', '，', ',', '、'];

/// Splits document text into ordered, length-bounded chunks.
///
/// # Example
///
/// ```rust,ignore
/// use contract_rag::Segmenter;
///
/// let segmenter = Segmenter::new(50, 500, 50);
/// let chunks = segmenter.smart_segment(&contract_text);
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    min_length: usize,
    max_length: usize,
    overlap: usize,
}

impl Segmenter {
    /// Create a segmenter with explicit length parameters.
    ///
    /// All parameters are in characters. Callers must ensure
    /// `0 < min_length < max_length` and `overlap < max_length`; the
    /// [`RetrievalConfig`](crate::RetrievalConfig) builder validates this.
    pub fn new(min_length: usize, max_length: usize, overlap: usize) -> Self {
        Self { min_length, max_length, overlap }
    }

    /// Split text at legal structure boundaries (chapter, section, article,
    /// clause, item markers and the enumeration separator `、`).
    ///
    /// Lines are trimmed and empty lines dropped. A chunk is closed when a
    /// boundary line follows accumulated text; the boundary line starts the
    /// next chunk. Chunks shorter than `min_length` are dropped, which can
    /// lose a structurally valid but short final clause entirely.
    pub fn structure_split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let is_boundary = line.chars().any(|c| STRUCTURE_MARKERS.contains(&c));

            if is_boundary && !pending.is_empty() {
                self.flush(&pending, &mut chunks);
                pending.clear();
                pending.push(line);
            } else {
                pending.push(line);
            }
        }

        if !pending.is_empty() {
            self.flush(&pending, &mut chunks);
        }

        chunks
    }

    /// Join accumulated lines and emit the chunk if it reaches `min_length`.
    fn flush(&self, pending: &[&str], chunks: &mut Vec<String>) {
        let chunk = pending.join("\n");
        if chunk.chars().count() >= self.min_length {
            chunks.push(chunk);
        }
    }

    /// Split text with a sliding window of at most `max_length` characters.
    ///
    /// Windows are snapped back to the nearest sentence or clause
    /// punctuation when one exists past `start + min_length`. Consecutive
    /// windows share `overlap` trailing characters as lead-in context. Text
    /// no longer than `max_length` is returned as a single chunk.
    pub fn length_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let length = chars.len();

        if length <= self.max_length {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < length {
            let mut end = (start + self.max_length).min(length);

            // Snap back to punctuation within the window, but never below
            // start + min_length.
            if end < length {
                let floor = start + self.min_length;
                let mut i = end - 1;
                while i > floor {
                    if BREAK_PUNCTUATION.contains(&chars[i]) {
                        end = i + 1;
                        break;
                    }
                    i -= 1;
                }
            }

            chunks.push(chars[start..end].iter().collect());

            if end >= length {
                break;
            }
            // A punctuation snap can close the window well short of
            // max_length; the next start must still advance past the
            // previous one or the loop never terminates.
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }

    /// Two-phase segmentation: structural boundaries first, window fallback
    /// for any structural unit longer than `max_length`.
    ///
    /// Document order is preserved; no chunk exceeds `max_length` characters.
    pub fn smart_segment(&self, text: &str) -> Vec<String> {
        let mut segments = Vec::new();

        for piece in self.structure_split(text) {
            if piece.chars().count() <= self.max_length {
                segments.push(piece);
            } else {
                segments.extend(self.length_split(&piece));
            }
        }

        segments
    }
}
