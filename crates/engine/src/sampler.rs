//! Stratified document sampling.
//!
//! Documents larger than the extractor's budget are not truncated. The
//! budget is split across positions instead:
//!
//! | Part | Share of budget | Taken from |
//! |------|-----------------|------------|
//! | Head | 40% | first characters |
//! | Interior | 20%, three equal windows | centred at 1/3, 1/2 and 2/3 of the document |
//! | Tail | 40% | last characters |
//!
//! Parts are joined with fixed markers so a reader can tell the excerpt is
//! not contiguous. All lengths are counted in `char`s.

use tracing::debug;

const START_MARKER: &str = "[...START OF DOCUMENT...]\n";
const MIDDLE_MARKERS: [&str; 3] = [
    "\n\n[...MIDDLE OF DOCUMENT - SAMPLE 1...]\n",
    "\n\n[...MIDDLE OF DOCUMENT - SAMPLE 2...]\n",
    "\n\n[...MIDDLE OF DOCUMENT - SAMPLE 3...]\n",
];
const END_MARKER: &str = "\n\n[...END OF DOCUMENT...]\n";

/// Characters added by the markers of a sampled document. Markers are
/// ASCII, so byte and char lengths agree.
pub const MARKER_OVERHEAD: usize = START_MARKER.len()
    + MIDDLE_MARKERS[0].len()
    + MIDDLE_MARKERS[1].len()
    + MIDDLE_MARKERS[2].len()
    + END_MARKER.len();

/// Samples documents against a fixed character budget.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    max_chars: usize,
}

impl Sampler {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn sample(&self, content: &str) -> String {
        sample(content, self.max_chars)
    }
}

/// Reduce `content` to at most `max_chars + MARKER_OVERHEAD` characters.
///
/// Content within budget is returned unchanged.
pub fn sample(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }

    let head = share(max_chars, 2, 5);
    let tail = share(max_chars, 2, 5);
    let window = share(max_chars, 1, 15);

    let centres = [total / 3, total / 2, total * 2 / 3];

    let mut out = String::with_capacity(max_chars + MARKER_OVERHEAD);
    out.push_str(START_MARKER);
    out.push_str(char_slice(content, 0, head));
    for (marker, centre) in MIDDLE_MARKERS.iter().zip(centres) {
        out.push_str(marker);
        out.push_str(char_slice(content, window_start(total, centre, window), window));
    }
    out.push_str(END_MARKER);
    out.push_str(char_slice(content, total - tail, tail));

    debug!(
        original_chars = total,
        budget = max_chars,
        sampled_chars = head + tail + 3 * window + MARKER_OVERHEAD,
        "Document over budget; using stratified sampling"
    );
    out
}

/// `floor(value * num / den)` without overflowing for large budgets.
fn share(value: usize, num: usize, den: usize) -> usize {
    value / den * num + value % den * num / den
}

/// First char of a `len`-char window centred on `centre`, kept inside a
/// document of `total` chars. Windows may overlap neighbours; they never
/// run off either end.
fn window_start(total: usize, centre: usize, len: usize) -> usize {
    centre.saturating_sub(len / 2).min(total.saturating_sub(len))
}

/// The `len` chars starting at char index `start`.
fn char_slice(s: &str, start: usize, len: usize) -> &str {
    let begin = byte_offset(s, start);
    let end = begin + byte_offset(&s[begin..], len);
    &s[begin..end]
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}
