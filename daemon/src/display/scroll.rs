//! Geometry of the scrolling text band.
//!
//! Two copies of the label travel along a band of fixed length so that one enters as the other
//! leaves. Units are pixels of the bottom strip.

/// Visible length of the band.
pub const BAND_LENGTH: i32 = 790;
/// Offset where the first copy starts, and where wrapped copies restart relative to.
pub const LEAD: i32 = 210;
/// Distance travelled per tick.
pub const STEP: i32 = 7;
/// Approximate advance of one glyph in the ticker font.
pub const GLYPH_ADVANCE: i32 = 38;

/// Estimated rendered width of `label`.
pub fn label_width(label: &str) -> i32 {
    i32::try_from(label.chars().count())
        .unwrap_or(i32::MAX)
        .saturating_mul(GLYPH_ADVANCE)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollBand {
    start: i32,
    end: i32,
    first: i32,
    second: i32,
}

impl ScrollBand {
    pub fn new(label: &str) -> Self {
        let scroll_length = BAND_LENGTH.saturating_add(label_width(label));
        let start = LEAD.saturating_sub(scroll_length);
        Self {
            start,
            end: scroll_length,
            first: LEAD,
            second: start,
        }
    }

    /// Current positions of both copies.
    pub fn offsets(&self) -> [i32; 2] {
        [self.first, self.second]
    }

    /// Moves both copies by one [`STEP`], wrapping any copy that left the band.
    pub fn advance(&mut self) {
        if self.first >= self.end {
            self.first = self.start;
        }
        if self.second >= self.end {
            self.second = self.start;
        }
        self.first = self.first.saturating_add(STEP);
        self.second = self.second.saturating_add(STEP);
    }
}

/// Characters of `label` visible in a band of `columns` glyphs, given the copies' offsets.
pub fn visible(label: &str, offsets: &[i32], columns: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    (0..columns)
        .map(|column| {
            let position = i32::try_from(column)
                .unwrap_or(i32::MAX)
                .saturating_mul(GLYPH_ADVANCE);
            offsets
                .iter()
                .filter(|&&offset| position >= offset)
                .find_map(|&offset| {
                    let index = usize::try_from((position - offset) / GLYPH_ADVANCE).ok()?;
                    chars.get(index).copied()
                })
                .unwrap_or(' ')
        })
        .collect()
}
