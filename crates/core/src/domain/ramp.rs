// Character Ramp - glyph alphabet for intensity rendering

use crate::domain::error::{DomainError, Result};

/// Default glyph alphabet, ordered densest ink first. Index 0 renders the
/// brightest cell, the trailing space renders the darkest.
pub const DEFAULT_GLYPHS: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Ordered, non-empty glyph alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRamp {
    glyphs: Vec<char>,
}

impl CharRamp {
    /// The 69-glyph ramp the service ships with.
    pub fn standard() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.chars().collect(),
        }
    }

    /// Build a ramp from a custom alphabet. Fails on an empty string.
    pub fn from_glyphs(glyphs: &str) -> Result<Self> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(DomainError::EmptyRamp);
        }
        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`. The index must come from a grid quantized against
    /// this ramp (see `raster::intensity_map`).
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index]
    }
}

impl Default for CharRamp {
    fn default() -> Self {
        Self::standard()
    }
}
