//! Character constants for background animations.

/// Star glyphs from faintest to brightest.
pub const STAR_CHARS: &[char] = &['·', '+', '✦'];

/// Spark glyphs from smallest to largest.
pub const SPARK_CHARS: &[char] = &['·', '•', '●'];

/// Pick a glyph from `chars` for a value in 0.0-1.0.
pub fn pick(chars: &[char], value: f32) -> char {
    let last = chars.len() - 1;
    let idx = (value.clamp(0.0, 1.0) * chars.len() as f32) as usize;
    chars[idx.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_bounds() {
        assert_eq!(pick(STAR_CHARS, 0.0), '·');
        assert_eq!(pick(STAR_CHARS, 1.0), '✦');
        assert_eq!(pick(SPARK_CHARS, 0.5), '•');
        assert_eq!(pick(SPARK_CHARS, -3.0), '·');
    }
}
