//! Scoring module - line-clear points, level and gravity speed

use crate::types::{GRAVITY_TABLE_MS, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL};

/// Points for clearing `lines` rows with one piece.
///
/// More than four rows cannot happen with tetrominoes; such a count is
/// scored as four.
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES[lines.min(LINE_SCORES.len() - 1)]
}

/// `min(20, lines / 10 + 1)`
pub fn level_for_lines(lines: u32) -> u32 {
    (lines / LINES_PER_LEVEL + 1).min(MAX_LEVEL)
}

/// Clamp a level into `1..=20`
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_LEVEL)
}

/// Milliseconds per gravity row at `level` (clamped first)
pub fn gravity_interval_ms(level: u32) -> f64 {
    GRAVITY_TABLE_MS[clamp_level(level) as usize] as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_scores() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 100);
        assert_eq!(line_clear_score(2), 300);
        assert_eq!(line_clear_score(3), 500);
        assert_eq!(line_clear_score(4), 800);
        assert_eq!(line_clear_score(5), 800);
    }

    #[test]
    fn level_formula() {
        let cases = [(0, 1), (9, 1), (10, 2), (19, 2), (20, 3), (199, 20), (200, 20)];
        for (lines, level) in cases {
            assert_eq!(level_for_lines(lines), level, "lines={}", lines);
        }
    }

    #[test]
    fn gravity_clamps_level() {
        assert_eq!(gravity_interval_ms(0), 1000.0);
        assert_eq!(gravity_interval_ms(1), 1000.0);
        assert_eq!(gravity_interval_ms(2), 793.0);
        assert_eq!(gravity_interval_ms(20), 1.0);
        assert_eq!(gravity_interval_ms(99), 1.0);
    }
}
