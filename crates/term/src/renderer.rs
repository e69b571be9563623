//! Framebuffer to terminal.
//!
//! The first frame, and any frame after a size change or
//! [`TerminalRenderer::invalidate`], repaints the whole screen. Other frames
//! rewrite only the horizontal runs of cells that differ from the previous
//! frame.

use std::io::{self, Write};
use std::mem;

use anyhow::Result;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Owns the terminal session and the previously drawn frame
pub struct TerminalRenderer {
    out: io::Stdout,
    prev: Option<FrameBuffer>,
    /// Escape sequences for the frame being drawn
    scratch: Vec<u8>,
    release_events: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            prev: None,
            scratch: Vec::with_capacity(32 * 1024),
            release_events: false,
        }
    }

    /// Switch to raw mode on the alternate screen with the cursor hidden.
    /// Key-release reporting is requested when the terminal supports it.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.scratch.clear();
        self.scratch
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        if self.release_events {
            self.scratch.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.write_scratch()?;
        self.prev = None;
        Ok(())
    }

    /// True when key releases arrive as events, so held keys need no timeout
    pub fn reports_key_release(&self) -> bool {
        self.release_events
    }

    /// Restore the terminal. Calling it twice is harmless.
    pub fn exit(&mut self) -> Result<()> {
        self.scratch.clear();
        if mem::take(&mut self.release_events) {
            self.scratch.queue(PopKeyboardEnhancementFlags)?;
        }
        self.scratch
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.write_scratch()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next draw (after a resize, for example)
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Draw `fb`, then hand back the previous frame in its place.
    ///
    /// Keep one framebuffer and pass it every frame: the two buffers
    /// alternate and neither is cloned. The returned contents of `fb` are
    /// stale and must be fully re-rendered before the next call.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.scratch.clear();
        let mut spare = match self.prev.take() {
            Some(prev) if same_size(&prev, fb) => {
                encode_diff_into(&prev, fb, &mut self.scratch)?;
                prev
            }
            Some(mut prev) => {
                encode_full_into(fb, &mut self.scratch)?;
                prev.resize(fb.width(), fb.height());
                prev
            }
            None => {
                encode_full_into(fb, &mut self.scratch)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.write_scratch()?;

        mem::swap(&mut spare, fb);
        self.prev = Some(spare);
        Ok(())
    }

    fn write_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Emits style changes only when the style actually differs
struct StyleTracker {
    current: Option<CellStyle>,
}

impl StyleTracker {
    fn new() -> Self {
        Self { current: None }
    }

    fn print(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        if self.current != Some(cell.style) {
            let style = cell.style;
            out.queue(SetForegroundColor(color(style.fg)))?
                .queue(SetBackgroundColor(color(style.bg)))?
                .queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.current = Some(style);
        }
        out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn row(fb: &FrameBuffer, y: u16) -> &[Cell] {
    let w = fb.width() as usize;
    let start = y as usize * w;
    &fb.cells()[start..start + w]
}

/// Clear the screen and write every cell of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))?;

    let mut styles = StyleTracker::new();
    for y in 0..fb.height() {
        if y > 0 {
            out.queue(cursor::MoveTo(0, y))?;
        }
        for &cell in row(fb, y) {
            styles.print(out, cell)?;
        }
    }
    styles.finish(out)
}

/// Write only the cells of `next` that differ from `prev` into `out`.
///
/// Frames of different sizes are repainted row by row.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut styles = StyleTracker::new();

    for y in 0..next.height() {
        let new_row = row(next, y);
        if !same_size(prev, next) {
            out.queue(cursor::MoveTo(0, y))?;
            for &cell in new_row {
                styles.print(out, cell)?;
            }
            continue;
        }

        for (start, end) in changed_runs(row(prev, y), new_row) {
            out.queue(cursor::MoveTo(start as u16, y))?;
            for &cell in &new_row[start..end] {
                styles.print(out, cell)?;
            }
        }
    }

    styles.finish(out)
}

/// Half-open ranges `[start, end)` where two equal-length rows differ
fn changed_runs<'a>(old: &'a [Cell], new: &'a [Cell]) -> impl Iterator<Item = (usize, usize)> + 'a {
    let len = old.len().min(new.len());
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < len && old[x] == new[x] {
            x += 1;
        }
        if x >= len {
            return None;
        }
        let start = x;
        while x < len && old[x] != new[x] {
            x += 1;
        }
        Some((start, x))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn full_encode_contains_every_glyph() {
        let mut fb = FrameBuffer::new(2, 2);
        let style = CellStyle::default();
        for (i, ch) in ['A', 'B', 'C', 'D'].into_iter().enumerate() {
            fb.set(i as u16 % 2, i as u16 / 2, style.cell(ch));
        }

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = text(&out);
        assert!(text.contains("AB"));
        assert!(text.contains("CD"));
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let fb = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_diff_into(&fb, &fb, &mut out).unwrap();
        assert!(!text(&out).contains(' '));
    }

    #[test]
    fn resized_frame_is_repainted() {
        let small = FrameBuffer::new(2, 1);
        let mut big = FrameBuffer::new(3, 2);
        big.put_str(0, 1, "xyz", CellStyle::default());
        let mut out = Vec::new();
        encode_diff_into(&small, &big, &mut out).unwrap();
        assert!(text(&out).contains("xyz"));
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(7, 1);
        let mut b = FrameBuffer::new(7, 1);
        for x in [1, 2, 3, 5] {
            b.set(x, 0, style.cell('X'));
        }

        let runs: Vec<_> = changed_runs(row(&a, 0), row(&b, 0)).collect();
        assert_eq!(runs, vec![(1, 4), (5, 6)]);
    }

    #[test]
    fn style_changes_are_not_repeated() {
        let style = CellStyle::new(Rgb::new(1, 2, 3), Rgb::new(0, 0, 0));
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "abc", style);

        let mut tracked = Vec::new();
        encode_full_into(&fb, &mut tracked).unwrap();
        // One foreground escape for the run plus none per glyph
        assert_eq!(text(&tracked).matches("38;2;1;2;3").count(), 1);
    }
}
