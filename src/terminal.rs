//! Presents the framebuffer as half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the top one as the
//! foreground of `▀`, the bottom one as the background. Only cells that
//! changed since the last frame are written.

use crate::color::Rgb;
use crate::graphics::FrameBuffer;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

const HALF_BLOCK: char = '▀';
const HUD_FG: Rgb = Rgb::new(200, 210, 220);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    pub fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

/// Builds the cell grid for a `cols` x `rows` terminal from a framebuffer
/// of `cols` x `2 * rows` pixels, with text overlaid from the top-left.
pub fn compose(frame: &FrameBuffer, cols: usize, rows: usize, overlay: &[String]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let top = pixel(frame, col, row * 2);
            let bottom = pixel(frame, col, row * 2 + 1);
            cells.push(Cell::new(HALF_BLOCK, top, bottom));
        }
    }
    for (row, line) in overlay.iter().take(rows).enumerate() {
        for (col, ch) in line.chars().take(cols).enumerate() {
            let cell = &mut cells[row * cols + col];
            let bg = cell.fg.lerp(cell.bg, 0.5).scale(0.4);
            *cell = Cell::new(ch, HUD_FG, bg);
        }
    }
    cells
}

fn pixel(frame: &FrameBuffer, x: usize, y: usize) -> Rgb {
    if x < frame.width && y < frame.height {
        frame.get(x, y)
    } else {
        Rgb::BLACK
    }
}

/// Diffing cell writer
pub struct Presenter {
    cols: usize,
    rows: usize,
    prev: Vec<Cell>,
}

impl Presenter {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            prev: vec![Cell::new('\0', Rgb::BLACK, Rgb::BLACK); cols * rows],
        }
    }

    /// Forgets what is on screen so the next draw writes every cell.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.prev = vec![Cell::new('\0', Rgb::BLACK, Rgb::BLACK); cols * rows];
    }

    /// Writes the cells that differ from the previous frame. Returns how many
    /// cells were written.
    pub fn draw<W: Write>(&mut self, out: &mut W, cells: &[Cell]) -> io::Result<usize> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut written = 0;
        let w = self.cols;

        for y in 0..self.rows {
            let row_off = y * w;
            let mut x = 0usize;
            while x < w {
                let i = row_off + x;
                let Some(cur) = cells.get(i).copied() else {
                    break;
                };
                if cur == self.prev[i] {
                    x += 1;
                    continue;
                }

                // Group a run of changed cells sharing colours
                let mut end = x + 1;
                while end < w {
                    let j = row_off + end;
                    match cells.get(j) {
                        Some(cj) if *cj != self.prev[j] && cj.fg == cur.fg && cj.bg == cur.bg => {
                            end += 1
                        }
                        _ => break,
                    }
                }

                queue!(
                    out,
                    cursor::MoveTo(x as u16, y as u16),
                    SetForegroundColor(cur.fg.to_color()),
                    SetBackgroundColor(cur.bg.to_color()),
                )?;
                for j in i..row_off + end {
                    queue!(out, Print(cells[j].ch))?;
                    self.prev[j] = cells[j];
                    written += 1;
                }
                x = end;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        Ok(written)
    }

    /// Paints the whole screen with one colour.
    pub fn clear_all<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        for y in 0..self.rows as u16 {
            queue!(
                out,
                cursor::MoveTo(0, y),
                SetBackgroundColor(Color::Black),
                Print(" ".repeat(self.cols)),
                ResetColor
            )?;
        }
        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;
        for c in self.prev.iter_mut() {
            c.ch = '\0';
        }
        Ok(())
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
///
/// Dropping it restores the terminal, including on error paths and while
/// unwinding from a panic.
pub struct TerminalGuard<W: Write> {
    out: W,
    raw: bool,
}

impl<W: Write> TerminalGuard<W> {
    pub fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out, raw: true };
        execute!(
            guard.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(guard)
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Nothing useful can be done with a failure here
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            LeaveAlternateScreen
        );
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_pairs_rows() {
        let mut frame = FrameBuffer::new(2, 4);
        frame.plot(0, 0, 1.0, Rgb::WHITE);
        frame.plot(1, 3, 1.0, Rgb::new(1, 2, 3));
        let cells = compose(&frame, 2, 2, &[]);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], Cell::new(HALF_BLOCK, Rgb::WHITE, Rgb::BLACK));
        assert_eq!(cells[3], Cell::new(HALF_BLOCK, Rgb::BLACK, Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_overlay_replaces_cells() {
        let frame = FrameBuffer::new(4, 4);
        let cells = compose(&frame, 4, 2, &["hi".to_string()]);
        assert_eq!(cells[0].ch, 'h');
        assert_eq!(cells[1].ch, 'i');
        assert_eq!(cells[2].ch, HALF_BLOCK);
    }

    #[test]
    fn test_presenter_only_writes_changes() {
        let mut presenter = Presenter::new(3, 1);
        let mut out = Vec::new();
        let mut cells = vec![Cell::new('a', Rgb::WHITE, Rgb::BLACK); 3];
        assert_eq!(presenter.draw(&mut out, &cells).unwrap(), 3);
        assert_eq!(presenter.draw(&mut out, &cells).unwrap(), 0);
        cells[1].ch = 'b';
        assert_eq!(presenter.draw(&mut out, &cells).unwrap(), 1);
        presenter.resize(3, 1);
        assert_eq!(presenter.draw(&mut out, &cells).unwrap(), 3);
    }

    fn restored(out: &[u8]) -> bool {
        let text = String::from_utf8_lossy(out);
        text.contains("\x1b[?1049l") && text.contains("\x1b[?25h")
    }

    #[test]
    fn test_guard_restores_screen_on_drop() {
        let mut out = Vec::new();
        {
            let _guard = TerminalGuard {
                out: &mut out,
                raw: false,
            };
        }
        assert!(restored(&out));
    }

    #[test]
    fn test_guard_restores_screen_on_panic() {
        let mut out = Vec::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = TerminalGuard {
                out: &mut out,
                raw: false,
            };
            panic!("frame failed");
        }));
        assert!(result.is_err());
        assert!(restored(&out));
    }
}
