//! Terminal presentation: half-block pixels plus the HUD row

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
    terminal::{self, ClearType},
};

use super::pixbuf::{PixelBuf, Rgb};
use crate::game::{Game, Phase};
use crate::viewport::Viewport;

/// Terminal rows reserved under the play surface.
pub const HUD_ROWS: u16 = 1;

/// Room for the widest button label.
const BUTTON_WIDTH: u16 = 11;

/// A block of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && row >= self.row
            && col < self.col.saturating_add(self.width)
            && row < self.row.saturating_add(self.height)
    }
}

/// Where the play surface and HUD sit in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    /// Play surface, two pixels per row
    pub canvas: Rect,
    pub hud: Rect,
    pub button: Rect,
}

impl Layout {
    /// Centre the largest play surface that fits a `cols` x `rows` terminal
    /// and return it with the logical viewport it shows.
    pub fn compute(cols: u16, rows: u16) -> (Layout, Viewport) {
        let avail_w = cols.max(1) as usize;
        let avail_h = rows.saturating_sub(HUD_ROWS).max(1) as usize * 2;
        let viewport = Viewport::fit_pixels(avail_w, avail_h);

        let scale = (avail_w as f32 / viewport.width).min(avail_h as f32 / viewport.height);
        let px_w = ((viewport.width * scale) as u16).clamp(1, cols.max(1));
        let px_h = ((viewport.height * scale) as u16).max(2);
        let canvas_rows = (px_h / 2).min(rows.saturating_sub(HUD_ROWS).max(1));

        let canvas = Rect {
            col: (cols.saturating_sub(px_w)) / 2,
            row: (rows.saturating_sub(HUD_ROWS + canvas_rows)) / 2,
            width: px_w,
            height: canvas_rows,
        };
        let hud = Rect {
            col: canvas.col,
            row: canvas.row + canvas.height,
            width: canvas.width,
            height: HUD_ROWS,
        };
        let button_width = BUTTON_WIDTH.min(hud.width);
        let button = Rect {
            col: hud.col + hud.width - button_width,
            row: hud.row,
            width: button_width,
            height: 1,
        };
        (Layout { canvas, hud, button }, viewport)
    }

    /// Pixel buffer size for the play surface.
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.canvas.width as usize, self.canvas.height as usize * 2)
    }
}

fn fg(c: Rgb) -> style::SetForegroundColor {
    style::SetForegroundColor(CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    })
}

fn bg(c: Rgb) -> style::SetBackgroundColor {
    style::SetBackgroundColor(CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    })
}

/// Queue the buffer as `▀` cells: foreground is the upper pixel, background
/// the lower. Colours are only re-sent when they change along a row.
pub fn present(out: &mut impl Write, buf: &PixelBuf, layout: &Layout) -> io::Result<()> {
    let rows = (buf.height() / 2).min(layout.canvas.height as usize);
    for row in 0..rows {
        queue!(
            out,
            cursor::MoveTo(layout.canvas.col, layout.canvas.row + row as u16)
        )?;
        let mut prev_fg = None;
        let mut prev_bg = None;
        for col in 0..buf.width() {
            let top = buf.get(col, row * 2);
            let bot = buf.get(col, row * 2 + 1);
            if prev_bg != Some(bot) {
                queue!(out, bg(bot))?;
                prev_bg = Some(bot);
            }
            if top == bot {
                queue!(out, style::Print(' '))?;
            } else {
                if prev_fg != Some(top) {
                    queue!(out, fg(top))?;
                    prev_fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
        }
        queue!(out, style::ResetColor)?;
    }
    Ok(())
}

const HUD_TEXT: Rgb = Rgb(235, 235, 235);

fn button_face(phase: Phase) -> Rgb {
    match phase {
        Phase::NotStarted => Rgb(84, 168, 55),
        Phase::Running => Rgb(70, 140, 200),
        Phase::GameOver => Rgb(225, 75, 35),
    }
}

/// Score line and the phase button under the play surface, then flush.
pub fn draw_hud(out: &mut impl Write, layout: &Layout, game: &Game) -> io::Result<()> {
    let hud = layout.hud;
    let text = format!(" SCORE {}   BEST {}", game.score, game.best);
    let text: String = text
        .chars()
        .take(layout.button.col.saturating_sub(hud.col) as usize)
        .collect();
    queue!(
        out,
        cursor::MoveTo(0, hud.row),
        terminal::Clear(ClearType::CurrentLine),
        cursor::MoveTo(hud.col, hud.row),
        fg(HUD_TEXT),
        style::Print(text),
        style::ResetColor,
    )?;

    let face = button_face(game.phase);
    let label = format!(
        "{:^width$}",
        game.phase.button_label(),
        width = layout.button.width as usize
    );
    let label: String = label.chars().take(layout.button.width as usize).collect();
    queue!(
        out,
        cursor::MoveTo(layout.button.col, layout.button.row),
        bg(face),
        fg(Rgb(255, 255, 255)),
        style::Print(label),
        style::ResetColor,
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;

    #[test]
    fn layout_fits_inside_terminal() {
        for (cols, rows) in [(80, 24), (200, 50), (40, 10), (300, 100), (1, 1)] {
            let (layout, viewport) = Layout::compute(cols, rows);
            assert!(layout.canvas.col + layout.canvas.width <= cols.max(1));
            assert!(layout.hud.row + layout.hud.height <= rows.max(2));
            assert!(viewport.width >= crate::viewport::MIN_WIDTH);
            assert!(layout.button.col >= layout.hud.col);
            assert!(layout.button.col + layout.button.width <= layout.hud.col + layout.hud.width);
        }
    }

    #[test]
    fn wide_terminal_is_letterboxed() {
        let (layout, viewport) = Layout::compute(300, 40);
        assert!(layout.canvas.width < 300);
        assert!(layout.canvas.col > 0);
        let aspect = layout.canvas.width as f32 / (layout.canvas.height as f32 * 2.0);
        assert!((aspect - viewport.width / viewport.height).abs() < 0.1);
    }

    #[test]
    fn hud_sits_under_canvas() {
        let (layout, _) = Layout::compute(120, 40);
        assert_eq!(layout.hud.row, layout.canvas.row + layout.canvas.height);
        assert!(layout.button.contains(layout.button.col, layout.hud.row));
        assert!(!layout.canvas.contains(layout.canvas.col, layout.hud.row));
        assert_eq!(layout.pixel_size().1, layout.canvas.height as usize * 2);
    }

    #[test]
    fn present_emits_half_blocks() {
        let (layout, _) = Layout::compute(40, 12);
        let (w, h) = layout.pixel_size();
        let mut buf = PixelBuf::new(w, h);
        buf.set(0, 0, Rgb(255, 0, 0));
        let mut out = Vec::new();
        present(&mut out, &buf, &layout).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{2580}'));
    }

    #[test]
    fn hud_shows_phase_label() {
        let (layout, viewport) = Layout::compute(120, 40);
        let mut game = Game::new(Tuning::default(), viewport, 1);
        let mut out = Vec::new();
        draw_hud(&mut out, &layout, &game).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Start"));

        game.phase = Phase::GameOver;
        game.score = 12;
        let mut out = Vec::new();
        draw_hud(&mut out, &layout, &game).unwrap();
        let text = String::from_utf8_lossy(&out).into_owned();
        assert!(text.contains("Restart"));
        assert!(text.contains("SCORE 12"));
    }
}
