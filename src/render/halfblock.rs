use crate::render::{Frame, Renderer, write_footer};
use std::io::Write;

/// Two pixel rows per terminal cell: the upper half block glyph takes the
/// top row as foreground and the bottom row as background.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let w = frame.width;
        let h = frame.height;
        if w == 0 || h == 0 || frame.pixels_rgba.len() < w * h * 4 {
            return Ok(());
        }

        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        let rows = h.div_ceil(2);
        for row in 0..rows {
            let top_y = row * 2;
            let bot_y = top_y + 1;
            for x in 0..w {
                let top_i = (top_y * w + x) * 4;
                let (tr, tg, tb) = (
                    frame.pixels_rgba[top_i],
                    frame.pixels_rgba[top_i + 1],
                    frame.pixels_rgba[top_i + 2],
                );
                // Odd heights leave the final bottom half black.
                let (br, bg, bb) = if bot_y < h {
                    let bot_i = (bot_y * w + x) * 4;
                    (
                        frame.pixels_rgba[bot_i],
                        frame.pixels_rgba[bot_i + 1],
                        frame.pixels_rgba[bot_i + 2],
                    )
                } else {
                    (0, 0, 0)
                };

                if self.last_fg != Some((tr, tg, tb)) {
                    write!(out, "\x1b[38;2;{tr};{tg};{tb}m")?;
                    self.last_fg = Some((tr, tg, tb));
                }
                if self.last_bg != Some((br, bg, bb)) {
                    write!(out, "\x1b[48;2;{br};{bg};{bb}m")?;
                    self.last_bg = Some((br, bg, bb));
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\x1b[0m\n")?;
            self.last_fg = None;
            self.last_bg = None;
        }

        write_footer(frame, out)
    }
}
