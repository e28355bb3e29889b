use crate::render::{Frame, Renderer, write_footer};
use anyhow::Context;
use base64::Engine;
use std::io::Write;

/// Kitty graphics protocol, direct transport: the RGBA payload is
/// base64-encoded inline, chunked so each escape stays within the
/// protocol's 4096-byte payload limit.
pub struct KittyRenderer {
    b64_buf: Vec<u8>,
}

impl KittyRenderer {
    pub fn new() -> Self {
        Self { b64_buf: Vec::new() }
    }
}

impl Renderer for KittyRenderer {
    fn name(&self) -> &'static str {
        "kitty"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let w = frame.width;
        let h = frame.height;
        if w == 0 || h == 0 || frame.pixels_rgba.len() < w * h * 4 {
            return Ok(());
        }

        write_kitty_direct_rgba(
            out,
            &frame.pixels_rgba[..w * h * 4],
            w,
            h,
            frame.term_cols as usize,
            frame.term_rows as usize,
            &mut self.b64_buf,
        )?;
        out.write_all(b"\n")?;

        write_footer(frame, out)
    }
}

fn write_kitty_direct_rgba(
    out: &mut dyn Write,
    rgba: &[u8],
    w: usize,
    h: usize,
    cols: usize,
    rows: usize,
    b64_buf: &mut Vec<u8>,
) -> anyhow::Result<()> {
    const RAW_CHUNK: usize = 3 * 1024; // 3072 -> 4096 bytes base64

    if rgba.is_empty() {
        return Ok(());
    }

    let mut off = 0usize;
    let len = rgba.len();
    let mut first = true;
    while off < len {
        let end = (off + RAW_CHUNK).min(len);
        let chunk = &rgba[off..end];
        let b64_len = chunk.len().div_ceil(3) * 4;
        if b64_buf.len() < b64_len {
            b64_buf.resize(b64_len, 0);
        }

        let written = base64::engine::general_purpose::STANDARD
            .encode_slice(chunk, &mut b64_buf[..b64_len])
            .context("base64 encode pixels")?;

        let more = end < len;
        if first {
            write!(
                out,
                "\x1b_Ga=T,f=32,s={},v={},t=d,i=1,c={},r={},C=1,q=2{};",
                w,
                h,
                cols,
                rows,
                if more { ",m=1" } else { "" }
            )?;
            first = false;
        } else {
            write!(out, "\x1b_Gm={};", if more { 1 } else { 0 })?;
        }
        out.write_all(&b64_buf[..written])?;
        out.write_all(b"\x1b\\")?;

        off = end;
    }

    Ok(())
}
