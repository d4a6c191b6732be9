//! Draw plain text onto a grayscale bitmap using the 8x8 public-domain font.

use crate::config::TextImageOptions;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{GrayImage, Luma};
use unicode_width::UnicodeWidthChar;

const GLYPH: u32 = 8;
/// Blank rows between lines, before scaling.
const LEADING: u32 = 2;

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// Render lines of text to a white image with black glyphs.
///
/// Lines are wrapped at `options.columns` display columns. Output beyond
/// `options.max_lines` is dropped with a warning. Characters the font
/// cannot draw are shown as `?`.
pub fn render_text(lines: &[String], options: &TextImageOptions) -> GrayImage {
    let columns = options.columns.max(1);
    let mut rows: Vec<Vec<char>> = lines
        .iter()
        .flat_map(|line| wrap_line(&line.replace('\t', &" ".repeat(options.tab_width)), columns))
        .collect();

    if rows.len() > options.max_lines {
        tracing::warn!(
            total = rows.len(),
            kept = options.max_lines,
            "text image truncated"
        );
        rows.truncate(options.max_lines);
    }
    if rows.is_empty() {
        rows.push(Vec::new());
    }

    let scale = options.glyph_scale.max(1);
    let cell = GLYPH * scale;
    let line_px = (GLYPH + LEADING) * scale;
    let widest = rows.iter().map(Vec::len).max().unwrap_or(0).max(1) as u32;

    let width = 2 * options.padding_px + widest * cell;
    let height = 2 * options.padding_px + rows.len() as u32 * line_px;
    let mut canvas = GrayImage::from_pixel(width, height, PAPER);

    for (r, row) in rows.iter().enumerate() {
        let top = options.padding_px + r as u32 * line_px;
        for (c, &ch) in row.iter().enumerate() {
            let left = options.padding_px + c as u32 * cell;
            draw_glyph(&mut canvas, glyph_for(ch), left, top, scale);
        }
    }
    canvas
}

/// Split a line into rows of at most `columns` cells. Wide characters take
/// two cells, the second filled with a space; zero-width ones are dropped.
fn wrap_line(line: &str, columns: usize) -> Vec<Vec<char>> {
    let mut rows = Vec::new();
    let mut current = Vec::new();
    for ch in line.chars() {
        let width = ch.width().unwrap_or(0);
        if width == 0 {
            continue;
        }
        if current.len() + width > columns && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        current.push(ch);
        if width == 2 {
            current.push(' ');
        }
    }
    rows.push(current);
    rows
}

fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_glyph(canvas: &mut GrayImage, glyph: [u8; 8], left: u32, top: u32, scale: u32) {
    for (gy, bits) in glyph.iter().enumerate() {
        for gx in 0..GLYPH {
            // Bit 0 is the leftmost pixel.
            if bits & (1 << gx) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = left + gx * scale + dx;
                    let y = top + gy as u32 * scale + dy;
                    if x < canvas.width() && y < canvas.height() {
                        canvas.put_pixel(x, y, INK);
                    }
                }
            }
        }
    }
}
