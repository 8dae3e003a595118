use image::{Rgb, RgbImage};

use super::typeface::Typeface;

/// Upper bound on shrink steps for one block.
pub const MAX_FIT_ATTEMPTS: usize = 1000;

pub const MIN_FONT_SIZE: u32 = 1;

/// Box a block of text has to fit in, centred on `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub anchor: (i32, i32),
    pub max_width: i32,
    pub max_height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub font_size: u32,
    pub lines: Vec<String>,
    pub line_height: i32,
    pub widest_line: i32,
    pub attempts: usize,
    /// False when even the smallest attempt overflows the box.
    pub fits: bool,
}

impl TextLayout {
    pub fn block_height(&self) -> i32 {
        self.line_height * self.lines.len() as i32
    }
}

/// Greedy word wrap: a word that would push a line past `max_width` starts
/// the next line. A single word wider than `max_width` still gets its own
/// line.
pub fn wrap_words(face: &dyn Typeface, text: &str, size: u32, max_width: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        current.push(word);

        if face.text_width(&current.join(" "), size) > max_width {
            current.pop();
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}

/// Shrink the font one size at a time until the wrapped text fits `bounds`.
///
/// Gives up after [`MAX_FIT_ATTEMPTS`] or at [`MIN_FONT_SIZE`] and returns
/// the last attempt, overflowing or not.
pub fn fit_text(face: &dyn Typeface, text: &str, nominal_size: u32, bounds: &TextBox) -> TextLayout {
    let mut font_size = nominal_size.max(MIN_FONT_SIZE);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let lines = wrap_words(face, text, font_size, bounds.max_width);
        let line_height = face.line_height(font_size);
        let widest_line = lines
            .iter()
            .map(|line| face.text_width(line, font_size))
            .max()
            .unwrap_or(0);

        let layout = TextLayout {
            font_size,
            lines,
            line_height,
            widest_line,
            attempts,
            fits: false,
        };

        let fits = layout.block_height() <= bounds.max_height && widest_line <= bounds.max_width;
        if fits || attempts >= MAX_FIT_ATTEMPTS || font_size <= MIN_FONT_SIZE {
            return TextLayout { fits, ..layout };
        }

        font_size -= 1;
    }
}

/// Draw every line centred on the box anchor, top to bottom.
pub fn draw_layout(
    face: &dyn Typeface,
    canvas: &mut RgbImage,
    layout: &TextLayout,
    bounds: &TextBox,
    color: Rgb<u8>,
) {
    let (anchor_x, anchor_y) = bounds.anchor;
    let mut y = anchor_y - layout.block_height().div_euclid(2);

    for line in &layout.lines {
        let width = face.text_width(line, layout.font_size);
        let x = anchor_x - width.div_euclid(2);

        face.draw_text(canvas, x, y, layout.font_size, line, color);
        y += layout.line_height;
    }
}
