use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

/// Measures and draws text at a given size.
///
/// Sizes are em sizes in pixels. Widths and heights follow the ink box of the
/// rendered text with the pen placed at the top-left of the line, so a line
/// drawn at `(x, y)` covers roughly `x..x + text_width` and
/// `y..y + line_height`.
pub trait Typeface: Send + Sync {
    fn text_width(&self, text: &str, size: u32) -> i32;

    fn line_height(&self, size: u32) -> i32;

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, size: u32, text: &str, color: Rgb<u8>);
}

/// TrueType font backed by rusttype.
pub struct RustTypeFace {
    font: Font<'static>,
}

impl RustTypeFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    /// rusttype scales by ascent-to-descent height, convert from em size.
    fn scale(&self, size: u32) -> Scale {
        let v_metrics = self.font.v_metrics_unscaled();
        let units_per_em = f32::from(self.font.units_per_em());

        Scale::uniform(size as f32 * (v_metrics.ascent - v_metrics.descent) / units_per_em)
    }

    fn ascent(&self, scale: Scale) -> f32 {
        self.font.v_metrics(scale).ascent
    }
}

impl Typeface for RustTypeFace {
    fn text_width(&self, text: &str, size: u32) -> i32 {
        let scale = self.scale(size);

        self.font
            .layout(text, scale, point(0.0, self.ascent(scale)))
            .filter_map(|glyph| glyph.pixel_bounding_box())
            .map(|bb| bb.max.x)
            .max()
            .unwrap_or(0)
    }

    fn line_height(&self, size: u32) -> i32 {
        let scale = self.scale(size);
        let ascent = self.ascent(scale);

        self.font
            .layout("A", scale, point(0.0, ascent))
            .filter_map(|glyph| glyph.pixel_bounding_box())
            .map(|bb| bb.max.y)
            .max()
            .unwrap_or_else(|| ascent.ceil() as i32)
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, size: u32, text: &str, color: Rgb<u8>) {
        let scale = self.scale(size);
        let origin = point(x as f32, y as f32 + self.ascent(scale));

        for glyph in self.font.layout(text, scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };

            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= canvas.width() as i32 || py >= canvas.height() as i32 {
                    return;
                }

                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                let inv = 1.0 - coverage;
                for (channel, fg) in dst.0.iter_mut().zip(color.0) {
                    *channel = (f32::from(fg) * coverage + f32::from(*channel) * inv) as u8;
                }
            });
        }
    }
}
