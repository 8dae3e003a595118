use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context;
use image::{codecs::jpeg::JpegEncoder, ImageResult, Rgb, RgbImage};

use crate::app::{chat_name, color::pick_stable_random, color::Color};

pub mod layout;
pub mod typeface;

use layout::{draw_layout, fit_text, TextBox};
use typeface::{RustTypeFace, Typeface};

pub const AVATAR_SIZE: u32 = 640;

pub const TITLE_FONT_SIZE: u32 = 124;
pub const SUBTITLE_FONT_SIZE: u32 = 74;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

const MAX_TEXT_WIDTH: i32 = 600;
const TITLE_MAX_HEIGHT: i32 = 300;
const SUBTITLE_MAX_HEIGHT: i32 = 74;
const SUBTITLE_OFFSET_Y: i32 = 200;
const LOGO_CENTER_Y: i32 = 105;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Read-only font and logo, loaded once and shared by every render.
#[derive(Clone)]
pub struct AvatarAssets {
    pub typeface: Arc<dyn Typeface>,
    pub logo: Arc<RgbImage>,
}

impl AvatarAssets {
    pub fn new(typeface: Arc<dyn Typeface>, logo: RgbImage) -> Self {
        Self {
            typeface,
            logo: Arc::new(logo),
        }
    }

    #[tracing::instrument(name = "Loading avatar assets", skip_all, fields(font = ?font_path, logo = ?logo_path))]
    pub fn load(font_path: &Path, logo_path: &Path) -> anyhow::Result<Self> {
        let font_bytes = std::fs::read(font_path)
            .with_context(|| format!("failed to read font {}", font_path.display()))?;
        let typeface = RustTypeFace::from_bytes(font_bytes)
            .with_context(|| format!("{} is not a TrueType font", font_path.display()))?;

        let logo = image::open(logo_path)
            .with_context(|| format!("failed to load logo {}", logo_path.display()))?
            .to_rgb8();

        Ok(Self::new(Arc::new(typeface), logo))
    }
}

/// Everything that determines one avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub color: Color,
}

impl AvatarRequest {
    /// Course title as the title, semester as the subtitle, color from the title.
    pub fn from_chat_name(chat_name: &str) -> Self {
        let title = chat_name::get_course_name(chat_name);
        let color = pick_stable_random(&title);

        Self {
            title,
            subtitle: chat_name::get_semester(chat_name),
            color,
        }
    }
}

pub struct AvatarRenderer {
    assets: AvatarAssets,
}

impl AvatarRenderer {
    pub fn new(assets: AvatarAssets) -> Self {
        Self { assets }
    }

    pub fn generate_avatar(&self, title: &str, subtitle: Option<&str>, color: Color) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, color.into());
        overlay_logo(&mut canvas, &self.assets.logo);

        let center = (AVATAR_SIZE / 2) as i32;
        let title_box = TextBox {
            anchor: (center, center),
            max_width: MAX_TEXT_WIDTH,
            max_height: TITLE_MAX_HEIGHT,
        };
        self.print_text(&mut canvas, title, TITLE_FONT_SIZE, &title_box);

        if let Some(subtitle) = subtitle.filter(|s| !s.trim().is_empty()) {
            let subtitle_box = TextBox {
                anchor: (center, center + SUBTITLE_OFFSET_Y),
                max_width: MAX_TEXT_WIDTH,
                max_height: SUBTITLE_MAX_HEIGHT,
            };
            self.print_text(&mut canvas, subtitle, SUBTITLE_FONT_SIZE, &subtitle_box);
        }

        canvas
    }

    pub fn render(&self, request: &AvatarRequest) -> RgbImage {
        self.generate_avatar(&request.title, request.subtitle.as_deref(), request.color)
    }

    pub fn render_jpeg(&self, request: &AvatarRequest, quality: u8) -> ImageResult<Vec<u8>> {
        encode_jpeg(&self.render(request), quality)
    }

    fn print_text(&self, canvas: &mut RgbImage, text: &str, nominal_size: u32, bounds: &TextBox) {
        let face = self.assets.typeface.as_ref();
        let layout = fit_text(face, text, nominal_size, bounds);

        if !layout.fits {
            tracing::debug!(
                text,
                font_size = layout.font_size,
                attempts = layout.attempts,
                "text overflows its box, drawing smallest attempt"
            );
        }

        draw_layout(face, canvas, &layout, bounds, TEXT_COLOR);
    }
}

/// Multiply-and-add blend, the logo's dark pixels let the background through.
fn overlay_logo(canvas: &mut RgbImage, logo: &RgbImage) {
    let (w, h) = (logo.width() as i32, logo.height() as i32);
    let x0 = (canvas.width() as i32 - w).div_euclid(2);
    let y0 = LOGO_CENTER_Y - h.div_euclid(2);

    for (lx, ly, logo_px) in logo.enumerate_pixels() {
        let (x, y) = (x0 + lx as i32, y0 + ly as i32);
        if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
            continue;
        }

        let dst = canvas.get_pixel_mut(x as u32, y as u32);
        for (channel, l) in dst.0.iter_mut().zip(logo_px.0) {
            let (bg, l) = (u32::from(*channel), u32::from(l));
            *channel = (bg * (255 - l) / 255 + l).min(255) as u8;
        }
    }
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(image)?;

    Ok(bytes.into_inner())
}
