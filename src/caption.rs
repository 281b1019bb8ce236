//! Single-line text rendering onto RGB canvases.
//!
//! Uses cosmic-text for shaping and rasterising so titles in any script
//! render with the system's fonts. Text is never wrapped; anything that
//! runs past the canvas edge is clipped.

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};
use image::{Rgb, RgbImage};

/// Where to anchor a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionAnchor {
    /// Horizontal centre of the text.
    pub center_x: i32,
    /// Bottom edge of the text's line box.
    pub bottom_y: i32,
}

/// Draws captions with a shared font database and glyph cache.
///
/// Creating a [`FontSystem`] scans the system fonts, so build one renderer
/// and reuse it for every caption.
pub struct CaptionRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl std::fmt::Debug for CaptionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionRenderer").finish_non_exhaustive()
    }
}

impl Default for CaptionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct LaidOut {
    buffer: Buffer,
    width: f32,
    height: f32,
}

impl CaptionRenderer {
    /// Load the system fonts.
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    fn lay_out(&mut self, text: &str, font_size: f32) -> LaidOut {
        let line_height = font_size * 1.2;
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font_size, line_height));
        buffer.set_size(&mut self.font_system, None, None);
        let attrs = Attrs::new().family(Family::SansSerif);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                width = width.max(glyph.x + glyph.w);
            }
            height += line_height;
        }
        LaidOut {
            buffer,
            width: width.ceil(),
            height: height.max(line_height).ceil(),
        }
    }

    /// Width and height in pixels of `text` at `font_size`.
    pub fn measure(&mut self, text: &str, font_size: f32) -> (u32, u32) {
        let laid_out = self.lay_out(text, font_size);
        (laid_out.width as u32, laid_out.height as u32)
    }

    /// Draw `text` centred on `anchor`, alpha-blended over the canvas.
    pub fn draw(
        &mut self,
        canvas: &mut RgbImage,
        text: &str,
        font_size: f32,
        color: [u8; 3],
        anchor: CaptionAnchor,
    ) {
        if text.is_empty() || font_size <= 0.0 {
            return;
        }
        let mut laid_out = self.lay_out(text, font_size);
        let origin_x = anchor.center_x - (laid_out.width / 2.0) as i32;
        let origin_y = anchor.bottom_y - laid_out.height as i32;
        let (canvas_width, canvas_height) = (canvas.width() as i32, canvas.height() as i32);
        let text_color = Color::rgb(color[0], color[1], color[2]);

        laid_out.buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            text_color,
            |x, y, w, h, glyph_color| {
                let alpha = glyph_color.a() as u32;
                if alpha == 0 {
                    return;
                }
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        let px = origin_x + x + dx;
                        let py = origin_y + y + dy;
                        if px < 0 || py < 0 || px >= canvas_width || py >= canvas_height {
                            continue;
                        }
                        let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                        *pixel = blend(
                            *pixel,
                            [glyph_color.r(), glyph_color.g(), glyph_color.b()],
                            alpha,
                        );
                    }
                }
            },
        );
    }
}

fn blend(destination: Rgb<u8>, source: [u8; 3], alpha: u32) -> Rgb<u8> {
    let mix = |d: u8, s: u8| ((s as u32 * alpha + d as u32 * (255 - alpha)) / 255) as u8;
    Rgb([
        mix(destination[0], source[0]),
        mix(destination[1], source[1]),
        mix(destination[2], source[2]),
    ])
}
