//! Per-frame decorations drawn over the grid artifact.
//!
//! The stored artifact is never modified: [`draw_highlight`] returns a copy
//! and [`draw_notice`] draws onto that copy.

use image::{Rgb, RgbImage};

use crate::caption::{CaptionAnchor, CaptionRenderer};
use crate::config::HighlightStyle;
use crate::layout::{GridLayout, Rect};

/// Vertical padding above and below notice text.
const NOTICE_PADDING: u32 = 16;

/// Return a copy of `frame` with the selection rectangle around cell `index`.
///
/// The stroke is drawn inside the rectangle from
/// [`GridLayout::highlight_rect`] and clipped to the frame.
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use videowall::{GridLayout, HighlightStyle, draw_highlight};
///
/// let layout = GridLayout::new(3, 2, 1920, 1080);
/// let frame = RgbImage::new(1920, 1080);
/// let highlighted = draw_highlight(&frame, &layout, &HighlightStyle::default(), 0);
/// assert_eq!(*highlighted.get_pixel(30, 20), Rgb([255, 255, 0]));
/// assert_eq!(*frame.get_pixel(30, 20), Rgb([0, 0, 0]));
/// ```
pub fn draw_highlight(
    frame: &RgbImage,
    layout: &GridLayout,
    style: &HighlightStyle,
    index: usize,
) -> RgbImage {
    let mut output = frame.clone();
    let rect = layout.highlight_rect(index, style.insets);
    stroke_rect(&mut output, rect, style.stroke_width, Rgb(style.color));
    output
}

/// Draw `text` in a darkened band across the top of `frame`.
pub fn draw_notice(
    frame: &mut RgbImage,
    text: &str,
    font_size: f32,
    captions: &mut CaptionRenderer,
) {
    if text.is_empty() {
        return;
    }
    let (_, text_height) = captions.measure(text, font_size);
    let band_height = (text_height + 2 * NOTICE_PADDING).min(frame.height());
    for pixel in frame.rows_mut().take(band_height as usize).flatten() {
        for channel in pixel.0.iter_mut() {
            *channel /= 4;
        }
    }
    let anchor = CaptionAnchor {
        center_x: (frame.width() / 2) as i32,
        bottom_y: (band_height - NOTICE_PADDING.min(band_height)) as i32,
    };
    captions.draw(frame, text, font_size, [255, 255, 255], anchor);
}

fn stroke_rect(image: &mut RgbImage, rect: Rect, stroke: u32, color: Rgb<u8>) {
    let stroke = stroke.min(rect.width).min(rect.height);
    if stroke == 0 {
        return;
    }
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    fill_rect(image, rect.x, rect.y, right, rect.y + stroke, color);
    fill_rect(image, rect.x, bottom - stroke, right, bottom, color);
    fill_rect(image, rect.x, rect.y, rect.x + stroke, bottom, color);
    fill_rect(image, right - stroke, rect.y, right, bottom, color);
}

/// Fill the half-open box `[x0, x1) x [y0, y1)`, clipped to the image.
fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}
