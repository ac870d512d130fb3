//! Screenshot annotation
//!
//! Draws numbered boxes over page screenshots so a human (or a vision
//! model) can see which elements an extraction found and what index each
//! one got. Box outlines always render; index digits render when a TTF
//! font is supplied.

use crate::dom::{BoundingBox, VisibleElement};
use crate::error::{Result, ScoutError};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::io::Cursor;

/// A numbered box to draw over a screenshot
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub index: usize,
    pub bounding_box: BoundingBox,
}

impl Annotation {
    pub fn new(index: usize, bounding_box: BoundingBox) -> Self {
        Self { index, bounding_box }
    }
}

/// Number the interactive elements of a flat extraction in order,
/// producing one annotation per element
pub fn annotations_for(elements: &[VisibleElement]) -> Vec<Annotation> {
    elements
        .iter()
        .filter(|element| element.is_interactive)
        .enumerate()
        .map(|(index, element)| Annotation::new(index, element.bounding_box))
        .collect()
}

/// Draws numbered boxes over PNG screenshots
pub struct Annotator {
    font: Option<Font<'static>>,
    box_color: Rgba<u8>,
    label_color: Rgba<u8>,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        Self {
            font: None,
            box_color: Rgba([230, 0, 126, 255]),
            label_color: Rgba([255, 255, 255, 255]),
        }
    }

    /// Enable index digits, rendered with the given TTF font data
    pub fn with_font(mut self, font_data: Vec<u8>) -> Result<Self> {
        let font =
            Font::try_from_vec(font_data).ok_or_else(|| ScoutError::Annotation("invalid font data".to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    /// Draw the annotations onto a PNG screenshot and re-encode it.
    /// Boxes outside the image are skipped.
    pub fn annotate_png(&self, png: &[u8], annotations: &[Annotation]) -> Result<Vec<u8>> {
        let image = image::load_from_memory(png).map_err(|e| ScoutError::Annotation(format!("decode: {e}")))?;
        let mut canvas = image.to_rgba8();
        let (canvas_width, canvas_height) = canvas.dimensions();

        for annotation in annotations {
            let Some(rect) = clamp_rect(&annotation.bounding_box, canvas_width, canvas_height) else {
                continue;
            };
            draw_hollow_rect_mut(&mut canvas, rect, self.box_color);
            self.draw_label(&mut canvas, annotation.index, rect);
        }

        let mut out = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .map_err(|e| ScoutError::Annotation(format!("encode: {e}")))?;

        Ok(out)
    }

    fn draw_label(&self, canvas: &mut RgbaImage, index: usize, rect: Rect) {
        let text = index.to_string();
        let badge_width = 4 + 7 * text.len() as u32;
        let badge = Rect::at(rect.left(), rect.top()).of_size(badge_width, 14);
        draw_filled_rect_mut(canvas, badge, self.box_color);

        if let Some(font) = &self.font {
            draw_text_mut(canvas, self.label_color, rect.left() + 2, rect.top() + 1, Scale::uniform(12.0), font, &text);
        }
    }
}

/// Clip a viewport-relative box to the image, dropping boxes that end up
/// without area
fn clamp_rect(bounding_box: &BoundingBox, canvas_width: u32, canvas_height: u32) -> Option<Rect> {
    let left = bounding_box.x.max(0.0);
    let top = bounding_box.y.max(0.0);
    let right = (bounding_box.x + bounding_box.width).min(canvas_width as f64);
    let bottom = (bounding_box.y + bounding_box.height).min(canvas_height as f64);

    let width = (right - left).floor() as i64;
    let height = (bottom - top).floor() as i64;
    if width < 1 || height < 1 {
        return None;
    }

    Some(Rect::at(left as i32, top as i32).of_size(width as u32, height as u32))
}

/// Base64 data URL for a PNG image
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn blank_png(width: u32, height: u32) -> Vec<u8> {
        let canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .unwrap();
        out
    }

    fn visible_element(is_interactive: bool, bounding_box: BoundingBox) -> VisibleElement {
        VisibleElement {
            xpath: "/html/body/button".to_string(),
            text: "Go".to_string(),
            tag_name: "button".to_string(),
            is_interactive,
            attributes: IndexMap::new(),
            bounding_box,
        }
    }

    #[test]
    fn test_annotations_number_interactive_elements() {
        let elements = vec![
            visible_element(true, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            visible_element(false, BoundingBox::new(0.0, 20.0, 10.0, 10.0)),
            visible_element(true, BoundingBox::new(0.0, 40.0, 10.0, 10.0)),
        ];

        let annotations = annotations_for(&elements);
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].index, 0);
        assert_eq!(annotations[1].index, 1);
        assert_eq!(annotations[1].bounding_box.y, 40.0);
    }

    #[test]
    fn test_annotate_draws_box_and_badge() {
        let png = blank_png(100, 60);
        let annotator = Annotator::new();
        let annotations = [Annotation::new(0, BoundingBox::new(20.0, 10.0, 40.0, 30.0))];

        let annotated = annotator.annotate_png(&png, &annotations).unwrap();
        let canvas = image::load_from_memory(&annotated).unwrap().to_rgba8();

        // Box corner and badge interior take the box color
        assert_eq!(canvas.get_pixel(20, 10), &Rgba([230, 0, 126, 255]));
        assert_eq!(canvas.get_pixel(22, 12), &Rgba([230, 0, 126, 255]));
        // Pixels well outside the box stay white
        assert_eq!(canvas.get_pixel(90, 55), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_out_of_canvas_annotations_are_skipped() {
        let png = blank_png(50, 50);
        let annotator = Annotator::new();
        let annotations = [
            Annotation::new(0, BoundingBox::new(200.0, 200.0, 40.0, 30.0)),
            Annotation::new(1, BoundingBox::new(10.0, 10.0, 0.0, 0.0)),
        ];

        let annotated = annotator.annotate_png(&png, &annotations).unwrap();
        let canvas = image::load_from_memory(&annotated).unwrap().to_rgba8();

        for pixel in canvas.pixels() {
            assert_eq!(pixel, &Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_invalid_font_is_rejected() {
        let result = Annotator::new().with_font(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(ScoutError::Annotation(_))));
    }

    #[test]
    fn test_data_url() {
        let url = to_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, "data:image/png;base64,AQID");
    }
}
