//! Raster drawing surface with a data-to-pixel mapping.

use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
pub const GRID: Rgb<u8> = Rgb([211, 211, 211]);
pub const DODGER_BLUE: Rgb<u8> = Rgb([30, 144, 255]);
pub const LIME_GREEN: Rgb<u8> = Rgb([50, 205, 50]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

const MARGIN: f32 = 0.08;

/// A white image whose inner plot area maps data coordinates to pixels.
pub struct Canvas {
    image: RgbImage,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    pub fn new(width: u32, height: u32, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let width = width.max(16);
        let height = height.max(16);
        let image = RgbImage::from_pixel(width, height, WHITE);
        let (w, h) = (width as f32, height as f32);
        Self {
            image,
            left: w * MARGIN,
            top: h * MARGIN,
            right: w * (1.0 - MARGIN),
            bottom: h * (1.0 - MARGIN),
            x_range: widen(x_range),
            y_range: widen(y_range),
        }
    }

    pub fn x(&self, value: f64) -> f32 {
        let (low, high) = self.x_range;
        let t = ((value - low) / (high - low)) as f32;
        self.left + t * (self.right - self.left)
    }

    pub fn y(&self, value: f64) -> f32 {
        let (low, high) = self.y_range;
        let t = ((value - low) / (high - low)) as f32;
        self.bottom - t * (self.bottom - self.top)
    }

    pub fn point(&self, x: f64, y: f64) -> (f32, f32) {
        (self.x(x), self.y(y))
    }

    /// Left and bottom axis lines.
    pub fn axes(&mut self) {
        let (left, top, right, bottom) = (self.left, self.top, self.right, self.bottom);
        draw_line_segment_mut(&mut self.image, (left, top), (left, bottom), AXIS);
        draw_line_segment_mut(&mut self.image, (left, bottom), (right, bottom), AXIS);
    }

    /// Filled rectangle between two data-space corners.
    pub fn fill(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        if let Some(rect) = self.rect(x0, y0, x1, y1) {
            draw_filled_rect_mut(&mut self.image, rect, color);
        }
    }

    /// Outlined rectangle between two data-space corners.
    pub fn outline(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        if let Some(rect) = self.rect(x0, y0, x1, y1) {
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
    }

    /// Line of the given pixel thickness between two data points.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), thickness: u32, color: Rgb<u8>) {
        let start = self.point(from.0, from.1);
        let end = self.point(to.0, to.1);
        let half = thickness.saturating_sub(1) as f32 / 2.0;
        for step in 0..thickness.max(1) {
            let offset = step as f32 - half;
            draw_line_segment_mut(
                &mut self.image,
                (start.0, start.1 + offset),
                (end.0, end.1 + offset),
                color,
            );
        }
    }

    /// Dotted vertical line across the plot area.
    pub fn dotted_vertical(&mut self, x: f64, color: Rgb<u8>) {
        let px = self.x(x);
        let mut y = self.top;
        while y < self.bottom {
            let end = (y + 3.0).min(self.bottom);
            draw_line_segment_mut(&mut self.image, (px, y), (px, end), color);
            y += 7.0;
        }
    }

    pub fn dot(&mut self, x: f64, y: f64, radius: i32, color: Rgb<u8>) {
        let (px, py) = self.point(x, y);
        draw_filled_circle_mut(&mut self.image, (px.round() as i32, py.round() as i32), radius, color);
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Rect> {
        let (ax, ay) = self.point(x0, y0);
        let (bx, by) = self.point(x1, y1);
        let (left, right) = (ax.min(bx).round(), ax.max(bx).round());
        let (top, bottom) = (ay.min(by).round(), ay.max(by).round());
        if !(left.is_finite() && top.is_finite() && right.is_finite() && bottom.is_finite()) {
            return None;
        }
        let width = ((right - left) as u32).max(1);
        let height = ((bottom - top) as u32).max(1);
        Some(Rect::at(left as i32, top as i32).of_size(width, height))
    }
}

/// Avoids a zero-width range.
fn widen(range: (f64, f64)) -> (f64, f64) {
    let (low, high) = range;
    if high > low { range } else { (low - 0.5, low + 0.5) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_corners_to_plot_area() {
        let canvas = Canvas::new(100, 50, (0.0, 10.0), (0.0, 1.0));
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        assert!(close(canvas.x(0.0), 8.0));
        assert!(close(canvas.x(10.0), 92.0));
        assert!(close(canvas.y(0.0), 46.0));
        assert!(close(canvas.y(1.0), 4.0));
    }

    #[test]
    fn fill_paints_pixels() {
        let mut canvas = Canvas::new(100, 100, (0.0, 1.0), (0.0, 1.0));
        canvas.fill(0.0, 0.0, 1.0, 1.0, RED);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(50, 50), RED);
        assert_eq!(*image.get_pixel(1, 1), WHITE);
    }
}
