//! In-memory RGB surface with a small drawing API.
//!
//! `Framebuffer` is the render target for résumé templates and the fake
//! surface used in tests:
//! - `fill()` - Fill the entire buffer with a color
//! - `draw_rect()` / `draw_hline()` - Filled shapes
//! - `draw_text()` / `draw_text_scaled()` - Text using font8x8 glyphs
//! - `detach()` / `mount()` - Simulate the surface leaving the page

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use std::io::Cursor;

use super::types::{Paint, Surface, SurfaceError, SurfaceLayout, SurfaceResult};

/// Width and height of a font8x8 glyph in pixels
pub const GLYPH_SIZE: u32 = 8;

/// Default identifier for framebuffers created without one
pub const DEFAULT_FRAMEBUFFER_ID: &str = "framebuffer";

/// A virtual RGB surface for templates and tests
#[derive(Debug, Clone)]
pub struct Framebuffer {
    id: String,
    pixels: RgbImage,
    mounted: bool,
    foreign_content: bool,
}

impl Framebuffer {
    /// Create a new framebuffer with the given dimensions, initialized to black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: DEFAULT_FRAMEBUFFER_ID.to_string(),
            pixels: RgbImage::new(width, height),
            mounted: true,
            foreign_content: false,
        }
    }

    /// Create a framebuffer initialized to a specific color
    pub fn with_color(width: u32, height: u32, color: [u8; 3]) -> Self {
        let mut fb = Self::new(width, height);
        fb.fill(color);
        fb
    }

    /// Set the surface identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Load a framebuffer from PNG image bytes
    pub fn from_png_bytes(data: &[u8]) -> SurfaceResult<Self> {
        let img = image::load_from_memory(data)?;
        let mut fb = Self::new(0, 0);
        fb.pixels = img.to_rgb8();
        Ok(fb)
    }

    /// Load a framebuffer from raw RGB bytes
    pub fn from_raw_rgb(width: u32, height: u32, data: Vec<u8>) -> SurfaceResult<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        let pixels = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            SurfaceError::Paint(format!(
                "Buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ))
        })?;
        let mut fb = Self::new(0, 0);
        fb.pixels = pixels;
        Ok(fb)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Mark the surface as removed from the page
    pub fn detach(&mut self) {
        self.mounted = false;
    }

    /// Mark the surface as mounted again
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Whether the surface is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Flag the surface as holding content from another origin
    pub fn set_foreign_content(&mut self, foreign: bool) {
        self.foreign_content = foreign;
    }

    /// Fill the entire framebuffer with a color
    pub fn fill(&mut self, color: [u8; 3]) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgb(color);
        }
    }

    /// Draw a filled rectangle, clipped to the buffer
    pub fn draw_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.pixels.put_pixel(px, py, Rgb(color));
            }
        }
    }

    /// Draw a horizontal line `thickness` pixels tall
    pub fn draw_hline(&mut self, x: u32, y: u32, w: u32, thickness: u32, color: [u8; 3]) {
        self.draw_rect(x, y, w, thickness, color);
    }

    /// Draw text using font8x8 glyphs on an opaque background
    ///
    /// Each character is 8x8 pixels. Text does not wrap.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, fg: [u8; 3], bg: [u8; 3]) {
        let mut cursor_x = x;
        for ch in text.chars() {
            if cursor_x >= self.width() {
                break;
            }
            self.draw_glyph(cursor_x, y, ch, fg, Some(bg), 1);
            cursor_x += GLYPH_SIZE;
        }
    }

    /// Draw text with each glyph pixel enlarged to `scale`x`scale`
    ///
    /// Only foreground pixels are written, so the background shows through.
    pub fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, fg: [u8; 3], scale: u32) {
        let scale = scale.max(1);
        let mut cursor_x = x;
        for ch in text.chars() {
            if cursor_x >= self.width() {
                break;
            }
            self.draw_glyph(cursor_x, y, ch, fg, None, scale);
            cursor_x += GLYPH_SIZE * scale;
        }
    }

    /// Width in pixels that `text` occupies at the given glyph scale
    pub fn text_width(text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_SIZE * scale.max(1)
    }

    fn draw_glyph(&mut self, x: u32, y: u32, ch: char, fg: [u8; 3], bg: Option<[u8; 3]>, scale: u32) {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .unwrap_or([0u8; 8]);
        for (row_idx, row) in glyph.iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                // font8x8 stores LSB as leftmost pixel
                let color = if (row >> bit) & 1 == 1 { Some(fg) } else { bg };
                if let Some(color) = color {
                    self.draw_rect(
                        x + bit * scale,
                        y + row_idx as u32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }

    /// Get the color of a pixel, black when out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| p.0)
            .unwrap_or([0, 0, 0])
    }

    /// Set the color of a pixel, ignoring out-of-bounds writes
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) {
            *pixel = Rgb(color);
        }
    }

    /// Get the raw RGB buffer
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Copy of the pixels as an image buffer
    pub fn to_image(&self) -> RgbImage {
        self.pixels.clone()
    }

    /// Encode the framebuffer as PNG bytes
    pub fn to_png(&self) -> SurfaceResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}

impl Surface for Framebuffer {
    fn id(&self) -> &str {
        &self.id
    }

    fn layout(&self) -> Option<SurfaceLayout> {
        self.mounted
            .then(|| SurfaceLayout::new(self.width(), self.height()))
    }

    fn paint(&self) -> SurfaceResult<Paint> {
        if !self.mounted {
            return Err(SurfaceError::Detached(self.id.clone()));
        }
        Ok(Paint {
            pixels: self.to_image(),
            has_foreign_content: self.foreign_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_new() {
        let fb = Framebuffer::new(100, 50);
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.id(), DEFAULT_FRAMEBUFFER_ID);
        assert_eq!(fb.get_pixel(0, 0), [0, 0, 0]);
        assert_eq!(fb.get_pixel(99, 49), [0, 0, 0]);
    }

    #[test]
    fn test_framebuffer_draw_rect_clips() {
        let mut fb = Framebuffer::new(20, 20);
        fb.draw_rect(15, 15, 100, 100, [255, 0, 0]);

        assert_eq!(fb.get_pixel(14, 14), [0, 0, 0]);
        assert_eq!(fb.get_pixel(15, 15), [255, 0, 0]);
        assert_eq!(fb.get_pixel(19, 19), [255, 0, 0]);
    }

    #[test]
    fn test_framebuffer_draw_text() {
        let mut fb = Framebuffer::new(80, 16);
        fb.draw_text(0, 0, "Hi", [255, 255, 255], [0, 0, 0]);

        let has_white = (0..8).any(|y| (0..8).any(|x| fb.get_pixel(x, y) == [255, 255, 255]));
        assert!(has_white, "Character 'H' should have some foreground pixels");
    }

    #[test]
    fn test_draw_text_scaled_is_transparent() {
        let mut fb = Framebuffer::with_color(64, 32, [10, 20, 30]);
        fb.draw_text_scaled(0, 0, "I", [255, 255, 255], 2);

        let white = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == [255, 255, 255])
            .count();
        assert!(white > 0);
        // Glyph pixels are drawn as 2x2 blocks
        assert_eq!(white % 4, 0);
        // Background is untouched outside the glyph
        assert_eq!(fb.get_pixel(63, 31), [10, 20, 30]);
    }

    #[test]
    fn test_latin_glyph_is_drawn() {
        let mut fb = Framebuffer::new(16, 8);
        fb.draw_text_scaled(0, 0, "é", [255, 255, 255], 1);
        assert!(fb.as_bytes().iter().any(|&b| b == 255));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(Framebuffer::text_width("abc", 1), 24);
        assert_eq!(Framebuffer::text_width("abc", 2), 48);
    }

    #[test]
    fn test_detached_surface_has_no_layout() {
        let mut fb = Framebuffer::new(10, 10).with_id("preview");
        assert!(fb.layout().is_some());

        fb.detach();
        assert!(fb.layout().is_none());
        assert!(matches!(fb.paint(), Err(SurfaceError::Detached(id)) if id == "preview"));

        fb.mount();
        assert_eq!(fb.layout(), Some(SurfaceLayout::new(10, 10)));
    }

    #[test]
    fn test_paint_is_read_only() {
        let mut fb = Framebuffer::with_color(4, 4, [1, 2, 3]);
        fb.set_foreign_content(true);
        let before = fb.as_bytes().to_vec();

        let paint = fb.paint().unwrap();
        assert!(paint.has_foreign_content);
        assert_eq!(paint.pixels.as_raw(), &before);
        assert_eq!(fb.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_framebuffer_png_roundtrip() {
        let mut fb = Framebuffer::new(32, 32);
        fb.fill([100, 150, 200]);
        fb.draw_rect(8, 8, 16, 16, [255, 0, 0]);

        let png = fb.to_png().unwrap();
        let fb2 = Framebuffer::from_png_bytes(&png).unwrap();

        assert_eq!(fb2.width(), 32);
        assert_eq!(fb2.get_pixel(0, 0), [100, 150, 200]);
        assert_eq!(fb2.get_pixel(10, 10), [255, 0, 0]);
    }

    #[test]
    fn test_from_raw_rgb_rejects_short_buffer() {
        let err = Framebuffer::from_raw_rgb(2, 2, vec![0; 5]).unwrap_err();
        assert!(err.to_string().contains("expected 12 bytes, got 5"));
    }
}
