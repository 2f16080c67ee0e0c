//! Owned RGBA pixel buffers that layers are drawn into and blitted from.

use crate::models::error::RenderError;
use crate::render::layout::Rect;
use image::{Rgba, RgbaImage, imageops};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Fills a rectangle given in signed coordinates, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(self.width() as i64);
        let y1 = (y + height as i64).min(self.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    pub fn fill_area(&mut self, area: Rect, color: Rgba<u8>) {
        self.fill_rect(area.x as i64, area.y as i64, area.width, area.height, color);
    }

    /// Sets one pixel; out-of-bounds writes are dropped.
    pub fn plot(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Copies `src` over this surface at `(x, y)`, replacing pixels.
    pub fn blit(&mut self, src: &Surface, x: i64, y: i64) {
        imageops::replace(&mut self.image, &src.image, x, y);
    }

    /// Copies `src` at the origin of `area`.
    pub fn blit_at(&mut self, src: &Surface, area: Rect) {
        self.blit(src, area.x as i64, area.y as i64);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Whether every pixel inside `area` equals the same pixel of `other`.
    pub fn region_eq(&self, other: &Surface, area: Rect) -> bool {
        (area.y..area.bottom())
            .all(|y| (area.x..area.right()).all(|x| self.pixel(x, y) == other.pixel(x, y)))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| RenderError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("RENDER: Frame written to {:?}", path);
        Ok(())
    }
}
