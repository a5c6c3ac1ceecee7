#[cfg(test)]
#[path = "image_canvas_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::bail;
use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use image::Rgba;
use image::RgbaImage;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

const CACHE_LIMIT: usize = 32;
const UPPER_HALF_BLOCK: &str = "▀";
const DIVIDER: &str = "┃";

fn blend(pixel: &Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    let alpha = a as u16;
    return Color::Rgb(
        ((r as u16 * alpha) / 255) as u8,
        ((g as u16 * alpha) / 255) as u8,
        ((b as u16 * alpha) / 255) as u8,
    );
}

fn pixel_at(img: &RgbaImage, x: u32, y: u32) -> Option<Color> {
    if x >= img.width() || y >= img.height() {
        return None;
    }

    return Some(blend(img.get_pixel(x, y)));
}

fn cell(top: Option<Color>, bottom: Option<Color>) -> Span<'static> {
    return Span::styled(
        UPPER_HALF_BLOCK,
        Style {
            fg: Some(top.unwrap_or(Color::Reset)),
            bg: Some(bottom.unwrap_or(Color::Reset)),
            ..Style::default()
        },
    );
}

fn error_lines(err: anyhow::Error) -> Vec<Line<'static>> {
    return vec![Line::from(format!("Unable to preview image: {err}"))];
}

/// Renders images as half block cells, two pixels per terminal cell. Resized
/// pixels are cached per image and target size, decode failures per image.
#[derive(Default)]
pub struct ImageCanvas {
    cache: HashMap<String, RgbaImage>,
    failed: HashMap<String, String>,
}

impl ImageCanvas {
    fn decode(&mut self, key: &str, data: &[u8]) -> Result<DynamicImage> {
        if let Some(err) = self.failed.get(key) {
            bail!("{err}");
        }

        match image::load_from_memory(data) {
            Ok(img) => return Ok(img),
            Err(err) => {
                tracing::warn!(key = key, error = ?err, "failed to decode image for preview");
                if self.failed.len() >= CACHE_LIMIT {
                    self.failed.clear();
                }
                self.failed.insert(key.to_string(), err.to_string());
                bail!(err);
            }
        }
    }

    fn fitted(&mut self, key: &str, data: &[u8], width: u16, height: u16) -> Result<&RgbaImage> {
        let cache_key = format!("{key}:fit:{width}x{height}");
        if !self.cache.contains_key(&cache_key) {
            if self.cache.len() >= CACHE_LIMIT {
                self.cache.clear();
            }

            let resized = self
                .decode(key, data)?
                .resize(width as u32, height as u32 * 2, FilterType::Triangle)
                .to_rgba8();
            self.cache.insert(cache_key.clone(), resized);
        }

        return Ok(&self.cache[&cache_key]);
    }

    fn exact(&mut self, key: &str, data: &[u8], width: u32, height: u32) -> Result<&RgbaImage> {
        let cache_key = format!("{key}:exact:{width}x{height}");
        if !self.cache.contains_key(&cache_key) {
            if self.cache.len() >= CACHE_LIMIT {
                self.cache.clear();
            }

            let resized = self
                .decode(key, data)?
                .resize_exact(width, height, FilterType::Triangle)
                .to_rgba8();
            self.cache.insert(cache_key.clone(), resized);
        }

        return Ok(&self.cache[&cache_key]);
    }

    /// Lines for a single image fitted into `width` x `height` cells and
    /// centered horizontally.
    pub fn lines(&mut self, key: &str, data: &[u8], width: u16, height: u16) -> Vec<Line<'static>> {
        if width == 0 || height == 0 {
            return vec![];
        }

        let img = match self.fitted(key, data, width, height) {
            Ok(img) => img,
            Err(err) => return error_lines(err),
        };

        let pad = (width as u32).saturating_sub(img.width()) / 2;
        return (0..(img.height() + 1) / 2)
            .map(|row| {
                let mut spans = vec![Span::raw(" ".repeat(pad as usize))];
                for x in 0..img.width() {
                    spans.push(cell(
                        pixel_at(img, x, row * 2),
                        pixel_at(img, x, row * 2 + 1),
                    ));
                }
                return Line::from(spans);
            })
            .collect();
    }

    /// Lines for a before/after view. Columns left of `split` show `before`
    /// scaled to the dimensions of `after`, the divider sits at `split`.
    pub fn comparison_lines(
        &mut self,
        before: (&str, &[u8]),
        after: (&str, &[u8]),
        width: u16,
        height: u16,
        split: u16,
    ) -> Vec<Line<'static>> {
        if width == 0 || height == 0 {
            return vec![];
        }

        let after_img = match self.fitted(after.0, after.1, width, height) {
            Ok(img) => img.clone(),
            Err(err) => return error_lines(err),
        };
        let before_img = match self.exact(before.0, before.1, after_img.width(), after_img.height())
        {
            Ok(img) => img.clone(),
            Err(err) => return error_lines(err),
        };

        let pad = (width as u32).saturating_sub(after_img.width()) / 2;
        let split = split as u32;
        return (0..(after_img.height() + 1) / 2)
            .map(|row| {
                let mut spans = vec![Span::raw(" ".repeat(pad as usize))];
                for x in 0..after_img.width() {
                    let column = x + pad;
                    if column == split {
                        spans.push(Span::styled(
                            DIVIDER,
                            Style {
                                fg: Some(Color::White),
                                bg: pixel_at(&after_img, x, row * 2),
                                ..Style::default()
                            },
                        ));
                        continue;
                    }

                    let source = if column < split {
                        &before_img
                    } else {
                        &after_img
                    };
                    spans.push(cell(
                        pixel_at(source, x, row * 2),
                        pixel_at(source, x, row * 2 + 1),
                    ));
                }
                return Line::from(spans);
            })
            .collect();
    }
}
