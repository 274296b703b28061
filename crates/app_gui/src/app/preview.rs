use anyhow::{Context, Result};
use eframe::egui;
use std::path::Path;

pub const PREVIEW_SIZE: u32 = 280;

/// Cached texture for the selected image.
#[derive(Default)]
pub enum Preview {
    #[default]
    NotLoaded,
    Loaded(egui::TextureHandle),
    Failed,
}

impl Preview {
    pub fn texture(&mut self, ctx: &egui::Context, path: &Path) -> Option<&egui::TextureHandle> {
        if matches!(self, Preview::NotLoaded) {
            *self = match load_preview(path) {
                Ok(color) => {
                    let name = format!("preview:{}", path.display());
                    Preview::Loaded(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
                }
                Err(e) => {
                    tracing::warn!("Failed to load preview for {}: {e:#}", path.display());
                    Preview::Failed
                }
            };
        }
        match &*self {
            Preview::Loaded(tex) => Some(tex),
            _ => None,
        }
    }
}

pub fn load_preview(path: &Path) -> Result<egui::ColorImage> {
    let img = image::open(path)
        .with_context(|| format!("cannot open image: {}", path.display()))?;
    let thumb = if img.width() > PREVIEW_SIZE || img.height() > PREVIEW_SIZE {
        img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgba8()
    } else {
        img.to_rgba8()
    };
    let (w, h) = thumb.dimensions();
    let size = [w as usize, h as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &thumb.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case(640, 480, [280, 210])]
    #[case(100, 50, [100, 50])]
    fn preview_fits_box(#[case] w: u32, #[case] h: u32, #[case] expected: [usize; 2]) -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("leaf.png");
        RgbaImage::new(w, h).save(&path)?;

        let color = load_preview(&path)?;
        assert_eq!(color.size, expected);
        Ok(())
    }

    #[test]
    fn broken_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("leaf.jpg");
        std::fs::write(&path, b"nope")?;
        assert!(load_preview(&path).is_err());
        Ok(())
    }
}
