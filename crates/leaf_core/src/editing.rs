//! Crop and recompression applied to a picked image before upload.

use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Centre-crop `src` to `aspect` (if given) and re-encode it as JPEG at
/// `quality` (0..=1) inside `out_dir`. Returns the path of the new file.
pub fn crop_and_recompress(
    src: &Path,
    aspect: Option<(u32, u32)>,
    quality: f32,
    out_dir: &Path,
) -> Result<PathBuf> {
    let img = image::open(src)
        .with_context(|| format!("cannot open image: {}", src.display()))?;
    let img = match aspect {
        Some(aspect) => crop_to_aspect(img, aspect),
        None => img,
    };

    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    let out = out_dir.join(format!("{stem}.jpg"));

    let file =
        File::create(&out).with_context(|| format!("cannot create {}", out.display()))?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), jpeg_quality(quality));
    // JPEG has no alpha channel
    img.to_rgb8()
        .write_with_encoder(encoder)
        .with_context(|| format!("cannot encode {}", out.display()))?;

    tracing::debug!(
        src = %src.display(),
        out = %out.display(),
        "recompressed picked image"
    );
    Ok(out)
}

fn crop_to_aspect(img: DynamicImage, (aw, ah): (u32, u32)) -> DynamicImage {
    if aw == 0 || ah == 0 {
        return img;
    }
    let (w, h) = (img.width() as u64, img.height() as u64);
    let (aw, ah) = (aw as u64, ah as u64);
    // widest crop that fits, then tallest
    let (cw, ch) = if w * ah > h * aw {
        (h * aw / ah, h)
    } else {
        (w, w * ah / aw)
    };
    let (cw, ch) = (cw.max(1) as u32, ch.max(1) as u32);
    let x = (img.width() - cw) / 2;
    let y = (img.height() - ch) / 2;
    img.crop_imm(x, y, cw, ch)
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.01, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn crops_wide_image_to_four_by_three() -> Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("leaf.png");
        RgbaImage::from_pixel(200, 100, image::Rgba([10, 200, 30, 255])).save(&src)?;

        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir)?;
        let out = crop_and_recompress(&src, Some((4, 3)), 0.8, &out_dir)?;

        assert_eq!(out, out_dir.join("leaf.jpg"));
        assert_eq!(image::ImageFormat::from_path(&out)?, ImageFormat::Jpeg);
        let decoded = image::open(&out)?;
        assert_eq!(decoded.dimensions(), (133, 100));
        Ok(())
    }

    #[test]
    fn crops_tall_image() {
        let img = DynamicImage::new_rgb8(90, 300);
        let cropped = crop_to_aspect(img, (4, 3));
        assert_eq!(cropped.dimensions(), (90, 67));
    }

    #[test]
    fn keeps_dimensions_without_aspect() -> Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("leaf.jpeg");
        DynamicImage::new_rgb8(64, 48).save(&src)?;

        let out = crop_and_recompress(&src, None, 0.8, dir.path())?;
        assert_eq!(image::open(&out)?.dimensions(), (64, 48));
        Ok(())
    }

    #[test]
    fn undecodable_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("broken.jpg");
        std::fs::write(&src, b"not an image")?;
        assert!(crop_and_recompress(&src, Some((4, 3)), 0.8, dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn quality_maps_to_percent() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(2.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
    }
}
