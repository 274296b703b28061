//! Picking a single leaf image through a host-provided picker.

use crate::editing::crop_and_recompress;
use crate::error::AcquireError;
use crate::prediction::ImageRef;
use std::path::{Path, PathBuf};

/// Extensions accepted for upload, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Cancelled,
    Picked(PathBuf),
}

/// How the picker should treat the chosen image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerOptions {
    /// Crop and recompress after selection.
    pub allows_editing: bool,
    pub aspect: Option<(u32, u32)>,
    /// Recompression quality in [0,1].
    pub quality: f32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            allows_editing: true,
            aspect: Some((4, 3)),
            quality: 0.8,
        }
    }
}

/// Platform media picker.
pub trait MediaPicker {
    fn request_permission(&mut self) -> Permission;

    fn pick_single_image(&mut self, options: &PickerOptions) -> Result<PickOutcome, AcquireError>;
}

pub fn is_supported_extension(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Ask for permission, run the picker, validate the result and apply the
/// configured crop/recompression into `scratch`.
pub fn pick_image(
    picker: &mut dyn MediaPicker,
    options: &PickerOptions,
    scratch: &Path,
) -> Result<ImageRef, AcquireError> {
    if picker.request_permission() == Permission::Denied {
        tracing::warn!("media library permission denied");
        return Err(AcquireError::PermissionDenied);
    }

    let path = match picker.pick_single_image(options)? {
        PickOutcome::Cancelled => return Err(AcquireError::Cancelled),
        PickOutcome::Picked(path) => path,
    };

    if !is_supported_extension(&path) {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        tracing::warn!("rejected {}: unsupported format", path.display());
        return Err(AcquireError::InvalidFormat { extension });
    }

    let path = if options.allows_editing {
        crop_and_recompress(&path, options.aspect, options.quality, scratch)
            .map_err(|e| AcquireError::Failed(format!("{e:#}")))?
    } else {
        path
    };

    tracing::info!("image selected: {}", path.display());
    Ok(ImageRef::new(path))
}
