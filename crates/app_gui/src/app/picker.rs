//! Native file dialog used as the media picker.

use leaf_core::acquisition::SUPPORTED_EXTENSIONS;
use leaf_core::{AcquireError, MediaPicker, Permission, PickOutcome, PickerOptions};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct RfdPicker {
    last_dir: Option<PathBuf>,
}

impl MediaPicker for RfdPicker {
    // Desktop file access needs no runtime grant.
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn pick_single_image(&mut self, _options: &PickerOptions) -> Result<PickOutcome, AcquireError> {
        let mut dialog = FileDialog::new()
            .set_title("Select a leaf image")
            .add_filter("Images", &SUPPORTED_EXTENSIONS)
            .add_filter("All files", &["*"]);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }

        match dialog.pick_file() {
            Some(path) => {
                self.last_dir = path.parent().map(Path::to_path_buf);
                Ok(PickOutcome::Picked(path))
            }
            None => Ok(PickOutcome::Cancelled),
        }
    }
}
