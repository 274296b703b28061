//! Core of the potato leaf detector: picking an image, uploading it to the
//! inference endpoint and tracking what the screen should show.

pub mod acquisition;
pub mod client;
pub mod config;
pub mod editing;
pub mod error;
pub mod prediction;
pub mod state;

pub use acquisition::{MediaPicker, Permission, PickOutcome, PickerOptions, pick_image};
pub use client::{HttpTransport, InFlight, Transport, UploadClient};
pub use config::ClientConfig;
pub use error::{AcquireError, ConfigError, Notice, PredictError};
pub use prediction::{ImageRef, PredictionResult};
pub use state::{PendingPrediction, Phase, Session, Ticket};
