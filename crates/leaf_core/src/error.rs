use thiserror::Error;

const NO_RESPONSE_HINT: &str = "No response from server.\n\nCheck:\n• Is the API running?\n• Same network?\n• Correct address?";

/// Modal text shown to the user for a failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Outcome of an image pick that did not yield an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("image selection cancelled")]
    Cancelled,
    #[error("media library permission denied")]
    PermissionDenied,
    #[error("unsupported image format: {}", extension.as_deref().unwrap_or("<none>"))]
    InvalidFormat { extension: Option<String> },
    #[error("image selection failed: {0}")]
    Failed(String),
}

impl AcquireError {
    /// Notice to surface, or `None` for the silent outcomes.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AcquireError::Cancelled => None,
            AcquireError::PermissionDenied => Some(Notice::new(
                "Permission Denied",
                "We need permission to access your images to select one.",
            )),
            AcquireError::InvalidFormat { .. } => Some(Notice::new(
                "Invalid Format",
                "Please select a JPG or PNG image.",
            )),
            AcquireError::Failed(_) => Some(Notice::new(
                "Error",
                "Failed to select image. Please try again.",
            )),
        }
    }
}

/// Missing preconditions for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no image selected")]
    NoImage,
    #[error("inference endpoint is not configured")]
    MissingEndpoint,
    #[error("inference endpoint is not a valid URL: {0}")]
    InvalidEndpoint(String),
}

impl ConfigError {
    pub fn notice(&self) -> Notice {
        match self {
            ConfigError::NoImage => {
                Notice::new("No Image", "Please select a potato leaf image first.")
            }
            ConfigError::MissingEndpoint => Notice::new(
                "Configuration Error",
                "API URL is not configured. Please set LEAF_API_URL in your environment or .env file.",
            ),
            ConfigError::InvalidEndpoint(url) => Notice::new(
                "Configuration Error",
                format!("API URL \"{url}\" is not a valid URL. Please check your setup."),
            ),
        }
    }
}

/// Classified failure of a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The request went out but no response came back.
    #[error("no response from server: {0}")]
    Network(String),
    #[error("server responded with status {status}")]
    Server { status: u16, body: String },
    #[error("prediction failed: {0}")]
    Unknown(String),
    /// Another request is still in flight.
    #[error("a prediction is already in flight")]
    Busy,
}

impl PredictError {
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        const TITLE: &str = "Prediction Failed";
        match self {
            PredictError::Config(err) => Some(err.notice()),
            PredictError::Network(_) => Some(Notice::new(TITLE, NO_RESPONSE_HINT)),
            PredictError::Server { status, .. } => {
                Some(Notice::new(TITLE, format!("Server error: {status}")))
            }
            PredictError::Unknown(msg) => Some(Notice::new(TITLE, msg.clone())),
            PredictError::Busy => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_silent() {
        assert_eq!(AcquireError::Cancelled.notice(), None);
        assert_eq!(PredictError::Busy.notice(), None);
    }

    #[test]
    fn notices_carry_expected_titles() {
        let titles: Vec<String> = [
            AcquireError::PermissionDenied.notice(),
            AcquireError::InvalidFormat {
                extension: Some("gif".into()),
            }
            .notice(),
            AcquireError::Failed("boom".into()).notice(),
            PredictError::from(ConfigError::NoImage).notice(),
            PredictError::from(ConfigError::MissingEndpoint).notice(),
            PredictError::Network("timed out".into()).notice(),
        ]
        .into_iter()
        .map(|n| n.unwrap().title)
        .collect();

        assert_eq!(
            titles,
            vec![
                "Permission Denied",
                "Invalid Format",
                "Error",
                "No Image",
                "Configuration Error",
                "Prediction Failed",
            ]
        );
    }

    #[test]
    fn server_error_message_includes_status() {
        let err = PredictError::Server {
            status: 500,
            body: "{\"detail\":\"boom\"}".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.notice().unwrap().message, "Server error: 500");
    }

    #[test]
    fn invalid_format_display_names_extension() {
        let none = AcquireError::InvalidFormat { extension: None };
        assert_eq!(none.to_string(), "unsupported image format: <none>");
        let gif = AcquireError::InvalidFormat {
            extension: Some("gif".into()),
        };
        assert_eq!(gif.to_string(), "unsupported image format: gif");
    }
}
