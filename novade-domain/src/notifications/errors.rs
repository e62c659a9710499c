use std::path::PathBuf;
use thiserror::Error;

/// Failures inside the notification domain.
///
/// None of these reach a client: the broker logs them and substitutes an
/// empty value (no image, fallback icon) before continuing.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Malformed image hint: {0}")]
    ImageDecode(String),

    #[error("Failed to load notification image from {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type NotificationResult<T> = Result<T, NotificationError>;
