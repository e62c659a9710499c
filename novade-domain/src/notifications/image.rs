//! Picks the visual of a notification out of its hints.
//!
//! Image sources are tried in a fixed order and the first key that is present
//! wins, even if its value turns out to be unusable:
//!
//! | order | key          | kind             |
//! |-------|--------------|------------------|
//! | 1     | `image_data` | inline raw image |
//! | 2     | `image-data` | inline raw image |
//! | 3     | `image_path` | file on disk     |
//! | 4     | `image-path` | file on disk     |
//! | 5     | `icon_data`  | inline raw image |
//!
//! Independently of that choice, a `desktop-entry` hint resolves the icon
//! declared by the sender's desktop file.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use super::errors::{NotificationError, NotificationResult};
use super::hints::{HintKey, HintValue, Hints, RawImageData};

/// Looks up application descriptors (desktop files) by identifier.
pub trait DesktopEntryLookup: Send + Sync {
    /// Icon name declared by the descriptor `desktop_entry`, or `None` if the
    /// descriptor is missing or declares no icon.
    fn icon_name(&self, desktop_entry: &str) -> Option<String>;
}

/// Lookup that knows no descriptors. Every `desktop-entry` hint then falls
/// back to the client's icon name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDesktopEntries;

impl DesktopEntryLookup for NoDesktopEntries {
    fn icon_name(&self, _desktop_entry: &str) -> Option<String> {
        None
    }
}

/// Visual attached to one live notification.
#[derive(Debug, Clone, Default)]
pub struct ImageBinding {
    /// Decoded bitmap, if an image hint produced one.
    pub image: Option<RgbaImage>,
    /// Icon name supplied by the client (`app_icon`).
    pub icon_name: String,
    /// Icon declared by the sender's desktop entry.
    pub desktop_entry_icon_name: Option<String>,
}

impl ImageBinding {
    pub fn has_visual(&self) -> bool {
        self.image.as_ref().map_or(false, |img| img.width() > 0 && img.height() > 0)
            || !self.icon_name.is_empty()
            || self.desktop_entry_icon_name.as_deref().map_or(false, |name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Inline,
    File,
}

const IMAGE_SOURCES: [(HintKey, SourceKind); 5] = [
    (HintKey::ImageData, SourceKind::Inline),
    (HintKey::ImageDataLegacy, SourceKind::Inline),
    (HintKey::ImagePath, SourceKind::File),
    (HintKey::ImagePathLegacy, SourceKind::File),
    (HintKey::IconData, SourceKind::Inline),
];

pub struct ImageResolver {
    desktop_entries: Arc<dyn DesktopEntryLookup>,
}

impl ImageResolver {
    pub fn new(desktop_entries: Arc<dyn DesktopEntryLookup>) -> Self {
        Self { desktop_entries }
    }

    /// Builds the binding for a request. Never fails: unusable hints leave the
    /// corresponding field empty.
    pub fn resolve(&self, hints: &Hints, fallback_icon_name: &str) -> ImageBinding {
        let image = IMAGE_SOURCES
            .iter()
            .find(|(key, _)| hints.contains(*key))
            .and_then(|&(key, kind)| {
                let decoded = match kind {
                    SourceKind::Inline => hints
                        .raw_image(key)
                        .ok_or_else(|| NotificationError::ImageDecode(format!("'{}' is not a raw image", key.as_str())))
                        .and_then(decode_raw_image),
                    SourceKind::File => match hints.path(key) {
                        Some(path) => load_image_file(&path),
                        None => Err(NotificationError::ImageDecode(format!("'{}' is not a path", key.as_str()))),
                    },
                };
                match decoded {
                    Ok(img) => {
                        tracing::debug!("Notification image taken from '{}' ({}x{})", key.as_str(), img.width(), img.height());
                        Some(img)
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring image hint '{}': {}", key.as_str(), e);
                        None
                    }
                }
            });

        let desktop_entry_icon_name = hints.desktop_entry().map(|entry| {
            self.desktop_entries
                .icon_name(entry)
                .unwrap_or_else(|| fallback_icon_name.to_string())
        });

        ImageBinding {
            image,
            icon_name: fallback_icon_name.to_string(),
            desktop_entry_icon_name,
        }
    }
}

fn to_usize(value: i32, field: &str) -> NotificationResult<usize> {
    usize::try_from(value).map_err(|_| NotificationError::ImageDecode(format!("negative {}: {}", field, value)))
}

/// Decodes a raw image argument into an RGBA bitmap.
///
/// Rows are `rowstride` bytes apart; bytes past `width * bytes_per_pixel` in a
/// row are padding and skipped. Only 8 bits per sample are supported, and the
/// channel count must match the alpha flag (4 with alpha, 3 without). The last
/// row may be shorter than `rowstride`.
pub fn decode_raw_image(raw: &RawImageData) -> NotificationResult<RgbaImage> {
    if raw.bits_per_sample != 8 {
        return Err(NotificationError::ImageDecode(format!(
            "unsupported bits per sample: {}",
            raw.bits_per_sample
        )));
    }
    let bytes_per_pixel: usize = if raw.has_alpha { 4 } else { 3 };
    if to_usize(raw.channels, "channel count")? != bytes_per_pixel {
        return Err(NotificationError::ImageDecode(format!(
            "{} channels do not match has_alpha={}",
            raw.channels, raw.has_alpha
        )));
    }

    let width = to_usize(raw.width, "width")?;
    let height = to_usize(raw.height, "height")?;
    let rowstride = to_usize(raw.rowstride, "rowstride")?;
    if width == 0 || height == 0 {
        return Err(NotificationError::ImageDecode(format!("empty image {}x{}", width, height)));
    }

    let row_len = width
        .checked_mul(bytes_per_pixel)
        .ok_or_else(|| NotificationError::ImageDecode("row length overflows".to_string()))?;
    if rowstride < row_len {
        return Err(NotificationError::ImageDecode(format!(
            "rowstride {} shorter than row length {}",
            rowstride, row_len
        )));
    }
    let required = rowstride
        .checked_mul(height - 1)
        .and_then(|n| n.checked_add(row_len))
        .ok_or_else(|| NotificationError::ImageDecode("image size overflows".to_string()))?;
    if raw.data.len() < required {
        return Err(NotificationError::ImageDecode(format!(
            "buffer holds {} bytes, {} needed",
            raw.data.len(),
            required
        )));
    }

    let mut pixels = Vec::with_capacity(width * height * 4);
    for row in raw.data.chunks(rowstride).take(height) {
        for px in row[..row_len].chunks_exact(bytes_per_pixel) {
            pixels.extend_from_slice(&px[..3]);
            pixels.push(if raw.has_alpha { px[3] } else { u8::MAX });
        }
    }

    RgbaImage::from_raw(raw.width as u32, raw.height as u32, pixels)
        .ok_or_else(|| NotificationError::ImageDecode("pixel buffer does not fit dimensions".to_string()))
}

/// Loads an image file of any supported format as RGBA.
pub fn load_image_file(path: &Path) -> NotificationResult<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| NotificationError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}
