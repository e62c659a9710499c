//! Typed view of the loosely-typed hint dictionary attached to a notification.
//!
//! The transport converts each wire value into a [`HintValue`]. Keys the
//! broker understands are enumerated by [`HintKey`]; everything else is kept
//! as-is and handed to the presentation layer untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use url::Url;

/// Structured raw image argument (`(iiibiiay)` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawImageData {
    pub width: i32,
    pub height: i32,
    pub rowstride: i32,
    pub has_alpha: bool,
    pub bits_per_sample: i32,
    pub channels: i32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HintValue {
    Bool(bool),
    Byte(u8),
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Image(RawImageData),
    /// Array of anything but bytes.
    List(Vec<HintValue>),
    /// Structure other than the raw image layout, fields in order.
    Struct(Vec<HintValue>),
    /// Dictionary entries, sorted by key.
    Dict(Vec<(HintValue, HintValue)>),
    /// A value with no representation here (file descriptors); only its type
    /// signature is kept.
    Unsupported { signature: String },
}

impl HintValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HintValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&RawImageData> {
        match self {
            HintValue::Image(raw) => Some(raw),
            _ => None,
        }
    }
}

/// Hint keys with a meaning to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKey {
    ImageData,
    /// Pre-1.1 spelling of `image_data`.
    ImageDataLegacy,
    ImagePath,
    ImagePathLegacy,
    /// Deprecated since protocol 1.1, still sent by older clients.
    IconData,
    DesktopEntry,
}

impl HintKey {
    pub const ALL: [HintKey; 6] = [
        HintKey::ImageData,
        HintKey::ImageDataLegacy,
        HintKey::ImagePath,
        HintKey::ImagePathLegacy,
        HintKey::IconData,
        HintKey::DesktopEntry,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            HintKey::ImageData => "image_data",
            HintKey::ImageDataLegacy => "image-data",
            HintKey::ImagePath => "image_path",
            HintKey::ImagePathLegacy => "image-path",
            HintKey::IconData => "icon_data",
            HintKey::DesktopEntry => "desktop-entry",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// Hint dictionary of one request, ordered by key.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Hints(BTreeMap<String, HintValue>);

impl Hints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: HintValue) -> Option<HintValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&HintValue> {
        self.0.get(key)
    }

    pub fn get_known(&self, key: HintKey) -> Option<&HintValue> {
        self.0.get(key.as_str())
    }

    pub fn contains(&self, key: HintKey) -> bool {
        self.0.contains_key(key.as_str())
    }

    /// Raw image carried by `key`, if the value has the image structure.
    pub fn raw_image(&self, key: HintKey) -> Option<&RawImageData> {
        self.get_known(key).and_then(HintValue::as_image)
    }

    /// Desktop-entry identifier of the sending application, if given as text.
    pub fn desktop_entry(&self) -> Option<&str> {
        self.get_known(HintKey::DesktopEntry).and_then(HintValue::as_text)
    }

    /// File path carried by `key`, accepting plain paths and `file://` URIs.
    /// URIs are percent-decoded; ones naming a remote host yield `None`.
    pub fn path(&self, key: HintKey) -> Option<PathBuf> {
        let value = self.get_known(key).and_then(HintValue::as_text)?;
        if !value.starts_with("file://") {
            return Some(PathBuf::from(value));
        }
        Url::parse(value).ok()?.to_file_path().ok()
    }

    /// Keys the broker does not interpret.
    pub fn unrecognized(&self) -> impl Iterator<Item = (&str, &HintValue)> {
        self.0
            .iter()
            .filter(|(k, _)| HintKey::from_key(k).is_none())
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HintValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, HintValue)> for Hints {
    fn from_iter<I: IntoIterator<Item = (K, HintValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
