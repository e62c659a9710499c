// novade-system/src/dbus_interfaces/hints.rs

//! Conversion of the `a{sv}` hint dictionary into domain [`Hints`].

use std::collections::HashMap;
use std::hash::Hash;

use novade_domain::notifications::{HintValue, Hints, RawImageData};
use zbus::zvariant::{self, Array, Basic, Dict, Structure, Value};

/// Signature of the raw image structure used by `image-data` and friends.
pub const RAW_IMAGE_SIGNATURE: &str = "(iiibiiay)";

pub fn hints_from_dbus(hints: &HashMap<String, Value<'_>>) -> Hints {
    hints
        .iter()
        .map(|(key, value)| (key.as_str(), hint_from_value(value)))
        .collect()
}

/// Maps a single variant onto a [`HintValue`], recursing into containers.
/// Variants nested inside variants are unwrapped.
pub fn hint_from_value(value: &Value<'_>) -> HintValue {
    match value {
        Value::Value(inner) => hint_from_value(inner),
        Value::Bool(b) => HintValue::Bool(*b),
        Value::U8(b) => HintValue::Byte(*b),
        Value::I16(n) => HintValue::Int(i64::from(*n)),
        Value::I32(n) => HintValue::Int(i64::from(*n)),
        Value::I64(n) => HintValue::Int(*n),
        Value::U16(n) => HintValue::UInt(u64::from(*n)),
        Value::U32(n) => HintValue::UInt(u64::from(*n)),
        Value::U64(n) => HintValue::UInt(*n),
        Value::F64(f) => HintValue::Double(*f),
        Value::Str(s) => HintValue::Text(s.to_string()),
        Value::ObjectPath(p) => HintValue::Text(p.to_string()),
        Value::Signature(sig) => HintValue::Text(sig.to_string()),
        Value::Array(array) => match bytes_from_array(array) {
            Some(bytes) => HintValue::Bytes(bytes),
            None => HintValue::List(array.get().iter().map(hint_from_value).collect()),
        },
        Value::Structure(structure) => match raw_image_from_structure(structure) {
            Some(raw) => HintValue::Image(raw),
            None => HintValue::Struct(structure.fields().iter().map(hint_from_value).collect()),
        },
        Value::Dict(dict) => dict_from_value(dict).map(HintValue::Dict).unwrap_or_else(|| unsupported(value)),
        _ => unsupported(value),
    }
}

fn dict_from_value<'a>(dict: &Dict<'a, 'a>) -> Option<Vec<(HintValue, HintValue)>> {
    let signature = dict.full_signature().to_string();
    let key_type = signature.strip_prefix("a{").and_then(|rest| rest.chars().next())?;
    match key_type {
        's' => dict_entries::<String>(dict),
        'b' => dict_entries::<bool>(dict),
        'y' => dict_entries::<u8>(dict),
        'n' => dict_entries::<i16>(dict),
        'q' => dict_entries::<u16>(dict),
        'i' => dict_entries::<i32>(dict),
        'u' => dict_entries::<u32>(dict),
        'x' => dict_entries::<i64>(dict),
        't' => dict_entries::<u64>(dict),
        _ => None,
    }
}

/// Entries of a dictionary whose keys are `K`, sorted by key.
fn dict_entries<'a, K>(dict: &Dict<'a, 'a>) -> Option<Vec<(HintValue, HintValue)>>
where
    K: Basic + TryFrom<Value<'a>> + Into<Value<'static>> + Hash + Ord,
    K::Error: Into<zvariant::Error>,
{
    let map: HashMap<K, Value<'a>> = HashMap::try_from(dict.clone()).ok()?;
    let mut entries: Vec<(K, Value<'a>)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Some(
        entries
            .into_iter()
            .map(|(key, value)| {
                let key: Value<'static> = key.into();
                (hint_from_value(&key), hint_from_value(&value))
            })
            .collect(),
    )
}

fn unsupported(value: &Value<'_>) -> HintValue {
    let signature = value.value_signature().to_string();
    tracing::debug!("Hint value of type '{}' kept as unsupported", signature);
    HintValue::Unsupported { signature }
}

fn bytes_from_array(array: &Array<'_>) -> Option<Vec<u8>> {
    if array.element_signature().as_str() != "y" {
        return None;
    }
    array
        .get()
        .iter()
        .map(|v| match v {
            Value::U8(b) => Some(*b),
            _ => None,
        })
        .collect()
}

fn raw_image_from_structure(structure: &Structure<'_>) -> Option<RawImageData> {
    match structure.fields() {
        [Value::I32(width), Value::I32(height), Value::I32(rowstride), Value::Bool(has_alpha), Value::I32(bits_per_sample), Value::I32(channels), Value::Array(data)] => {
            Some(RawImageData {
                width: *width,
                height: *height,
                rowstride: *rowstride,
                has_alpha: *has_alpha,
                bits_per_sample: *bits_per_sample,
                channels: *channels,
                data: bytes_from_array(data)?,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars_map_to_matching_variants() {
        assert_eq!(hint_from_value(&Value::from(true)), HintValue::Bool(true));
        assert_eq!(hint_from_value(&Value::from(2u8)), HintValue::Byte(2));
        assert_eq!(hint_from_value(&Value::from(-7i32)), HintValue::Int(-7));
        assert_eq!(hint_from_value(&Value::from(9u32)), HintValue::UInt(9));
        assert_eq!(hint_from_value(&Value::from(0.5f64)), HintValue::Double(0.5));
        assert_eq!(
            hint_from_value(&Value::from("im.message")),
            HintValue::Text("im.message".to_string())
        );
    }

    #[test]
    fn nested_variant_is_unwrapped() {
        let nested = Value::Value(Box::new(Value::from("x-nova")));
        assert_eq!(hint_from_value(&nested), HintValue::Text("x-nova".to_string()));
    }

    #[test]
    fn image_structure_becomes_raw_image() {
        let value = Value::from((2i32, 1i32, 8i32, false, 8i32, 3i32, vec![1u8, 2, 3, 4, 5, 6, 0, 0]));
        assert_eq!(value.value_signature().as_str(), RAW_IMAGE_SIGNATURE);
        assert_eq!(
            hint_from_value(&value),
            HintValue::Image(RawImageData {
                width: 2,
                height: 1,
                rowstride: 8,
                has_alpha: false,
                bits_per_sample: 8,
                channels: 3,
                data: vec![1, 2, 3, 4, 5, 6, 0, 0],
            })
        );
    }

    #[test]
    fn byte_array_becomes_bytes() {
        assert_eq!(
            hint_from_value(&Value::from(vec![7u8, 8, 9])),
            HintValue::Bytes(vec![7, 8, 9])
        );
    }

    #[test]
    fn containers_keep_their_contents() {
        assert_eq!(
            hint_from_value(&Value::from(vec!["a", "b"])),
            HintValue::List(vec![HintValue::Text("a".into()), HintValue::Text("b".into())])
        );
        assert_eq!(
            hint_from_value(&Value::from((1i32, "two"))),
            HintValue::Struct(vec![HintValue::Int(1), HintValue::Text("two".into())])
        );
    }

    #[test]
    fn dictionaries_are_converted_recursively_and_sorted() {
        let mut inner: HashMap<String, Value<'_>> = HashMap::new();
        inner.insert("volume".to_string(), Value::from(7u32));
        inner.insert("muted".to_string(), Value::from(false));
        inner.insert("tags".to_string(), Value::from(vec!["x"]));
        assert_eq!(
            hint_from_value(&Value::from(inner)),
            HintValue::Dict(vec![
                (HintValue::Text("muted".into()), HintValue::Bool(false)),
                (HintValue::Text("tags".into()), HintValue::List(vec![HintValue::Text("x".into())])),
                (HintValue::Text("volume".into()), HintValue::UInt(7)),
            ])
        );

        let mut numbered: HashMap<u32, &str> = HashMap::new();
        numbered.insert(2, "b");
        numbered.insert(1, "a");
        assert_eq!(
            hint_from_value(&Value::from(numbered)),
            HintValue::Dict(vec![
                (HintValue::UInt(1), HintValue::Text("a".into())),
                (HintValue::UInt(2), HintValue::Text("b".into())),
            ])
        );
    }

    #[test]
    fn dictionary_keeps_every_key() {
        let mut raw = HashMap::new();
        raw.insert("urgency".to_string(), Value::from(1u8));
        raw.insert("desktop-entry".to_string(), Value::from("firefox"));
        let hints = hints_from_dbus(&raw);
        assert_eq!(hints.len(), 2);
        assert_eq!(hints.desktop_entry(), Some("firefox"));
        assert_eq!(hints.get("urgency"), Some(&HintValue::Byte(1)));
    }
}
