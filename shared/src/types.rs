//! Common types used across the platform

use serde::{Deserialize, Deserializer};

/// Surrogate identifier assigned by the record store
pub type RecordId = i64;

/// Wire format for calendar dates (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`:
/// - key missing: `None` (leave the stored value untouched)
/// - `null`: `Some(None)` (clear the stored value)
/// - value: `Some(Some(v))`
pub fn deserialize_patch<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a patch field to a nullable stored value
pub fn apply_patch<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct PatchHolder {
        #[serde(default, deserialize_with = "deserialize_patch")]
        value: Option<Option<i32>>,
    }

    #[test]
    fn test_absent_null_and_present_are_distinct() {
        let absent: PatchHolder = serde_json::from_str("{}").unwrap();
        let null: PatchHolder = serde_json::from_str(r#"{"value": null}"#).unwrap();
        let set: PatchHolder = serde_json::from_str(r#"{"value": 7}"#).unwrap();

        assert_eq!(absent.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some(7)));
    }

    #[test]
    fn test_apply_patch() {
        let mut stored = Some(3);
        apply_patch(&mut stored, None);
        assert_eq!(stored, Some(3));

        apply_patch(&mut stored, Some(Some(4)));
        assert_eq!(stored, Some(4));

        apply_patch(&mut stored, Some(None));
        assert_eq!(stored, None);
    }
}
