//! Form field descriptors and the ordered collections that hold them.
//!
//! A [`Field`] describes a single input. Fields are grouped into a
//! [`FieldGroup`] (rendered as a `<fieldset>`), and the profile form is an
//! ordered collection of groups. Both levels use [`KeyedList`] so that
//! insertion order is observable and a stable priority sort can preserve it
//! for ties.

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// Input type of a field.
///
/// Unknown type names are kept verbatim in [`FieldType::Other`] and left for
/// the renderer to handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Select,
    Textarea,
    Hidden,
    Other(String),
}

impl FieldType {
    /// The type name as it appears in configuration and JSON output.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Hidden => "hidden",
            FieldType::Other(name) => name,
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "select" => FieldType::Select,
            "textarea" => FieldType::Textarea,
            "hidden" => FieldType::Hidden,
            _ => FieldType::Other(s),
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        FieldType::from(s.to_string())
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single input descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Human-readable label.
    pub label: String,
    /// Input type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Display priority; lower sorts first.
    pub priority: i32,
    /// Whether the field must be non-empty on submission.
    #[serde(default)]
    pub required: bool,
    /// Current value, sourced from the donor record at render time.
    #[serde(default)]
    pub value: String,
    /// Enumerated options for select fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl Field {
    /// Create an optional field with an empty value.
    pub fn new(label: impl Into<String>, field_type: FieldType, priority: i32) -> Self {
        Self {
            label: label.into(),
            field_type,
            priority,
            required: false,
            value: String::new(),
            options: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }
}

/// Anything that carries a display priority.
pub trait Prioritized {
    fn priority(&self) -> i32;
}

impl Prioritized for Field {
    fn priority(&self) -> i32 {
        self.priority
    }
}

/// An ordered collection of values addressed by a stable string key.
///
/// Re-inserting an existing key replaces the value in place, keeping its
/// position. Serializes as a JSON array of `{ "key": ..., ...value }`
/// objects so the order survives the trip to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedList<T> {
    entries: Vec<(String, T)>,
}

impl<T> KeyedList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace `key`. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort by a key extracted from each value.
    ///
    /// Entries whose keys compare equal keep their relative order.
    pub fn sort_stable_by_key<K: Ord>(&mut self, mut f: impl FnMut(&T) -> K) {
        self.entries.sort_by_key(|(_, v)| f(v));
    }
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut list = KeyedList::new();
        for (k, v) in iter {
            list.insert(k, v);
        }
        list
    }
}

impl<T> IntoIterator for KeyedList<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for KeyedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a, T> {
            key: &'a str,
            #[serde(flatten)]
            value: &'a T,
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            seq.serialize_element(&Entry { key, value })?;
        }
        seq.end()
    }
}

/// Fields of one fieldset, keyed by field name.
pub type FieldSet = KeyedList<Field>;

/// A named fieldset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    /// Text of the `<legend>` element.
    pub legend: String,
    pub priority: i32,
    pub fields: FieldSet,
}

impl FieldGroup {
    pub fn new(legend: impl Into<String>, priority: i32, fields: FieldSet) -> Self {
        Self {
            legend: legend.into(),
            priority,
            fields,
        }
    }
}

impl Prioritized for FieldGroup {
    fn priority(&self) -> i32 {
        self.priority
    }
}

/// The complete profile form: fieldsets keyed by group name.
pub type ProfileFields = KeyedList<FieldGroup>;

/// The three built-in sections of the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    User,
    Address,
    Social,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 3] = [
        ProfileSection::User,
        ProfileSection::Address,
        ProfileSection::Social,
    ];

    /// Key of the section's group in [`ProfileFields`].
    pub fn group_key(&self) -> &'static str {
        match self {
            ProfileSection::User => "user_fields",
            ProfileSection::Address => "address_fields",
            ProfileSection::Social => "social_fields",
        }
    }

    pub fn legend(&self) -> &'static str {
        match self {
            ProfileSection::User => "Your Details",
            ProfileSection::Address => "Your Address",
            ProfileSection::Social => "Your Social Profiles",
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            ProfileSection::User => 0,
            ProfileSection::Address => 20,
            ProfileSection::Social => 40,
        }
    }
}

impl fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_from_str() {
        assert_eq!(FieldType::from("email"), FieldType::Email);
        assert_eq!(FieldType::from("select"), FieldType::Select);
        assert_eq!(
            FieldType::from("datepicker"),
            FieldType::Other("datepicker".to_string())
        );
    }

    #[test]
    fn test_unknown_field_type_passes_through_serde() {
        let json = r#"{"label":"Birthday","type":"datepicker","priority":3}"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Other("datepicker".to_string()));

        let out = serde_json::to_value(&field).unwrap();
        assert_eq!(out["type"], "datepicker");
        assert_eq!(out["required"], false);
        assert!(out.get("options").is_none());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut list = KeyedList::new()
            .with("a", 1)
            .with("b", 2)
            .with("c", 3);
        let old = list.insert("b", 20);
        assert_eq!(old, Some(2));
        assert_eq!(list.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(list.get("b"), Some(&20));
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut list: KeyedList<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(list.remove("b"), Some(2));
        assert_eq!(list.remove("missing"), None);
        assert_eq!(list.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_sort_stable_by_key_preserves_ties() {
        let mut list: KeyedList<i32> = [("a", 6), ("b", 2), ("c", 6)].into_iter().collect();
        list.sort_stable_by_key(|v| *v);
        assert_eq!(list.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_keyed_list_serializes_as_ordered_array() {
        let fields = FieldSet::new()
            .with("last_name", Field::new("Last name", FieldType::Text, 4))
            .with("first_name", Field::new("First name", FieldType::Text, 2).required());
        let json = serde_json::to_value(&fields).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["key"], "last_name");
        assert_eq!(arr[1]["key"], "first_name");
        assert_eq!(arr[1]["required"], true);
    }

    #[test]
    fn test_profile_section_metadata() {
        assert_eq!(ProfileSection::User.group_key(), "user_fields");
        assert_eq!(ProfileSection::Address.priority(), 20);
        assert_eq!(ProfileSection::Social.legend(), "Your Social Profiles");
        let parsed: ProfileSection = serde_json::from_str("\"address\"").unwrap();
        assert_eq!(parsed, ProfileSection::Address);
    }
}
