//! Keyed response sequences
//!
//! Response lists in the GO wire format are JSON arrays whose elements carry
//! a stable business key (`area`, `component`, `question`). The list is
//! really a map keyed by that id; array positions carry no meaning beyond
//! append order. [`KeyedSeq`] makes that explicit: an insertion-order
//! preserving map keyed by the business id that serializes as the wire
//! array and deserializes from one.
//!
//! Creating an absent entry goes through [`KeyedSeq::entry`], which builds
//! the element from [`Keyed::with_key`] with the key already set. The key
//! is written exactly once, at creation; later partial updates touch only
//! the payload fields.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// An element of a keyed response list.
pub trait Keyed {
    /// The business-key type (an id newtype).
    type Key: Copy + Eq + Hash;

    /// Returns this element's key.
    fn key(&self) -> Self::Key;

    /// Builds a default element with the key set and all payload fields
    /// empty.
    fn with_key(key: Self::Key) -> Self;
}

/// Insertion-order preserving map of keyed elements, serialized as a JSON
/// array.
///
/// Key uniqueness is structural: there is no way to hold two elements with
/// the same key. New entries append at the end; existing entries keep their
/// position when updated.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedSeq<T: Keyed> {
    inner: IndexMap<T::Key, T>,
}

impl<T: Keyed> KeyedSeq<T> {
    /// Creates an empty sequence
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Looks up an element by key.
    ///
    /// Returns `None` for a key that has never been written; a response
    /// exists only once something has been recorded against it.
    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.inner.get(&key)
    }

    /// Mutable lookup by key; does not create the element
    pub fn get_mut(&mut self, key: T::Key) -> Option<&mut T> {
        self.inner.get_mut(&key)
    }

    /// Whether an element with this key exists
    pub fn contains_key(&self, key: T::Key) -> bool {
        self.inner.contains_key(&key)
    }

    /// Looks up an element by array position (serialization order).
    ///
    /// Used when resolving positional server error paths back to keys.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.inner.get_index(index).map(|(_, v)| v)
    }

    /// Returns the element with this key, creating it at the end of the
    /// sequence from [`Keyed::with_key`] if absent.
    ///
    /// Writing through the returned reference twice for the same key
    /// updates one element; it never duplicates it.
    pub fn entry(&mut self, key: T::Key) -> &mut T {
        self.inner.entry(key).or_insert_with(|| T::with_key(key))
    }

    /// Applies a partial update to the element with this key, creating it
    /// if absent. The key field must not be changed by the update.
    pub fn merge(&mut self, key: T::Key, patch: impl FnOnce(&mut T)) {
        let element = self.entry(key);
        patch(element);
        debug_assert!(element.key() == key, "merge must not rewrite the key");
    }

    /// Inserts or replaces a whole element, keyed by its own key field.
    ///
    /// Replacing keeps the element's position; inserting appends. Returns
    /// the previous element when one was replaced.
    pub fn insert(&mut self, value: T) -> Option<T> {
        self.inner.insert(value.key(), value)
    }

    /// Removes the element with this key, preserving the order of the rest
    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        self.inner.shift_remove(&key)
    }

    /// Iterates elements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.values()
    }

    /// Iterates elements mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.inner.values_mut()
    }

    /// Iterates keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = T::Key> + '_ {
        self.inner.keys().copied()
    }
}

impl<T: Keyed> Default for KeyedSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        for value in iter {
            seq.insert(value);
        }
        seq
    }
}

impl<T: Keyed> IntoIterator for KeyedSeq<T> {
    type Item = T;
    type IntoIter = indexmap::map::IntoValues<T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedSeq<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.values()
    }
}

impl<T: Keyed + Serialize> Serialize for KeyedSeq<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.inner.values())
    }
}

impl<'de, T> Deserialize<'de> for KeyedSeq<T>
where
    T: Keyed + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeqVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T> Visitor<'de> for SeqVisitor<T>
        where
            T: Keyed + Deserialize<'de>,
        {
            type Value = KeyedSeq<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an array of keyed elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = KeyedSeq::new();
                while let Some(value) = seq.next_element::<T>()? {
                    // Last-wins on duplicate keys; the wire format promises
                    // uniqueness but the container must not amplify a
                    // server bug into duplicated state.
                    if out.insert(value).is_some() {
                        tracing::warn!("duplicate key in keyed sequence, keeping last element");
                    }
                }
                Ok(out)
            }
        }

        deserializer.deserialize_seq(SeqVisitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        value: Option<u32>,
    }

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn with_key(key: u32) -> Self {
            Item {
                id: key,
                value: None,
            }
        }
    }

    #[test]
    fn test_absent_key_lookup_is_none() {
        let seq: KeyedSeq<Item> = KeyedSeq::new();
        assert!(seq.get(1).is_none());
        assert!(seq.is_empty());
    }

    #[test]
    fn test_entry_creates_with_key_set() {
        let mut seq: KeyedSeq<Item> = KeyedSeq::new();
        let item = seq.entry(3);
        assert_eq!(item.id, 3);
        assert_eq!(item.value, None);
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_writing_same_key_twice_updates_one_element() {
        // Two writes against a key whose position was never learned must
        // not create two elements.
        let mut seq: KeyedSeq<Item> = KeyedSeq::new();
        seq.merge(5, |item| item.value = Some(1));
        seq.merge(5, |item| item.value = Some(2));

        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(5).unwrap().value, Some(2));
    }

    #[test]
    fn test_no_duplicate_keys_after_any_write_sequence() {
        let mut seq: KeyedSeq<Item> = KeyedSeq::new();
        for key in [4, 2, 4, 9, 2, 4] {
            seq.merge(key, |item| {
                item.value = Some(item.value.unwrap_or(0) + 1);
            });
        }

        let keys: Vec<u32> = seq.keys().collect();
        assert_eq!(keys, vec![4, 2, 9]);
        assert_eq!(seq.get(4).unwrap().value, Some(3));
    }

    #[test]
    fn test_new_entries_append_existing_keep_position() {
        let mut seq: KeyedSeq<Item> = KeyedSeq::new();
        seq.entry(1);
        seq.entry(2);
        seq.merge(1, |item| item.value = Some(9));
        seq.entry(3);

        let keys: Vec<u32> = seq.keys().collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(seq.get_index(0).unwrap().id, 1);
        assert_eq!(seq.get_index(2).unwrap().id, 3);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut seq: KeyedSeq<Item> = KeyedSeq::new();
        seq.merge(1, |item| item.value = Some(2));
        seq.entry(3);

        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"[{"id":1,"value":2},{"id":3,"value":null}]"#);
    }

    #[test]
    fn test_deserializes_from_array() {
        let seq: KeyedSeq<Item> =
            serde_json::from_str(r#"[{"id":1,"value":2},{"id":3,"value":4}]"#).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(3).unwrap().value, Some(4));
    }

    #[test]
    fn test_duplicate_wire_keys_last_wins() {
        let seq: KeyedSeq<Item> =
            serde_json::from_str(r#"[{"id":1,"value":2},{"id":1,"value":7}]"#).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(1).unwrap().value, Some(7));
    }
}
