//! Small adapters over in-memory collections.
//!
//! The [`Collection`] trait gives Vec, VecDeque, slices, arrays, HashSet and
//! BTreeSet one shape so the helpers below can accept any of them. The
//! conversions borrow when the input already has the requested shape and
//! only copy otherwise, which is what the [`Cow`] return types express.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectionError {
    /// An element has no value for the requested sort property.
    #[error("element {index} has no property `{name}`")]
    UnknownProperty { name: String, index: usize },
}

/// Uniform read access to a collection.
pub trait Collection {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in iteration order.
    fn items(&self) -> Box<dyn Iterator<Item = &Self::Item> + '_>;

    /// The elements as one contiguous ordered slice, when stored that way.
    fn as_ordered(&self) -> Option<&[Self::Item]> {
        None
    }

    /// The collection itself, when it already is a `HashSet`.
    fn as_hash_set(&self) -> Option<&HashSet<Self::Item>> {
        None
    }
}

impl<T> Collection for [T] {
    type Item = T;
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn as_ordered(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<T, const N: usize> Collection for [T; N] {
    type Item = T;
    fn len(&self) -> usize {
        N
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn as_ordered(&self) -> Option<&[T]> {
        Some(self.as_slice())
    }
}

impl<T> Collection for Vec<T> {
    type Item = T;
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn as_ordered(&self) -> Option<&[T]> {
        Some(self.as_slice())
    }
}

impl<T> Collection for VecDeque<T> {
    type Item = T;
    fn len(&self) -> usize {
        VecDeque::len(self)
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    // Only borrowable while the ring buffer has not wrapped.
    fn as_ordered(&self) -> Option<&[T]> {
        match self.as_slices() {
            (front, []) => Some(front),
            _ => None,
        }
    }
}

impl<T> Collection for HashSet<T> {
    type Item = T;
    fn len(&self) -> usize {
        HashSet::len(self)
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn as_hash_set(&self) -> Option<&HashSet<T>> {
        Some(self)
    }
}

impl<T> Collection for BTreeSet<T> {
    type Item = T;
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
}

/// True when `collection` is absent or has no elements.
pub fn is_empty<C: Collection + ?Sized>(collection: Option<&C>) -> bool {
    collection.map_or(true, |c| c.is_empty())
}

pub fn is_not_empty<C: Collection + ?Sized>(collection: Option<&C>) -> bool {
    !is_empty(collection)
}

/// View `collection` as an ordered sequence.
///
/// Contiguous ordered collections are borrowed as-is; anything else is
/// copied into a new `Vec` in iteration order.
pub fn to_list<C>(collection: &C) -> Cow<'_, [C::Item]>
where
    C: Collection + ?Sized,
    C::Item: Clone,
{
    match collection.as_ordered() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(collection.items().cloned().collect()),
    }
}

/// View `collection` as a `HashSet`, deduplicating when a copy is needed.
pub fn to_set<C>(collection: &C) -> Cow<'_, HashSet<C::Item>>
where
    C: Collection + ?Sized,
    C::Item: Clone + Eq + Hash,
{
    match collection.as_hash_set() {
        Some(set) => Cow::Borrowed(set),
        None => Cow::Owned(collection.items().cloned().collect()),
    }
}

/// Exactly the elements of `collection`, in iteration order, in a
/// fixed-size boxed slice.
pub fn to_array<C>(collection: &C) -> Box<[C::Item]>
where
    C: Collection + ?Sized,
    C::Item: Clone,
{
    collection.items().cloned().collect()
}

/// A sortable value extracted from an element by property name.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            PropertyValue::Bool(_) => 0,
            PropertyValue::Int(_) | PropertyValue::Float(_) => 1,
            PropertyValue::Text(_) => 2,
        }
    }

    /// Total order: numbers compare by value (floats via `total_cmp`),
    /// otherwise values of different kinds order as bool < number < text.
    pub fn compare(&self, other: &Self) -> Ordering {
        use PropertyValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

/// Name-to-value lookup used by [`sort_by_property`].
pub trait PropertyAccess {
    fn property(&self, name: &str) -> Option<PropertyValue>;
}

impl PropertyAccess for HashMap<String, PropertyValue> {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        self.get(name).cloned()
    }
}

impl PropertyAccess for BTreeMap<String, PropertyValue> {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        self.get(name).cloned()
    }
}

/// Stable in-place sort of `items` by the value of property `name`.
///
/// Every element must expose the property; otherwise the first offending
/// index is reported and `items` is left as it was.
pub fn sort_by_property<T: PropertyAccess>(
    items: &mut Vec<T>,
    name: &str,
    ascending: bool,
) -> Result<(), CollectionError> {
    let keys = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.property(name).ok_or_else(|| CollectionError::UnknownProperty {
                name: name.to_string(),
                index,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut keyed: Vec<(PropertyValue, T)> = keys.into_iter().zip(items.drain(..)).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    items.extend(keyed.into_iter().map(|(_, item)| item));
    Ok(())
}

pub fn sort_by_property_asc<T: PropertyAccess>(
    items: &mut Vec<T>,
    name: &str,
) -> Result<(), CollectionError> {
    sort_by_property(items, name, true)
}

pub fn sort_by_property_desc<T: PropertyAccess>(
    items: &mut Vec<T>,
    name: &str,
) -> Result<(), CollectionError> {
    sort_by_property(items, name, false)
}
