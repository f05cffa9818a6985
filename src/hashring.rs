extern crate siphasher;

use siphasher::sip::SipHasher;
use std::hash::{BuildHasher, Hash};

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod crud;
mod iterator;
pub mod lookup;

pub use iterator::{IntoNodes, Nodes};

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DefaultHashBuilder;

impl BuildHasher for DefaultHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

/// Maps a key onto an anchor value. The ring reduces the result modulo its slot count.
///
/// `slots` is the current slot count (gaps included), so implementations can
/// spread keys with knowledge of the ring size. Any `Fn(&K, usize) -> u64` is a `KeyHasher`.
///
/// # Examples
///
/// ```
/// use slot_hashring::{KeyHasher, SlotRing};
///
/// let identity = |key: &u64, _slots: usize| *key;
/// assert_eq!(identity.hash_key(&7, 4), 7);
///
/// let ring = SlotRing::with_hasher(vec!["a", "b", "c"], identity);
/// assert_eq!(ring.successor(&0).unwrap(), Some(&"b"));
/// ```
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K, slots: usize) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K, usize) -> u64,
{
    fn hash_key(&self, key: &K, slots: usize) -> u64 {
        self(key, slots)
    }
}

// SipHash of the key alone, the slot count does not take part
impl<K> KeyHasher<K> for DefaultHashBuilder
where
    K: Hash + ?Sized,
{
    fn hash_key(&self, key: &K, _slots: usize) -> u64 {
        self.hash_one(key)
    }
}

/// One addressable position of a [`SlotRing`].
///
/// Removing a node leaves an `Empty` slot behind instead of shifting its neighbours,
/// which keeps the index of every other slot stable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub enum Slot<T> {
    Occupied(T),
    Empty,
}

impl<T> Slot<T> {
    pub fn node(&self) -> Option<&T> {
        match self {
            Slot::Occupied(node) => Some(node),
            Slot::Empty => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn is_empty(&self) -> bool {
        !self.is_occupied()
    }

    /// Takes the node out, leaving a gap.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Slot::Empty) {
            Slot::Occupied(node) => Some(node),
            Slot::Empty => None,
        }
    }

    pub fn into_node(self) -> Option<T> {
        match self {
            Slot::Occupied(node) => Some(node),
            Slot::Empty => None,
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(node: Option<T>) -> Self {
        match node {
            Some(node) => Slot::Occupied(node),
            None => Slot::Empty,
        }
    }
}

/// SlotRing routes keys onto a small, slowly changing set of nodes (e.g. service endpoints)
/// SlotRing holds one slot per node, addressed directly by `hash(key) % len()`
/// SlotRing answers with the nearest occupied neighbours of that anchor slot, see [`SlotRing::predecessor`] and [`SlotRing::successor`]
/// SlotRing leaves gaps on removal, so only keys whose walk crosses the vacated slot change their answer
///
/// The ring does no locking. Share it between threads behind a lock of your choice.
#[derive(Clone, PartialEq, Debug)]
pub struct SlotRing<T, S = DefaultHashBuilder> {
    hash_builder: S,
    slots: Vec<Slot<T>>,
}

impl<T> Default for SlotRing<T> {
    fn default() -> Self {
        SlotRing {
            hash_builder: DefaultHashBuilder,
            slots: Vec::new(),
        }
    }
}

/// Slot Ring
///
/// Constructors using the SipHash based [`DefaultHashBuilder`].
impl<T> SlotRing<T> {
    /// Create a `SlotRing` with one slot per node, in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_hashring::SlotRing;
    ///
    /// let ring = SlotRing::new(vec!["10.0.0.1", "10.0.0.2"]);
    /// assert_eq!(ring.len(), 2);
    /// assert_eq!(ring.index_of(&"10.0.0.2"), Some(1));
    /// ```
    pub fn new<I>(nodes: I) -> SlotRing<T>
    where
        I: IntoIterator<Item = T>,
    {
        SlotRing::with_hasher(nodes, DefaultHashBuilder)
    }

    /// Create a `SlotRing` from possibly absent nodes. `None` entries are skipped and
    /// do not produce a slot.
    pub fn from_options<I>(nodes: I) -> SlotRing<T>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        SlotRing::new(nodes.into_iter().flatten())
    }

    /// Create a ring holding exactly one node.
    pub fn single(node: T) -> SlotRing<T> {
        SlotRing::new(std::iter::once(node))
    }

    /// Create an empty ring with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> SlotRing<T> {
        SlotRing {
            hash_builder: DefaultHashBuilder,
            slots: Vec::with_capacity(capacity),
        }
    }
}

impl<T, S> SlotRing<T, S> {
    /// Creates a `SlotRing` over `nodes` which will anchor keys with the given hasher.
    ///
    /// # Arguments
    ///
    /// * `nodes` - one slot is created per node, in iteration order
    /// * `hash_builder` - a [`KeyHasher`], e.g. a closure `|key: &K, slots: usize| -> u64`
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_hashring::SlotRing;
    ///
    /// // session ids are spread evenly already, use them as anchors directly
    /// let ring = SlotRing::with_hasher(vec!["a", "b", "c", "d"], |id: &u32, _slots: usize| u64::from(*id));
    ///
    /// assert_eq!(ring.predecessor(&2).unwrap(), Some(&"b"));
    /// assert_eq!(ring.successor(&2).unwrap(), Some(&"d"));
    /// ```
    pub fn with_hasher<I>(nodes: I, hash_builder: S) -> SlotRing<T, S>
    where
        I: IntoIterator<Item = T>,
    {
        SlotRing {
            hash_builder,
            slots: nodes.into_iter().map(Slot::Occupied).collect(),
        }
    }

    /// Get the number of slots in the ring, gaps included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Get the number of slots holding a node.
    pub fn occupied_len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Get the number of empty slots left behind by removals.
    pub fn gaps(&self) -> usize {
        self.len() - self.occupied_len()
    }

    /// Returns true if the ring has no slots or only empty ones.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    /// All slots in addressing order, gaps included.
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot<T>> {
        self.slots.get(index)
    }

    /// Snapshot of the occupied nodes in slot order.
    pub fn nodes(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Position of the first slot holding a node equal to `node`. Linear in the slot count.
    pub fn index_of(&self, node: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.slots.iter().position(|slot| slot.node() == Some(node))
    }

    /// Node stored at `index`.
    ///
    /// Returns `Ok(None)` for a gap and [`Error::OutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<Option<&T>> {
        match self.slots.get(index) {
            Some(slot) => Ok(slot.node()),
            None => {
                tracing::warn!(index, len = self.len(), "slot index out of range");
                Err(Error::OutOfRange {
                    index,
                    len: self.len(),
                })
            }
        }
    }

    /// Node stored at `index`, `None` for gaps and invalid indices alike.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Slot::node)
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Replace the key hasher used by all following lookups.
    pub fn set_hasher(&mut self, hash_builder: S) {
        self.hash_builder = hash_builder;
    }

    /// Move the slots into a ring using another kind of key hasher. Slot indices are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_hashring::SlotRing;
    ///
    /// let ring = SlotRing::new(vec!["a", "b", "c"]).with_key_hasher(|key: &u64, _slots: usize| *key);
    /// assert_eq!(ring.successor(&2).unwrap(), Some(&"a"));
    /// ```
    pub fn with_key_hasher<H>(self, hash_builder: H) -> SlotRing<T, H> {
        SlotRing {
            hash_builder,
            slots: self.slots,
        }
    }
}

impl<T> FromIterator<T> for SlotRing<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SlotRing::new(iter)
    }
}

impl<T> From<Vec<T>> for SlotRing<T> {
    fn from(nodes: Vec<T>) -> Self {
        SlotRing::new(nodes)
    }
}
