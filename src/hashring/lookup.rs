//! Predecessor and successor lookups.
//!
//! A key is hashed onto its anchor slot. The anchor itself is never returned: the nearest
//! occupied slot behind it is the predecessor, the nearest occupied slot in front of it is
//! the successor. Gaps are walked over, wrapping around the end of the ring.

#[cfg(feature = "derive")]
use serde::{Deserialize, Serialize};

use super::{KeyHasher, Slot, SlotRing};
use crate::error::{Error, Result};

/// Neighbors contains both nodes assigned to a key
///
/// * `anchor` - slot index the key hashed onto
/// * `predecessor` - nearest occupied slot before the anchor, `None` if the ring holds no node
/// * `successor` - nearest occupied slot after the anchor, `None` if the ring holds no node
///
/// A common assignment is predecessor as primary and successor as backup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "derive", derive(Serialize, Deserialize))]
pub struct Neighbors<T> {
    pub anchor: usize,
    pub predecessor: Option<T>,
    pub successor: Option<T>,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn step(self, index: usize, len: usize) -> usize {
        match self {
            Direction::Backward => (index + len - 1) % len,
            Direction::Forward => (index + 1) % len,
        }
    }
}

impl<T, S> SlotRing<T, S> {
    /// Slot index `key` hashes onto, i.e. the hasher output modulo [`SlotRing::len`].
    ///
    /// Returns [`Error::EmptyRing`] if the ring has no slots.
    pub fn anchor<K>(&self, key: &K) -> Result<usize>
    where
        K: ?Sized,
        S: KeyHasher<K>,
    {
        let len = self.slots.len();
        if len == 0 {
            return Err(Error::EmptyRing);
        }

        let hash = self.hash_builder.hash_key(key, len);

        // the remainder is below len, so it fits back into usize
        Ok((hash % len as u64) as usize)
    }

    /// Nearest node before the anchor slot of `key`.
    ///
    /// Returns `Ok(None)` if every slot is a gap and [`Error::EmptyRing`] if there are no slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_hashring::SlotRing;
    ///
    /// let mut ring = SlotRing::with_hasher(vec!["a", "b", "c", "d"], |key: &u64, _slots: usize| *key);
    /// assert_eq!(ring.predecessor(&3).unwrap(), Some(&"c"));
    ///
    /// ring.remove(&"c").unwrap();
    /// assert_eq!(ring.predecessor(&3).unwrap(), Some(&"b"));
    /// ```
    pub fn predecessor<K>(&self, key: &K) -> Result<Option<&T>>
    where
        K: ?Sized,
        S: KeyHasher<K>,
    {
        let anchor = self.anchor(key)?;
        Ok(self.walk(anchor, Direction::Backward))
    }

    /// Nearest node after the anchor slot of `key`.
    ///
    /// Returns `Ok(None)` if every slot is a gap and [`Error::EmptyRing`] if there are no slots.
    pub fn successor<K>(&self, key: &K) -> Result<Option<&T>>
    where
        K: ?Sized,
        S: KeyHasher<K>,
    {
        let anchor = self.anchor(key)?;
        Ok(self.walk(anchor, Direction::Forward))
    }

    /// Predecessor and successor of `key` computed from a single hash.
    pub fn neighbors<K>(&self, key: &K) -> Result<Neighbors<T>>
    where
        K: ?Sized,
        S: KeyHasher<K>,
        T: Clone,
    {
        let anchor = self.anchor(key)?;

        Ok(Neighbors {
            anchor,
            predecessor: self.walk(anchor, Direction::Backward).cloned(),
            successor: self.walk(anchor, Direction::Forward).cloned(),
        })
    }

    // visits every slot at most once, starting next to the anchor
    fn walk(&self, anchor: usize, direction: Direction) -> Option<&T> {
        let len = self.slots.len();
        let mut index = anchor;

        for walked in 0..len {
            index = direction.step(index, len);

            if let Slot::Occupied(node) = &self.slots[index] {
                if walked > 0 {
                    tracing::trace!(anchor, index, walked, ?direction, "walked over gaps");
                }
                return Some(node);
            }
        }

        None
    }
}
