use std::iter::FilterMap;

use super::{Slot, SlotRing};

/// Occupied nodes of a ring in slot order, gaps skipped.
pub struct Nodes<'a, T> {
    slots: std::slice::Iter<'a, Slot<T>>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(Slot::node)
    }
}

/// Owning variant of [`Nodes`].
pub struct IntoNodes<T> {
    slots: FilterMap<std::vec::IntoIter<Slot<T>>, fn(Slot<T>) -> Option<T>>,
}

impl<T> Iterator for IntoNodes<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next()
    }
}

impl<T, S> SlotRing<T, S> {
    pub fn iter(&self) -> Nodes<'_, T> {
        Nodes {
            slots: self.slots.iter(),
        }
    }
}

impl<T, S> IntoIterator for SlotRing<T, S> {
    type Item = T;

    type IntoIter = IntoNodes<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoNodes {
            slots: self.slots.into_iter().filter_map(Slot::into_node as fn(Slot<T>) -> Option<T>),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a SlotRing<T, S> {
    type Item = &'a T;

    type IntoIter = Nodes<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
