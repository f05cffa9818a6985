use super::{Slot, SlotRing};
use crate::error::{Error, Result};

impl<T, S> SlotRing<T, S> {
    /// Append `node` in a new slot at the end of the ring and return its index.
    pub fn push(&mut self, node: T) -> usize {
        self.slots.push(Slot::Occupied(node));

        let index = self.slots.len() - 1;
        tracing::debug!(index, len = self.slots.len(), "appended node to ring");
        index
    }

    /// Put `node` into the first gap, or append it if there is none. Returns its index.
    ///
    /// Filling a gap keeps the slot count, so keys that do not border the gap keep their nodes.
    pub fn insert(&mut self, node: T) -> usize {
        match self.slots.iter().position(Slot::is_empty) {
            Some(index) => {
                self.slots[index] = Slot::Occupied(node);
                tracing::debug!(index, len = self.slots.len(), "filled gap in ring");
                index
            }
            None => self.push(node),
        }
    }

    /// Overwrite the slot holding `old` with `new`, keeping its index. Returns the displaced node.
    ///
    /// Returns [`Error::NotFound`] and leaves the ring unchanged if `old` is not in the ring.
    pub fn replace(&mut self, old: &T, new: T) -> Result<T>
    where
        T: PartialEq,
    {
        let index = self.find(old, "replace")?;
        let displaced = std::mem::replace(&mut self.slots[index], Slot::Occupied(new));

        tracing::debug!(index, "replaced node in ring");
        displaced.into_node().ok_or(Error::NotFound)
    }

    /// Remove `node` from the ring, leaving a gap so that no other slot moves.
    ///
    /// Returns [`Error::NotFound`] and leaves the ring unchanged if `node` is not in the ring.
    pub fn remove(&mut self, node: &T) -> Result<T>
    where
        T: PartialEq,
    {
        let index = self.find(node, "remove")?;
        let removed = self.slots[index].take().ok_or(Error::NotFound)?;

        tracing::debug!(index, gaps = self.gaps(), "removed node from ring");
        Ok(removed)
    }

    /// Drop all gaps, shrinking the ring to its occupied slots in their current order.
    ///
    /// Every slot after the first gap is renumbered, which remaps a large share of keys.
    /// Only call this during planned maintenance, never in reaction to a single removal.
    pub fn compact(&mut self) {
        let before = self.slots.len();
        self.slots.retain(Slot::is_occupied);

        if self.slots.len() != before {
            tracing::debug!(before, after = self.slots.len(), "compacted ring");
        }
    }

    fn find(&self, node: &T, op: &'static str) -> Result<usize>
    where
        T: PartialEq,
    {
        self.index_of(node).ok_or_else(|| {
            tracing::warn!(op, len = self.slots.len(), "node not found in ring");
            Error::NotFound
        })
    }
}

impl<T, S> Extend<T> for SlotRing<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, nodes: I) {
        for node in nodes {
            self.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::hash::Hash;
    use std::hash::Hasher;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::SlotRing;
    use crate::{Error, Slot};

    #[derive(Debug, Copy, Clone, PartialEq)]
    struct Node {
        addr: Ipv4Addr,
    }

    impl Node {
        fn new(ip: &str) -> Self {
            let addr = Ipv4Addr::from_str(ip).unwrap();
            Node { addr }
        }
    }

    impl Hash for Node {
        fn hash<H: Hasher>(&self, s: &mut H) {
            (self.addr).hash(s)
        }
    }

    fn identity(key: &u64, _slots: usize) -> u64 {
        *key
    }

    #[test]
    fn push_and_remove_nodes() {
        let mut ring: SlotRing<Node> = SlotRing::default();

        assert_eq!(ring.len(), 0);
        assert!(ring.is_empty());

        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");

        assert_eq!(ring.push(node1), 0);
        assert_eq!(ring.push(node2), 1);
        assert_eq!(ring.push(node3), 2);
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_empty());

        assert_eq!(ring.remove(&node2), Ok(node2));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.occupied_len(), 2);
        assert_eq!(ring.at(1), Ok(None));
        assert_eq!(ring.index_of(&node3), Some(2));
        assert_eq!(ring.nodes(), vec![node1, node3]);
    }

    #[test]
    fn remove_unknown_node_leaves_ring_unchanged() {
        let node1 = Node::new("127.0.0.1");
        let mut ring = SlotRing::new(vec![node1]);
        let before = ring.clone();

        assert_eq!(ring.remove(&Node::new("127.0.0.2")), Err(Error::NotFound));
        assert_eq!(ring, before);

        ring.remove(&node1).unwrap();
        assert_eq!(ring.remove(&node1), Err(Error::NotFound));
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn insert_fills_first_gap() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");
        let node4 = Node::new("127.0.0.4");
        let node5 = Node::new("127.0.0.5");

        let mut ring = SlotRing::new(vec![node1, node2, node3]);
        ring.remove(&node3).unwrap();
        ring.remove(&node2).unwrap();

        assert_eq!(ring.insert(node4), 1);
        assert_eq!(ring.insert(node5), 2);
        assert_eq!(ring.len(), 3);
        assert_eq!(
            ring.slots(),
            &[
                Slot::Occupied(node1),
                Slot::Occupied(node4),
                Slot::Occupied(node5)
            ]
        );
    }

    #[test]
    fn insert_without_gap_appends() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");

        let mut ring = SlotRing::new(vec![node1]);

        assert_eq!(ring.insert(node2), 1);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn replace_keeps_index() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");
        let node4 = Node::new("127.0.0.4");

        let mut ring = SlotRing::with_hasher(vec![node1, node2, node3], identity);
        let before = ring.clone();

        assert_eq!(ring.replace(&node2, node4), Ok(node2));
        assert_eq!(ring.index_of(&node4), Some(1));
        assert_eq!(ring.index_of(&node2), None);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.predecessor(&2), Ok(Some(&node4)));

        // and back again
        assert_eq!(ring.replace(&node4, node2), Ok(node4));
        assert_eq!(ring.slots(), before.slots());
    }

    #[test]
    fn replace_unknown_node_fails() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");

        let mut ring = SlotRing::new(vec![node1]);

        assert_eq!(ring.replace(&node2, node1), Err(Error::NotFound));
        assert_eq!(ring.nodes(), vec![node1]);
    }

    #[test]
    fn compact_drops_gaps_and_keeps_order() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");
        let node4 = Node::new("127.0.0.4");

        let mut ring = SlotRing::new(vec![node1, node2, node3, node4]);
        ring.remove(&node1).unwrap();
        ring.remove(&node3).unwrap();
        let nodes = ring.nodes();

        ring.compact();

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.len(), ring.occupied_len());
        assert_eq!(ring.nodes(), nodes);
        assert_eq!(ring.index_of(&node4), Some(1));

        ring.compact();
        assert_eq!(ring.nodes(), nodes);
    }

    #[test]
    fn compact_ring_of_gaps() {
        let node1 = Node::new("127.0.0.1");

        let mut ring = SlotRing::new(vec![node1]);
        ring.remove(&node1).unwrap();
        ring.compact();

        assert_eq!(ring.len(), 0);
        assert_eq!(ring.successor(&"key"), Err(Error::EmptyRing));
    }

    #[test]
    fn extend_appends_nodes() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");

        let mut ring = SlotRing::new(vec![node1, node2]);
        ring.remove(&node1).unwrap();
        ring.extend(vec![node3]);

        assert_eq!(ring.index_of(&node3), Some(2));
        assert_eq!(ring.gaps(), 1);
    }

    #[test]
    fn set_hasher_changes_anchors() {
        let node1 = Node::new("127.0.0.1");
        let node2 = Node::new("127.0.0.2");
        let node3 = Node::new("127.0.0.3");

        let hasher: fn(&u64, usize) -> u64 = identity;
        let mut ring = SlotRing::with_hasher(vec![node1, node2, node3], hasher);
        assert_eq!(ring.successor(&0), Ok(Some(&node2)));

        fn shifted(key: &u64, _slots: usize) -> u64 {
            key + 1
        }
        ring.set_hasher(shifted);

        assert_eq!(ring.successor(&0), Ok(Some(&node3)));
    }
}
