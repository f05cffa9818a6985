//! A slot based consistent hash ring to route keys (session ids, request ids, shard ids) onto nodes
//! Each node occupies one slot, a key is anchored on slot `hash(key) % slots`
//! The nodes next to the anchor serve the key: the predecessor and the successor, e.g. as primary and backup
//!
//! Membership changes are applied in place:
//!     push: appends a slot, only keys bordering the new last slot move
//!     insert: fills the first gap (or appends), the slot count stays the same if a gap exists
//!     replace: swaps a node for another in the same slot, no key moves to a different slot
//!     remove: leaves a gap, lookups walk over it, only keys served by the removed node move
//!     compact: drops all gaps and renumbers the slots, meant for planned maintenance only
//!
//! The ring is not thread safe. Guard it with a lock if it is shared.
//!
//! ```
//! use slot_hashring::SlotRing;
//!
//! let mut ring = SlotRing::with_hasher(
//!     vec!["svc-1", "svc-2", "svc-3", "svc-4"],
//!     |session: &u32, _slots: usize| u64::from(*session),
//! );
//!
//! assert_eq!(ring.predecessor(&2).unwrap(), Some(&"svc-2"));
//! assert_eq!(ring.successor(&2).unwrap(), Some(&"svc-4"));
//!
//! ring.remove(&"svc-3").unwrap();
//! assert_eq!(ring.successor(&1).unwrap(), Some(&"svc-4"));
//! assert_eq!(ring.len(), 4);
//! ```

mod error;
mod hashring;

pub use error::{Error, Result};
pub use hashring::lookup::Neighbors;
pub use hashring::{DefaultHashBuilder, IntoNodes, KeyHasher, Nodes, Slot, SlotRing};
