//! `Hold` — the set of parcels a carrier currently owns.

use rustc_hash::FxHashSet;

use rd_core::ParcelId;

/// Insertion-ordered set of parcel IDs.
///
/// Order matters to drivers (they deliver in manifest order), membership
/// tests matter to the transfer protocol, so both a `Vec` and a hash set are
/// kept in sync.
#[derive(Clone, Debug, Default)]
pub struct Hold {
    order:   Vec<ParcelId>,
    members: FxHashSet<ParcelId>,
}

impl Hold {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, parcel: ParcelId) -> bool {
        self.members.contains(&parcel)
    }

    /// Add `parcel`.  Returns `false` (and changes nothing) if it was
    /// already present.
    pub fn insert(&mut self, parcel: ParcelId) -> bool {
        if !self.members.insert(parcel) {
            return false;
        }
        self.order.push(parcel);
        true
    }

    /// Remove `parcel`.  Returns `true` if it was present.
    pub fn remove(&mut self, parcel: ParcelId) -> bool {
        if !self.members.remove(&parcel) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&p| p == parcel) {
            self.order.remove(pos);
        }
        true
    }

    /// Remove every listed parcel that is present.  Returns `true` if the
    /// hold changed.
    pub fn remove_many(&mut self, parcels: &[ParcelId]) -> bool {
        let before = self.members.len();
        for p in parcels {
            self.members.remove(p);
        }
        if self.members.len() == before {
            return false;
        }
        let members = &self.members;
        self.order.retain(|p| members.contains(p));
        true
    }

    /// Parcels in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[ParcelId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = ParcelId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
