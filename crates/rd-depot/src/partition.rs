//! Round partitioning — grouping a parcel backlog into manifests.
//!
//! The depot does not care how manifests are formed; it only needs an ordered
//! list of parcel groups.  Two partitioners ship with the crate:
//!
//! | Partitioner               | Grouping                                         |
//! |---------------------------|--------------------------------------------------|
//! | [`ChunkPartitioner`]      | Backlog order, split into balanced chunks        |
//! | [`NearestPointPartitioner`] | By nearest delivery point, then balanced chunks |

use rstar::RTree;
use rstar::primitives::GeomWithData;

use rd_core::{ParcelId, Point};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Groups parcels into manifests of roughly `approx_manifest_size`.
///
/// # Contract
///
/// - Every input parcel appears in exactly one output manifest.
/// - Output order is the dispatch order.
/// - Must be deterministic for identical inputs.
pub trait RoundPartitioner: Send + Sync {
    fn partition(
        &self,
        parcels:              &[(ParcelId, Point)],
        delivery_points:      &[Point],
        approx_manifest_size: usize,
    ) -> Vec<Vec<ParcelId>>;
}

/// A partitioner bundled with its inputs, as a depot needs it.
pub struct RoundPlanner {
    pub partitioner:          Box<dyn RoundPartitioner>,
    pub delivery_points:      Vec<Point>,
    pub approx_manifest_size: usize,
}

impl RoundPlanner {
    pub fn new(
        partitioner:          impl RoundPartitioner + 'static,
        delivery_points:      Vec<Point>,
        approx_manifest_size: usize,
    ) -> Self {
        Self {
            partitioner: Box::new(partitioner),
            delivery_points,
            approx_manifest_size,
        }
    }

    pub fn plan(&self, parcels: &[(ParcelId, Point)]) -> Vec<Vec<ParcelId>> {
        self.partitioner
            .partition(parcels, &self.delivery_points, self.approx_manifest_size)
    }
}

impl std::fmt::Debug for RoundPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundPlanner")
            .field("delivery_points", &self.delivery_points.len())
            .field("approx_manifest_size", &self.approx_manifest_size)
            .finish()
    }
}

// ── Chunk ─────────────────────────────────────────────────────────────────────

/// Splits the backlog, in order, into balanced manifests.  Ignores delivery
/// points.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChunkPartitioner;

impl RoundPartitioner for ChunkPartitioner {
    fn partition(
        &self,
        parcels:              &[(ParcelId, Point)],
        _delivery_points:     &[Point],
        approx_manifest_size: usize,
    ) -> Vec<Vec<ParcelId>> {
        let ids: Vec<ParcelId> = parcels.iter().map(|&(id, _)| id).collect();
        balanced_chunks(&ids, approx_manifest_size)
    }
}

// ── Nearest delivery point ────────────────────────────────────────────────────

/// Assigns each parcel to the delivery point nearest its destination, then
/// splits each point's group into balanced manifests.
///
/// Manifests are emitted in delivery-point order, and within a point in
/// backlog order, so a driver's round stays geographically tight.  With no
/// delivery points it behaves like [`ChunkPartitioner`].
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestPointPartitioner;

type PointEntry = GeomWithData<[f64; 2], usize>;

impl RoundPartitioner for NearestPointPartitioner {
    fn partition(
        &self,
        parcels:              &[(ParcelId, Point)],
        delivery_points:      &[Point],
        approx_manifest_size: usize,
    ) -> Vec<Vec<ParcelId>> {
        if delivery_points.is_empty() {
            return ChunkPartitioner.partition(parcels, delivery_points, approx_manifest_size);
        }

        let tree: RTree<PointEntry> = RTree::bulk_load(
            delivery_points
                .iter()
                .enumerate()
                .map(|(i, p)| PointEntry::new([p.x, p.y], i))
                .collect(),
        );
        let nearest = |p: &Point| -> usize {
            tree.nearest_neighbor(&[p.x, p.y]).map_or(0, |e| e.data)
        };

        #[cfg(not(feature = "parallel"))]
        let assignment: Vec<usize> = parcels.iter().map(|(_, p)| nearest(p)).collect();

        #[cfg(feature = "parallel")]
        let assignment: Vec<usize> = {
            use rayon::prelude::*;
            parcels.par_iter().map(|(_, p)| nearest(p)).collect()
        };

        let mut groups: Vec<Vec<ParcelId>> = vec![Vec::new(); delivery_points.len()];
        for (&(id, _), &g) in parcels.iter().zip(&assignment) {
            groups[g].push(id);
        }

        groups
            .iter()
            .flat_map(|g| balanced_chunks(g, approx_manifest_size))
            .collect()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Split `ids` into `ceil(len / size)` chunks whose sizes differ by at most
/// one, preserving order.
pub(crate) fn balanced_chunks(ids: &[ParcelId], size: usize) -> Vec<Vec<ParcelId>> {
    if ids.is_empty() {
        return Vec::new();
    }
    let size = size.max(1);
    let n = ids.len().div_ceil(size);
    let base = ids.len() / n;
    let extra = ids.len() % n;

    let mut out = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let len = base + usize::from(i < extra);
        out.push(ids[start..start + len].to_vec());
        start += len;
    }
    out
}
