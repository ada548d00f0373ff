//! Straight-line k-nearest lookup for restaurants, leisure sites, and bus
//! stops.
//!
//! Two entry points with identical results:
//!
//! - [`k_nearest`]: linear scan with partial selection.  Right for one-off
//!   queries or small datasets.
//! - [`AmenityFinder`]: builds an R-tree over the dataset once and answers
//!   many queries against it.
//!
//! Results hold the `k` records with the smallest haversine distance to the
//! anchor, ascending, equal distances in dataset order.  Records without
//! usable coordinates never appear.  `road_m` is always `None`.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use cn_core::{CoreResult, GeoPoint, Located, RankedCandidate};

use crate::nearest::by_distance_then_index;

/// Slack on squared chord length when collecting records tied with the k-th.
/// Larger than the rounding error of `to_unit_vector` at any distance.
const CHORD2_SLACK: f64 = 1e-12;

/// The `k` records of `dataset` nearest to `anchor`.
///
/// # Errors
///
/// [`CoreError::InvalidInput`](cn_core::CoreError::InvalidInput) for an
/// invalid anchor.
pub fn k_nearest<T: Located + Clone>(
    anchor: GeoPoint,
    dataset: &[T],
    k: usize,
) -> CoreResult<Vec<RankedCandidate<T>>> {
    let anchor = anchor.validate()?;
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(f64, usize)> = dataset
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.location().map(|p| (anchor.distance_m(p), i)))
        .collect();

    if scored.len() > k {
        scored.select_nth_unstable_by(k - 1, |&a, &b| by_distance_then_index(a, b));
        scored.truncate(k);
    }
    scored.sort_unstable_by(|&a, &b| by_distance_then_index(a, b));

    Ok(scored
        .into_iter()
        .map(|(d, i)| RankedCandidate::straight_line(i, dataset[i].clone(), d))
        .collect())
}

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// A dataset with a spatial index for repeated k-nearest queries.
///
/// Immutable after construction; share it behind an `Arc` and swap a new one
/// in when the dataset is refreshed.
pub struct AmenityFinder<T> {
    records: Vec<T>,
    tree:    RTree<IndexedPoint>,
}

impl<T: Located + Clone> AmenityFinder<T> {
    pub fn new(records: Vec<T>) -> Self {
        let points: Vec<IndexedPoint> = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.location().map(|p| GeomWithData::new(p.to_unit_vector(), i)))
            .collect();
        Self { tree: RTree::bulk_load(points), records }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records that can appear in results.
    pub fn indexed_len(&self) -> usize {
        self.tree.size()
    }

    /// Same contract as [`k_nearest`] over this finder's records.
    pub fn k_nearest(&self, anchor: GeoPoint, k: usize) -> CoreResult<Vec<RankedCandidate<T>>> {
        let anchor = anchor.validate()?;
        if k == 0 {
            return Ok(Vec::new());
        }

        // Walk in chord order; past the k-th, keep going only while tied.
        let query = anchor.to_unit_vector();
        let mut picked: Vec<(f64, usize)> = Vec::with_capacity(k);
        let mut cutoff = f64::INFINITY;
        for (entry, chord2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if picked.len() >= k && chord2 > cutoff {
                break;
            }
            picked.push((chord2, entry.data));
            if picked.len() == k {
                cutoff = chord2 + CHORD2_SLACK;
            }
        }

        let mut scored: Vec<(f64, usize)> = picked
            .into_iter()
            .filter_map(|(_, i)| self.records[i].location().map(|p| (anchor.distance_m(p), i)))
            .collect();
        scored.sort_unstable_by(|&a, &b| by_distance_then_index(a, b));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(d, i)| RankedCandidate::straight_line(i, self.records[i].clone(), d))
            .collect())
    }
}
