//! Cosine nearest-neighbor search over the user rows of the rating matrix.

use ndarray::{Array2, Axis};

/// One neighbor of a query row, by cosine distance (`1 - similarity`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

/// Nearest-neighbor lookup over the rows of a fitted matrix.
pub trait NeighborIndex: Send + Sync {
    /// Up to `k` nearest rows to `row`, excluding `row` itself, ordered by
    /// ascending distance with ties broken by row index.
    fn kneighbors(&self, row: usize, k: usize) -> Vec<Neighbor>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exhaustive cosine index. Rows are normalized once at build time.
#[derive(Debug, Clone)]
pub struct BruteForceIndex {
    normalized: Array2<f64>,
}

impl BruteForceIndex {
    pub fn build(matrix: &Array2<f64>) -> Self {
        let mut normalized = matrix.clone();
        for mut row in normalized.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
        Self { normalized }
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        let similarity = self.normalized.row(a).dot(&self.normalized.row(b));
        (1.0 - similarity).max(0.0)
    }
}

impl NeighborIndex for BruteForceIndex {
    fn kneighbors(&self, row: usize, k: usize) -> Vec<Neighbor> {
        if row >= self.len() || k == 0 {
            return Vec::new();
        }

        let mut neighbors: Vec<Neighbor> = (0..self.len())
            .filter(|&other| other != row)
            .map(|other| Neighbor {
                row: other,
                distance: self.distance(row, other),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.row.cmp(&b.row))
        });
        neighbors.truncate(k);
        neighbors
    }

    fn len(&self) -> usize {
        self.normalized.nrows()
    }
}
