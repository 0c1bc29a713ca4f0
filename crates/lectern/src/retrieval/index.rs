//! Flat in-memory vector index with exact search

use crate::error::{Error, Result};

/// Exact nearest-neighbor index over raw vectors.
///
/// Distances are squared Euclidean, which ranks identically to true L2
/// without the square root. The index lives for one request; notes are
/// re-embedded per question, so there is nothing to persist.
#[derive(Debug)]
pub struct FlatIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append vectors to the index, validating their dimensions.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        for vector in &vectors {
            if vector.len() != self.dimensions {
                return Err(Error::Index(format!(
                    "Expected {} dimensions, got {}",
                    self.dimensions,
                    vector.len()
                )));
            }
        }
        self.vectors.extend(vectors);
        Ok(())
    }

    /// Return up to `k` `(index, distance)` pairs ordered by ascending
    /// distance. Ties keep insertion order. A query with the wrong
    /// dimension count matches nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if query.len() != self.dimensions || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (i, squared_l2(query, vector)))
            .collect();

        // stable sort keeps insertion order for equal distances
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
