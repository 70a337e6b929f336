//! Uniform bucket grid over circles
//!
//! Tunnels are append-only, so each circle is registered once in every bucket
//! its bounding box touches and never moved. Queries only visit the buckets
//! overlapping the query region.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct BucketGrid {
    bucket_size: f32,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl BucketGrid {
    pub fn new(bucket_size: f32) -> Self {
        Self {
            bucket_size: bucket_size.max(f32::EPSILON),
            buckets: HashMap::new(),
        }
    }

    #[inline]
    fn bucket_of(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.bucket_size).floor() as i32,
            (p.y / self.bucket_size).floor() as i32,
        )
    }

    /// Buckets covering the square `center ± half_extent`
    fn span(&self, center: Vec2, half_extent: f32) -> impl Iterator<Item = (i32, i32)> {
        let (x0, y0) = self.bucket_of(center - Vec2::splat(half_extent));
        let (x1, y1) = self.bucket_of(center + Vec2::splat(half_extent));
        (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| (x, y)))
    }

    /// Register circle `index` covering `center` with `radius`
    pub fn insert(&mut self, index: usize, center: Vec2, radius: f32) {
        let keys: Vec<_> = self.span(center, radius).collect();
        for key in keys {
            self.buckets.entry(key).or_default().push(index);
        }
    }

    /// Indices of circles whose bounding box touches the bucket holding `p`
    pub fn at_point(&self, p: Vec2) -> &[usize] {
        self.buckets
            .get(&self.bucket_of(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indices registered in any bucket overlapping `center ± radius`.
    /// An index may appear more than once.
    pub fn near(&self, center: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        self.span(center, radius)
            .filter_map(|key| self.buckets.get(&key))
            .flat_map(|indices| indices.iter().copied())
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
