//! Lazily rasterized rock chunks
//!
//! The world is split into square chunks. A chunk is sampled from the density
//! field the first time the camera comes near it and kept afterwards. Tunnels
//! and piles are not baked in, so a chunk never goes stale and regenerating
//! one always yields the same cells.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::density::DensityField;
use crate::settings::WorldSettings;

/// Integer chunk grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance in chunks
    pub fn distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// One solid square of rock, top-left corner in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RockCell {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub cells: Vec<RockCell>,
}

#[derive(Debug, Clone)]
pub struct ChunkStore {
    pub chunk_size: f32,
    pub cell_size: f32,
    pub render_distance: i32,
    pub eviction_radius: Option<i32>,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    pub fn new(chunk_size: f32, cell_size: f32, render_distance: i32) -> Self {
        Self {
            chunk_size,
            cell_size,
            render_distance,
            eviction_radius: None,
            chunks: HashMap::new(),
        }
    }

    pub fn from_settings(world: &WorldSettings) -> Self {
        Self {
            eviction_radius: world.chunk_eviction_radius,
            ..Self::new(world.chunk_size, world.cell_size, world.render_distance)
        }
    }

    /// Number of chunks currently cached
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Chunk containing a world point
    pub fn coord_at(&self, p: Vec2) -> ChunkCoord {
        ChunkCoord::new(
            (p.x / self.chunk_size).floor() as i32,
            (p.y / self.chunk_size).floor() as i32,
        )
    }

    /// Rasterize one chunk from the density field
    pub fn generate(&self, field: &DensityField, coord: ChunkCoord) -> Chunk {
        let origin = Vec2::new(coord.x as f32, coord.y as f32) * self.chunk_size;
        let per_side = (self.chunk_size / self.cell_size).ceil() as i32;

        let mut cells = Vec::new();
        for ix in 0..per_side {
            for iy in 0..per_side {
                let corner = origin + Vec2::new(ix as f32, iy as f32) * self.cell_size;
                if field.solid_rock_at(corner) {
                    cells.push(RockCell {
                        x: corner.x,
                        y: corner.y,
                        size: self.cell_size,
                    });
                }
            }
        }

        Chunk { coord, cells }
    }

    /// Chunk at `coord`, generating and caching it on first use
    pub fn get_or_generate(&mut self, field: &DensityField, coord: ChunkCoord) -> &Chunk {
        if !self.chunks.contains_key(&coord) {
            let chunk = self.generate(field, coord);
            log::debug!(
                "Generated chunk ({}, {}) with {} rock cells",
                coord.x,
                coord.y,
                chunk.cells.len()
            );
            self.chunks.insert(coord, chunk);
        }
        &self.chunks[&coord]
    }

    /// Every chunk within `render_distance` of the chunk holding `camera`
    pub fn visible_chunks(&mut self, field: &DensityField, camera: Vec2) -> Vec<&Chunk> {
        let center = self.coord_at(camera);
        let d = self.render_distance;

        if let Some(radius) = self.eviction_radius {
            self.evict_outside(center, radius.max(d));
        }

        let coords: Vec<ChunkCoord> = (-d..=d)
            .flat_map(|dx| (-d..=d).map(move |dy| ChunkCoord::new(center.x + dx, center.y + dy)))
            .collect();
        for &coord in &coords {
            self.get_or_generate(field, coord);
        }

        coords.iter().filter_map(|c| self.chunks.get(c)).collect()
    }

    /// Drop cached chunks farther than `radius` from `center`. Returns how many were dropped.
    pub fn evict_outside(&mut self, center: ChunkCoord, radius: i32) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|coord, _| coord.distance(center) <= radius);
        let evicted = before - self.chunks.len();
        if evicted > 0 {
            log::debug!("Evicted {} chunks around ({}, {})", evicted, center.x, center.y);
        }
        evicted
    }
}
