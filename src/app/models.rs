//! Core data models for survey data
//!
//! This module holds the small value types shared by the container, the
//! sensor registry and the text format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scaled magnitude above which snapping is left out (2^50)
const SNAP_LIMIT: f64 = 1_125_899_906_842_624.0;

/// A position in 3D space, used for sensors and topography points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Pos {
    /// Create a new position
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Pos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Snap every coordinate to the nearest multiple of `tolerance`
    ///
    /// Coordinates too large for the grid to be finer than `f64` resolution
    /// are kept as they are, so snapping twice gives the same position.
    pub fn round(&self, tolerance: f64) -> Pos {
        let scale = 1.0 / tolerance;
        let snap = |v: f64| {
            let scaled = v * scale;
            if scaled.abs() < SNAP_LIMIT {
                scaled.round() / scale
            } else {
                v
            }
        };
        Pos::new(snap(self.x), snap(self.y), snap(self.z))
    }

    /// Whether all coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Pos {
    fn from(coords: [f64; 3]) -> Self {
        Pos::new(coords[0], coords[1], coords[2])
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
