//! Spatial nodes and the coordinate identity they are deduplicated on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in 3-D space, in the model's unit. Two points identify the same
/// spatial node only when all three coordinates are exactly equal, there is
/// no tolerance or rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Bit pattern used as the dedup key. -0.0 folds onto +0.0 so the key
    /// agrees with `==` on every finite value.
    pub(crate) fn key(self) -> [u64; 3] {
        fn canon(v: f64) -> u64 {
            if v == 0.0 { 0f64.to_bits() } else { v.to_bits() }
        }
        [canon(self.x), canon(self.y), canon(self.z)]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// 1-based identifier of a spatial node. Assigned when the node is first
/// created and stable for the life of the model, so `N7` in the output
/// always names the seventh distinct coordinate ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32 + 1)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// One deduplicated spatial node: a coordinate and the net it currently
/// belongs to. The net is rebound by any later segment that lands another
/// terminal on the same coordinate.
#[derive(Debug, Clone)]
pub struct SpatialNode {
    point: Point3,
    net: String,
}

impl SpatialNode {
    pub(crate) fn new(point: Point3, net: String) -> Self {
        Self { point, net }
    }

    pub fn point(&self) -> Point3 {
        self.point
    }

    pub fn net(&self) -> &str {
        &self.net
    }

    pub(crate) fn set_net(&mut self, net: String) {
        self.net = net;
    }
}

/// A segment endpoint as callers describe it: where it sits and which net
/// it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminal {
    pub point: Point3,
    pub net: String,
}

impl Terminal {
    pub fn new(point: Point3, net: impl Into<String>) -> Self {
        Self {
            point,
            net: net.into(),
        }
    }
}
