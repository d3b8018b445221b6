//! The model aggregate: deduplicated nodes, segments, ports and the sweep.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ArgumentError, WriteError, ensure_finite};
use crate::nets::NetGroup;
use crate::node::{NodeId, Point3, SpatialNode};
use crate::segment::{Segment, SegmentConfig};
use crate::units::Unit;

/// A measurement port between two nets. The writer emits the representative
/// node of each net's equivalence class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub positive: String,
    pub negative: String,
}

impl Port {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }
}

/// Frequency sweep directive. Bounds are required, points-per-decade is
/// left to the solver's default when unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencySweep {
    pub fmin: f64,
    pub fmax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndec: Option<f64>,
}

impl FrequencySweep {
    pub fn new(fmin: f64, fmax: f64) -> Self {
        Self {
            fmin,
            fmax,
            ndec: None,
        }
    }

    pub fn with_ndec(mut self, ndec: f64) -> Self {
        self.ndec = Some(ndec);
        self
    }
}

/// One solver input deck under construction. Nodes, segments, ports and the
/// sweep are only reachable through these methods, so the orderings the
/// writer depends on cannot be disturbed from outside.
#[derive(Debug)]
pub struct InputModel {
    unit: Unit,
    nodes: Vec<SpatialNode>,
    ids_by_point: HashMap<[u64; 3], NodeId>,
    segments: Vec<Segment>,
    ports: Option<Vec<Port>>,
    sweep: Option<FrequencySweep>,
}

impl InputModel {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            nodes: Vec::new(),
            ids_by_point: HashMap::new(),
            segments: Vec::new(),
            ports: None,
            sweep: None,
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Deduplicated spatial nodes in creation order. Node `N(k)` is at
    /// index `k - 1`.
    pub fn nodes(&self) -> &[SpatialNode] {
        &self.nodes
    }

    /// Segments in insertion order. Segment `E(k)` is at index `k - 1`.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The port list, if one has been set. An empty list counts as set.
    pub fn ports(&self) -> Option<&[Port]> {
        self.ports.as_deref()
    }

    pub fn frequency(&self) -> Option<FrequencySweep> {
        self.sweep
    }

    /// Validate a segment config, intern both endpoint coordinates and
    /// append the segment. Both terminals rebind their node's net, `from`
    /// before `to`, so on a degenerate segment the `to` net sticks.
    pub fn add_segment(&mut self, config: SegmentConfig) -> Result<(), ArgumentError> {
        config.validate()?;

        let SegmentConfig {
            from,
            to,
            width,
            height,
            material,
            width_vector,
            nhinc,
            nwinc,
            rh,
            rw,
        } = config;

        let from_id = self.intern(from.point, from.net);
        let to_id = self.intern(to.point, to.net);

        trace!(segment = self.segments.len() + 1, from = %from_id, to = %to_id, "added segment");
        self.segments.push(Segment {
            from: from_id,
            to: to_id,
            width,
            height,
            material,
            width_vector,
            nhinc,
            nwinc,
            rh,
            rw,
        });
        Ok(())
    }

    /// Exact-match coordinate lookup: reuse the existing node or append a
    /// new one. Either way the node's net becomes `net`, last write wins.
    fn intern(&mut self, point: Point3, net: String) -> NodeId {
        match self.ids_by_point.get(&point.key()) {
            Some(&id) => {
                let node = &mut self.nodes[(id.0 - 1) as usize];
                if node.net() != net {
                    debug!(node = %id, old = node.net(), new = %net, "rebound net on reused coordinate");
                }
                node.set_net(net);
                id
            }
            None => {
                let id = NodeId::from_index(self.nodes.len());
                trace!(node = %id, x = point.x, y = point.y, z = point.z, "created spatial node");
                self.ids_by_point.insert(point.key(), id);
                self.nodes.push(SpatialNode::new(point, net));
                id
            }
        }
    }

    /// Replace the port list wholesale. Net names are checked against the
    /// node table at write time, not here, so ports may be declared before
    /// the segments that carry their nets.
    pub fn set_ports(&mut self, ports: Vec<Port>) {
        self.ports = Some(ports);
    }

    /// Replace the frequency sweep wholesale.
    pub fn set_frequency(&mut self, sweep: FrequencySweep) -> Result<(), ArgumentError> {
        ensure_finite("fmin", sweep.fmin)?;
        ensure_finite("fmax", sweep.fmax)?;
        if let Some(ndec) = sweep.ndec {
            ensure_finite("ndec", ndec)?;
        }
        self.sweep = Some(sweep);
        Ok(())
    }

    /// Electrical equivalence classes over the current node table, derived
    /// fresh on every call.
    pub fn net_groups(&self) -> Vec<NetGroup> {
        crate::nets::group_nodes(&self.nodes)
    }

    /// Render the complete input deck to a string. See [`crate::writer`].
    pub fn render(&self) -> Result<String, WriteError> {
        crate::writer::render(self)
    }

    /// Render and write the deck to `path` in one shot. See
    /// [`crate::writer::write_file`].
    pub fn write_file<P: AsRef<Path>>(&self, path: P, force: bool) -> Result<(), WriteError> {
        crate::writer::write_file(self, path.as_ref(), force)
    }
}
