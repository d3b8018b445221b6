//! Conductor segments: the caller-facing config and the stored form.

use serde::{Deserialize, Serialize};

use crate::error::{ArgumentError, ensure_finite};
use crate::node::{NodeId, Terminal};

/// Conductor material, stated exactly one way. Serialized as a single
/// `sigma` or `rho` key; a description carrying both (or neither) is
/// rejected when the segment deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Conductivity, emitted as `sigma=`.
    #[serde(rename = "sigma")]
    Conductivity(f64),
    /// Resistivity, emitted as `rho=`.
    #[serde(rename = "rho")]
    Resistivity(f64),
}

/// Direction of the cross-section's width side. Optional on a segment, but
/// when present all three components are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct WidthVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WidthVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for WidthVector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<WidthVector> for [f64; 3] {
    fn from(v: WidthVector) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Everything needed to add one conductor segment. Geometry and material
/// are required and go through `new`, the remaining fields are optional
/// refinements of the solver's filament subdivision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSegmentConfig")]
pub struct SegmentConfig {
    pub from: Terminal,
    pub to: Terminal,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub material: Material,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_vector: Option<WidthVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nhinc: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nwinc: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rw: Option<f64>,
}

impl SegmentConfig {
    pub fn new(from: Terminal, to: Terminal, width: f64, height: f64, material: Material) -> Self {
        Self {
            from,
            to,
            width,
            height,
            material,
            width_vector: None,
            nhinc: None,
            nwinc: None,
            rh: None,
            rw: None,
        }
    }

    pub fn set_width_vector(&mut self, vector: WidthVector) {
        self.width_vector = Some(vector);
    }

    pub fn set_nhinc(&mut self, filaments: u32) {
        self.nhinc = Some(filaments);
    }

    pub fn set_nwinc(&mut self, filaments: u32) {
        self.nwinc = Some(filaments);
    }

    pub fn set_rh(&mut self, ratio: f64) {
        self.rh = Some(ratio);
    }

    pub fn set_rw(&mut self, ratio: f64) {
        self.rw = Some(ratio);
    }

    /// Check every numeric field is finite. Runs in full before the model
    /// touches any state, so a rejected config has no effect at all.
    pub(crate) fn validate(&self) -> Result<(), ArgumentError> {
        ensure_finite("from.x", self.from.point.x)?;
        ensure_finite("from.y", self.from.point.y)?;
        ensure_finite("from.z", self.from.point.z)?;
        ensure_finite("to.x", self.to.point.x)?;
        ensure_finite("to.y", self.to.point.y)?;
        ensure_finite("to.z", self.to.point.z)?;
        ensure_finite("width", self.width)?;
        ensure_finite("height", self.height)?;
        match self.material {
            Material::Conductivity(sigma) => ensure_finite("sigma", sigma)?,
            Material::Resistivity(rho) => ensure_finite("rho", rho)?,
        }
        if let Some(v) = self.width_vector {
            ensure_finite("wx", v.x)?;
            ensure_finite("wy", v.y)?;
            ensure_finite("wz", v.z)?;
        }
        if let Some(rh) = self.rh {
            ensure_finite("rh", rh)?;
        }
        if let Some(rw) = self.rw {
            ensure_finite("rw", rw)?;
        }
        Ok(())
    }
}

/// Deserialization shape for [`SegmentConfig`]: the material arrives as two
/// optional keys and must resolve to exactly one. Unknown keys are errors.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSegmentConfig {
    from: Terminal,
    to: Terminal,
    width: f64,
    height: f64,
    sigma: Option<f64>,
    rho: Option<f64>,
    width_vector: Option<WidthVector>,
    nhinc: Option<u32>,
    nwinc: Option<u32>,
    rh: Option<f64>,
    rw: Option<f64>,
}

impl TryFrom<RawSegmentConfig> for SegmentConfig {
    type Error = ArgumentError;

    fn try_from(raw: RawSegmentConfig) -> Result<Self, Self::Error> {
        let material = match (raw.sigma, raw.rho) {
            (Some(sigma), None) => Material::Conductivity(sigma),
            (None, Some(rho)) => Material::Resistivity(rho),
            (Some(_), Some(_)) => return Err(ArgumentError::ConflictingMaterial),
            (None, None) => return Err(ArgumentError::MissingMaterial),
        };
        Ok(Self {
            from: raw.from,
            to: raw.to,
            width: raw.width,
            height: raw.height,
            material,
            width_vector: raw.width_vector,
            nhinc: raw.nhinc,
            nwinc: raw.nwinc,
            rh: raw.rh,
            rw: raw.rw,
        })
    }
}

/// A stored conductor segment. Endpoints are resolved to node ids, the
/// physical fields are carried through from the validated config.
#[derive(Debug, Clone)]
pub struct Segment {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) material: Material,
    pub(crate) width_vector: Option<WidthVector>,
    pub(crate) nhinc: Option<u32>,
    pub(crate) nwinc: Option<u32>,
    pub(crate) rh: Option<f64>,
    pub(crate) rw: Option<f64>,
}

impl Segment {
    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn width_vector(&self) -> Option<WidthVector> {
        self.width_vector
    }

    pub fn nhinc(&self) -> Option<u32> {
        self.nhinc
    }

    pub fn nwinc(&self) -> Option<u32> {
        self.nwinc
    }

    pub fn rh(&self) -> Option<f64> {
        self.rh
    }

    pub fn rw(&self) -> Option<f64> {
        self.rw
    }
}
