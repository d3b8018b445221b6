//! JSON network descriptions, the on-disk form of a full model build.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use hank_model::{ArgumentError, FrequencySweep, InputModel, Port, SegmentConfig, Unit};

/// One self-contained network: the unit, every conductor segment, the port
/// list and an optional sweep. Segments carry exactly one of `sigma` or
/// `rho`, same as the library type they deserialize into.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkFile {
    pub unit: Unit,
    pub segments: Vec<SegmentConfig>,
    pub ports: Vec<Port>,
    #[serde(default)]
    pub frequency: Option<FrequencySweep>,
}

impl NetworkFile {
    /// Replay the description into a model in file order, so node numbering
    /// follows the segment list.
    pub fn into_model(self) -> Result<InputModel, ArgumentError> {
        let mut model = InputModel::new(self.unit);
        for segment in self.segments {
            model.add_segment(segment)?;
        }
        model.set_ports(self.ports);
        if let Some(sweep) = self.frequency {
            model.set_frequency(sweep)?;
        }
        Ok(model)
    }
}

pub fn load(path: &Path) -> anyhow::Result<InputModel> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let network: NetworkFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid network description {}", path.display()))?;
    debug!(
        segments = network.segments.len(),
        ports = network.ports.len(),
        "loaded network description"
    );
    Ok(network.into_model()?)
}
