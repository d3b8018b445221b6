//! Built-in geometry sample: a square planar spiral.

use anyhow::ensure;
use clap::Args;
use tracing::debug;

use hank_model::{
    FrequencySweep, InputModel, Material, Point3, Port, SegmentConfig, Terminal, Unit,
};

/// Copper conductivity in S/mm, the default trace material.
const COPPER_SIGMA: f64 = 5.8e4;

const PORT_IN: &str = "p1";
const PORT_OUT: &str = "p2";

#[derive(Args)]
pub struct CoilArgs {
    /// Length unit for coordinates and dimensions
    #[arg(long, default_value = "mm")]
    unit: Unit,

    /// Number of full turns
    #[arg(long, default_value_t = 4)]
    turns: u32,

    /// Outermost side length of the spiral
    #[arg(long, default_value_t = 10.0)]
    side: f64,

    /// Center-to-center spacing between adjacent turns
    #[arg(long, default_value_t = 0.4)]
    pitch: f64,

    /// Trace width
    #[arg(long, default_value_t = 0.2)]
    width: f64,

    /// Trace thickness
    #[arg(long, default_value_t = 0.035)]
    height: f64,

    /// Trace conductivity, copper in S/mm when neither material is given
    #[arg(long, conflicts_with = "rho")]
    sigma: Option<f64>,

    /// Trace resistivity
    #[arg(long)]
    rho: Option<f64>,

    /// Sweep lower bound in Hz
    #[arg(long, default_value_t = 1e3)]
    fmin: f64,

    /// Sweep upper bound in Hz
    #[arg(long, default_value_t = 1e9)]
    fmax: f64,

    /// Sweep points per decade
    #[arg(long)]
    ndec: Option<f64>,
}

impl CoilArgs {
    fn material(&self) -> Material {
        match (self.sigma, self.rho) {
            (Some(sigma), _) => Material::Conductivity(sigma),
            (None, Some(rho)) => Material::Resistivity(rho),
            (None, None) => Material::Conductivity(COPPER_SIGMA),
        }
    }

    /// Walk the spiral inward one quarter turn per segment. Consecutive
    /// legs meet on the exact same coordinate, so every joint becomes a
    /// single shared node in the model.
    pub fn build(&self) -> anyhow::Result<InputModel> {
        ensure!(self.turns >= 1, "a coil needs at least one turn");
        ensure!(self.side > 0.0, "side must be positive");
        ensure!(self.pitch > 0.0, "pitch must be positive");

        let legs = self.turns as usize * 4;
        let innermost = self.side - ((legs - 1) / 2) as f64 * self.pitch;
        ensure!(
            innermost > 0.0,
            "{} turns at pitch {} eat up the whole side of {}",
            self.turns,
            self.pitch,
            self.side
        );

        // quarter-turn directions: east, north, west, south
        let directions = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        let mut points = Vec::with_capacity(legs + 1);
        let (mut x, mut y) = (0.0_f64, 0.0_f64);
        points.push(Point3::new(x, y, 0.0));
        for leg in 0..legs {
            // every second leg steps one pitch inward
            let length = self.side - (leg / 2) as f64 * self.pitch;
            let (dx, dy) = directions[leg % 4];
            x += dx * length;
            y += dy * length;
            points.push(Point3::new(x, y, 0.0));
        }

        let material = self.material();
        let mut model = InputModel::new(self.unit);
        for leg in 0..legs {
            let config = SegmentConfig::new(
                Terminal::new(points[leg], joint_net(leg, legs)),
                Terminal::new(points[leg + 1], joint_net(leg + 1, legs)),
                self.width,
                self.height,
                material,
            );
            model.add_segment(config)?;
        }

        model.set_ports(vec![Port::new(PORT_IN, PORT_OUT)]);
        let mut sweep = FrequencySweep::new(self.fmin, self.fmax);
        if let Some(ndec) = self.ndec {
            sweep = sweep.with_ndec(ndec);
        }
        model.set_frequency(sweep)?;

        debug!(segments = legs, nodes = model.nodes().len(), "generated coil");
        Ok(model)
    }
}

fn joint_net(index: usize, legs: usize) -> String {
    if index == 0 {
        PORT_IN.to_string()
    } else if index == legs {
        PORT_OUT.to_string()
    } else {
        format!("j{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(turns: u32) -> CoilArgs {
        CoilArgs {
            unit: Unit::Mm,
            turns,
            side: 10.0,
            pitch: 0.4,
            width: 0.2,
            height: 0.035,
            sigma: None,
            rho: None,
            fmin: 1e3,
            fmax: 1e9,
            ndec: None,
        }
    }

    #[test]
    fn consecutive_legs_share_their_joint_node() {
        let model = args(4).build().unwrap();
        assert_eq!(model.segments().len(), 16);
        assert_eq!(model.nodes().len(), 17);
    }

    #[test]
    fn the_ports_sit_on_the_spiral_ends() {
        let model = args(2).build().unwrap();
        let text = model.render().unwrap();
        assert!(text.contains(".external N1 N9\n"));
        assert!(text.contains(".freq fmin=1e3 fmax=1e9\n"));
    }

    #[test]
    fn an_explicit_resistivity_replaces_the_copper_default() {
        let mut coil = args(1);
        coil.rho = Some(1.68e-8);
        let model = coil.build().unwrap();
        let text = model.render().unwrap();
        assert!(text.contains(" rho=1.68e-8\n"));
        assert!(!text.contains("sigma="));
    }

    #[test]
    fn a_pitch_wider_than_the_side_is_rejected() {
        let mut coil = args(4);
        coil.pitch = 2.0;
        assert!(coil.build().is_err());
    }

    #[test]
    fn zero_turns_are_rejected() {
        assert!(args(0).build().is_err());
    }
}
