//! Renders a model into the solver's text format, fully in memory, then
//! writes it out in one shot.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::WriteError;
use crate::model::InputModel;
use crate::nets::NetGroup;
use crate::node::NodeId;
use crate::segment::Material;

/// The shorter of the plain and exponent spellings of a value, ties going
/// to plain. Both spellings round-trip an f64 exactly, so this only picks
/// between `1e3` and `1000`, never changes the number.
fn fmt_num(value: f64) -> String {
    let plain = format!("{value}");
    let exponent = format!("{value:e}");
    if exponent.len() < plain.len() { exponent } else { plain }
}

/// Assemble the complete deck as text. A missing port list or a port that
/// names an unknown net fails here, before any file is touched, and the
/// output depends only on the model's insertion orders.
pub fn render(model: &InputModel) -> Result<String, WriteError> {
    let ports = model.ports().ok_or(WriteError::PortsNotSet)?;
    let groups = model.net_groups();

    let mut out = Vec::new();
    writeln!(out, "* Set the units")?;
    writeln!(out, ".units {}", model.unit())?;

    for (i, node) in model.nodes().iter().enumerate() {
        let p = node.point();
        writeln!(
            out,
            "{} x={} y={} z={}",
            NodeId::from_index(i),
            fmt_num(p.x),
            fmt_num(p.y),
            fmt_num(p.z)
        )?;
    }
    writeln!(out)?;

    for (i, segment) in model.segments().iter().enumerate() {
        write!(
            out,
            "E{} {} {} w={} h={}",
            i + 1,
            segment.from(),
            segment.to(),
            fmt_num(segment.width()),
            fmt_num(segment.height())
        )?;
        match segment.material() {
            Material::Conductivity(sigma) => write!(out, " sigma={}", fmt_num(sigma))?,
            Material::Resistivity(rho) => write!(out, " rho={}", fmt_num(rho))?,
        }
        if let Some(v) = segment.width_vector() {
            write!(out, " wx={} wy={} wz={}", fmt_num(v.x), fmt_num(v.y), fmt_num(v.z))?;
        }
        if let Some(nhinc) = segment.nhinc() {
            write!(out, " nhinc={nhinc}")?;
        }
        if let Some(nwinc) = segment.nwinc() {
            write!(out, " nwinc={nwinc}")?;
        }
        if let Some(rh) = segment.rh() {
            write!(out, " rh={}", fmt_num(rh))?;
        }
        if let Some(rw) = segment.rw() {
            write!(out, " rw={}", fmt_num(rw))?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    for group in &groups {
        write!(out, ".Equiv")?;
        for id in group.members() {
            write!(out, " {id}")?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(out, "* Define the ports of the network")?;
    for (i, port) in ports.iter().enumerate() {
        let positive = representative(&groups, &port.positive, i)?;
        let negative = representative(&groups, &port.negative, i)?;
        writeln!(out, ".external {positive} {negative}")?;
    }
    writeln!(out)?;

    if let Some(sweep) = model.frequency() {
        write!(out, ".freq fmin={} fmax={}", fmt_num(sweep.fmin), fmt_num(sweep.fmax))?;
        if let Some(ndec) = sweep.ndec {
            write!(out, " ndec={}", fmt_num(ndec))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "* Mark end of file")?;
    writeln!(out, ".end")?;

    // only directives, ids and numbers are emitted, never net names
    Ok(String::from_utf8(out).expect("rendered deck is plain ASCII"))
}

fn representative(groups: &[NetGroup], net: &str, port: usize) -> Result<NodeId, WriteError> {
    groups
        .iter()
        .find(|group| group.net() == net)
        .map(NetGroup::representative)
        .ok_or_else(|| WriteError::UnknownPortNet {
            index: port + 1,
            net: net.to_string(),
        })
}

/// Render and write in one shot. Without `force` an existing destination is
/// refused before anything renders, and a failed render never creates or
/// truncates the destination.
pub fn write_file(model: &InputModel, path: &Path, force: bool) -> Result<(), WriteError> {
    if !force && path.exists() {
        return Err(WriteError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let text = render(model)?;
    fs::write(path, &text)?;
    info!(path = %path.display(), bytes = text.len(), "wrote input deck");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::{FrequencySweep, Port};
    use crate::node::{Point3, Terminal};
    use crate::segment::{SegmentConfig, WidthVector};
    use crate::units::Unit;

    fn segment(
        from: (f64, f64, f64),
        from_net: &str,
        to: (f64, f64, f64),
        to_net: &str,
    ) -> SegmentConfig {
        SegmentConfig::new(
            Terminal::new(Point3::new(from.0, from.1, from.2), from_net),
            Terminal::new(Point3::new(to.0, to.1, to.2), to_net),
            1.0,
            1.0,
            Material::Conductivity(5.8e7),
        )
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(10.0, "10")]
    #[case(100.0, "100")]
    #[case(1000.0, "1e3")]
    #[case(1e8, "1e8")]
    #[case(0.5, "0.5")]
    #[case(0.035, "0.035")]
    #[case(1.68e-8, "1.68e-8")]
    #[case(-2.5, "-2.5")]
    #[case(-0.0, "-0")]
    fn numbers_take_their_shortest_spelling(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(fmt_num(value), expected);
    }

    #[test]
    fn exponent_spelling_wins_only_when_strictly_shorter() {
        insta::assert_snapshot!(fmt_num(5.8e7), @"5.8e7");
        insta::assert_snapshot!(fmt_num(100.0), @"100");
        insta::assert_snapshot!(fmt_num(1.5), @"1.5");
    }

    #[test]
    fn a_single_segment_deck_renders_byte_for_byte() {
        let mut model = InputModel::new(Unit::Mm);
        let mut config = segment((0.0, 0.0, 0.0), "A", (0.0, 1000.0, 0.0), "B");
        config.material = Material::Resistivity(1.68e-8);
        model.add_segment(config).unwrap();
        model.set_ports(vec![Port::new("A", "B")]);
        model.set_frequency(FrequencySweep::new(10.0, 1e8).with_ndec(0.5)).unwrap();

        let expected = concat!(
            "* Set the units\n",
            ".units mm\n",
            "N1 x=0 y=0 z=0\n",
            "N2 x=0 y=1e3 z=0\n",
            "\n",
            "E1 N1 N2 w=1 h=1 rho=1.68e-8\n",
            "\n",
            ".Equiv N1\n",
            ".Equiv N2\n",
            "\n",
            "* Define the ports of the network\n",
            ".external N1 N2\n",
            "\n",
            ".freq fmin=10 fmax=1e8 ndec=0.5\n",
            "* Mark end of file\n",
            ".end\n",
        );
        assert_eq!(model.render().unwrap(), expected);
    }

    #[test]
    fn shared_nets_share_an_equiv_line_and_the_sweep_is_optional() {
        let mut model = InputModel::new(Unit::Um);
        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "m")).unwrap();
        model.add_segment(segment((2.0, 0.0, 0.0), "m", (3.0, 0.0, 0.0), "b")).unwrap();
        model.set_ports(vec![Port::new("a", "b")]);

        let expected = concat!(
            "* Set the units\n",
            ".units um\n",
            "N1 x=0 y=0 z=0\n",
            "N2 x=1 y=0 z=0\n",
            "N3 x=2 y=0 z=0\n",
            "N4 x=3 y=0 z=0\n",
            "\n",
            "E1 N1 N2 w=1 h=1 sigma=5.8e7\n",
            "E2 N3 N4 w=1 h=1 sigma=5.8e7\n",
            "\n",
            ".Equiv N1\n",
            ".Equiv N2 N3\n",
            ".Equiv N4\n",
            "\n",
            "* Define the ports of the network\n",
            ".external N1 N4\n",
            "\n",
            "* Mark end of file\n",
            ".end\n",
        );
        assert_eq!(model.render().unwrap(), expected);
    }

    #[test]
    fn optional_segment_fields_render_in_fixed_order() {
        let mut model = InputModel::new(Unit::Mm);
        let mut config = segment((0.0, 0.0, 0.0), "in", (10.0, 0.0, 0.0), "out");
        config.width = 0.2;
        config.height = 0.035;
        config.set_width_vector(WidthVector::new(0.0, 0.0, 1.0));
        config.set_nhinc(3);
        config.set_nwinc(5);
        config.set_rh(1.5);
        config.set_rw(2.0);
        model.add_segment(config).unwrap();
        model.set_ports(vec![Port::new("in", "out")]);

        let out = model.render().unwrap();
        assert!(out.contains(
            "E1 N1 N2 w=0.2 h=0.035 sigma=5.8e7 wx=0 wy=0 wz=1 nhinc=3 nwinc=5 rh=1.5 rw=2\n"
        ));
    }

    #[test]
    fn rendering_without_a_port_list_fails() {
        let mut model = InputModel::new(Unit::Mm);
        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "b")).unwrap();

        assert!(matches!(model.render().unwrap_err(), WriteError::PortsNotSet));
    }

    #[test]
    fn an_empty_port_list_renders_no_external_lines() {
        let mut model = InputModel::new(Unit::Mm);
        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "b")).unwrap();
        model.set_ports(Vec::new());

        let out = model.render().unwrap();
        assert!(out.contains("* Define the ports of the network\n"));
        assert!(!out.contains(".external"));
    }

    #[test]
    fn a_port_naming_an_unknown_net_fails_with_its_position() {
        let mut model = InputModel::new(Unit::Mm);
        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "b")).unwrap();
        model.set_ports(vec![Port::new("a", "b"), Port::new("ground", "a")]);

        match model.render().unwrap_err() {
            WriteError::UnknownPortNet { index, net } => {
                assert_eq!(index, 2);
                assert_eq!(net, "ground");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rendering_is_deterministic_within_and_across_builds() {
        let build = || {
            let mut model = InputModel::new(Unit::Mm);
            for i in 0..20 {
                let x = i as f64;
                model
                    .add_segment(segment(
                        (x, 0.0, 0.0),
                        &format!("n{i}"),
                        (x + 1.0, 0.0, 0.0),
                        &format!("n{}", i + 1),
                    ))
                    .unwrap();
            }
            model.set_ports(vec![Port::new("n0", "n20")]);
            model
        };

        let model = build();
        assert_eq!(model.render().unwrap(), model.render().unwrap());
        assert_eq!(model.render().unwrap(), build().render().unwrap());
    }

    #[test]
    fn write_refuses_an_existing_destination_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.inp");
        fs::write(&path, "keep me").unwrap();

        let mut model = InputModel::new(Unit::Mm);
        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "b")).unwrap();
        model.set_ports(vec![Port::new("a", "b")]);

        let err = model.write_file(&path, false).unwrap_err();
        assert!(matches!(err, WriteError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        model.write_file(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with(".end\n"));
    }

    #[test]
    fn a_failed_render_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.inp");

        let mut model = InputModel::new(Unit::Mm);
        assert!(matches!(
            model.write_file(&path, false).unwrap_err(),
            WriteError::PortsNotSet
        ));
        assert!(!path.exists());

        model.add_segment(segment((0.0, 0.0, 0.0), "a", (1.0, 0.0, 0.0), "b")).unwrap();
        model.set_ports(vec![Port::new("a", "ground")]);
        assert!(matches!(
            model.write_file(&path, false).unwrap_err(),
            WriteError::UnknownPortNet { .. }
        ));
        assert!(!path.exists());
    }

    #[test]
    fn the_existence_check_runs_before_port_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.inp");
        fs::write(&path, "keep me").unwrap();

        let model = InputModel::new(Unit::Mm);
        assert!(matches!(
            model.write_file(&path, false).unwrap_err(),
            WriteError::AlreadyExists { .. }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }
}
