use std::fs;

use hank_model::{
    FrequencySweep, InputModel, Material, Point3, Port, SegmentConfig, Terminal, Unit,
};

fn trace(from: (f64, f64), from_net: &str, to: (f64, f64), to_net: &str) -> SegmentConfig {
    SegmentConfig::new(
        Terminal::new(Point3::new(from.0, from.1, 0.0), from_net),
        Terminal::new(Point3::new(to.0, to.1, 0.0), to_net),
        0.2,
        0.035,
        Material::Conductivity(5.8e4),
    )
}

/// A closed rectangular loop built through the public API, written to disk
/// and read back. The closing segment must land on the very first node.
#[test]
fn a_rectangular_loop_round_trips_to_disk() {
    let mut model = InputModel::new(Unit::Mm);
    model.add_segment(trace((0.0, 0.0), "p", (10.0, 0.0), "c1")).unwrap();
    model.add_segment(trace((10.0, 0.0), "c1", (10.0, 10.0), "c2")).unwrap();
    model.add_segment(trace((10.0, 10.0), "c2", (0.0, 10.0), "c3")).unwrap();
    model.add_segment(trace((0.0, 10.0), "c3", (0.0, 0.0), "p")).unwrap();
    model.set_ports(vec![Port::new("p", "c2")]);
    model.set_frequency(FrequencySweep::new(1e3, 1e9).with_ndec(10.0)).unwrap();

    assert_eq!(model.nodes().len(), 4);
    assert_eq!(model.segments().len(), 4);
    let first = model.segments()[0].from();
    let closing = model.segments()[3].to();
    assert_eq!(closing, first);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.inp");
    model.write_file(&path, false).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, model.render().unwrap());
    assert!(text.starts_with("* Set the units\n.units mm\n"));
    assert!(text.contains("N4 x=0 y=10 z=0\n"));
    assert!(text.contains("E4 N4 N1 w=0.2 h=0.035 sigma=58000\n"));
    assert!(text.contains(".external N1 N3\n"));
    assert!(text.contains(".freq fmin=1e3 fmax=1e9 ndec=10\n"));
    assert!(text.ends_with("* Mark end of file\n.end\n"));
    assert_eq!(text.lines().count(), 23);
}

/// Ports may name nets in either role and in any order; resolution happens
/// at write time against whatever the node table holds by then.
#[test]
fn ports_set_before_their_nets_exist_still_resolve() {
    let mut model = InputModel::new(Unit::Mm);
    model.set_ports(vec![Port::new("late", "later")]);

    assert!(model.render().is_err());

    model.add_segment(trace((0.0, 0.0), "late", (5.0, 0.0), "later")).unwrap();
    let text = model.render().unwrap();
    assert!(text.contains(".external N1 N2\n"));
}
