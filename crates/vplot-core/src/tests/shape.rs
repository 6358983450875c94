use crate::columns::{CO2_LIQ, H2O_LIQ, PRESSURE, XH2O_FL};
use crate::geom::point;
use crate::*;

fn isobar_table() -> Table {
    let xs = [0.5, 1.2, 2.0, 3.1, 4.0];
    let mut pressure = Vec::new();
    let mut h2o = Vec::new();
    let mut co2 = Vec::new();
    for p in [1000.0, 2000.0] {
        for &x in &xs {
            pressure.push(p);
            h2o.push(x);
            co2.push(p / 1000.0 * (0.3 - 0.05 * x + 0.002 * x * x));
        }
    }
    Table::from_columns([(PRESSURE, pressure), (H2O_LIQ, h2o), (CO2_LIQ, co2)]).unwrap()
}

#[test]
fn two_pressures_give_two_resampled_curves() {
    let groups = shape(
        &isobar_table(),
        PRESSURE,
        H2O_LIQ,
        CO2_LIQ,
        ShapeOptions::isobars(),
    )
    .unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, 1000.0);
    assert_eq!(groups[1].key, 2000.0);
    for g in &groups {
        assert!(g.is_smoothed());
        assert_eq!(g.resampled_len(), 50);
        assert!(g.leading_anchor);
        let first = g.points[0];
        assert!(first.x == 0.0 || first.y == 0.0);
        let last = g.points[g.len() - 1];
        assert!(last.x == 0.0 || last.y == 0.0);
    }
}

#[test]
fn resampled_grid_spans_first_to_last_sample() {
    let options = ShapeOptions::isobars().with_extend_to_zero(false);
    let groups = shape(&isobar_table(), PRESSURE, H2O_LIQ, CO2_LIQ, options).unwrap();
    let xs = groups[0].xs();
    assert_eq!(xs.len(), 50);
    assert_eq!(xs[0], 0.5);
    assert_eq!(xs[49], 4.0);
    assert!(!groups[0].leading_anchor && !groups[0].trailing_anchor);
}

#[test]
fn shaping_is_repeatable() {
    let table = isobar_table();
    let a = shape(&table, PRESSURE, H2O_LIQ, CO2_LIQ, ShapeOptions::isobars()).unwrap();
    let b = shape(&table, PRESSURE, H2O_LIQ, CO2_LIQ, ShapeOptions::isobars()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn degenerate_group_keeps_raw_points() {
    let table = Table::from_columns([
        (XH2O_FL, vec![0.5, 0.5, 0.9, 0.9, 0.9, 0.9]),
        (H2O_LIQ, vec![1.0, 2.0, 1.0, 2.0, 3.0, 4.0]),
        (CO2_LIQ, vec![0.3, 0.2, 0.05, 0.06, 0.08, 0.1]),
    ])
    .unwrap();
    let groups = shape(&table, XH2O_FL, H2O_LIQ, CO2_LIQ, ShapeOptions::isopleths()).unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!(
        groups[0].fit,
        CurveFit::Raw {
            reason: Some(Degenerate::TooFewPoints {
                points: 2,
                required: 3
            })
        }
    );
    assert_eq!(groups[0].points, vec![point(1.0, 0.3), point(2.0, 0.2)]);

    assert!(groups[1].is_smoothed());
    assert_eq!(groups[1].len(), 50);
}

#[test]
fn constant_x_group_falls_back_with_every_point() {
    let table = Table::from_columns([
        (XH2O_FL, vec![0.7, 0.7, 0.7, 0.7]),
        (H2O_LIQ, vec![2.0, 2.0, 2.0, 2.0]),
        (CO2_LIQ, vec![0.1, 0.2, 0.3, 0.4]),
    ])
    .unwrap();
    let groups = shape(&table, XH2O_FL, H2O_LIQ, CO2_LIQ, ShapeOptions::isopleths()).unwrap();
    assert_eq!(groups.len(), 1);
    assert!(matches!(
        groups[0].fit,
        CurveFit::Raw {
            reason: Some(Degenerate::Singular { required: 3, .. })
        }
    ));
    assert_eq!(groups[0].len(), 4);
    assert_eq!(
        groups[0].points,
        vec![
            point(2.0, 0.1),
            point(2.0, 0.2),
            point(2.0, 0.3),
            point(2.0, 0.4)
        ]
    );
}

#[test]
fn unsmoothed_curves_keep_raw_points_and_can_extend() {
    let table = Table::from_columns([
        (PRESSURE, vec![500.0, 500.0]),
        (H2O_LIQ, vec![1.0, 3.0]),
        (CO2_LIQ, vec![2.0, 0.5]),
    ])
    .unwrap();
    let options = ShapeOptions::isobars().with_smooth(false);
    let groups = shape(&table, PRESSURE, H2O_LIQ, CO2_LIQ, options).unwrap();
    assert_eq!(groups[0].fit, CurveFit::Raw { reason: None });
    assert_eq!(
        groups[0].points,
        vec![
            point(1.0, 0.0),
            point(1.0, 2.0),
            point(3.0, 0.5),
            point(3.0, 0.0)
        ]
    );
}

#[test]
fn origin_row_joins_the_zero_pressure_group() {
    let table = Table::from_columns([
        (PRESSURE, vec![0.0, 0.0]),
        (H2O_LIQ, vec![1.0, 2.0]),
        (CO2_LIQ, vec![0.0, 0.0]),
    ])
    .unwrap();
    let options = ShapeOptions::isobars().with_smooth(false);
    let groups = shape(&table, PRESSURE, H2O_LIQ, CO2_LIQ, options).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].points[2], point(0.0, 0.0));
}

#[test]
fn extension_follows_tie_break_rules() {
    // leading x > y -> (0, y); trailing x < y -> (0, y)
    let mut pts = vec![point(3.0, 1.0), point(2.0, 2.0), point(1.0, 4.0)];
    assert_eq!(extend_to_axes(&mut pts), (true, true));
    assert_eq!(pts[0], point(0.0, 1.0));
    assert_eq!(pts[4], point(0.0, 4.0));
    assert_eq!(&pts[1..4], &[point(3.0, 1.0), point(2.0, 2.0), point(1.0, 4.0)]);

    // leading x <= y -> (x, 0); trailing x >= y -> (x, 0)
    let mut pts = vec![point(1.0, 1.0), point(5.0, 2.0)];
    extend_to_axes(&mut pts);
    assert_eq!(pts.first(), Some(&point(1.0, 0.0)));
    assert_eq!(pts.last(), Some(&point(5.0, 0.0)));
}

#[test]
fn extension_skips_ends_already_on_an_axis() {
    let mut pts = vec![point(0.0, 2.0), point(1.0, 1.0), point(3.0, 0.0)];
    assert_eq!(extend_to_axes(&mut pts), (false, false));
    assert_eq!(pts.len(), 3);

    let mut empty = Vec::new();
    assert_eq!(extend_to_axes(&mut empty), (false, false));
}

#[test]
fn smoothed_tables_flatten_groups() {
    let isopleths = Table::from_columns([
        (XH2O_FL, vec![0.25, 0.25, 0.25, 0.25]),
        (H2O_LIQ, vec![0.5, 1.0, 2.0, 3.0]),
        (CO2_LIQ, vec![0.1, 0.2, 0.5, 0.9]),
    ])
    .unwrap();
    let out = smooth_isobars_and_isopleths(Some(&isobar_table()), Some(&isopleths)).unwrap();

    let isobars = out.isobars.unwrap();
    assert_eq!(isobars.len(), 100);
    assert_eq!(
        isobars.column_names().collect::<Vec<_>>(),
        vec![PRESSURE, H2O_LIQ, CO2_LIQ]
    );
    let isopleths = out.isopleths.unwrap();
    assert_eq!(isopleths.len(), 50);
    assert_eq!(isopleths.unique(XH2O_FL).unwrap(), vec![0.25]);

    let none = smooth_isobars_and_isopleths(None, None).unwrap();
    assert_eq!(none, SmoothedCurves::default());
}
