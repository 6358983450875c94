use vplot::columns::{K2O, NA2O, NA2O_K2O, SIO2};
use vplot::render::{AxisLimits, LegendLabel, Marker, Theme};
use vplot::tas::{TAS_FIELD_LINES, TAS_FIELD_NAMES, compose_tas};
use vplot::{
    Applicability, CalibrationEntry, ChemicalSystem, InMemoryCatalog, ModelSelection, PlotError,
    PlotKind, Sample, SampleSet, Table, TasPlot, Zoom,
};

fn oxides(silica: Vec<f64>, na2o: Vec<f64>, k2o: Vec<f64>) -> Table {
    Table::from_columns([(SIO2, silica), (NA2O, na2o), (K2O, k2o)]).unwrap()
}

const EVERYTHING: Applicability = Applicability {
    h2o: true,
    co2: true,
    mixed: true,
};

fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(
        "MagmaSat",
        EVERYTHING,
        CalibrationEntry::new("#F4A582")
            .with_subset(
                ChemicalSystem::PureH2O,
                oxides(vec![50.0, 70.0], vec![3.0, 4.0], vec![1.0, 3.0]),
            )
            .with_subset(
                ChemicalSystem::PureCO2,
                oxides(vec![48.0, 49.0], vec![2.0, 2.5], vec![0.5, 0.7]),
            )
            .with_subset(
                ChemicalSystem::Mixed,
                oxides(vec![55.0, 56.0, 57.0], vec![3.5, 3.6, 3.7], vec![2.0, 2.1, 2.2]),
            ),
    );
    catalog.insert(
        "MooreWater",
        Applicability {
            h2o: true,
            ..Applicability::default()
        },
        CalibrationEntry::new("#B2182B").with_subset(
            ChemicalSystem::PureH2O,
            Table::from_columns([(SIO2, vec![60.0]), (NA2O_K2O, vec![7.5])]).unwrap(),
        ),
    );
    catalog.insert(
        "AllisonCarbon",
        Applicability {
            co2: true,
            ..Applicability::default()
        },
        CalibrationEntry::new("#D6604D").with_subset(
            ChemicalSystem::PureCO2,
            Table::from_columns([(SIO2, vec![47.0])]).unwrap(),
        ),
    );
    catalog.insert_unavailable(
        "Liu",
        EVERYTHING,
        "Calibration dataset not available for Liu.",
    );
    catalog
}

fn named(models: &[&str]) -> ModelSelection {
    ModelSelection::Named(models.iter().map(|m| m.to_string()).collect())
}

fn legend_texts(fig: &vplot::render::Figure) -> Vec<&str> {
    fig.legend_entries().filter_map(|s| s.label.text()).collect()
}

#[test]
fn magmasat_gets_both_sections_and_the_field_overlay() {
    let plot = TasPlot {
        models: named(&["MagmaSat"]),
        ..TasPlot::default()
    };
    let theme = Theme::default();
    let fig = compose_tas(&plot, &catalog(), &theme).unwrap();

    assert_eq!(
        legend_texts(&fig),
        vec![
            "Pure H₂O:",
            "MagmaSat",
            "",
            "CO₂ and H₂O-CO₂:",
            "MagmaSat"
        ]
    );
    assert_eq!(fig.annotations().len(), TAS_FIELD_NAMES.len());
    let field_lines: Vec<_> = fig
        .series()
        .iter()
        .filter(|s| s.z_order == 0 && s.label.is_hidden())
        .collect();
    assert_eq!(field_lines.len(), TAS_FIELD_LINES.len());
    assert!(
        field_lines
            .iter()
            .all(|s| s.color.as_deref() == Some(theme.field_color.as_str()))
    );

    assert_eq!(fig.x_limits, AxisLimits::fixed(35.0, 100.0));
    assert_eq!(fig.y_limits, AxisLimits::fixed(0.0, 25.0));
    assert_eq!(fig.x_label.as_deref(), Some("SiO₂, wt%"));
    assert_eq!(fig.y_label.as_deref(), Some("Na₂O+K₂O, wt%"));
    assert_eq!(fig.axis_label_font_size, Some(20.0));
    assert!(fig.tight_layout);
    assert!(fig.legend.is_some());
    assert_eq!((fig.width, fig.height), (17.0, 8.0));
}

#[test]
fn calibration_markers_use_section_shapes_and_concatenate_subsets() {
    let plot = TasPlot {
        models: named(&["MagmaSat"]),
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    let models: Vec<_> = fig
        .series()
        .iter()
        .filter(|s| s.label == LegendLabel::entry("MagmaSat"))
        .collect();
    assert_eq!(models.len(), 2);

    assert_eq!(models[0].marker, Some(Marker::Square));
    assert_eq!(models[0].points.len(), 2);
    assert_eq!(models[0].points[0].y, 4.0);
    assert_eq!(models[0].color.as_deref(), Some("#F4A582"));
    assert_eq!(models[0].edge_color.as_deref(), Some("black"));

    assert_eq!(models[1].marker, Some(Marker::ThinDiamond));
    assert_eq!(models[1].points.len(), 5);
}

#[test]
fn combined_alkali_column_is_used_when_present() {
    let plot = TasPlot {
        models: named(&["MooreWater"]),
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    assert_eq!(legend_texts(&fig), vec!["Pure H₂O:", "MooreWater"]);
    let series = fig
        .series()
        .iter()
        .find(|s| s.label == LegendLabel::entry("MooreWater"))
        .unwrap();
    assert_eq!(series.points[0].x, 60.0);
    assert_eq!(series.points[0].y, 7.5);
}

#[test]
fn unusable_models_are_skipped_not_fatal() {
    let plot = TasPlot {
        models: named(&["Liu", "NotAModel", "AllisonCarbon", "MooreWater"]),
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    // Liu is unavailable, NotAModel unknown, AllisonCarbon lacks alkali columns.
    assert_eq!(
        legend_texts(&fig),
        vec!["Pure H₂O:", "MooreWater", "", "CO₂ and H₂O-CO₂:"]
    );
}

#[test]
fn around_sample_zoom_centers_on_a_single_sample() {
    let sample = SampleSet::from(
        Sample::new()
            .with(SIO2, 50.0)
            .with(NA2O, 1.0)
            .with(K2O, 0.5),
    );
    let plot = TasPlot {
        user_data: Some(&sample),
        models: named(&["MooreWater"]),
        zoom: Zoom::AroundSample,
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    assert_eq!(fig.x_limits, AxisLimits::fixed(45.0, 55.0));
    assert_eq!(fig.y_limits, AxisLimits::fixed(0.0, 3.5));
    assert!(fig.annotations().is_empty());

    let user = fig.series().last().unwrap();
    assert_eq!(user.label, LegendLabel::entry("User Data"));
    assert_eq!(user.marker, Some(Marker::FilledPlus));
    assert_eq!(user.color.as_deref(), Some("red"));
    assert_eq!(user.edge_color.as_deref(), Some("white"));
    assert_eq!(user.marker_size, Some(150f64.sqrt()));
}

#[test]
fn around_sample_zoom_falls_back_for_collections() {
    let samples = SampleSet::from(oxides(vec![50.0, 60.0], vec![3.0, 4.0], vec![1.0, 2.0]));
    let plot = TasPlot {
        user_data: Some(&samples),
        models: named(&["MooreWater"]),
        zoom: Zoom::AroundSample,
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    assert_eq!(fig.x_limits, AxisLimits::fixed(35.0, 100.0));
    assert_eq!(fig.y_limits, AxisLimits::fixed(0.0, 25.0));
    assert_eq!(fig.series().last().unwrap().points.len(), 2);
}

#[test]
fn explicit_limits_are_used_verbatim() {
    let plot = TasPlot {
        models: named(&["MooreWater"]),
        zoom: Zoom::Limits {
            x: (40.0, 80.0),
            y: (-1.0, 12.0),
        },
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    assert_eq!(fig.x_limits, AxisLimits::fixed(40.0, 80.0));
    assert_eq!(fig.y_limits, AxisLimits::fixed(-1.0, 12.0));
    assert!(fig.annotations().is_empty());
}

#[test]
fn xy_kind_plots_named_oxides_without_fields() {
    let samples = SampleSet::from(oxides(vec![50.0], vec![3.0], vec![1.0]));
    let plot = TasPlot {
        user_data: Some(&samples),
        models: named(&["MagmaSat"]),
        kind: PlotKind::parse("xy", Some(SIO2), Some(K2O)).unwrap(),
        legend: false,
        ..TasPlot::default()
    };
    let fig = compose_tas(&plot, &catalog(), &Theme::default()).unwrap();
    assert_eq!(fig.x_label.as_deref(), Some("SiO2, wt%"));
    assert_eq!(fig.y_label.as_deref(), Some("K2O, wt%"));
    assert!(fig.x_limits.is_auto());
    assert!(fig.annotations().is_empty());
    assert!(fig.legend.is_none());

    let h2o = &fig.series()[1];
    assert_eq!(h2o.points[1].y, 3.0);
    let user = fig.series().last().unwrap();
    assert_eq!(user.points[0].y, 1.0);
}

#[test]
fn user_samples_need_alkalis_in_tas_mode() {
    let samples = SampleSet::from(Sample::new().with(SIO2, 50.0).with(NA2O, 3.0));
    let plot = TasPlot {
        user_data: Some(&samples),
        models: named(&["MagmaSat"]),
        ..TasPlot::default()
    };
    let err = compose_tas(&plot, &catalog(), &Theme::default()).unwrap_err();
    assert!(matches!(err, PlotError::Input(_)));
    assert_eq!(err.to_string(), "Na2O and K2O data must be in user_data");
}

#[test]
fn empty_model_list_is_a_usage_error() {
    let plot = TasPlot {
        models: ModelSelection::Named(Vec::new()),
        ..TasPlot::default()
    };
    assert!(matches!(
        compose_tas(&plot, &catalog(), &Theme::default()),
        Err(PlotError::Input(_))
    ));
}

#[test]
fn all_models_skip_what_the_catalog_lacks() {
    let fig = compose_tas(&TasPlot::default(), &catalog(), &Theme::default()).unwrap();
    let texts = legend_texts(&fig);
    assert_eq!(texts.iter().filter(|t| **t == "MagmaSat").count(), 2);
    assert!(texts.contains(&"MooreWater"));
    assert!(!texts.contains(&"Liu"));
    assert!(!texts.contains(&"Dixon"));
}
