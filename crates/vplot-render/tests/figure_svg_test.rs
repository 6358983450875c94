use vplot_core::geom::point;
use vplot_render::{
    Annotation, Figure, LayoutOptions, LegendLabel, LegendPlacement, LineStyle, Marker, Series,
    SvgRenderOptions, Theme, layout_figure, layout_to_json, render_svg,
};

fn sample_figure() -> Figure {
    let mut fig = Figure::new(8.0, 6.0);
    fig.set_labels("H2O wt%", "CO2 wt%");
    fig.legend = Some(LegendPlacement::outside_right(1.01));
    fig.add_series(
        Series::line(
            vec![point(0.0, 0.0), point(f64::NAN, 1.0), point(2.0, 0.5)],
            LineStyle::Dashed,
        )
        .with_color("#0072B2")
        .with_label(LegendLabel::entry("XH2Ofl 0.5")),
    );
    fig.add_series(
        Series::markers(vec![point(1.0, 0.2), point(2.0, 0.4)], Marker::FilledPlus)
            .with_color("red")
            .with_edge_color("white")
            .with_label(LegendLabel::entry("User <Data>")),
    );
    fig.annotate(Annotation::new("Trachyte\n(Q < 20%)\n\nTrachydacite", point(1.0, 0.3)));
    fig
}

fn render(fig: &Figure, id: Option<&str>) -> String {
    let layout = layout_figure(fig, &Theme::default(), &LayoutOptions::default()).unwrap();
    render_svg(
        &layout,
        &SvgRenderOptions {
            diagram_id: id.map(str::to_string),
        },
    )
    .unwrap()
}

#[test]
fn svg_is_well_formed_with_sized_root() {
    let svg = render(&sample_figure(), None);
    let doc = roxmltree::Document::parse(&svg).expect("valid xml");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("id"), Some("vplot"));
    assert_eq!(root.attribute("width"), Some("800"));
    assert_eq!(root.attribute("viewBox"), Some("0 0 800 600"));
}

#[test]
fn clipped_elements_reference_the_plot_clip_path() {
    let svg = render(&sample_figure(), Some("fig1"));
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let clip = doc
        .descendants()
        .find(|n| n.has_tag_name("clipPath"))
        .expect("clip path");
    assert_eq!(clip.attribute("id"), Some("fig1-plot-clip"));

    let clipped = doc
        .descendants()
        .filter(|n| n.attribute("clip-path") == Some("url(#fig1-plot-clip)"))
        .count();
    // Line, markers, and the annotation wrapper.
    assert_eq!(clipped, 3);
}

#[test]
fn dashed_line_breaks_at_gaps() {
    let svg = render(&sample_figure(), None);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let line = doc
        .descendants()
        .filter(|n| n.has_tag_name("g") && n.attribute("class") == Some("line-plot-0"))
        .flat_map(|g| g.children())
        .find(|n| n.has_tag_name("path"))
        .expect("line path");
    let d = line.attribute("d").unwrap();
    assert_eq!(d.matches('M').count(), 2);
    assert!(!d.contains('L'));
    assert!(line.attribute("stroke-dasharray").is_some());
    assert_eq!(line.attribute("fill"), Some("none"));
    assert_eq!(line.attribute("stroke"), Some("#0072B2"));
}

#[test]
fn multi_line_text_becomes_tspans() {
    let svg = render(&sample_figure(), None);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let text = doc
        .descendants()
        .find(|n| {
            n.has_tag_name("text") && n.children().any(|c| c.text() == Some("(Q < 20%)"))
        })
        .expect("annotation text");
    let spans: Vec<_> = text.children().filter(|c| c.has_tag_name("tspan")).collect();
    assert_eq!(spans.len(), 4);
    assert_eq!(spans[0].text(), Some("Trachyte"));
    assert_eq!(spans[2].text(), Some("\u{a0}"));
    assert_eq!(spans[3].attribute("dy"), Some("1.2em"));
}

#[test]
fn legend_text_is_escaped() {
    let svg = render(&sample_figure(), None);
    assert!(svg.contains("User &lt;Data&gt;"));
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("g") && n.attribute("class") == Some("labels"))
        .flat_map(|g| g.children())
        .filter_map(|t| t.text())
        .collect();
    assert_eq!(labels, vec!["XH2Ofl 0.5", "User <Data>"]);
}

#[test]
fn layout_serializes_to_json() {
    let layout =
        layout_figure(&sample_figure(), &Theme::default(), &LayoutOptions::default()).unwrap();
    let json = layout_to_json(&layout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["width"], 800.0);
    assert!(value["drawables"].as_array().is_some_and(|d| !d.is_empty()));
    assert!(value["legendArea"].is_object());
}
