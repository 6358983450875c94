//! SVG serializer for [`ChartLayout`].

pub(crate) mod util;

use crate::Result;
use crate::model::{ChartDrawableElem, ChartLayout, ChartPathData, ChartRectData, ChartTextData};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use util::{escape_xml, fmt};

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root element id; also prefixes the plot clip path id. Defaults to `vplot`.
    pub diagram_id: Option<String>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    /// Pre-escaped.
    text: Option<String>,
    children: Vec<usize>,
}

fn node(tag: &str) -> Node {
    Node {
        tag: tag.to_string(),
        attrs: BTreeMap::new(),
        text: None,
        children: Vec::new(),
    }
}

impl Node {
    fn attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }
}

fn push_child(arena: &mut Vec<Node>, parent: usize, child: Node) -> usize {
    let id = arena.len();
    arena.push(child);
    arena[parent].children.push(id);
    id
}

fn render_node(out: &mut String, arena: &[Node], id: usize) {
    let n = &arena[id];
    out.push('<');
    out.push_str(&n.tag);
    for (k, v) in &n.attrs {
        let _ = write!(out, r#" {k}="{v}""#);
    }
    if n.children.is_empty() && n.text.as_deref().unwrap_or("").is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(t) = n.text.as_deref() {
        out.push_str(t);
    }
    for c in &n.children {
        render_node(out, arena, *c);
    }
    let _ = write!(out, "</{}>", n.tag);
}

fn text_anchor(horizontal_pos: &str) -> &'static str {
    match horizontal_pos {
        "left" => "start",
        "right" => "end",
        _ => "middle",
    }
}

fn dominant_baseline(vertical_pos: &str) -> &'static str {
    match vertical_pos {
        "top" => "text-before-edge",
        "bottom" => "text-after-edge",
        _ => "middle",
    }
}

/// Resolves (creating on first use) the nested `<g class=..>` chain for `group_texts`.
fn group_for(
    arena: &mut Vec<Node>,
    groups_by_prefix: &mut HashMap<String, usize>,
    group_texts: &[String],
) -> usize {
    let mut prefix = String::new();
    let mut parent = 0usize;
    for seg in group_texts {
        prefix.push('/');
        prefix.push_str(seg);
        parent = match groups_by_prefix.get(&prefix).copied() {
            Some(existing) => existing,
            None => {
                let mut g = node("g");
                g.attr("class", escape_xml(seg));
                let id = push_child(arena, parent, g);
                groups_by_prefix.insert(prefix.clone(), id);
                id
            }
        };
    }
    parent
}

fn rect_node(r: &ChartRectData) -> Node {
    let mut n = node("rect");
    n.attr("x", fmt(r.x))
        .attr("y", fmt(r.y))
        .attr("width", fmt(r.width))
        .attr("height", fmt(r.height))
        .attr("fill", escape_xml(&r.fill))
        .attr("stroke", escape_xml(&r.stroke_fill))
        .attr("stroke-width", fmt(r.stroke_width));
    n
}

fn path_node(p: &ChartPathData) -> Node {
    let mut n = node("path");
    n.attr("d", p.path.clone())
        .attr("fill", escape_xml(p.fill.as_deref().unwrap_or("none")))
        .attr("stroke", escape_xml(&p.stroke_fill))
        .attr("stroke-width", fmt(p.stroke_width));
    if let Some(dashes) = p.dash_array.as_deref().filter(|d| !d.is_empty()) {
        let dashes: Vec<String> = dashes.iter().map(|d| fmt(*d)).collect();
        n.attr("stroke-dasharray", dashes.join(","));
    }
    n
}

/// `\n` splits a label into `<tspan>` rows, shifted so the block honors its vertical alignment.
fn text_node(arena: &mut Vec<Node>, parent: usize, t: &ChartTextData) -> usize {
    let mut n = node("text");
    n.attr("x", "0")
        .attr("y", "0")
        .attr("fill", escape_xml(&t.fill))
        .attr("font-size", fmt(t.font_size))
        .attr("dominant-baseline", dominant_baseline(&t.vertical_pos))
        .attr("text-anchor", text_anchor(&t.horizontal_pos))
        .attr(
            "transform",
            format!(
                "translate({}, {}) rotate({})",
                fmt(t.x),
                fmt(t.y),
                fmt(t.rotation)
            ),
        );
    if let Some(weight) = &t.font_weight {
        n.attr("font-weight", escape_xml(weight));
    }

    let lines: Vec<&str> = t.text.split('\n').collect();
    if lines.len() == 1 {
        n.text = Some(escape_xml(&t.text));
        return push_child(arena, parent, n);
    }

    let id = push_child(arena, parent, n);
    let extra = (lines.len() - 1) as f64;
    let first_dy = match t.vertical_pos.as_str() {
        "top" => 0.0,
        "bottom" => -1.2 * extra,
        _ => -0.6 * extra,
    };
    for (i, line) in lines.iter().enumerate() {
        let mut span = node("tspan");
        let dy = if i == 0 { first_dy } else { 1.2 };
        span.attr("x", "0").attr("dy", format!("{}em", fmt(dy)));
        // Keep blank rows so the following lines stay in place.
        span.text = Some(if line.is_empty() {
            "&#160;".to_string()
        } else {
            escape_xml(line)
        });
        push_child(arena, id, span);
    }
    id
}

pub fn render_svg(layout: &ChartLayout, options: &SvgRenderOptions) -> Result<String> {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("vplot");
    let diagram_id_esc = escape_xml(diagram_id);
    let clip_id = format!("{diagram_id_esc}-plot-clip");

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{diagram_id_esc}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}" role="graphics-document document" aria-roledescription="vplot">"#,
        w = fmt(layout.width.max(1.0)),
        h = fmt(layout.height.max(1.0)),
        font = escape_xml(&layout.font_family),
    );

    let plot = layout.plot_area;
    let _ = write!(
        &mut out,
        r#"<defs><clipPath id="{clip_id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        fmt(plot.x),
        fmt(plot.y),
        fmt(plot.width),
        fmt(plot.height),
    );

    let mut arena: Vec<Node> = Vec::new();
    arena.push(node("g"));
    arena[0].attr("class", "main");

    let mut bg = node("rect");
    bg.attr("width", fmt(layout.width))
        .attr("height", fmt(layout.height))
        .attr("class", "background")
        .attr("fill", escape_xml(&layout.background_color));
    push_child(&mut arena, 0, bg);

    let clip_ref = format!("url(#{clip_id})");
    let mut groups_by_prefix: HashMap<String, usize> = HashMap::new();
    for shape in &layout.drawables {
        match shape {
            ChartDrawableElem::Rect { group_texts, data } => {
                if data.is_empty() {
                    continue;
                }
                let parent = group_for(&mut arena, &mut groups_by_prefix, group_texts);
                for r in data {
                    push_child(&mut arena, parent, rect_node(r));
                }
            }
            ChartDrawableElem::Path {
                group_texts,
                clipped,
                data,
            } => {
                if data.is_empty() {
                    continue;
                }
                let parent = group_for(&mut arena, &mut groups_by_prefix, group_texts);
                for p in data {
                    let mut n = path_node(p);
                    if *clipped {
                        n.attr("clip-path", clip_ref.clone());
                    }
                    push_child(&mut arena, parent, n);
                }
            }
            ChartDrawableElem::Text {
                group_texts,
                clipped,
                data,
            } => {
                if data.is_empty() {
                    continue;
                }
                let parent = group_for(&mut arena, &mut groups_by_prefix, group_texts);
                for t in data {
                    // The text carries its own transform, so clip through a wrapper.
                    let target = if *clipped {
                        let mut g = node("g");
                        g.attr("clip-path", clip_ref.clone());
                        push_child(&mut arena, parent, g)
                    } else {
                        parent
                    };
                    text_node(&mut arena, target, t);
                }
            }
        }
    }

    render_node(&mut out, &arena, 0);
    out.push_str("</svg>");
    Ok(out)
}
