use std::collections::HashSet;

use graphviz_rust::{
    cmd::{CommandArg, Format},
    dot_structures::{
        Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
    },
    exec,
    printer::{DotPrinter, PrinterContext},
};

use crate::layer::{LayerId, Position};
use crate::synapse::Sign;
use crate::view::LayerView;

/// Node of `layer` at `pos`, as a DOT identifier.
fn dot_id(layer: LayerId, pos: Position) -> NodeId {
    let name = layer.name().replace('-', "_");
    NodeId(Id::Plain(format!("{}_{}_{}", name, pos.row, pos.col)), None)
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.into()), Id::Escaped(format!("\"{}\"", value)))
}

/// Low output is green, high output red.
fn output_color(output: f32, max: f32) -> String {
    let level = if max > 0.0 {
        (output / max * 255.0).clamp(0.0, 255.0) as u8
    } else {
        0
    };
    format!("#{:02x}{:02x}00", level, 255 - level)
}

fn sign_color(sign: Sign) -> &'static str {
    match sign {
        Sign::Excitatory => "#2e8b57",
        Sign::Inhibitory => "#b22222",
    }
}

/// Build a DOT graph of `view`: one pinned, filled node per cell, a point
/// per distinct upstream source, one edge per incoming synapse.
pub fn layer_graph(view: &LayerView, clamp_max: f32) -> Graph {
    let mut g = Graph::DiGraph {
        id: Id::Plain(view.layer.name().replace('-', "_")),
        strict: false,
        stmts: Vec::new(),
    };

    g.add_stmt(Stmt::GAttribute(GraphAttributes::Graph(vec![
        Attribute(Id::Plain("layout".into()), Id::Plain("neato".into())),
        Attribute(Id::Plain("overlap".into()), Id::Plain("true".into())),
        Attribute(Id::Plain("splines".into()), Id::Plain("line".into())),
    ])));

    let mut sources = HashSet::new();
    for node in &view.nodes {
        let pos = node.position;
        let node_id = dot_id(view.layer, pos);
        g.add_stmt(Stmt::Node(Node::new(
            node_id.clone(),
            vec![
                attr("shape", "circle"),
                attr("style", "filled"),
                attr("label", ""),
                attr("fillcolor", &output_color(node.output, clamp_max)),
                attr("pos", &format!("{},{}!", pos.col, -(pos.row as isize))),
            ],
        )));

        for syn in &node.synapses {
            let src = (syn.source_layer, syn.source);
            if sources.insert(src) {
                g.add_stmt(Stmt::Node(Node::new(
                    dot_id(syn.source_layer, syn.source),
                    vec![
                        attr("shape", "point"),
                        attr(
                            "pos",
                            &format!("{},{}!", syn.source.col as f32 + 0.3, -(syn.source.row as f32) - 0.3),
                        ),
                    ],
                )));
            }

            g.add_stmt(Stmt::Edge(Edge {
                ty: EdgeTy::Pair(
                    Vertex::N(dot_id(syn.source_layer, syn.source)),
                    Vertex::N(node_id.clone()),
                ),
                // no arrowhead
                attributes: vec![
                    attr("dir", "none"),
                    attr("color", sign_color(syn.sign)),
                    attr("penwidth", &format!("{:.2}", syn.weight.max(0.1))),
                ],
            }));
        }
    }

    g
}

pub fn to_dot(view: &LayerView, clamp_max: f32) -> String {
    layer_graph(view, clamp_max).print(&mut PrinterContext::default())
}

/// Render `view` using Graphviz' **neato** engine and return a PNG in-memory.
/// Requires a `dot`/Graphviz installation.
pub fn to_neato_png(view: &LayerView, clamp_max: f32) -> std::io::Result<Vec<u8>> {
    let mut ctx = PrinterContext::default();
    exec(
        layer_graph(view, clamp_max),
        &mut ctx,
        vec![CommandArg::Format(Format::Png)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Retina, RetinaParams};

    fn view(layer: LayerId) -> LayerView {
        let retina = Retina::build(&RetinaParams {
            rows: 2,
            cols: 3,
            ..Default::default()
        })
        .unwrap();
        LayerView::capture(&retina, layer)
    }

    #[test]
    fn one_dot_node_per_cell() {
        let dot = to_dot(&view(LayerId::Photoreceptor), 255.0);
        for row in 0..2 {
            for col in 0..3 {
                assert!(dot.contains(&format!("photoreceptor_{row}_{col}")));
            }
        }
        assert!(!dot.contains("--") && !dot.contains("->"));
    }

    #[test]
    fn synapses_become_edges() {
        let v = view(LayerId::OffCenter);
        let g = layer_graph(&v, 255.0);
        let Graph::DiGraph { stmts, .. } = g else {
            panic!("expected a digraph");
        };
        let edges = stmts.iter().filter(|s| matches!(s, Stmt::Edge(_))).count();
        let synapses: usize = v.nodes.iter().map(|n| n.synapses.len()).sum();
        assert_eq!(edges, synapses);
        assert!(to_dot(&v, 255.0).contains("#b22222"));
    }

    #[test]
    fn colors_scale_with_output() {
        assert_eq!(output_color(0.0, 255.0), "#00ff00");
        assert_eq!(output_color(255.0, 255.0), "#ff0000");
        assert_eq!(output_color(1.0, 0.0), "#00ff00");
    }
}
