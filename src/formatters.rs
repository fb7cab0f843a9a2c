use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_json::json;
use tracing::{info, warn};

use crate::config::{MapperConfig, VisualizationConfig};
use crate::graph_builder::SgGraph;
use crate::types::Node;

const DEFAULT_TITLE: &str = "Security Group Relationships";

/// A rendering back-end for a built graph. Implementations are selected by
/// engine name, never by inspecting the graph.
pub trait Renderer {
    /// Render the graph to the output path. An empty graph is reported as
    /// a warning and skipped; it is not an error.
    fn render(&self, graph: &SgGraph, output: &Path, title: Option<&str>) -> Result<()>;

    /// File extension this renderer's artifacts use.
    fn extension(&self) -> &'static str;
}

/// Select a renderer by engine name ("dot" or "json").
pub fn renderer_for(engine: &str, config: &MapperConfig) -> Result<Box<dyn Renderer>> {
    match engine {
        "dot" => Ok(Box::new(DotRenderer::new(config.visualization.clone()))),
        "json" => Ok(Box::new(JsonRenderer)),
        other => bail!("Unknown render engine: {}", other),
    }
}

// Graphviz DOT output. Security groups cluster into their VPCs so the
// container boundaries show up in the drawing; cross-VPC edges are dashed.
pub struct DotRenderer {
    settings: VisualizationConfig,
}

impl DotRenderer {
    pub fn new(settings: VisualizationConfig) -> Self {
        Self { settings }
    }

    fn to_dot(&self, graph: &SgGraph, title: Option<&str>) -> String {
        let mut output = String::from("digraph {\n");

        output.push_str("    graph [fontname=\"Arial\", rankdir=TB, splines=true];\n");
        output.push_str(&format!(
            "    node [fontname=\"Arial\", fontsize={}];\n",
            self.settings.font_size
        ));
        output.push_str(&format!(
            "    edge [fontname=\"Arial\", fontsize={}];\n",
            self.settings.font_size.saturating_sub(2).max(1)
        ));
        output.push_str(&format!(
            "    label=\"{}\";\n    labelloc=t;\n\n",
            escape_label(title.unwrap_or(DEFAULT_TITLE))
        ));

        let (vpc_groups, cidr_nodes) = graph.group_nodes_by_vpc();

        // One cluster per VPC
        for (cluster_id, (vpc_id, node_keys)) in vpc_groups.iter().enumerate() {
            output.push_str(&format!("    subgraph cluster_{} {{\n", cluster_id));
            output.push_str(&format!(
                "        label=\"VPC: {}\";\n",
                escape_label(vpc_id)
            ));
            output.push_str("        style=\"filled\";\n");
            output.push_str("        fillcolor=\"#f8f9fa\";\n");
            output.push_str("        color=\"#6c757d\";\n");
            for key in node_keys {
                if let (Some(idx), Some(node)) = (graph.node_index(key), graph.node(key)) {
                    output.push_str("        ");
                    output.push_str(&self.format_node(idx, node));
                    output.push('\n');
                }
            }
            output.push_str("    }\n");
        }

        // Address blocks live outside any VPC boundary
        for key in &cidr_nodes {
            if let (Some(idx), Some(node)) = (graph.node_index(key), graph.node(key)) {
                output.push_str("    ");
                output.push_str(&self.format_node(idx, node));
                output.push('\n');
            }
        }
        output.push('\n');

        for edge in graph.graph().edge_references() {
            let attrs = edge.weight();
            let (color, style, penwidth) = if attrs.is_cross_vpc {
                ("#FF6B6B", "dashed", f64::from(self.settings.edge_width) * 1.5)
            } else {
                ("#404040", "solid", f64::from(self.settings.edge_width) * 1.2)
            };
            output.push_str(&format!(
                "    {} -> {} [label=\"{}\", color=\"{}\", style=\"{}\", penwidth={:.1}];\n",
                edge.source().index(),
                edge.target().index(),
                escape_label(&attrs.label),
                color,
                style,
                penwidth
            ));
        }

        output.push_str("}\n");
        output
    }

    fn format_node(&self, idx: NodeIndex, node: &Node) -> String {
        let (label, shape, fillcolor, width) = match node {
            Node::SecurityGroup {
                id,
                name,
                description,
                is_highlighted,
                ..
            } => {
                let desc: String = description.chars().take(30).collect();
                let label = format!("{}\n({})\n{}...", name, id, desc);
                if *is_highlighted {
                    (label, "ellipse", "#FF6B6B", self.node_width(1.5))
                } else {
                    (label, "ellipse", "#5B9BD5", self.node_width(1.2))
                }
            }
            Node::AddressBlock { label } => {
                (label.clone(), "box", "#70AD47", self.node_width(1.0))
            }
        };

        format!(
            "{} [label=\"{}\", shape={}, fillcolor=\"{}\", style=\"filled\", width={:.1}];",
            idx.index(),
            escape_label(&label),
            shape,
            fillcolor,
            width
        )
    }

    // node_size is in layout units; DOT wants inches
    fn node_width(&self, factor: f64) -> f64 {
        f64::from(self.settings.node_size) * factor / 1000.0
    }
}

impl Renderer for DotRenderer {
    fn render(&self, graph: &SgGraph, output: &Path, title: Option<&str>) -> Result<()> {
        if graph.is_empty() {
            warn!("No nodes in graph to visualize");
            return Ok(());
        }

        let dot = self.to_dot(graph, title);
        fs::write(output, dot)
            .with_context(|| format!("Failed to write to file: {:?}", output))?;
        info!("Graph visualization saved to {}", output.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "dot"
    }
}

// Nodes/edges document for downstream interactive viewers.
pub struct JsonRenderer;

impl JsonRenderer {
    fn to_json(graph: &SgGraph) -> serde_json::Value {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut node_id_map: HashMap<NodeIndex, String> = HashMap::new();

        for idx in graph.graph().node_indices() {
            match &graph.graph()[idx] {
                Node::SecurityGroup {
                    id,
                    name,
                    description,
                    vpc_id,
                    is_highlighted,
                } => {
                    node_id_map.insert(idx, id.clone());
                    nodes.push(json!({
                        "id": id,
                        "label": name,
                        "group": "security_group",
                        "description": description,
                        "vpc_id": vpc_id,
                        "is_highlighted": is_highlighted,
                    }));
                }
                Node::AddressBlock { label } => {
                    let node_id = format!("CIDR: {}", label);
                    node_id_map.insert(idx, node_id.clone());
                    nodes.push(json!({
                        "id": node_id,
                        "label": label,
                        "group": "cidr",
                    }));
                }
            }
        }

        for edge in graph.graph().edge_references() {
            let attrs = edge.weight();
            edges.push(json!({
                "from": node_id_map[&edge.source()],
                "to": node_id_map[&edge.target()],
                "label": attrs.label,
                "protocol": attrs.protocol,
                "ports": attrs.ports,
                "is_cross_vpc": attrs.is_cross_vpc,
                "dashes": attrs.is_cross_vpc,
            }));
        }

        json!({
            "nodes": nodes,
            "edges": edges,
        })
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, graph: &SgGraph, output: &Path, _title: Option<&str>) -> Result<()> {
        if graph.is_empty() {
            warn!("No nodes in graph to visualize");
            return Ok(());
        }

        let value = Self::to_json(graph);
        let content = serde_json::to_string_pretty(&value)
            .context("Failed to serialize graph to JSON")?;
        fs::write(output, content)
            .with_context(|| format!("Failed to write to file: {:?}", output))?;
        info!("Graph data saved to {}", output.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

// Escape for DOT double-quoted strings.
fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
