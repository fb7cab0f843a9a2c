use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::config::MapperConfig;
use crate::types::{Edge, Node, PermissionRule, SecurityGroupRecord, UNKNOWN_VPC};
use crate::utils::{display_protocol, format_ports, friendly_cidr_name};

// Address block nodes are keyed by their friendly label under this prefix,
// so two rules naming the same CIDR collapse to one node.
const CIDR_KEY_PREFIX: &str = "CIDR: ";

/// Directed relationship graph over security group records.
///
/// Nodes are security groups (keyed by group id) and address blocks (keyed
/// by friendly CIDR label). Edges point from the permission source to the
/// group that declared the rule. One instance owns one mutable graph;
/// `build` clears prior state, so an instance can be reused sequentially
/// across units of work.
pub struct SgGraph {
    config: MapperConfig,
    graph: DiGraph<Node, Edge>,
    node_map: HashMap<String, NodeIndex>,
    highlight: Option<String>,
}

impl SgGraph {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            highlight: None,
        }
    }

    /// Drop all graph state, ready for the next build.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_map.clear();
        self.highlight = None;
    }

    /// Build the relationship graph from a set of records, in input order.
    ///
    /// Never fails: missing optional fields default, references to absent
    /// groups synthesize placeholder nodes, and invalid CIDR strings become
    /// literal labels. An empty record set yields an empty graph.
    pub fn build(&mut self, records: &[SecurityGroupRecord], highlight: Option<&str>) {
        self.clear();
        self.highlight = highlight.map(str::to_string);

        for record in records {
            let node = Node::SecurityGroup {
                id: record.group_id.clone(),
                name: record.group_name.clone(),
                description: record.description.clone(),
                vpc_id: record.vpc_id.clone(),
                is_highlighted: self.is_highlighted(&record.group_id),
            };
            self.upsert_node(&record.group_id, node);

            for rule in &record.permissions {
                self.process_permission(rule, &record.group_id, &record.vpc_id);
            }
        }

        debug!(
            "Built graph with {} nodes and {} edges from {} records",
            self.graph.node_count(),
            self.graph.edge_count(),
            records.len()
        );
    }

    fn process_permission(&mut self, rule: &PermissionRule, target_group_id: &str, vpc_id: &str) {
        let label = format!(
            "{}:{}",
            display_protocol(&rule.protocol),
            format_ports(rule.from_port, rule.to_port)
        );
        let ports = format!("{}-{}", rule.from_port, rule.to_port);

        for reference in &rule.group_references {
            let source_id = match reference.group_id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => continue,
            };
            let source_vpc = &reference.vpc_id;

            if !self.node_map.contains_key(&source_id) {
                let placeholder = Node::SecurityGroup {
                    id: source_id.clone(),
                    name: format!("Security Group {}", source_id),
                    description: "Referenced Security Group".to_string(),
                    vpc_id: source_vpc.clone(),
                    is_highlighted: self.is_highlighted(&source_id),
                };
                self.upsert_node(&source_id, placeholder);
            }

            let is_cross_vpc = source_vpc != vpc_id && source_vpc != UNKNOWN_VPC;
            self.upsert_edge(
                &source_id,
                target_group_id,
                Edge {
                    label: label.clone(),
                    protocol: rule.protocol.clone(),
                    ports: ports.clone(),
                    is_cross_vpc,
                },
            );
        }

        for range in &rule.address_ranges {
            let cidr = match range.cidr.as_deref() {
                Some(cidr) if !cidr.is_empty() => cidr,
                _ => continue,
            };

            let friendly = friendly_cidr_name(cidr, &self.config);
            let key = format!("{}{}", CIDR_KEY_PREFIX, friendly);
            self.intern_node(&key, Node::AddressBlock { label: friendly });
            self.upsert_edge(
                &key,
                target_group_id,
                Edge {
                    label: label.clone(),
                    protocol: rule.protocol.clone(),
                    ports: ports.clone(),
                    is_cross_vpc: false,
                },
            );
        }
    }

    // Insert a node under the given key, overwriting the attributes of an
    // existing node with the same key. Keys are unique across the graph.
    fn upsert_node(&mut self, key: &str, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(key) {
            self.graph[idx] = node;
            idx
        } else {
            let idx = self.graph.add_node(node);
            self.node_map.insert(key.to_string(), idx);
            idx
        }
    }

    // Insert a node only if the key is new; first insertion wins.
    fn intern_node(&mut self, key: &str, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(key) {
            idx
        } else {
            let idx = self.graph.add_node(node);
            self.node_map.insert(key.to_string(), idx);
            idx
        }
    }

    // One edge per ordered node pair: a later rule for the same pair
    // overwrites the earlier edge's attributes.
    fn upsert_edge(&mut self, source_key: &str, target_key: &str, edge: Edge) {
        if let (Some(&source), Some(&target)) =
            (self.node_map.get(source_key), self.node_map.get(target_key))
        {
            self.graph.update_edge(source, target, edge);
        }
    }

    fn is_highlighted(&self, group_id: &str) -> bool {
        self.highlight.as_deref() == Some(group_id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    pub fn graph(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }

    pub fn node_index(&self, key: &str) -> Option<NodeIndex> {
        self.node_map.get(key).copied()
    }

    /// Look up a node by key: a group id, or "CIDR: " plus the friendly label.
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.node_index(key).map(|idx| &self.graph[idx])
    }

    /// Iterate all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Iterate all directed edges as (source, target, attributes).
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node, &Edge)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    /// Partition security group node keys by VPC, and list address block
    /// node keys separately. Renderers use this to draw VPC boundaries.
    /// Returns a sorted map so output is stable across runs.
    pub fn group_nodes_by_vpc(&self) -> (BTreeMap<String, Vec<String>>, Vec<String>) {
        let mut vpc_groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut cidr_nodes = Vec::new();

        for idx in self.graph.node_indices() {
            match &self.graph[idx] {
                Node::SecurityGroup { id, vpc_id, .. } => {
                    vpc_groups.entry(vpc_id.clone()).or_default().push(id.clone());
                }
                Node::AddressBlock { label } => {
                    cidr_nodes.push(format!("{}{}", CIDR_KEY_PREFIX, label));
                }
            }
        }

        (vpc_groups, cidr_nodes)
    }
}
