use super::*;

/// Whether `edge` is a parent to child link under `direction`: both ends
/// exist and the target lies strictly beyond the source. Every other edge is
/// a cross-link.
pub fn is_tree_edge(graph: &Graph, edge: &Edge, direction: LayoutDirection) -> bool {
    match (graph.node(&edge.from_node), graph.node(&edge.to_node)) {
        (Some(from), Some(to)) => direction.is_beyond(&from.rect(), &to.rect()),
        _ => false,
    }
}

/// Builds the mind-map forest of `graph` for the given growth direction.
///
/// Roots are nodes without incoming edges. Children follow [`is_tree_edge`].
/// A node reachable from several parents hangs under the first one reached;
/// later parents only cross-link to it. Dangling edges and edges that would
/// close a cycle are dropped and reported in [`Forest::issues`].
pub fn build_forest(graph: &Graph, direction: LayoutDirection) -> Forest {
    let mut issues = Vec::new();
    let mut children: HashMap<&str, Vec<&Edge>> = HashMap::new();
    let mut has_parent: HashSet<&str> = HashSet::new();

    for edge in graph.edges() {
        let missing = [&edge.from_node, &edge.to_node]
            .into_iter()
            .find(|id| !graph.contains(id));
        if let Some(node_id) = missing {
            tracing::debug!(edge_id = %edge.id, %node_id, "ignoring dangling edge");
            issues.push(MindmapError::DanglingEdgeReference {
                edge_id: edge.id.clone(),
                node_id: node_id.clone(),
            });
            continue;
        }
        children.entry(edge.from_node.as_str()).or_default().push(edge);
        has_parent.insert(edge.to_node.as_str());
    }

    let mut walk = Walk {
        graph,
        direction,
        children,
        placed: HashSet::new(),
        path: Vec::new(),
        issues,
    };
    let mut trees = Vec::new();
    for root in graph.nodes() {
        if has_parent.contains(root.id.as_str()) {
            continue;
        }
        trees.push(walk.subtree(root));
    }

    Forest {
        trees,
        issues: walk.issues,
    }
}

struct Walk<'a> {
    graph: &'a Graph,
    direction: LayoutDirection,
    children: HashMap<&'a str, Vec<&'a Edge>>,
    /// Nodes already attached somewhere in the forest.
    placed: HashSet<&'a str>,
    path: Vec<&'a str>,
    issues: Vec<MindmapError>,
}

impl<'a> Walk<'a> {
    fn subtree(&mut self, node: &'a Node) -> TreeNode {
        self.placed.insert(node.id.as_str());
        self.path.push(node.id.as_str());
        let mut tree = TreeNode::leaf(node.id.clone());

        let edges = self.children.get(node.id.as_str()).cloned().unwrap_or_default();
        for edge in edges {
            if !is_tree_edge(self.graph, edge, self.direction) {
                continue;
            }
            let Some(child) = self.graph.node(&edge.to_node) else {
                continue;
            };
            if self.path.contains(&child.id.as_str()) {
                tracing::debug!(edge_id = %edge.id, node_id = %child.id, "cycle in mind map, skipping edge");
                self.issues.push(MindmapError::CyclicGraph {
                    edge_id: edge.id.clone(),
                    node_id: child.id.clone(),
                });
                continue;
            }
            if self.placed.contains(child.id.as_str()) {
                tracing::debug!(edge_id = %edge.id, node_id = %child.id, "node already has a tree parent, keeping edge as cross-link");
                continue;
            }
            tree.children.push(self.subtree(child));
        }

        self.path.pop();
        tree
    }
}
