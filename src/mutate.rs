//! Snapshot-in, snapshot-out edits of a [`Graph`]. Nothing here mutates the
//! input graph and nothing here removes nodes or edges.

use crate::error::{MindmapError, Result};
use crate::ir::{Edge, Graph, Node, NodeKind, Rect, Side};
use crate::layout::Placement;

/// Everything about a new node except its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub rect: Rect,
    pub kind: NodeKind,
    pub color: Option<String>,
}

impl NodeSpec {
    pub fn new(rect: Rect, kind: NodeKind) -> Self {
        Self {
            rect,
            kind,
            color: None,
        }
    }

    /// Empty text node, the kind every keyboard command creates.
    pub fn empty_text(rect: Rect) -> Self {
        Self::new(rect, NodeKind::text(""))
    }
}

/// One end of a new edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEnd<'a> {
    pub node: &'a str,
    pub side: Side,
}

impl<'a> EdgeEnd<'a> {
    pub fn new(node: &'a str, side: Side) -> Self {
        Self { node, side }
    }
}

pub fn add_node(graph: &Graph, id: impl Into<String>, spec: NodeSpec) -> Result<(Graph, Node)> {
    let id = id.into();
    if graph.contains(&id) {
        return Err(MindmapError::DuplicateId { node_id: id });
    }
    let (width, height) = (spec.rect.width, spec.rect.height);
    if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
        return Err(MindmapError::InvalidGeometry {
            node_id: id,
            width: spec.rect.width,
            height: spec.rect.height,
        });
    }
    let node = Node {
        id,
        x: spec.rect.x,
        y: spec.rect.y,
        width: spec.rect.width,
        height: spec.rect.height,
        color: spec.color,
        kind: spec.kind,
        extra: Default::default(),
    };
    let mut next = graph.clone();
    next.push_node(node.clone());
    Ok((next, node))
}

pub fn add_edge(
    graph: &Graph,
    id: impl Into<String>,
    from: EdgeEnd<'_>,
    to: EdgeEnd<'_>,
) -> Result<Graph> {
    let id = id.into();
    if graph.edges().iter().any(|edge| edge.id == id) {
        return Err(MindmapError::DuplicateEdgeId { edge_id: id });
    }
    for end in [from, to] {
        if !graph.contains(end.node) {
            return Err(MindmapError::InvalidReference {
                node_id: end.node.to_string(),
            });
        }
    }
    let mut next = graph.clone();
    next.push_edge(Edge {
        id,
        from_node: from.node.to_string(),
        from_side: Some(from.side),
        to_node: to.node.to_string(),
        to_side: Some(to.side),
        color: None,
        label: None,
        extra: Default::default(),
    });
    Ok(next)
}

/// Moves nodes to their computed positions. Unknown ids are skipped.
pub fn apply_placements(graph: &Graph, placements: &[Placement]) -> Graph {
    let mut next = graph.clone();
    place(&mut next, placements);
    next
}

/// In-place form of [`apply_placements`] for passes that already own a
/// working snapshot.
pub(crate) fn place(graph: &mut Graph, placements: &[Placement]) {
    for placement in placements {
        match graph.node_mut(&placement.id) {
            Some(node) => {
                node.x = placement.x;
                node.y = placement.y;
            }
            None => tracing::debug!(node_id = %placement.id, "placement for unknown node ignored"),
        }
    }
}

/// Colours a node and every edge leaving it. `None` clears the colour.
pub fn paint_node(graph: &Graph, id: &str, color: Option<&str>) -> Result<Graph> {
    let mut next = graph.clone();
    let node = next
        .node_mut(id)
        .ok_or_else(|| MindmapError::InvalidReference {
            node_id: id.to_string(),
        })?;
    node.color = color.map(str::to_string);
    for edge in next.edges_mut().filter(|edge| edge.from_node == id) {
        edge.color = color.map(str::to_string);
    }
    Ok(next)
}
