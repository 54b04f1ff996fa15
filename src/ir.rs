use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Direction in which a mind map grows from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
}

impl LayoutDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            "TB" | "TD" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
        }
    }

    /// True when children sit beside their parent and siblings stack vertically.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Side of the parent an outgoing child edge leaves from.
    pub fn exit_side(self) -> Side {
        match self {
            Self::LeftRight => Side::Right,
            Self::RightLeft => Side::Left,
            Self::TopBottom => Side::Bottom,
            Self::BottomTop => Side::Top,
        }
    }

    /// Side of the child an incoming parent edge attaches to.
    pub fn entry_side(self) -> Side {
        self.exit_side().opposite()
    }

    /// Whether `child` lies strictly beyond `parent` in this direction.
    pub fn is_beyond(self, parent: &Rect, child: &Rect) -> bool {
        match self {
            Self::LeftRight => child.x > parent.x,
            Self::RightLeft => child.x < parent.x,
            Self::TopBottom => child.y > parent.y,
            Self::BottomTop => child.y < parent.y,
        }
    }
}

/// One edge of a node rectangle. Doubles as a cardinal direction for
/// navigation and floating-node placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" | "up" => Some(Self::Top),
            "bottom" | "down" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Side of `from` that faces `to`, for connectors stored without sides.
    pub fn facing(from: &Rect, to: &Rect) -> Self {
        let dx = to.mid_x() - from.mid_x();
        let dy = to.mid_y() - from.mid_y();
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 { Self::Right } else { Self::Left }
        } else if dy >= 0.0 {
            Self::Bottom
        } else {
            Self::Top
        }
    }

    /// Midpoint of this side of `rect`, where a connector attaches.
    pub fn anchor(self, rect: &Rect) -> (f32, f32) {
        match self {
            Self::Left => (rect.x, rect.mid_y()),
            Self::Right => (rect.right(), rect.mid_y()),
            Self::Top => (rect.mid_x(), rect.y),
            Self::Bottom => (rect.mid_x(), rect.bottom()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Text {
        #[serde(default)]
        text: String,
    },
    File {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subpath: Option<String>,
    },
    Link {
        url: String,
    },
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl NodeKind {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Keys of the persisted record that belong to this variant.
    fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Text { .. } => &["text"],
            Self::File { .. } => &["file", "subpath"],
            Self::Link { .. } => &["url"],
            Self::Group { .. } => &["label"],
        }
    }

    /// Short human-readable caption used by previews and dumps.
    pub fn caption(&self) -> String {
        match self {
            Self::Text { text } => text.lines().next().unwrap_or_default().to_string(),
            Self::File { file, subpath } => match subpath {
                Some(subpath) => format!("{file}{subpath}"),
                None => file.clone(),
            },
            Self::Link { url } => url.clone(),
            Self::Group { label } => label.clone().unwrap_or_default(),
        }
    }
}

/// A canvas card. Fields the model does not know about (`background`,
/// `styleAttributes`, ...) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord")]
pub struct Node {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of a node. The flattened map sees every key the named fields
/// did not take, including the ones `kind` consumed, so those are stripped
/// when converting.
#[derive(Deserialize)]
struct NodeRecord {
    id: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    color: Option<String>,
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let mut extra = record.extra;
        extra.remove("type");
        for key in record.kind.field_names() {
            extra.remove(*key);
        }
        Self {
            id: record.id,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            color: record.color,
            kind: record.kind,
            extra,
        }
    }
}

impl Node {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    pub to_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Unmodelled keys such as `fromEnd`/`toEnd`, passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilter {
    Outgoing,
    Incoming,
    Any,
}

/// Persisted canvas record, exactly as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Immutable snapshot of a canvas: nodes and edges in insertion order plus an
/// id index. Edits go through [`crate::mutate`] and produce a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CanvasData", into = "CanvasData")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if index.contains_key(&node.id) {
                tracing::warn!(node_id = %node.id, "duplicate node id in canvas; keeping the first");
                continue;
            }
            index.insert(node.id.clone(), idx);
        }
        Self {
            nodes,
            edges,
            index,
        }
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in insertion order; used as a stable tie-breaker.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn edges_for_node<'a>(
        &'a self,
        id: &'a str,
        filter: EdgeFilter,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| match filter {
            EdgeFilter::Outgoing => edge.from_node == id,
            EdgeFilter::Incoming => edge.to_node == id,
            EdgeFilter::Any => edge.from_node == id || edge.to_node == id,
        })
    }

    pub fn nodes_in_viewport(&self, viewport: &Rect) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| node.rect().intersects(viewport))
            .collect()
    }

    /// Edges whose endpoints both exist.
    pub fn is_resolved(&self, edge: &Edge) -> bool {
        self.contains(&edge.from_node) && self.contains(&edge.to_node)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.nodes.get_mut(idx)
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Drops a node and every edge touching it. Returns the removed node.
    pub(crate) fn remove_node(&mut self, id: &str) -> Option<Node> {
        let idx = self.index.remove(id)?;
        let node = self.nodes.remove(idx);
        self.edges
            .retain(|edge| edge.from_node != id && edge.to_node != id);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(node)
    }
}

impl From<CanvasData> for Graph {
    fn from(data: CanvasData) -> Self {
        Self::from_parts(data.nodes, data.edges)
    }
}

impl From<Graph> for CanvasData {
    fn from(graph: Graph) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

/// Currently active node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only(id: impl Into<String>) -> Self {
        let mut ids = BTreeSet::new();
        ids.insert(id.into());
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// The selected id when exactly one node is selected.
    pub fn single(&self) -> crate::error::Result<&str> {
        if self.ids.len() != 1 {
            return Err(crate::error::MindmapError::InvalidSelection {
                count: self.ids.len(),
            });
        }
        Ok(self.ids.iter().next().map(String::as_str).unwrap_or_default())
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
