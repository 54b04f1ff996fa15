pub type Result<T> = std::result::Result<T, MindmapError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MindmapError {
    #[error("expected exactly one selected node, found {count}")]
    InvalidSelection { count: usize },

    #[error("edge {edge_id} references missing node {node_id}")]
    DanglingEdgeReference { edge_id: String, node_id: String },

    #[error("edge {edge_id} closes a cycle back to node {node_id}")]
    CyclicGraph { edge_id: String, node_id: String },

    #[error("node {node_id} does not exist")]
    InvalidReference { node_id: String },

    #[error("node id {node_id} is already in use")]
    DuplicateId { node_id: String },

    #[error("edge id {edge_id} is already in use")]
    DuplicateEdgeId { edge_id: String },

    #[error("node {node_id} has an invalid size ({width} x {height})")]
    InvalidGeometry {
        node_id: String,
        width: f32,
        height: f32,
    },

    #[error("could not read headings of {file}: {message}")]
    Headings { file: String, message: String },
}
