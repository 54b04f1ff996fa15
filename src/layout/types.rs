use crate::ir::{Node, Rect};
use serde::Serialize;

/// A member of a sibling group as the layout engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sibling {
    pub id: String,
    pub rect: Rect,
}

impl From<&Node> for Sibling {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            rect: node.rect(),
        }
    }
}

/// New top-left corner computed for a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Node in a derived mind-map tree. Never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Pre-order walk over the subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Result of tree construction: the trees plus any edges that had to be
/// dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub trees: Vec<TreeNode>,
    pub issues: Vec<crate::error::MindmapError>,
}

impl Forest {
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.trees.iter().find_map(|tree| tree.find(id))
    }

    pub fn len(&self) -> usize {
        self.trees.iter().map(TreeNode::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
