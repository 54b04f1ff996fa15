mod siblings;
mod tree;
pub(crate) mod types;
pub use siblings::{
    child_group, layout_siblings, relayout_children, relayout_forest, shares_rank, sort_siblings,
};
pub use tree::{build_forest, is_tree_edge};
pub use types::*;

use crate::config::LayoutSettings;
use crate::error::MindmapError;
use crate::ir::{Edge, EdgeFilter, Graph, LayoutDirection, Node, Rect};
use std::collections::{HashMap, HashSet};
