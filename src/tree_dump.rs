use crate::ir::{Graph, LayoutDirection};
use crate::layout::{Forest, TreeNode};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct TreeDump {
    pub direction: String,
    pub node_count: usize,
    pub trees: Vec<TreeNodeDump>,
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TreeNodeDump {
    pub id: String,
    pub caption: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub children: Vec<TreeNodeDump>,
}

fn dump_node(tree: &TreeNode, graph: &Graph, depth: usize) -> TreeNodeDump {
    let node = graph.node(&tree.id);
    TreeNodeDump {
        id: tree.id.clone(),
        caption: node.map(|n| n.kind.caption()).unwrap_or_default(),
        x: node.map(|n| n.x).unwrap_or_default(),
        y: node.map(|n| n.y).unwrap_or_default(),
        width: node.map(|n| n.width).unwrap_or_default(),
        height: node.map(|n| n.height).unwrap_or_default(),
        depth,
        children: tree
            .children
            .iter()
            .map(|child| dump_node(child, graph, depth + 1))
            .collect(),
    }
}

impl TreeDump {
    pub fn from_forest(forest: &Forest, graph: &Graph, direction: LayoutDirection) -> Self {
        TreeDump {
            direction: direction.token().to_string(),
            node_count: forest.len(),
            trees: forest
                .trees
                .iter()
                .map(|tree| dump_node(tree, graph, 0))
                .collect(),
            issues: forest.issues.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn write_tree_dump(
    path: Option<&Path>,
    forest: &Forest,
    graph: &Graph,
    direction: LayoutDirection,
) -> anyhow::Result<()> {
    let dump = TreeDump::from_forest(forest, graph, direction);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_forest;

    #[test]
    fn dump_nests_children_with_depth() {
        let graph = Graph::from_json(
            r#"{
                "nodes": [
                    {"id": "r", "type": "text", "text": "Root\nsecond line", "x": 0, "y": 0, "width": 10, "height": 10},
                    {"id": "c", "type": "link", "url": "https://example.com", "x": 50, "y": 0, "width": 10, "height": 10}
                ],
                "edges": [
                    {"id": "e", "fromNode": "r", "fromSide": "right", "toNode": "c", "toSide": "left"},
                    {"id": "x", "fromNode": "r", "fromSide": "right", "toNode": "gone", "toSide": "left"}
                ]
            }"#,
        )
        .unwrap();
        let forest = build_forest(&graph, LayoutDirection::LeftRight);
        let dump = TreeDump::from_forest(&forest, &graph, LayoutDirection::LeftRight);
        assert_eq!(dump.direction, "LR");
        assert_eq!(dump.node_count, 2);
        assert_eq!(dump.trees[0].caption, "Root");
        assert_eq!(dump.trees[0].children[0].depth, 1);
        assert_eq!(dump.trees[0].children[0].caption, "https://example.com");
        assert_eq!(dump.issues.len(), 1);
        assert!(dump.issues[0].contains("gone"));
    }
}
