use std::path::{Path, PathBuf};

use canvas_mindmap::commands::{
    create_child, create_sibling, delete_and_relayout, navigate, paint, relayout,
    split_into_mindmap,
};
use canvas_mindmap::headings::MarkdownHeadings;
use canvas_mindmap::ids::SequentialIds;
use canvas_mindmap::layout::build_forest;
use canvas_mindmap::render::render_svg;
use canvas_mindmap::theme::Theme;
use canvas_mindmap::{
    Graph, LayoutDirection, MindmapError, NodeKind, Rect, Selection, Settings, Side,
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> Graph {
    let input = std::fs::read_to_string(fixtures().join(name)).expect("fixture read failed");
    Graph::from_json(&input).expect("fixture parse failed")
}

fn ys(graph: &Graph, ids: &[&str]) -> Vec<f32> {
    ids.iter()
        .map(|id| graph.node(id).expect("node missing").y)
        .collect()
}

#[test]
fn fixtures_load_and_render() {
    for name in [
        "mindmap_lr.canvas",
        "navigation.canvas",
        "split.canvas",
        "passthrough.canvas",
    ] {
        let graph = load_fixture(name);
        let svg = render_svg(&graph, &Theme::light());
        assert!(svg.contains("<svg"), "{name}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{name}: missing </svg tag");
    }
}

#[test]
fn tree_excludes_edges_against_the_direction() {
    let graph = load_fixture("mindmap_lr.canvas");
    let forest = build_forest(&graph, LayoutDirection::LeftRight);
    let root = forest.find("root").expect("root tree");
    let children: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(children, vec!["c1", "c2", "c3"]);
    assert!(root.find("note").is_none());
    assert_eq!(forest.issues.len(), 1);

    let flipped = build_forest(&graph, LayoutDirection::RightLeft);
    let root = flipped.find("root").expect("root tree");
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].id, "note");
}

#[test]
fn fourth_child_recenters_the_group() {
    let graph = load_fixture("mindmap_lr.canvas");
    let settings = Settings::default();
    let mut ids = SequentialIds::new("n");
    let edit = create_child(&graph, &Selection::only("root"), &settings, &mut ids)
        .unwrap()
        .expect("child created");

    let child_id = edit.focus.clone().expect("focus on new child");
    assert_eq!(child_id, "n1");
    let child = edit.graph.node(&child_id).unwrap();
    assert_eq!((child.x, child.width, child.height), (400.0, 200.0, 100.0));
    assert_eq!(
        ys(&edit.graph, &["c1", "c2", "c3", "n1"]),
        vec![-180.0, -60.0, 60.0, 180.0]
    );
    // The cross-linked note stays where it was.
    assert_eq!(edit.graph.node("note").unwrap().y, 0.0);

    let edge = edit.graph.edges().last().unwrap();
    assert_eq!((edge.from_node.as_str(), edge.to_node.as_str()), ("root", "n1"));
    assert_eq!(
        (edge.from_side, edge.to_side),
        (Some(Side::Right), Some(Side::Left))
    );
}

#[test]
fn sibling_lands_after_the_selection() {
    let graph = load_fixture("mindmap_lr.canvas");
    let settings = Settings::default();
    let mut ids = SequentialIds::new("s");
    let edit = create_sibling(&graph, &Selection::only("c1"), &settings, &mut ids)
        .unwrap()
        .expect("sibling created");
    assert_eq!(edit.focus.as_deref(), Some("s1"));
    assert_eq!(
        ys(&edit.graph, &["c1", "s1", "c2", "c3"]),
        vec![-180.0, -60.0, 60.0, 180.0]
    );
}

#[test]
fn delete_restacks_the_survivors() {
    let graph = load_fixture("mindmap_lr.canvas");
    let edit = delete_and_relayout(&graph, &Selection::only("c2"), &Settings::default())
        .unwrap()
        .expect("deleted");
    assert!(!edit.graph.contains("c2"));
    assert!(edit.graph.edges().iter().all(|e| e.to_node != "c2"));
    assert_eq!(edit.focus.as_deref(), Some("root"));
    assert_eq!(ys(&edit.graph, &["c1", "c3"]), vec![-60.0, 60.0]);
}

#[test]
fn multi_selection_is_a_no_op() {
    let graph = load_fixture("mindmap_lr.canvas");
    let selection: Selection = ["c1", "c2"].into_iter().collect();
    let mut ids = SequentialIds::new("n");
    assert!(
        create_child(&graph, &selection, &Settings::default(), &mut ids)
            .unwrap()
            .is_none()
    );
    assert!(paint(&graph, &selection, Some("2")).unwrap().is_none());
}

#[test]
fn relayout_whole_canvas_centers_every_group() {
    let graph = load_fixture("mindmap_lr.canvas");
    let edit = relayout(&graph, &Selection::new(), &Settings::default()).expect("relayout");
    assert_eq!(ys(&edit.graph, &["c1", "c2", "c3"]), vec![-120.0, 0.0, 120.0]);
}

#[test]
fn paint_colours_outgoing_edges() {
    let graph = load_fixture("mindmap_lr.canvas");
    let edit = paint(&graph, &Selection::only("root"), Some("5"))
        .unwrap()
        .expect("painted");
    assert_eq!(edit.graph.node("root").unwrap().color.as_deref(), Some("5"));
    for edge in edit.graph.edges().iter().filter(|e| e.from_node == "root") {
        assert_eq!(edge.color.as_deref(), Some("5"));
    }
    assert!(edit.graph.edges().iter().find(|e| e.id == "d1").unwrap().color.is_none());
}

#[test]
fn navigation_prefers_aligned_nodes() {
    let graph = load_fixture("navigation.canvas");
    let settings = Settings::default();
    let sel = Selection::only("sel");
    assert_eq!(
        navigate(&graph, &sel, Side::Top, None, &settings).as_deref(),
        Some("above")
    );
    assert_eq!(
        navigate(&graph, &sel, Side::Right, None, &settings).as_deref(),
        Some("right")
    );
    let viewport = Rect::new(0.0, 0.0, 200.0, 200.0);
    assert_eq!(
        navigate(&graph, &sel, Side::Right, Some(&viewport), &settings),
        None
    );

    let mut disabled = Settings::default();
    disabled.navigate.use_navigate = false;
    assert_eq!(navigate(&graph, &sel, Side::Top, None, &disabled), None);
}

#[test]
fn split_reads_level_one_headings_from_the_vault() {
    let graph = load_fixture("split.canvas");
    let provider = MarkdownHeadings::new(fixtures().join("vault"));
    let mut ids = SequentialIds::new("h");
    let edit = split_into_mindmap(
        &graph,
        &Selection::only("doc"),
        &provider,
        &Settings::default(),
        &mut ids,
    )
    .unwrap()
    .expect("split applied");

    let children: Vec<_> = edit
        .graph
        .nodes()
        .iter()
        .filter(|node| node.id != "doc")
        .collect();
    let subpaths: Vec<_> = children
        .iter()
        .map(|node| match &node.kind {
            NodeKind::File { file, subpath } => {
                assert_eq!(file, "plan.md");
                subpath.clone().unwrap_or_default()
            }
            other => panic!("expected file node, got {other:?}"),
        })
        .collect();
    assert_eq!(subpaths, vec!["#Goals", "#Team", "#Timeline"]);

    for node in &children {
        assert_eq!((node.x, node.width, node.height), (600.0, 400.0, 300.0));
    }
    let ys: Vec<_> = children.iter().map(|node| node.y).collect();
    assert_eq!(ys, vec![-220.0, 100.0, 420.0]);
    assert_eq!(edit.graph.edges().len(), 3);
}

#[test]
fn split_of_missing_document_is_a_no_op() {
    let graph = load_fixture("split.canvas");
    let provider = MarkdownHeadings::new(fixtures().join("no-such-vault"));
    let mut ids = SequentialIds::new("h");
    let edit = split_into_mindmap(
        &graph,
        &Selection::only("doc"),
        &provider,
        &Settings::default(),
        &mut ids,
    )
    .unwrap();
    assert!(edit.is_none());
}

#[test]
fn split_surfaces_unreadable_documents() {
    let vault = std::env::temp_dir().join(format!("cmm-vault-{}", std::process::id()));
    std::fs::create_dir_all(vault.join("plan.md")).expect("create vault");
    let graph = load_fixture("split.canvas");
    let provider = MarkdownHeadings::new(&vault);
    let mut ids = SequentialIds::new("h");
    let result = split_into_mindmap(
        &graph,
        &Selection::only("doc"),
        &provider,
        &Settings::default(),
        &mut ids,
    );
    let _ = std::fs::remove_dir_all(&vault);
    match result {
        Err(MindmapError::Headings { file, .. }) => assert_eq!(file, "plan.md"),
        other => panic!("expected a headings error, got {other:?}"),
    }
}

#[test]
fn canvas_round_trips_through_json() {
    let graph = load_fixture("mindmap_lr.canvas");
    let json = graph.to_json_pretty().unwrap();
    let again = Graph::from_json(&json).unwrap();
    assert_eq!(again.nodes(), graph.nodes());
    assert_eq!(again.edges(), graph.edges());
    assert!(json.contains("\"fromNode\""));
}

#[test]
fn unmodelled_fields_survive_a_round_trip() {
    let graph = load_fixture("passthrough.canvas");
    let json = graph.to_json_pretty().unwrap();
    let again = Graph::from_json(&json).unwrap();
    assert_eq!(again.nodes(), graph.nodes());
    assert_eq!(again.edges(), graph.edges());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let board = &value["nodes"][0];
    assert_eq!(board["background"], "img/paper.png");
    assert_eq!(board["backgroundStyle"], "repeat");
    assert_eq!(board["label"], "Board");
    assert_eq!(value["nodes"][1]["styleAttributes"]["shape"], "pill");
    assert_eq!(value["nodes"][2]["subpath"], "#Intro");
    assert_eq!(value["edges"][0]["fromEnd"], "arrow");
    assert_eq!(value["edges"][0]["toEnd"], "none");

    let loose = &value["edges"][1];
    assert!(loose.get("fromSide").is_none());
    assert!(loose.get("toSide").is_none());
    assert_eq!(loose["label"], "loose");
    assert_eq!(json.matches("\"type\"").count(), 3);
}

#[test]
fn side_less_edges_count_as_tree_edges() {
    let graph = load_fixture("passthrough.canvas");
    let forest = build_forest(&graph, LayoutDirection::LeftRight);
    let root = forest.find("root").expect("root tree");
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].id, "leaf");
    assert!(forest.issues.is_empty());
}
