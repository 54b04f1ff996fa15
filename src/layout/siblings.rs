use super::*;

/// Extent of `rect` along the stacking axis: `(start, size)`.
fn stack_extent(rect: &Rect, direction: LayoutDirection) -> (f32, f32) {
    if direction.is_horizontal() {
        (rect.y, rect.height)
    } else {
        (rect.x, rect.width)
    }
}

/// Coordinate of `rect` on the axis children grow along.
fn rank_coordinate(rect: &Rect, direction: LayoutDirection) -> f32 {
    if direction.is_horizontal() { rect.x } else { rect.y }
}

/// Whether the siblings already sit on one rank, i.e. share the child-axis
/// coordinate within `tolerance`.
pub fn shares_rank(siblings: &[Sibling], direction: LayoutDirection, tolerance: f32) -> bool {
    let Some(first) = siblings.first() else {
        return true;
    };
    let anchor = rank_coordinate(&first.rect, direction);
    siblings
        .iter()
        .all(|sibling| (rank_coordinate(&sibling.rect, direction) - anchor).abs() <= tolerance)
}

/// Stacks `siblings` in the given order, centered on `parent`.
///
/// For horizontal layouts the stack runs top to bottom, for vertical layouts
/// left to right. Consecutive siblings are separated by exactly
/// `settings.sibling_gap`. Returns no placements when there is nothing to
/// stack (fewer than two siblings) or when the siblings are not on one rank.
pub fn layout_siblings(
    parent: &Rect,
    siblings: &[Sibling],
    settings: &LayoutSettings,
) -> Vec<Placement> {
    let direction = settings.direction;
    if siblings.len() <= 1 {
        return Vec::new();
    }
    if !shares_rank(siblings, direction, settings.rank_tolerance) {
        tracing::debug!(
            count = siblings.len(),
            "siblings are not aligned on one rank, leaving them in place"
        );
        return Vec::new();
    }

    let gap = settings.sibling_gap;
    let total: f32 = siblings
        .iter()
        .map(|sibling| stack_extent(&sibling.rect, direction).1 + gap)
        .sum::<f32>()
        - gap;
    let parent_mid = if direction.is_horizontal() {
        parent.mid_y()
    } else {
        parent.mid_x()
    };
    let rank = rank_coordinate(&siblings[0].rect, direction);

    let mut cursor = parent_mid - total / 2.0;
    let mut placements = Vec::with_capacity(siblings.len());
    for sibling in siblings {
        let (x, y) = if direction.is_horizontal() {
            (rank, cursor)
        } else {
            (cursor, rank)
        };
        placements.push(Placement {
            id: sibling.id.clone(),
            x,
            y,
        });
        cursor += stack_extent(&sibling.rect, direction).1 + gap;
    }
    placements
}

/// Orders siblings along the stacking axis, keeping input order on ties.
pub fn sort_siblings(siblings: &mut [Sibling], direction: LayoutDirection) {
    siblings.sort_by(|a, b| {
        stack_extent(&a.rect, direction)
            .0
            .total_cmp(&stack_extent(&b.rect, direction).0)
    });
}

/// Children of `parent_id` in mind-map terms: targets of its outgoing
/// [tree edges](is_tree_edge). Duplicate targets are skipped.
pub fn child_group(graph: &Graph, parent_id: &str, direction: LayoutDirection) -> Vec<Sibling> {
    let mut seen = HashSet::new();
    graph
        .edges_for_node(parent_id, EdgeFilter::Outgoing)
        .filter(|edge| is_tree_edge(graph, edge, direction))
        .filter_map(|edge| graph.node(&edge.to_node))
        .filter(|node| seen.insert(node.id.as_str()))
        .map(Sibling::from)
        .collect()
}

/// Re-stacks the current children of `parent_id`, sorted along the stacking
/// axis. Returns the placements that differ from the current positions.
pub fn relayout_children(graph: &Graph, parent_id: &str, settings: &LayoutSettings) -> Vec<Placement> {
    let Some(parent) = graph.node(parent_id) else {
        return Vec::new();
    };
    let mut siblings = child_group(graph, parent_id, settings.direction);
    sort_siblings(&mut siblings, settings.direction);
    layout_siblings(&parent.rect(), &siblings, settings)
        .into_iter()
        .filter(|placement| {
            graph
                .node(&placement.id)
                .is_some_and(|node| node.x != placement.x || node.y != placement.y)
        })
        .collect()
}

/// Auto-layout pass: walks every tree top-down and re-stacks each node's
/// [`child_group`] around the (already moved) node.
pub fn relayout_forest(graph: &Graph, settings: &LayoutSettings) -> Graph {
    let forest = build_forest(graph, settings.direction);
    let mut next = graph.clone();
    for tree in &forest.trees {
        relayout_subtree(&mut next, tree, settings);
    }
    next
}

fn relayout_subtree(graph: &mut Graph, tree: &TreeNode, settings: &LayoutSettings) {
    let Some(parent) = graph.node(&tree.id).map(Node::rect) else {
        return;
    };
    let mut siblings = child_group(graph, &tree.id, settings.direction);
    sort_siblings(&mut siblings, settings.direction);
    let placements = layout_siblings(&parent, &siblings, settings);
    crate::mutate::place(graph, &placements);
    for child in &tree.children {
        relayout_subtree(graph, child, settings);
    }
}
