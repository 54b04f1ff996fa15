//! Editing commands of the mind-map shell. Every command takes the current
//! snapshot plus explicit selection and settings, and returns the next
//! snapshot. `Ok(None)` means the command did not apply (wrong selection,
//! feature disabled, nothing to do) and the caller should leave the canvas
//! untouched.

use crate::config::Settings;
use crate::error::Result;
use crate::headings::HeadingsProvider;
use crate::ids::IdSource;
use crate::ir::{EdgeFilter, Graph, LayoutDirection, Node, NodeKind, Rect, Selection, Side};
use crate::layout::{
    Sibling, child_group, is_tree_edge, layout_siblings, relayout_children, relayout_forest,
    sort_siblings,
};
use crate::mutate::{EdgeEnd, NodeSpec, add_edge, add_node, apply_placements, paint_node};

#[derive(Debug, Clone)]
pub struct Edit {
    pub graph: Graph,
    /// Node to select and start editing once the snapshot is on screen.
    pub focus: Option<String>,
}

impl Edit {
    fn new(graph: Graph, focus: Option<String>) -> Self {
        Self { graph, focus }
    }
}

fn selected_node<'g>(graph: &'g Graph, selection: &Selection, command: &str) -> Option<&'g Node> {
    let id = match selection.single() {
        Ok(id) => id,
        Err(err) => {
            tracing::debug!(command, %err, "command skipped");
            return None;
        }
    };
    let node = graph.node(id);
    if node.is_none() {
        tracing::debug!(command, node_id = id, "selected node is not on the canvas");
    }
    node
}

/// Parent of `id`: the source of its first incoming tree edge, or of its
/// first incoming edge of any kind.
pub fn parent_of<'g>(graph: &'g Graph, id: &str, direction: LayoutDirection) -> Option<&'g Node> {
    let mut incoming = graph
        .edges_for_node(id, EdgeFilter::Incoming)
        .filter(|edge| graph.contains(&edge.from_node));
    let first = incoming.next()?;
    let preferred = std::iter::once(first)
        .chain(incoming)
        .find(|edge| is_tree_edge(graph, edge, direction))
        .unwrap_or(first);
    graph.node(&preferred.from_node)
}

/// Coordinate of the stacking axis where a rect starts, and its extent.
fn stack_span(rect: &Rect, direction: LayoutDirection) -> (f32, f32) {
    if direction.is_horizontal() {
        (rect.y, rect.height)
    } else {
        (rect.x, rect.width)
    }
}

/// Child-axis coordinate for a child of `parent` with the given size.
fn child_rank(parent: &Rect, width: f32, height: f32, gap: f32, direction: LayoutDirection) -> f32 {
    match direction {
        LayoutDirection::LeftRight => parent.right() + gap,
        LayoutDirection::RightLeft => parent.x - gap - width,
        LayoutDirection::TopBottom => parent.bottom() + gap,
        LayoutDirection::BottomTop => parent.y - gap - height,
    }
}

fn rect_at(rank: f32, stack: f32, width: f32, height: f32, direction: LayoutDirection) -> Rect {
    if direction.is_horizontal() {
        Rect::new(rank, stack, width, height)
    } else {
        Rect::new(stack, rank, width, height)
    }
}

/// Where a new child of `parent_id` lands before re-stacking: beside the
/// parent, after the last existing child (or level with the parent when it
/// has none), with the parent's size.
pub fn child_slot(graph: &Graph, parent_id: &str, settings: &Settings) -> Option<Rect> {
    let direction = settings.layout.direction;
    let parent = graph.node(parent_id)?.rect();
    let mut siblings = child_group(graph, parent_id, direction);
    sort_siblings(&mut siblings, direction);
    let stack = match siblings.last() {
        Some(last) => {
            let (start, extent) = stack_span(&last.rect, direction);
            start + extent + settings.layout.sibling_gap
        }
        None => stack_span(&parent, direction).0,
    };
    let rank = child_rank(
        &parent,
        parent.width,
        parent.height,
        settings.create.horizontal_gap,
        direction,
    );
    Some(rect_at(rank, stack, parent.width, parent.height, direction))
}

/// Adds `spec` as a new child node linked from `parent_id`.
fn attach_child(
    graph: &Graph,
    parent_id: &str,
    spec: NodeSpec,
    direction: LayoutDirection,
    ids: &mut dyn IdSource,
) -> Result<(Graph, Node)> {
    let (graph, node) = add_node(graph, ids.next_id(), spec)?;
    let graph = add_edge(
        &graph,
        ids.next_id(),
        EdgeEnd::new(parent_id, direction.exit_side()),
        EdgeEnd::new(&node.id, direction.entry_side()),
    )?;
    Ok((graph, node))
}

fn restack(graph: &Graph, parent: &Rect, siblings: &[Sibling], settings: &Settings) -> Graph {
    let placements = layout_siblings(parent, siblings, &settings.layout);
    apply_placements(graph, &placements)
}

/// Creates a child of the selected node and re-stacks the parent's children.
pub fn create_child(
    graph: &Graph,
    selection: &Selection,
    settings: &Settings,
    ids: &mut dyn IdSource,
) -> Result<Option<Edit>> {
    let Some(parent) = selected_node(graph, selection, "create-child") else {
        return Ok(None);
    };
    let direction = settings.layout.direction;
    let Some(slot) = child_slot(graph, &parent.id, settings) else {
        return Ok(None);
    };
    let mut siblings = child_group(graph, &parent.id, direction);
    sort_siblings(&mut siblings, direction);

    let (next, child) = attach_child(graph, &parent.id, NodeSpec::empty_text(slot), direction, ids)?;
    siblings.push(Sibling::from(&child));
    let next = restack(&next, &parent.rect(), &siblings, settings);

    tracing::info!(parent = %parent.id, child = %child.id, "created child node");
    Ok(Some(Edit::new(next, Some(child.id))))
}

/// Creates a sibling right after the selected node in its parent's stack.
pub fn create_sibling(
    graph: &Graph,
    selection: &Selection,
    settings: &Settings,
    ids: &mut dyn IdSource,
) -> Result<Option<Edit>> {
    let Some(selected) = selected_node(graph, selection, "create-sibling") else {
        return Ok(None);
    };
    let direction = settings.layout.direction;
    let Some(parent) = parent_of(graph, &selected.id, direction) else {
        tracing::debug!(node_id = %selected.id, "selected node has no parent, no sibling created");
        return Ok(None);
    };

    let mut siblings = child_group(graph, &parent.id, direction);
    sort_siblings(&mut siblings, direction);
    let parent_rect = parent.rect();
    let (rect, insert_at) = match siblings.iter().position(|sibling| sibling.id == selected.id) {
        Some(idx) => {
            let selected_rect = selected.rect();
            let (start, extent) = stack_span(&selected_rect, direction);
            let rank = if direction.is_horizontal() {
                selected_rect.x
            } else {
                selected_rect.y
            };
            let rect = rect_at(
                rank,
                start + extent + settings.layout.sibling_gap,
                parent_rect.width,
                parent_rect.height,
                direction,
            );
            (rect, idx + 1)
        }
        // Only cross-linked to its parent: the selection's rank may be on the
        // wrong side, so the sibling takes a regular child slot.
        None => {
            let Some(slot) = child_slot(graph, &parent.id, settings) else {
                return Ok(None);
            };
            (slot, siblings.len())
        }
    };

    let (next, sibling) = attach_child(graph, &parent.id, NodeSpec::empty_text(rect), direction, ids)?;
    siblings.insert(insert_at, Sibling::from(&sibling));
    let next = restack(&next, &parent_rect, &siblings, settings);

    tracing::info!(parent = %parent.id, sibling = %sibling.id, "created sibling node");
    Ok(Some(Edit::new(next, Some(sibling.id))))
}

/// Creates an unconnected copy-sized node next to the selection.
pub fn create_floating(
    graph: &Graph,
    selection: &Selection,
    toward: Side,
    settings: &Settings,
    ids: &mut dyn IdSource,
) -> Result<Option<Edit>> {
    if !settings.create.create_float {
        return Ok(None);
    }
    let Some(selected) = selected_node(graph, selection, "create-floating") else {
        return Ok(None);
    };
    let gap_x = settings.create.floating_gap_x;
    let gap_y = settings.create.floating_gap_y;
    let (x, y) = match toward {
        Side::Left => (selected.x - selected.width - gap_x, selected.y),
        Side::Right => (selected.x + selected.width + gap_x, selected.y),
        Side::Top => (selected.x, selected.y - selected.height - gap_y),
        Side::Bottom => (selected.x, selected.y + selected.height + gap_y),
    };
    let rect = Rect::new(x, y, selected.width, selected.height);
    let (next, node) = add_node(graph, ids.next_id(), NodeSpec::empty_text(rect))?;
    tracing::info!(from = %selected.id, node_id = %node.id, ?toward, "created floating node");
    Ok(Some(Edit::new(next, Some(node.id))))
}

/// Creates a blank text node at the canvas origin; needs no selection.
pub fn create_standalone(
    graph: &Graph,
    settings: &Settings,
    ids: &mut dyn IdSource,
) -> Result<Edit> {
    let rect = Rect::new(
        0.0,
        0.0,
        settings.create.standalone_width,
        settings.create.standalone_height,
    );
    let (next, node) = add_node(graph, ids.next_id(), NodeSpec::empty_text(rect))?;
    tracing::info!(node_id = %node.id, "created standalone node");
    Ok(Edit::new(next, Some(node.id)))
}

/// Id of the node to select after moving from the selection toward `toward`.
/// Only nodes intersecting `viewport` are candidates when one is given.
pub fn navigate(
    graph: &Graph,
    selection: &Selection,
    toward: Side,
    viewport: Option<&Rect>,
    settings: &Settings,
) -> Option<String> {
    if !settings.navigate.use_navigate {
        return None;
    }
    let selected = selected_node(graph, selection, "navigate")?;
    let next = match viewport {
        Some(viewport) => crate::navigate::find_next(
            &selected.rect(),
            graph.nodes_in_viewport(viewport),
            toward,
        ),
        None => crate::navigate::find_next(&selected.rect(), graph.nodes(), toward),
    }?;
    tracing::debug!(from = %selected.id, to = %next.id, ?toward, "navigated");
    Some(next.id.clone())
}

/// Deletes the selected node with its edges, then re-stacks the siblings it
/// leaves behind. Focus moves to the parent.
pub fn delete_and_relayout(
    graph: &Graph,
    selection: &Selection,
    settings: &Settings,
) -> Result<Option<Edit>> {
    let Some(selected) = selected_node(graph, selection, "delete") else {
        return Ok(None);
    };
    let parent_id = parent_of(graph, &selected.id, settings.layout.direction).map(|p| p.id.clone());

    let mut next = graph.clone();
    next.remove_node(&selected.id);
    tracing::info!(node_id = %selected.id, "deleted node");

    if let Some(parent_id) = &parent_id
        && settings.layout.auto_layout
    {
        let placements = relayout_children(&next, parent_id, &settings.layout);
        next = apply_placements(&next, &placements);
    }
    Ok(Some(Edit::new(next, parent_id)))
}

/// Turns the headings of the selected markdown file node into file nodes
/// pointing at each heading, stacked as children of the selection.
pub fn split_into_mindmap(
    graph: &Graph,
    selection: &Selection,
    provider: &dyn HeadingsProvider,
    settings: &Settings,
    ids: &mut dyn IdSource,
) -> Result<Option<Edit>> {
    let Some(parent) = selected_node(graph, selection, "split-into-mindmap") else {
        return Ok(None);
    };
    let NodeKind::File { file, .. } = &parent.kind else {
        tracing::debug!(node_id = %parent.id, "split needs a file node");
        return Ok(None);
    };
    if !file.to_ascii_lowercase().ends_with(".md") {
        tracing::debug!(%file, "split needs a markdown file");
        return Ok(None);
    }
    let Some(headings) = provider.headings(file)? else {
        return Ok(None);
    };
    let level = settings.split.heading_level;
    let headings: Vec<_> = headings.into_iter().filter(|h| h.level == level).collect();
    if headings.is_empty() {
        tracing::debug!(%file, level, "no headings at the requested level");
        return Ok(None);
    }

    let direction = settings.layout.direction;
    let parent_rect = parent.rect();
    let (width, height) = if direction.is_horizontal() {
        (parent_rect.width, parent_rect.height * settings.split.height_scale)
    } else {
        (parent_rect.width * settings.split.height_scale, parent_rect.height)
    };
    let rank = child_rank(
        &parent_rect,
        width,
        height,
        settings.create.horizontal_gap,
        direction,
    );

    let mut siblings = child_group(graph, &parent.id, direction);
    sort_siblings(&mut siblings, direction);
    let mut stack = match siblings.last() {
        Some(last) => {
            let (start, extent) = stack_span(&last.rect, direction);
            start + extent + settings.layout.sibling_gap
        }
        None => stack_span(&parent_rect, direction).0,
    };

    let mut next = graph.clone();
    for heading in &headings {
        let rect = rect_at(rank, stack, width, height, direction);
        let kind = NodeKind::File {
            file: file.clone(),
            subpath: Some(format!("#{}", heading.text)),
        };
        let (with_child, child) =
            attach_child(&next, &parent.id, NodeSpec::new(rect, kind), direction, ids)?;
        next = with_child;
        stack += stack_span(&rect, direction).1 + settings.layout.sibling_gap;
        siblings.push(Sibling::from(&child));
    }
    let next = restack(&next, &parent_rect, &siblings, settings);

    tracing::info!(node_id = %parent.id, count = headings.len(), "split headings into mind map");
    Ok(Some(Edit::new(next, None)))
}

/// Re-stacks the children of the selected node, or the whole canvas when
/// nothing is selected.
pub fn relayout(graph: &Graph, selection: &Selection, settings: &Settings) -> Option<Edit> {
    if selection.is_empty() {
        return Some(Edit::new(relayout_forest(graph, &settings.layout), None));
    }
    let parent = selected_node(graph, selection, "relayout")?;
    let placements = relayout_children(graph, &parent.id, &settings.layout);
    Some(Edit::new(
        apply_placements(graph, &placements),
        Some(parent.id.clone()),
    ))
}

/// Colours the selected node and its outgoing edges.
pub fn paint(graph: &Graph, selection: &Selection, color: Option<&str>) -> Result<Option<Edit>> {
    let Some(node) = selected_node(graph, selection, "paint") else {
        return Ok(None);
    };
    let next = paint_node(graph, &node.id, color)?;
    Ok(Some(Edit::new(next, None)))
}
