use crate::ir::{Node, Rect, Side};

fn is_beyond(selected: &Rect, candidate: &Rect, toward: Side) -> bool {
    match toward {
        Side::Top => candidate.y < selected.y,
        Side::Bottom => candidate.y > selected.y,
        Side::Left => candidate.x < selected.x,
        Side::Right => candidate.x > selected.x,
    }
}

/// Whether the candidate spans the selection's midpoint on the axis
/// perpendicular to the move.
fn is_aligned(selected: &Rect, candidate: &Rect, toward: Side) -> bool {
    if toward.is_vertical() {
        let mid = selected.mid_x();
        candidate.x < mid && mid < candidate.right()
    } else {
        let mid = selected.mid_y();
        candidate.y < mid && mid < candidate.bottom()
    }
}

fn primary_distance(selected: &Rect, candidate: &Rect, toward: Side) -> f32 {
    match toward {
        Side::Top => selected.y - candidate.y,
        Side::Bottom => candidate.y - selected.y,
        Side::Left => selected.x - candidate.x,
        Side::Right => candidate.x - selected.x,
    }
}

fn perpendicular_distance(selected: &Rect, candidate: &Rect, toward: Side) -> f32 {
    if toward.is_vertical() {
        (candidate.mid_x() - selected.mid_x()).abs()
    } else {
        (candidate.mid_y() - selected.mid_y()).abs()
    }
}

/// Picks the node to move to from `selected` toward `toward`.
///
/// Nodes roughly in line with the selection win; among them the closest one
/// along the move axis. Without an aligned node the closest node in the
/// general direction is used, breaking ties by perpendicular distance and
/// then by candidate order. Only nodes strictly beyond the selection on the
/// move axis are considered.
pub fn find_next<'a, I>(selected: &Rect, candidates: I, toward: Side) -> Option<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    let beyond: Vec<&Node> = candidates
        .into_iter()
        .filter(|node| is_beyond(selected, &node.rect(), toward))
        .collect();

    let nearest = |nodes: &mut dyn Iterator<Item = &'a Node>| {
        nodes.min_by(|a, b| {
            let (a, b) = (a.rect(), b.rect());
            primary_distance(selected, &a, toward)
                .total_cmp(&primary_distance(selected, &b, toward))
                .then_with(|| {
                    perpendicular_distance(selected, &a, toward)
                        .total_cmp(&perpendicular_distance(selected, &b, toward))
                })
        })
    };

    let mut aligned = beyond
        .iter()
        .copied()
        .filter(|node| is_aligned(selected, &node.rect(), toward))
        .peekable();
    if aligned.peek().is_some() {
        return nearest(&mut aligned);
    }
    nearest(&mut beyond.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;

    fn node(id: &str, x: f32, y: f32, width: f32, height: f32) -> Node {
        Node {
            id: id.to_string(),
            x,
            y,
            width,
            height,
            color: None,
            kind: NodeKind::text(id),
            extra: Default::default(),
        }
    }

    #[test]
    fn prefers_aligned_node_above() {
        let selected = node("s", 100.0, 100.0, 50.0, 50.0);
        let candidates = [
            node("aligned", 100.0, 0.0, 50.0, 50.0),
            node("off", 300.0, -50.0, 50.0, 50.0),
        ];
        let next = find_next(&selected.rect(), &candidates, Side::Top).unwrap();
        assert_eq!(next.id, "aligned");
    }

    #[test]
    fn picks_nearest_aligned_in_each_direction() {
        let selected = node("s", 0.0, 0.0, 100.0, 100.0);
        let candidates = [
            node("right-far", 600.0, 20.0, 100.0, 100.0),
            node("right-near", 300.0, -20.0, 100.0, 100.0),
            node("left-far", -600.0, 0.0, 100.0, 100.0),
            node("left-near", -300.0, 0.0, 100.0, 100.0),
            node("below-near", 10.0, 200.0, 100.0, 100.0),
            node("above-near", -10.0, -200.0, 100.0, 100.0),
            node("above-far", 0.0, -500.0, 100.0, 100.0),
        ];
        let pick = |side| find_next(&selected.rect(), &candidates, side).unwrap().id.as_str();
        assert_eq!(pick(Side::Right), "right-near");
        assert_eq!(pick(Side::Left), "left-near");
        assert_eq!(pick(Side::Bottom), "below-near");
        assert_eq!(pick(Side::Top), "above-near");
    }

    #[test]
    fn falls_back_to_closest_unaligned() {
        let selected = node("s", 0.0, 0.0, 100.0, 100.0);
        let candidates = [
            node("far", 900.0, 500.0, 50.0, 50.0),
            node("near-high", 400.0, -800.0, 50.0, 50.0),
            node("near-low", 400.0, 300.0, 50.0, 50.0),
        ];
        let next = find_next(&selected.rect(), &candidates, Side::Right).unwrap();
        assert_eq!(next.id, "near-low");
    }

    #[test]
    fn never_returns_nodes_behind_the_selection() {
        let selected = node("s", 0.0, 0.0, 100.0, 100.0);
        let candidates = [
            node("self", 0.0, 0.0, 100.0, 100.0),
            node("left", -200.0, 0.0, 100.0, 100.0),
            node("same-x", 0.0, 300.0, 100.0, 100.0),
        ];
        assert!(find_next(&selected.rect(), &candidates, Side::Right).is_none());
        for side in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
            if let Some(next) = find_next(&selected.rect(), &candidates, side) {
                assert!(is_beyond(&selected.rect(), &next.rect(), side));
            }
        }
    }

    #[test]
    fn ties_keep_candidate_order() {
        let selected = node("s", 0.0, 0.0, 100.0, 100.0);
        let candidates = [
            node("first", 300.0, 0.0, 100.0, 100.0),
            node("second", 300.0, 0.0, 100.0, 100.0),
        ];
        let next = find_next(&selected.rect(), &candidates, Side::Right).unwrap();
        assert_eq!(next.id, "first");
    }
}
