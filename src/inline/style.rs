use super::InlineElement;
use crate::dom::{Dom, NodeId, Tag};
use crate::leaf;
use crate::position::{Offset, Position};

/// Restyle exactly the content an inline element identifies.
///
/// Text nodes at partial boundaries are split first so the covered region is
/// whole nodes. The callback then runs once per touched element: `true` for
/// carriers the region fully covers (the text's parent when the region is
/// its entire content, otherwise a fresh `span` wrapped around the covered
/// text), `false` for wrapper elements the region passes through on the way
/// down. Empty inlines do nothing; image runs have no text and produce no
/// carriers.
pub fn apply_style(
    dom: &mut Dom,
    inline: &InlineElement,
    styler: &mut dyn FnMut(&mut Dom, NodeId, bool),
) {
    match inline {
        InlineElement::Empty { .. } => {}
        InlineElement::Partial(partial) => apply_text_style(
            dom,
            partial.decorated().container_node(),
            partial.start_cut(),
            partial.end_cut(),
            styler,
        ),
        _ => apply_text_style(dom, inline.container_node(), None, None, styler),
    }
}

fn apply_text_style(
    dom: &mut Dom,
    container: NodeId,
    from: Option<Position>,
    to: Option<Position>,
    styler: &mut dyn FnMut(&mut Dom, NodeId, bool),
) {
    let from = from
        .unwrap_or_else(|| Position::new(dom, container, Offset::Begin))
        .normalize(dom);
    let to = to
        .unwrap_or_else(|| Position::new(dom, container, Offset::End))
        .normalize(dom);

    // Collect the covered text nodes first. The splits below rearrange
    // siblings, so each next leaf is looked up before its node is cut.
    let mut format_nodes: Vec<NodeId> = Vec::new();
    let mut cur = from;
    while to.is_after(dom, &cur) {
        let node = cur.node();
        let next = leaf::next_leaf_sibling(dom, container, node);
        if dom.is_text(node) {
            let mut covered = node;
            if node == to.node() && !to.is_at_end() {
                dom.split_text(covered, to.offset());
            }
            if node == from.node() && from.offset() > 0 {
                if let Some(right) = dom.split_text(covered, from.offset()) {
                    covered = right;
                }
            }
            format_nodes.push(covered);
        }
        cur = match next {
            Some(next) => Position::new(dom, next, Offset::Begin),
            None => break,
        };
    }
    if format_nodes.is_empty() {
        return;
    }

    let mut carriers: Vec<NodeId> = Vec::new();
    for node in &format_nodes {
        let carrier = match dom.parent(*node) {
            Some(parent) if dom.children(parent).len() == 1 => parent,
            _ => match dom.wrap(*node, Tag::Span) {
                Some(wrapper) => wrapper,
                None => continue,
            },
        };
        carriers.push(carrier);
    }

    let mut wrappers: Vec<NodeId> = Vec::new();
    for carrier in &carriers {
        let mut cur = dom.parent(*carrier);
        while let Some(n) = cur {
            if n == container || !dom.contains(container, n) {
                break;
            }
            if !wrappers.contains(&n) && !carriers.contains(&n) {
                wrappers.push(n);
            }
            cur = dom.parent(n);
        }
    }

    for carrier in &carriers {
        styler(dom, *carrier, true);
    }
    for wrapper in &wrappers {
        styler(dom, *wrapper, false);
    }
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod style_tests;
