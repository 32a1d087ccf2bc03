use crate::dom::{Dom, NodeId};

/// Nodes navigation treats as carrying no content: empty text nodes and
/// elements the host marked hidden. Hidden subtrees are never entered.
pub(crate) fn should_skip(dom: &Dom, node: NodeId) -> bool {
    if let Some(text) = dom.text(node) {
        return text.is_empty();
    }
    dom.is_hidden(node)
}

/// Near-side leaf of a subtree. None when everything under `node` (or the
/// node itself) is skippable.
fn edge_leaf(dom: &Dom, node: NodeId, forward: bool) -> Option<NodeId> {
    if should_skip(dom, node) {
        return None;
    }
    let children = dom.children(node);
    if children.is_empty() {
        return Some(node);
    }
    if forward {
        children.iter().find_map(|c| edge_leaf(dom, *c, true))
    } else {
        children.iter().rev().find_map(|c| edge_leaf(dom, *c, false))
    }
}

/// First meaningful leaf under `root`, or None when there is none.
pub fn first_leaf(dom: &Dom, root: NodeId) -> Option<NodeId> {
    dom.children(root)
        .iter()
        .find_map(|c| edge_leaf(dom, *c, true))
}

pub fn last_leaf(dom: &Dom, root: NodeId) -> Option<NodeId> {
    dom.children(root)
        .iter()
        .rev()
        .find_map(|c| edge_leaf(dom, *c, false))
}

/// The next (`forward`) or previous leaf in document order relative to
/// `start`'s subtree, staying strictly inside `root`. Climbs until an
/// ancestor level has a sibling on the requested side, then descends into
/// the nearest one with visible content. None at the root boundary.
pub fn leaf_sibling(dom: &Dom, root: NodeId, start: NodeId, forward: bool) -> Option<NodeId> {
    if start == root || !dom.contains(root, start) {
        return None;
    }
    let mut node = start;
    while node != root {
        let parent = dom.parent(node)?;
        let at = dom.child_index(node)?;
        let siblings = dom.children(parent);
        if forward {
            for sib in &siblings[at + 1..] {
                if let Some(leaf) = edge_leaf(dom, *sib, true) {
                    return Some(leaf);
                }
            }
        } else {
            for sib in siblings[..at].iter().rev() {
                if let Some(leaf) = edge_leaf(dom, *sib, false) {
                    return Some(leaf);
                }
            }
        }
        node = parent;
    }
    None
}

pub fn next_leaf_sibling(dom: &Dom, root: NodeId, start: NodeId) -> Option<NodeId> {
    leaf_sibling(dom, root, start, true)
}

pub fn previous_leaf_sibling(dom: &Dom, root: NodeId, start: NodeId) -> Option<NodeId> {
    leaf_sibling(dom, root, start, false)
}

#[cfg(test)]
#[path = "leaf_tests.rs"]
mod leaf_tests;
