use crate::dom::{Dom, NodeId, Tag};
use crate::position::{Offset, Position};

/// A logical line of content. Either a whole node that lays out as a block
/// on its own, or a [start, end] span of sibling-level nodes living inside a
/// block-level container without one of their own (text next to a `<br>`,
/// say). Equality is identity of the start/end nodes, so a single-node block
/// equals a degenerate pair over the same node.
#[derive(Clone, Copy, Debug)]
pub enum BlockElement {
    SingleNode(NodeId),
    StartEnd { start: NodeId, end: NodeId },
}

impl PartialEq for BlockElement {
    fn eq(&self, other: &Self) -> bool {
        self.start_node() == other.start_node() && self.end_node() == other.end_node()
    }
}

impl Eq for BlockElement {}

impl BlockElement {
    pub fn start_node(&self) -> NodeId {
        match self {
            BlockElement::SingleNode(node) => *node,
            BlockElement::StartEnd { start, .. } => *start,
        }
    }

    pub fn end_node(&self) -> NodeId {
        match self {
            BlockElement::SingleNode(node) => *node,
            BlockElement::StartEnd { end, .. } => *end,
        }
    }

    pub fn start_position(&self, dom: &Dom) -> Position {
        Position::new(dom, self.start_node(), Offset::Begin).normalize(dom)
    }

    pub fn end_position(&self, dom: &Dom) -> Position {
        Position::new(dom, self.end_node(), Offset::End).normalize(dom)
    }

    /// Document order between blocks: this one starts after the other ends.
    pub fn is_after(&self, dom: &Dom, other: &BlockElement) -> bool {
        dom.is_node_after(self.start_node(), other.end_node())
    }

    /// True for every node between start and end inclusive, descendants
    /// of the boundary nodes included.
    pub fn contains(&self, dom: &Dom, node: NodeId) -> bool {
        let start = self.start_node();
        let end = self.end_node();
        let after_start = node == start || dom.contains(start, node) || dom.is_node_after(node, start);
        let before_end = node == end || dom.contains(end, node) || dom.is_node_after(end, node);
        after_start && before_end
    }

    /// The sibling-level nodes making up the block, start to end.
    pub fn content_nodes(&self, dom: &Dom) -> Vec<NodeId> {
        let start = self.start_node();
        let end = self.end_node();
        let mut nodes = vec![start];
        let mut cur = start;
        while cur != end && !dom.contains(cur, end) {
            let Some(next) = dom.next_sibling(cur) else {
                break;
            };
            nodes.push(next);
            cur = next;
        }
        nodes
    }

    pub fn text_content(&self, dom: &Dom) -> String {
        self.content_nodes(dom)
            .iter()
            .map(|n| dom.text_content(*n))
            .collect()
    }
}

/// Resolve the block containing `node`, or None when `node` is not under
/// `root`.
///
/// The containing block-level ancestor (or `root`) acts as the ceiling. If
/// the node is its own ceiling it is the block. Otherwise the enclosing run
/// is scanned sibling by sibling at the node's own level first, climbing one
/// level at a time, so when breaks exist at several nesting depths the
/// nearest level wins. A `<br>` found scanning forward ends the run at the
/// break itself; one found scanning backward belongs to the previous run.
/// Both edges are then collapsed upward, without splitting anything, while
/// they are flush with their parent's boundary, and a pair spanning its
/// whole parent is absorbed into it.
pub fn block_at(dom: &Dom, root: NodeId, node: NodeId) -> Option<BlockElement> {
    if !dom.contains(root, node) {
        return None;
    }
    let ceiling = closest_block_ancestor(dom, root, node);
    if ceiling == node {
        return Some(BlockElement::SingleNode(node));
    }

    let head = find_run_edge(dom, ceiling, node, false);
    let tail = if dom.tag(node) == Some(Tag::Br) {
        // a break is its own run end
        node
    } else {
        find_run_edge(dom, ceiling, node, true)
    };

    let mut start = collapse_edge(dom, head, ceiling, true);
    let mut end = collapse_edge(dom, tail, ceiling, false);
    if dom.parent(start) != dom.parent(end) {
        return Some(BlockElement::StartEnd { start, end });
    }

    // absorb wrappers the pair spans completely
    while start != ceiling {
        let Some(parent) = dom.parent(start) else {
            break;
        };
        let children = dom.children(parent);
        if children.first() == Some(&start) && children.last() == Some(&end) {
            start = parent;
            end = parent;
        } else {
            break;
        }
    }

    if start == end && dom.is_block_node(start) {
        Some(BlockElement::SingleNode(start))
    } else {
        Some(BlockElement::StartEnd { start, end })
    }
}

/// Nearest block-level ancestor-or-self, never walking past `root`.
fn closest_block_ancestor(dom: &Dom, root: NodeId, node: NodeId) -> NodeId {
    let mut cur = node;
    loop {
        if cur == root || dom.is_block_node(cur) {
            return cur;
        }
        match dom.parent(cur) {
            Some(parent) => cur = parent,
            None => return cur,
        }
    }
}

/// Walk from `node` toward one end of its run. Stops in front of sibling
/// blocks; a `<br>` sibling ends a forward walk at the break and a backward
/// walk just after it. Climbs a level only when the current one is
/// exhausted.
fn find_run_edge(dom: &Dom, ceiling: NodeId, node: NodeId, toward_end: bool) -> NodeId {
    let mut result = node;
    loop {
        loop {
            let sib = if toward_end {
                dom.next_sibling(result)
            } else {
                dom.previous_sibling(result)
            };
            let Some(sib) = sib else {
                break;
            };
            if dom.is_block_node(sib) {
                return result;
            }
            if dom.tag(sib) == Some(Tag::Br) {
                return if toward_end { sib } else { result };
            }
            result = sib;
        }
        let Some(parent) = dom.parent(result) else {
            return result;
        };
        if parent == ceiling {
            return result;
        }
        result = parent;
    }
}

/// Climb while `node` sits flush against its parent's relevant edge,
/// stopping below the ceiling. Never modifies the tree.
fn collapse_edge(dom: &Dom, node: NodeId, ceiling: NodeId, toward_start: bool) -> NodeId {
    let mut node = node;
    while let Some(parent) = dom.parent(node) {
        if parent == ceiling {
            break;
        }
        let children = dom.children(parent);
        let edge = if toward_start {
            children.first()
        } else {
            children.last()
        };
        if edge == Some(&node) {
            node = parent;
        } else {
            break;
        }
    }
    node
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod block_tests;
