use crate::dom::{Dom, NodeId};

/// How to anchor a new [`Position`] on a node: an explicit char/child
/// offset, one of the node's own ends, or just outside it in the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    Begin,
    End,
    Before,
    After,
    At(usize),
}

impl From<usize> for Offset {
    fn from(offset: usize) -> Self {
        Offset::At(offset)
    }
}

/// A caret location: a node plus an offset into it (char offset for text,
/// child index for elements). `is_at_end` disambiguates "at the last offset"
/// from "past the content"; `element` caches the nearest element ancestor.
///
/// Positions are plain values. They are only meaningful against the tree
/// they were built from, and mutations may silently invalidate them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    node: NodeId,
    offset: usize,
    is_at_end: bool,
    element: NodeId,
}

impl Position {
    /// Resolve a symbolic or numeric offset against the tree. Numeric
    /// offsets clamp to the node length; `Before`/`After` on a parentless
    /// node degrade to the node's own ends.
    pub fn new(dom: &Dom, node: NodeId, offset: impl Into<Offset>) -> Position {
        let (node, offset, is_at_end) = match offset.into() {
            Offset::Begin => (node, 0, false),
            Offset::End => (node, dom.node_len(node), true),
            Offset::Before => match dom.parent(node) {
                Some(parent) => (parent, dom.child_index(node).unwrap_or(0), false),
                None => (node, 0, false),
            },
            Offset::After => match (dom.parent(node), dom.child_index(node)) {
                (Some(parent), Some(at)) => {
                    let len = dom.node_len(parent);
                    (parent, at + 1, at + 1 == len)
                }
                _ => (node, dom.node_len(node), true),
            },
            Offset::At(offset) => {
                let len = dom.node_len(node);
                let offset = offset.min(len);
                (node, offset, offset > 0 && offset == len)
            }
        };
        Position {
            node,
            offset,
            is_at_end,
            element: dom.nearest_element(node),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.is_at_end
    }

    /// Nearest element ancestor of the anchor node (the node itself when it
    /// is an element).
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Descend to the deepest first/last leaf on this position's side.
    /// Idempotent; never descends into void elements, pinning to a
    /// before/after position on them instead.
    pub fn normalize(&self, dom: &Dom) -> Position {
        let mut node = self.node;
        let mut offset = self.offset;
        let mut at_end = self.is_at_end;
        loop {
            if dom.is_text(node) {
                if at_end {
                    offset = dom.node_len(node);
                }
                break;
            }
            let children = dom.children(node);
            if children.is_empty() {
                break;
            }
            let end_side = at_end || offset >= children.len();
            let child = if end_side {
                children[children.len() - 1]
            } else {
                children[offset]
            };
            if dom.is_void(child) {
                return if end_side {
                    Position::new(dom, child, Offset::After)
                } else {
                    Position::new(dom, child, Offset::Before)
                };
            }
            node = child;
            if end_side {
                at_end = true;
                offset = dom.node_len(child);
            } else {
                at_end = false;
                offset = 0;
            }
        }
        Position {
            node,
            offset,
            is_at_end: at_end,
            element: dom.nearest_element(node),
        }
    }

    /// Strict document order. On the same node, offsets decide, with
    /// `is_at_end` winning ties; across nodes, intrinsic tree order decides.
    pub fn is_after(&self, dom: &Dom, other: &Position) -> bool {
        if self.node == other.node {
            if self.offset == other.offset {
                self.is_at_end && !other.is_at_end
            } else {
                self.offset > other.offset
            }
        } else {
            dom.is_node_after(self.node, other.node)
        }
    }

    /// Shift by `delta` offsets on the same node, clamped to [0, len].
    pub fn move_by(&self, dom: &Dom, delta: isize) -> Position {
        let offset = (self.offset as isize + delta).max(0) as usize;
        Position::new(dom, self.node, Offset::At(offset))
    }
}

/// A host selection: an ordered pair of positions on the same tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    start: Position,
    end: Position,
}

impl SelectionRange {
    /// Build a range from two ends in either order.
    pub fn new(dom: &Dom, a: Position, b: Position) -> SelectionRange {
        if a.is_after(dom, &b) {
            SelectionRange { start: b, end: a }
        } else {
            SelectionRange { start: a, end: b }
        }
    }

    pub fn collapsed(position: Position) -> SelectionRange {
        SelectionRange {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
