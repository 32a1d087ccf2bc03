use crate::block::{BlockElement, block_at};
use crate::dom::{Dom, NodeId, Tag};
use crate::leaf;
use crate::position::{Offset, Position};

mod style;

pub use style::apply_style;

/// A run of content inside one block: a plain text/leaf run, a whole image
/// or link, a zero-length placeholder, or a partial slice of one of those.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineElement {
    Run { node: NodeId, block: BlockElement },
    Image { node: NodeId, block: BlockElement },
    Link { node: NodeId, block: BlockElement },
    Empty { at: Position, block: BlockElement },
    Partial(PartialInline),
}

/// Start/end cuts over a full inline. `None` means "from the run's own
/// end". The decorated element is never itself partial or empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialInline {
    of: Box<InlineElement>,
    start: Option<Position>,
    end: Option<Position>,
}

impl PartialInline {
    /// Nested partials merge into one layer over the underlying run,
    /// keeping the tighter cut on each side.
    pub(crate) fn new(
        dom: &Dom,
        of: InlineElement,
        start: Option<Position>,
        end: Option<Position>,
    ) -> PartialInline {
        match of {
            InlineElement::Partial(inner) => PartialInline {
                start: tighter(dom, inner.start, start, true),
                end: tighter(dom, inner.end, end, false),
                of: inner.of,
            },
            other => PartialInline {
                of: Box::new(other),
                start,
                end,
            },
        }
    }

    pub fn decorated(&self) -> &InlineElement {
        &self.of
    }

    pub fn start_cut(&self) -> Option<Position> {
        self.start
    }

    pub fn end_cut(&self) -> Option<Position> {
        self.end
    }
}

fn tighter(dom: &Dom, a: Option<Position>, b: Option<Position>, later: bool) -> Option<Position> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.is_after(dom, &b) == later { a } else { b }),
        (a, b) => a.or(b),
    }
}

impl InlineElement {
    /// The node anchoring this inline in the tree.
    pub fn container_node(&self) -> NodeId {
        match self {
            InlineElement::Run { node, .. }
            | InlineElement::Image { node, .. }
            | InlineElement::Link { node, .. } => *node,
            InlineElement::Empty { at, .. } => at.node(),
            InlineElement::Partial(partial) => partial.of.container_node(),
        }
    }

    pub fn parent_block(&self) -> &BlockElement {
        match self {
            InlineElement::Run { block, .. }
            | InlineElement::Image { block, .. }
            | InlineElement::Link { block, .. }
            | InlineElement::Empty { block, .. } => block,
            InlineElement::Partial(partial) => partial.of.parent_block(),
        }
    }

    pub fn start_position(&self, dom: &Dom) -> Position {
        match self {
            InlineElement::Empty { at, .. } => *at,
            InlineElement::Partial(partial) => partial
                .start
                .unwrap_or_else(|| partial.of.start_position(dom)),
            _ => Position::new(dom, self.container_node(), Offset::Begin).normalize(dom),
        }
    }

    pub fn end_position(&self, dom: &Dom) -> Position {
        match self {
            InlineElement::Empty { at, .. } => *at,
            InlineElement::Partial(partial) => {
                partial.end.unwrap_or_else(|| partial.of.end_position(dom))
            }
            _ => Position::new(dom, self.container_node(), Offset::End).normalize(dom),
        }
    }

    pub fn text_content(&self, dom: &Dom) -> String {
        match self {
            InlineElement::Empty { .. } => String::new(),
            InlineElement::Partial(partial) => {
                let container = partial.of.container_node();
                let full: Vec<char> = dom.text_content(container).chars().collect();
                let from = partial
                    .start
                    .as_ref()
                    .map(|p| text_offset_within(dom, container, p))
                    .unwrap_or(0)
                    .min(full.len());
                let to = partial
                    .end
                    .as_ref()
                    .map(|p| text_offset_within(dom, container, p))
                    .unwrap_or(full.len())
                    .min(full.len());
                if from >= to {
                    String::new()
                } else {
                    full[from..to].iter().collect()
                }
            }
            _ => dom.text_content(self.container_node()),
        }
    }

    /// Whether this inline carries plain text: a run anchored on a text
    /// node, or a partial slice of one.
    pub fn is_textual(&self, dom: &Dom) -> bool {
        match self {
            InlineElement::Run { node, .. } => dom.is_text(*node),
            InlineElement::Partial(partial) => partial.of.is_textual(dom),
            _ => false,
        }
    }

    /// Strictly-interior position test.
    pub fn contains(&self, dom: &Dom, position: &Position) -> bool {
        let start = self.start_position(dom);
        let end = self.end_position(dom);
        position.is_after(dom, &start) && end.is_after(dom, position)
    }

    /// Document order between inlines: this one starts after the other
    /// ends. Two slices of the same run meeting exactly at a cut are
    /// disjoint, so an abutting partial counts as ordered too.
    pub fn is_after(&self, dom: &Dom, other: &InlineElement) -> bool {
        let start = self.start_position(dom);
        let end = other.end_position(dom);
        if start.is_after(dom, &end) {
            return true;
        }
        (matches!(self, InlineElement::Partial(_)) || matches!(other, InlineElement::Partial(_)))
            && start == end
    }
}

/// Resolve the inline at a leaf node. The outermost link or image wrapper
/// between the node and its block boundary claims the whole run; otherwise
/// the node itself is a plain run.
pub fn inline_at(dom: &Dom, root: NodeId, node: NodeId) -> Option<InlineElement> {
    let block = block_at(dom, root, node)?;
    Some(inline_in_block(dom, &block, node))
}

pub(crate) fn inline_in_block(dom: &Dom, block: &BlockElement, node: NodeId) -> InlineElement {
    let mut wrapper: Option<(NodeId, Tag)> = None;
    let mut cur = Some(node);
    while let Some(n) = cur {
        if matches!(block, BlockElement::SingleNode(b) if *b == n) {
            break;
        }
        if !block.contains(dom, n) {
            break;
        }
        match dom.tag(n) {
            Some(tag @ (Tag::A | Tag::Img)) => wrapper = Some((n, tag)),
            _ => {}
        }
        cur = dom.parent(n);
    }
    match wrapper {
        Some((n, Tag::A)) => InlineElement::Link {
            node: n,
            block: *block,
        },
        Some((n, _)) => InlineElement::Image {
            node: n,
            block: *block,
        },
        None => InlineElement::Run {
            node,
            block: *block,
        },
    }
}

pub fn inline_after(dom: &Dom, root: NodeId, position: &Position) -> Option<InlineElement> {
    inline_before_after(dom, root, position, true)
}

pub fn inline_before(dom: &Dom, root: NodeId, position: &Position) -> Option<InlineElement> {
    inline_before_after(dom, root, position, false)
}

/// The inline adjacent to a position. At a boundary facing the requested
/// direction this hops to the neighboring leaf and resolves it whole;
/// strictly inside a text node it slices the run into a partial at the
/// position. A position right at an element edge (after a link, say)
/// resolves the neighbor in full, never as a partial.
pub fn inline_before_after(
    dom: &Dom,
    root: NodeId,
    position: &Position,
    forward: bool,
) -> Option<InlineElement> {
    let pos = position.normalize(dom);
    let node = pos.node();

    if dom.is_text(node) {
        let len = dom.node_len(node);
        if forward {
            if pos.offset() >= len {
                return resolve_target(dom, root, leaf::leaf_sibling(dom, root, node, true)?, true);
            }
            if pos.offset() == 0 {
                return resolve_target(dom, root, node, true);
            }
            let full = inline_at(dom, root, node)?;
            return Some(partial_or_empty(dom, full, Some(pos), None));
        }
        if pos.offset() == 0 && !pos.is_at_end() {
            return resolve_target(dom, root, leaf::leaf_sibling(dom, root, node, false)?, false);
        }
        if pos.offset() >= len {
            return resolve_target(dom, root, node, false);
        }
        let full = inline_at(dom, root, node)?;
        return Some(partial_or_empty(dom, full, None, Some(pos)));
    }

    // Element coordinates. After normalization the position either sits on
    // a childless element or is pinned before/after a void child.
    let children = dom.children(node);
    let target = if children.is_empty() {
        // The end of a childless element puts the element behind the
        // position and its next leaf ahead; the start puts it ahead.
        if pos.is_at_end() == forward {
            leaf::leaf_sibling(dom, root, node, forward)
        } else {
            Some(node)
        }
    } else if forward {
        if pos.is_at_end() || pos.offset() >= children.len() {
            leaf::leaf_sibling(dom, root, node, true)
        } else {
            Some(children[pos.offset()])
        }
    } else if pos.is_at_end() || pos.offset() >= children.len() {
        Some(children[children.len() - 1])
    } else if pos.offset() == 0 {
        leaf::leaf_sibling(dom, root, node, false)
    } else {
        leaf::leaf_sibling(dom, root, children[pos.offset()], false)
    };

    resolve_target(dom, root, target?, forward)
}

fn resolve_target(dom: &Dom, root: NodeId, target: NodeId, forward: bool) -> Option<InlineElement> {
    let target = if leaf::should_skip(dom, target) {
        leaf::leaf_sibling(dom, root, target, forward)?
    } else {
        target
    };
    inline_at(dom, root, target)
}

/// Cut a full inline down to [start, end]. No-op cuts hand the inline back
/// untouched; a zero-width result degrades to an empty placeholder instead
/// of a hollow partial.
pub(crate) fn partial_or_empty(
    dom: &Dom,
    of: InlineElement,
    start: Option<Position>,
    end: Option<Position>,
) -> InlineElement {
    let container = of.container_node();
    let total = dom.text_content(container).chars().count();
    if total == 0 {
        return of;
    }
    let from = start
        .as_ref()
        .map(|p| text_offset_within(dom, container, p))
        .unwrap_or(0);
    let to = end
        .as_ref()
        .map(|p| text_offset_within(dom, container, p))
        .unwrap_or(total);
    if from == 0 && to >= total {
        return of;
    }
    if from >= to {
        let block = *of.parent_block();
        let at = start
            .or(end)
            .unwrap_or_else(|| of.start_position(dom));
        return InlineElement::Empty { at, block };
    }
    InlineElement::Partial(PartialInline::new(dom, of, start, end))
}

/// Char offset of a position within a run container's text. Positions
/// outside the container clamp to the side they fall on.
pub(crate) fn text_offset_within(dom: &Dom, container: NodeId, position: &Position) -> usize {
    let pos = position.normalize(dom);
    if !dom.contains(container, pos.node()) {
        return if dom.is_node_after(pos.node(), container) {
            dom.text_content(container).chars().count()
        } else {
            0
        };
    }
    let mut count = 0;
    walk_text_offset(dom, container, &pos, &mut count);
    count
}

fn walk_text_offset(dom: &Dom, node: NodeId, pos: &Position, count: &mut usize) -> bool {
    if node == pos.node() {
        if let Some(text) = dom.text(node) {
            *count += pos.offset().min(text.chars().count());
        } else {
            let children = dom.children(node);
            for child in &children[..pos.offset().min(children.len())] {
                *count += dom.text_content(*child).chars().count();
            }
        }
        return true;
    }
    if let Some(text) = dom.text(node) {
        *count += text.chars().count();
        return false;
    }
    for child in dom.children(node) {
        if walk_text_offset(dom, *child, pos, count) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "inline_tests.rs"]
mod inline_tests;
