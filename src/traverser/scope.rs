use crate::block::{BlockElement, block_at};
use crate::dom::{Dom, NodeId};
use crate::inline::{self, InlineElement};
use crate::leaf;
use crate::position::{Position, SelectionRange};

use super::TraversalStart;

// ============================================================================
// Scope
// ============================================================================

/// Boundary policy for a traverser: where enumeration starts, which blocks
/// belong to the region, and how a candidate inline gets clipped to it.
#[derive(Clone, Debug)]
pub(crate) enum Scope {
    /// Everything under `root`, optionally starting at a given node.
    Body {
        root: NodeId,
        start: Option<NodeId>,
    },
    /// The blocks a selection touches; inlines clipped to the range.
    Selection {
        root: NodeId,
        range: SelectionRange,
        start_block: Option<BlockElement>,
        end_block: Option<BlockElement>,
    },
    /// A single block, entered at one of its edges or at a position inside.
    Block {
        root: NodeId,
        block: Option<BlockElement>,
        position: Position,
        start_from: TraversalStart,
    },
}

impl Scope {
    pub(crate) fn body(root: NodeId, start: Option<NodeId>) -> Scope {
        Scope::Body { root, start }
    }

    pub(crate) fn selection(dom: &Dom, root: NodeId, range: SelectionRange) -> Scope {
        let start_block = block_at(dom, root, range.start().normalize(dom).node());
        let end_block = block_at(dom, root, range.end().normalize(dom).node());
        Scope::Selection {
            root,
            range,
            start_block,
            end_block,
        }
    }

    pub(crate) fn block(
        dom: &Dom,
        root: NodeId,
        position: Position,
        start_from: TraversalStart,
    ) -> Scope {
        let position = position.normalize(dom);
        let block = block_at(dom, root, position.node());
        Scope::Block {
            root,
            block,
            position,
            start_from,
        }
    }

    pub(crate) fn start_block(&self, dom: &Dom) -> Option<BlockElement> {
        match self {
            Scope::Body { root, start } => {
                let node = match start {
                    Some(node) => *node,
                    None => leaf::first_leaf(dom, *root)?,
                };
                block_at(dom, *root, node)
            }
            Scope::Selection { start_block, .. } => *start_block,
            Scope::Block { block, .. } => *block,
        }
    }

    pub(crate) fn start_inline(&self, dom: &Dom) -> Option<InlineElement> {
        match self {
            Scope::Body { root, start } => {
                let node = match start {
                    Some(node) => *node,
                    None => leaf::first_leaf(dom, *root)?,
                };
                inline::inline_at(dom, *root, node)
            }
            Scope::Selection { root, range, .. } => {
                let inline = inline::inline_after(dom, *root, &range.start())?;
                self.trim_inline(dom, inline)
            }
            Scope::Block {
                root,
                block,
                position,
                start_from,
            } => {
                let block = block.as_ref()?;
                let inline = match start_from {
                    TraversalStart::Begin => {
                        inline::inline_after(dom, *root, &block.start_position(dom))?
                    }
                    TraversalStart::End => {
                        inline::inline_before(dom, *root, &block.end_position(dom))?
                    }
                    TraversalStart::SelectionStart => inline::inline_after(dom, *root, position)?,
                };
                self.trim_inline(dom, inline)
            }
        }
    }

    /// The inline just before the scope's start position. Only meaningful for
    /// a block scope entered at a selection position, where backward
    /// traversal begins with nothing current.
    pub(crate) fn inline_before_start(&self, dom: &Dom) -> Option<InlineElement> {
        match self {
            Scope::Block {
                root,
                block,
                position,
                start_from: TraversalStart::SelectionStart,
            } => {
                let block = block.as_ref()?;
                let inline = inline::inline_before(dom, *root, position)?;
                block
                    .contains(dom, inline.container_node())
                    .then_some(inline)
            }
            _ => None,
        }
    }

    pub(crate) fn is_block_in_scope(&self, dom: &Dom, block: &BlockElement) -> bool {
        match self {
            Scope::Body { root, .. } => dom.contains(*root, block.start_node()),
            Scope::Selection {
                start_block,
                end_block,
                ..
            } => {
                let Some(start_block) = start_block else {
                    return false;
                };
                if block == start_block {
                    return true;
                }
                match end_block {
                    Some(end_block) => {
                        block == end_block
                            || (block.is_after(dom, start_block) && end_block.is_after(dom, block))
                    }
                    None => false,
                }
            }
            Scope::Block {
                block: scope_block, ..
            } => scope_block.as_ref() == Some(block),
        }
    }

    /// Clip a candidate inline to the scope, or drop it entirely.
    pub(crate) fn trim_inline(&self, dom: &Dom, inline: InlineElement) -> Option<InlineElement> {
        match self {
            Scope::Body { .. } => Some(inline),
            Scope::Selection { range, .. } => trim_to_range(dom, *range, inline),
            Scope::Block { block, .. } => {
                let block = block.as_ref()?;
                block
                    .contains(dom, inline.container_node())
                    .then_some(inline)
            }
        }
    }
}

/// Clip an inline to a selection range. Fully outside drops it, fully inside
/// passes it through, and an inline straddling either edge becomes a partial
/// cut at that edge.
fn trim_to_range(
    dom: &Dom,
    range: SelectionRange,
    inline: InlineElement,
) -> Option<InlineElement> {
    let start = inline.start_position(dom);
    let end = inline.end_position(dom);
    if !range.end().is_after(dom, &start) || !end.is_after(dom, &range.start()) {
        return None;
    }
    let start_cut = range.start().is_after(dom, &start).then(|| range.start());
    let end_cut = end.is_after(dom, &range.end()).then(|| range.end());
    if start_cut.is_none() && end_cut.is_none() {
        return Some(inline);
    }
    Some(inline::partial_or_empty(dom, inline, start_cut, end_cut))
}
