//! Block and inline enumeration over a scoped region of the tree.
//!
//! A [`ContentTraverser`] is a pair of lazy cursors, one per axis. Each
//! `next_*`/`previous_*` call resolves a candidate from the current
//! element's edge, checks that it actually advances in document order, and
//! clips it to the scope. The cursor only moves when a candidate is
//! accepted, so a failed step leaves the traverser where it was.

use crate::block::{self, BlockElement};
use crate::dom::{Dom, NodeId};
use crate::inline::{self, InlineElement};
use crate::leaf;
use crate::position::{Position, SelectionRange};

mod scope;

use scope::Scope;

#[cfg(test)]
#[path = "traverser_tests.rs"]
mod traverser_tests;

// ============================================================================
// TraversalStart
// ============================================================================

/// Where a block-scoped traverser begins inside its block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalStart {
    /// At the first inline of the block.
    Begin,
    /// At the last inline of the block.
    End,
    /// At the position the traverser was created with.
    SelectionStart,
}

// ============================================================================
// ContentTraverser
// ============================================================================

/// Cursor over the blocks and inlines of one region of the tree.
///
/// Holding a traverser borrows the tree, so edits require dropping it
/// first; positions resolved after an edit come from a fresh traverser.
#[derive(Debug)]
pub struct ContentTraverser<'a> {
    dom: &'a Dom,
    root: NodeId,
    scope: Scope,
    current_block: Option<BlockElement>,
    block_ready: bool,
    current_inline: Option<InlineElement>,
    inline_ready: bool,
}

impl<'a> ContentTraverser<'a> {
    /// Traverse everything under `root`.
    pub fn body(dom: &'a Dom, root: NodeId) -> Self {
        Self::with_scope(dom, root, Scope::body(root, None))
    }

    /// Traverse everything under `root`, starting at `start`.
    pub fn body_from(dom: &'a Dom, root: NodeId, start: NodeId) -> Self {
        Self::with_scope(dom, root, Scope::body(root, Some(start)))
    }

    /// Traverse the blocks a selection touches. Inlines sticking out past
    /// either end of the range come back as partials clipped to it.
    pub fn selection(dom: &'a Dom, root: NodeId, range: SelectionRange) -> Self {
        let scope = Scope::selection(dom, root, range);
        Self::with_scope(dom, root, scope)
    }

    /// Traverse the single block containing `position`.
    pub fn block(
        dom: &'a Dom,
        root: NodeId,
        position: Position,
        start_from: TraversalStart,
    ) -> Self {
        let scope = Scope::block(dom, root, position, start_from);
        Self::with_scope(dom, root, scope)
    }

    fn with_scope(dom: &'a Dom, root: NodeId, scope: Scope) -> Self {
        ContentTraverser {
            dom,
            root,
            scope,
            current_block: None,
            block_ready: false,
            current_inline: None,
            inline_ready: false,
        }
    }

    // ------------------------------------------------------------------
    // Block axis
    // ------------------------------------------------------------------

    /// The block the cursor is on, resolving the scope's start block on
    /// first use.
    pub fn current_block(&mut self) -> Option<BlockElement> {
        if !self.block_ready {
            self.block_ready = true;
            self.current_block = self.scope.start_block(self.dom);
        }
        self.current_block
    }

    pub fn next_block(&mut self) -> Option<BlockElement> {
        self.advance_block(true)
    }

    pub fn previous_block(&mut self) -> Option<BlockElement> {
        self.advance_block(false)
    }

    fn advance_block(&mut self, forward: bool) -> Option<BlockElement> {
        let current = self.current_block()?;
        let edge = if forward {
            current.end_node()
        } else {
            current.start_node()
        };
        let next_leaf = leaf::leaf_sibling(self.dom, self.root, edge, forward)?;
        let candidate = block::block_at(self.dom, self.root, next_leaf)?;
        let ordered = if forward {
            candidate.is_after(self.dom, &current)
        } else {
            current.is_after(self.dom, &candidate)
        };
        if !ordered || !self.scope.is_block_in_scope(self.dom, &candidate) {
            return None;
        }
        self.current_block = Some(candidate);
        Some(candidate)
    }

    // ------------------------------------------------------------------
    // Inline axis
    // ------------------------------------------------------------------

    /// The inline the cursor is on, resolving the scope's start inline on
    /// first use. A block scope entered at the end of its block has no
    /// inline after the start, so this can stay `None` while
    /// [`previous_inline`](Self::previous_inline) still yields content.
    pub fn current_inline(&mut self) -> Option<InlineElement> {
        if !self.inline_ready {
            self.inline_ready = true;
            self.current_inline = self.scope.start_inline(self.dom);
        }
        self.current_inline.clone()
    }

    pub fn next_inline(&mut self) -> Option<InlineElement> {
        self.advance_inline(true)
    }

    pub fn previous_inline(&mut self) -> Option<InlineElement> {
        self.advance_inline(false)
    }

    fn advance_inline(&mut self, forward: bool) -> Option<InlineElement> {
        let current = self.current_inline();
        let candidate = match &current {
            Some(current) => {
                let from = if forward {
                    current.end_position(self.dom)
                } else {
                    current.start_position(self.dom)
                };
                inline::inline_before_after(self.dom, self.root, &from, forward)?
            }
            None if forward => self.scope.start_inline(self.dom)?,
            None => self.scope.inline_before_start(self.dom)?,
        };
        // Order check runs on the raw candidate; a scope cut must not turn
        // a rejected element into an accepted one.
        if let Some(current) = &current {
            let ordered = if forward {
                candidate.is_after(self.dom, current)
            } else {
                current.is_after(self.dom, &candidate)
            };
            if !ordered {
                return None;
            }
        }
        let accepted = self.scope.trim_inline(self.dom, candidate)?;
        self.current_inline = Some(accepted.clone());
        Some(accepted)
    }
}
