//! Backward text reconstruction around a caret position.
//!
//! Features that react to typing ("did the user just paste a URL", "what
//! word is being completed") need the text behind the cursor without
//! re-reading the whole document. [`ContentSearcher`] drives a
//! block-scoped traverser backward and caches everything it has seen, so
//! each query only travels as far as its answer requires. Caches grow
//! monotonically; a tree edit invalidates the searcher, so build a new one
//! per editing operation.

use std::cell::OnceCell;
use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Dom, NodeId};
use crate::inline::{self, InlineElement};
use crate::position::{Position, SelectionRange};
use crate::traverser::{ContentTraverser, TraversalStart};

#[cfg(test)]
#[path = "searcher_tests.rs"]
mod searcher_tests;

/// The text following the last whitespace run, if the text has one.
fn word_after_whitespace(text: &str) -> Option<String> {
    static WORD_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let pattern =
        WORD_BOUNDARY.get_or_init(|| Regex::new(r"\s+(\S*)$").expect("Invalid word regex"));
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|word| word.as_str().to_owned())
}

// ============================================================================
// ContentSearcher
// ============================================================================

/// Lazy backward scanner over the block containing one position.
pub struct ContentSearcher<'a> {
    dom: &'a Dom,
    root: NodeId,
    position: Position,
    traverser: ContentTraverser<'a>,
    /// Text accumulated so far, in document order; grows at the front.
    text: String,
    /// Textual inlines already visited, nearest first.
    inlines: Vec<InlineElement>,
    word: Option<String>,
    nearest_non_text: Option<InlineElement>,
    exhausted: bool,
    before: OnceCell<Option<InlineElement>>,
    after: OnceCell<Option<InlineElement>>,
}

impl<'a> ContentSearcher<'a> {
    pub fn new(dom: &'a Dom, root: NodeId, position: Position) -> Self {
        let traverser =
            ContentTraverser::block(dom, root, position, TraversalStart::SelectionStart);
        ContentSearcher {
            dom,
            root,
            position,
            traverser,
            text: String::new(),
            inlines: Vec::new(),
            word: None,
            nearest_non_text: None,
            exhausted: false,
            before: OnceCell::new(),
            after: OnceCell::new(),
        }
    }

    /// The word the cursor sits at the end of: the accumulated text after
    /// its last whitespace run, or all of it when no whitespace precedes.
    /// Empty when the cursor directly follows whitespace.
    pub fn word_before(&mut self) -> String {
        if self.word.is_none() {
            self.travel(|searcher| searcher.word.is_some());
        }
        self.word.clone().unwrap_or_default()
    }

    /// The last `length` characters before the position, or as many as the
    /// block holds.
    pub fn substring_before(&mut self, length: usize) -> String {
        if self.text.chars().count() < length {
            self.travel(|searcher| searcher.text.chars().count() >= length);
        }
        let skip = self.text.chars().count().saturating_sub(length);
        self.text.chars().skip(skip).collect()
    }

    /// The inline ending at or spanning the position.
    pub fn inline_before(&self) -> Option<InlineElement> {
        self.before
            .get_or_init(|| inline::inline_before(self.dom, self.root, &self.position))
            .clone()
    }

    /// The inline starting at or spanning the position.
    pub fn inline_after(&self) -> Option<InlineElement> {
        self.after
            .get_or_init(|| inline::inline_after(self.dom, self.root, &self.position))
            .clone()
    }

    /// The first non-textual inline behind the position, if the block has
    /// one before its start.
    pub fn nearest_non_text_inline(&mut self) -> Option<InlineElement> {
        if self.nearest_non_text.is_none() {
            self.travel(|_| false);
        }
        self.nearest_non_text.clone()
    }

    /// Find `needle` ending at the position, matching characters backward.
    ///
    /// With `exact_match` the text behind the cursor must end with the
    /// needle exactly; without it, characters behind the cursor may be
    /// skipped until the needle's tail is found (a URL followed by the
    /// space that triggered its detection, say). Any mismatch after the
    /// tail has matched fails the search.
    pub fn range_from_text(&mut self, needle: &str, exact_match: bool) -> Option<SelectionRange> {
        if needle.is_empty() {
            return None;
        }
        let needle: Vec<char> = needle.chars().collect();
        let mut remaining = needle.len();
        let mut start = None;
        let mut end: Option<Position> = None;

        self.for_each_text_inline(|dom, inline| {
            let content: Vec<char> = inline.text_content(dom).chars().collect();
            let from = inline.start_position(dom);
            let mut node_index = content.len();

            while node_index > 0 && remaining > 0 {
                node_index -= 1;
                if needle[remaining - 1] == content[node_index] {
                    remaining -= 1;
                    if end.is_none() {
                        end = Some(from.move_by(dom, (node_index + 1) as isize));
                    }
                } else if exact_match || end.is_some() {
                    return true;
                }
            }
            if remaining == 0 {
                start = Some(from.move_by(dom, node_index as isize));
                return true;
            }
            false
        });

        match (start, end) {
            (Some(start), Some(end)) => Some(SelectionRange::new(self.dom, start, end)),
            _ => None,
        }
    }

    /// Walk visited textual inlines nearest-first, traveling further as
    /// needed, until `callback` returns true.
    fn for_each_text_inline(&mut self, mut callback: impl FnMut(&Dom, &InlineElement) -> bool) {
        let mut index = 0;
        loop {
            while index < self.inlines.len() {
                let inline = self.inlines[index].clone();
                index += 1;
                if callback(self.dom, &inline) {
                    return;
                }
            }
            if self.exhausted {
                return;
            }
            let seen = self.inlines.len();
            self.travel(|searcher| searcher.inlines.len() > seen);
        }
    }

    /// Step the traverser backward until `stop` is satisfied, a non-textual
    /// inline turns up, or the block start is reached. The word cache is
    /// finalized on either terminal condition.
    fn travel(&mut self, mut stop: impl FnMut(&Self) -> bool) {
        while !self.exhausted && !stop(self) {
            let Some(previous) = self.traverser.previous_inline() else {
                self.exhausted = true;
                self.finalize_word();
                break;
            };
            if previous.is_textual(self.dom) {
                let chunk = previous.text_content(self.dom);
                self.text.insert_str(0, &chunk);
                self.inlines.push(previous);
                if self.word.is_none() {
                    self.word = word_after_whitespace(&self.text);
                }
            } else {
                self.nearest_non_text = Some(previous);
                self.exhausted = true;
                self.finalize_word();
            }
        }
    }

    fn finalize_word(&mut self) {
        if self.word.is_none() {
            self.word = Some(self.text.clone());
        }
    }
}
