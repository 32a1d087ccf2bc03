//! Structure discovery for rich text editing over a host-owned markup tree.
//!
//! The tree holds elements and text runs and nothing else. Everything an
//! editor needs on top of that lives here: normalized positions, block and
//! inline discovery, scoped traversal and backward content search, plus the
//! run-splitting primitive that styling commands are built on.
//!
//! Discovery never mutates the tree and caches only inside the traverser or
//! searcher instance doing the work. Instances are meant to live for one
//! editing operation; after a mutation, resolve positions again through a
//! fresh one.

pub mod block;
pub mod dom;
pub mod inline;
pub mod leaf;
pub mod position;
pub mod searcher;
pub mod traverser;

// Re-export the main types for easier usage
pub use block::*;
pub use dom::*;
pub use inline::*;
pub use leaf::*;
pub use position::*;
pub use searcher::*;
pub use traverser::*;
