use super::*;
use crate::dom::markup;
use crate::inline::{inline_at, inline_before, partial_or_empty};

fn dom_from(source: &str) -> Dom {
    markup::parse(source).unwrap()
}

fn record_calls(
    dom: &mut Dom,
    inline: &InlineElement,
) -> Vec<(NodeId, bool)> {
    let mut calls = Vec::new();
    apply_style(dom, inline, &mut |_, node, covered| calls.push((node, covered)));
    calls
}

#[test]
fn a_fully_covered_run_styles_its_sole_parent() {
    let mut dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let p = dom.children(root)[0];
    let text = dom.children(p)[0];
    let inline = inline_at(&dom, root, text).unwrap();

    let calls = record_calls(&mut dom, &inline);
    assert_eq!(calls, vec![(p, true)]);
    assert_eq!(markup::to_markup(&dom), "<p>hello</p>", "no splits needed");
}

#[test]
fn an_interior_partial_splits_the_text_and_wraps_the_middle() {
    let mut dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let p = dom.children(root)[0];
    let text = dom.children(p)[0];
    let full = inline_at(&dom, root, text).unwrap();
    let partial = partial_or_empty(
        &dom,
        full,
        Some(Position::new(&dom, text, 1)),
        Some(Position::new(&dom, text, 4)),
    );

    let calls = record_calls(&mut dom, &partial);
    assert_eq!(markup::to_markup(&dom), "<p>h<span>ell</span>o</p>");

    let span = dom.children(p)[1];
    assert_eq!(dom.tag(span), Some(Tag::Span));
    assert_eq!(calls, vec![(span, true)]);
}

#[test]
fn a_prefix_partial_splits_only_the_far_end() {
    let mut dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];
    let cut = Position::new(&dom, text, 2);
    let prefix = inline_before(&dom, root, &cut).unwrap();

    let calls = record_calls(&mut dom, &prefix);
    assert_eq!(markup::to_markup(&dom), "<p><span>he</span>llo</p>");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1, "the covered half is a carrier");
}

#[test]
fn wrappers_on_the_way_down_are_flagged_as_uncovered() {
    let mut dom = dom_from("<a href=\"#\"><i><b>x</b> y</i></a>");
    let root = dom.root();
    let a = dom.children(root)[0];
    let i = dom.children(a)[0];
    let b = dom.children(i)[0];
    let x = dom.children(b)[0];
    let y = dom.children(i)[1];
    let link = inline_at(&dom, root, x).unwrap();
    assert!(matches!(link, InlineElement::Link { .. }));

    let calls = record_calls(&mut dom, &link);

    // the bare text leaf got a fresh span, the sole-child parent is reused
    let span = dom.parent(y).unwrap();
    assert_eq!(dom.tag(span), Some(Tag::Span));
    assert_eq!(calls, vec![(b, true), (span, true), (i, false)]);
}

#[test]
fn empty_inlines_style_nothing() {
    let mut dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];
    let full = inline_at(&dom, root, text).unwrap();
    let at = Position::new(&dom, text, 2);
    let empty = partial_or_empty(&dom, full, Some(at), Some(at));
    assert!(matches!(empty, InlineElement::Empty { .. }));

    let before = dom.node_count();
    let calls = record_calls(&mut dom, &empty);
    assert!(calls.is_empty());
    assert_eq!(dom.node_count(), before);
}

#[test]
fn image_runs_produce_no_carriers() {
    let mut dom = dom_from("x<img src=\"p\">y");
    let root = dom.root();
    let img = dom.children(root)[1];
    let image = inline_at(&dom, root, img).unwrap();
    assert!(matches!(image, InlineElement::Image { .. }));

    let before = dom.node_count();
    let calls = record_calls(&mut dom, &image);
    assert!(calls.is_empty());
    assert_eq!(dom.node_count(), before);
}
