use super::*;
use crate::dom::markup;

fn dom_from(source: &str) -> Dom {
    markup::parse(source).unwrap()
}

#[test]
fn plain_text_resolves_to_a_full_run() {
    let dom = dom_from("<p>Hello world</p>");
    let root = dom.root();
    let p = dom.children(root)[0];
    let text = dom.children(p)[0];

    let inline = inline_at(&dom, root, text).unwrap();
    assert_eq!(
        inline,
        InlineElement::Run {
            node: text,
            block: BlockElement::SingleNode(p),
        }
    );
    assert_eq!(*inline.parent_block(), BlockElement::SingleNode(p));
    assert_eq!(inline.text_content(&dom), "Hello world");
    assert!(inline.is_textual(&dom));
}

#[test]
fn the_outermost_link_wrapper_claims_the_run() {
    let dom = dom_from("<a href=\"#\"><b>deep</b></a>");
    let root = dom.root();
    let a = dom.children(root)[0];
    let b = dom.children(a)[0];
    let deep = dom.children(b)[0];

    let inline = inline_at(&dom, root, deep).unwrap();
    assert!(matches!(inline, InlineElement::Link { node, .. } if node == a));
    assert_eq!(inline.container_node(), a);
    assert_eq!(inline.text_content(&dom), "deep");
    assert!(!inline.is_textual(&dom));
}

#[test]
fn a_link_around_an_image_wins_over_the_image() {
    let dom = dom_from("<a href=\"#\"><img src=\"x\"></a>");
    let root = dom.root();
    let a = dom.children(root)[0];
    let img = dom.children(a)[0];

    let inline = inline_at(&dom, root, img).unwrap();
    assert!(matches!(inline, InlineElement::Link { node, .. } if node == a));
}

#[test]
fn images_resolve_as_image_inlines() {
    let dom = dom_from("x<img src=\"p\">y");
    let root = dom.root();
    let img = dom.children(root)[1];

    let inline = inline_at(&dom, root, img).unwrap();
    assert!(matches!(inline, InlineElement::Image { node, .. } if node == img));
    assert!(!inline.is_textual(&dom));
}

#[test]
fn positions_inside_a_text_run_slice_it_into_partials() {
    let dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];
    let cut = Position::new(&dom, text, 2);

    let before = inline_before(&dom, root, &cut).unwrap();
    assert_eq!(before.text_content(&dom), "he");
    let after = inline_after(&dom, root, &cut).unwrap();
    assert_eq!(after.text_content(&dom), "llo");

    let InlineElement::Partial(partial) = &after else {
        panic!("expected a partial run, got {after:?}");
    };
    assert!(matches!(partial.decorated(), InlineElement::Run { .. }));
    assert_eq!(partial.start_cut(), Some(cut));
    assert_eq!(partial.end_cut(), None);
    assert!(after.is_textual(&dom));
}

#[test]
fn slices_rejoin_to_the_full_run() {
    let dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];

    for k in 1..5 {
        let cut = Position::new(&dom, text, k);
        let before = inline_before(&dom, root, &cut).unwrap();
        let after = inline_after(&dom, root, &cut).unwrap();
        let rejoined = format!("{}{}", before.text_content(&dom), after.text_content(&dom));
        assert_eq!(rejoined, "hello", "cut at {k}");
        assert!(after.is_after(&dom, &before));
        assert!(!before.is_after(&dom, &after));
    }
}

#[test]
fn edge_positions_resolve_whole_neighbors() {
    let dom = dom_from("<a href=\"http://x/\">click</a> after");
    let root = dom.root();
    let a = dom.children(root)[0];
    let tail = dom.children(root)[1];
    let boundary = Position::new(&dom, a, Offset::After);

    let before = inline_before(&dom, root, &boundary).unwrap();
    assert!(
        matches!(before, InlineElement::Link { node, .. } if node == a),
        "looking back over a link boundary must see the whole link, got {before:?}"
    );

    let after = inline_after(&dom, root, &boundary).unwrap();
    assert!(
        matches!(after, InlineElement::Run { node, .. } if node == tail),
        "looking forward must see the whole following run, got {after:?}"
    );
    assert_eq!(after.text_content(&dom), " after");
}

#[test]
fn begin_and_end_of_a_text_node_hop_to_the_neighbor() {
    let dom = dom_from("<p>ab</p><p>cd</p>");
    let root = dom.root();
    let ab = dom.children(dom.children(root)[0])[0];
    let cd = dom.children(dom.children(root)[1])[0];

    let begin = Position::new(&dom, cd, 0);
    let before = inline_before(&dom, root, &begin).unwrap();
    assert!(matches!(before, InlineElement::Run { node, .. } if node == ab));

    let end = Position::new(&dom, ab, Offset::End);
    let after = inline_after(&dom, root, &end).unwrap();
    assert!(matches!(after, InlineElement::Run { node, .. } if node == cd));

    assert!(inline_before(&dom, root, &Position::new(&dom, ab, 0)).is_none());
    assert!(inline_after(&dom, root, &Position::new(&dom, cd, Offset::End)).is_none());
}

#[test]
fn a_pinned_position_before_a_break_sees_both_sides() {
    let dom = dom_from("ab<br>cd");
    let root = dom.root();
    let ab = dom.children(root)[0];
    let br = dom.children(root)[1];
    let pin = Position::new(&dom, br, Offset::Before);

    let before = inline_before(&dom, root, &pin).unwrap();
    assert!(matches!(before, InlineElement::Run { node, .. } if node == ab));
    let after = inline_after(&dom, root, &pin).unwrap();
    assert!(matches!(after, InlineElement::Run { node, .. } if node == br));
}

#[test]
fn a_position_at_the_end_of_a_break_sees_both_sides() {
    let dom = dom_from("ab<br>cd");
    let root = dom.root();
    let br = dom.children(root)[1];
    let cd = dom.children(root)[2];
    let end = Position::new(&dom, br, Offset::End);

    let before = inline_before(&dom, root, &end).unwrap();
    assert!(
        matches!(before, InlineElement::Run { node, .. } if node == br),
        "the break itself ends at this position, got {before:?}"
    );
    let after = inline_after(&dom, root, &end).unwrap();
    assert!(matches!(after, InlineElement::Run { node, .. } if node == cd));
}

#[test]
fn zero_width_cuts_degrade_to_empty_placeholders() {
    let dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];
    let full = inline_at(&dom, root, text).unwrap();
    let at = Position::new(&dom, text, 2);

    let empty = partial_or_empty(&dom, full.clone(), Some(at), Some(at));
    assert!(matches!(empty, InlineElement::Empty { .. }));
    assert_eq!(empty.text_content(&dom), "");
    assert_eq!(empty.start_position(&dom), at);
    assert_eq!(empty.end_position(&dom), at);

    let begin = Position::new(&dom, text, 0);
    let untouched = partial_or_empty(&dom, full.clone(), Some(begin), None);
    assert_eq!(untouched, full, "cuts at the run's own ends are no-ops");
}

#[test]
fn nested_partials_merge_keeping_the_tighter_cuts() {
    let dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];

    let outer = inline_after(&dom, root, &Position::new(&dom, text, 1)).unwrap();
    let merged = partial_or_empty(
        &dom,
        outer,
        Some(Position::new(&dom, text, 2)),
        Some(Position::new(&dom, text, 4)),
    );

    let InlineElement::Partial(partial) = &merged else {
        panic!("expected a partial run, got {merged:?}");
    };
    assert!(matches!(partial.decorated(), InlineElement::Run { .. }));
    assert_eq!(merged.text_content(&dom), "ll");
}

#[test]
fn contains_is_strictly_interior() {
    let dom = dom_from("<p>hello</p>");
    let root = dom.root();
    let text = dom.children(dom.children(root)[0])[0];
    let full = inline_at(&dom, root, text).unwrap();

    assert!(full.contains(&dom, &Position::new(&dom, text, 3)));
    assert!(!full.contains(&dom, &Position::new(&dom, text, 0)));
    assert!(!full.contains(&dom, &Position::new(&dom, text, 5)));
}

#[test]
fn positions_outside_the_root_resolve_to_none() {
    let dom = dom_from("<p>ab</p><p>cd</p>");
    let first_p = dom.children(dom.root())[0];
    let cd = dom.children(dom.children(dom.root())[1])[0];
    let pos = Position::new(&dom, cd, 1);

    assert!(inline_after(&dom, first_p, &pos).is_none());
    assert!(inline_before(&dom, first_p, &pos).is_none());
}
