use super::*;
use crate::dom::markup;

fn dom_from(source: &str) -> Dom {
    markup::parse(source).unwrap()
}

#[test]
fn numeric_offsets_clamp_and_mark_the_end() {
    let dom = dom_from("<p>hello</p>");
    let p = dom.children(dom.root())[0];
    let text = dom.children(p)[0];

    let inside = Position::new(&dom, text, 3);
    assert_eq!(inside.node(), text);
    assert_eq!(inside.offset(), 3);
    assert!(!inside.is_at_end());

    let clamped = Position::new(&dom, text, 99);
    assert_eq!(clamped.offset(), 5);
    assert!(clamped.is_at_end());

    let begin = Position::new(&dom, text, 0);
    assert_eq!(begin.offset(), 0);
    assert!(!begin.is_at_end());
}

#[test]
fn before_and_after_anchor_in_the_parent() {
    let dom = dom_from("<p>ab<br>cd</p>");
    let p = dom.children(dom.root())[0];
    let br = dom.children(p)[1];
    let tail = dom.children(p)[2];

    let before = Position::new(&dom, br, Offset::Before);
    assert_eq!(before.node(), p);
    assert_eq!(before.offset(), 1);
    assert!(!before.is_at_end());

    let after = Position::new(&dom, br, Offset::After);
    assert_eq!(after.node(), p);
    assert_eq!(after.offset(), 2);
    assert!(!after.is_at_end(), "two children follow the br");

    let after_tail = Position::new(&dom, tail, Offset::After);
    assert_eq!(after_tail.offset(), 3);
    assert!(after_tail.is_at_end());
}

#[test]
fn before_and_after_degrade_on_parentless_nodes() {
    let mut dom = Dom::new();
    let loose = dom.create_text("xy");

    let before = Position::new(&dom, loose, Offset::Before);
    assert_eq!(before.node(), loose);
    assert_eq!(before.offset(), 0);

    let after = Position::new(&dom, loose, Offset::After);
    assert_eq!(after.node(), loose);
    assert_eq!(after.offset(), 2);
    assert!(after.is_at_end());
}

#[test]
fn element_is_the_nearest_element_ancestor() {
    let dom = dom_from("<p>hello</p>");
    let p = dom.children(dom.root())[0];
    let text = dom.children(p)[0];

    assert_eq!(Position::new(&dom, text, 1).element(), p);
    assert_eq!(Position::new(&dom, p, 0).element(), p);
}

#[test]
fn normalize_descends_to_the_leaf_on_either_side() {
    let dom = dom_from("<div><p>hello</p></div>");
    let root = dom.root();
    let div = dom.children(root)[0];
    let p = dom.children(div)[0];
    let text = dom.children(p)[0];

    let start = Position::new(&dom, root, 0).normalize(&dom);
    assert_eq!(start.node(), text);
    assert_eq!(start.offset(), 0);
    assert!(!start.is_at_end());

    let end = Position::new(&dom, root, Offset::End).normalize(&dom);
    assert_eq!(end.node(), text);
    assert_eq!(end.offset(), 5);
    assert!(end.is_at_end());
}

#[test]
fn normalize_pins_to_void_elements() {
    let dom = dom_from("<p>ab<br></p>");
    let p = dom.children(dom.root())[0];
    let br = dom.children(p)[1];

    let mid = Position::new(&dom, p, 1).normalize(&dom);
    assert_eq!(mid, Position::new(&dom, br, Offset::Before));

    let end = Position::new(&dom, p, Offset::End).normalize(&dom);
    assert_eq!(end, Position::new(&dom, br, Offset::After));
}

#[test]
fn normalize_is_idempotent_across_the_tree() {
    let dom = dom_from("<div><p>ab<br>cd</p><p><b>x</b></p></div>123");
    for node in dom.node_ids() {
        for offset in 0..=dom.node_len(node) {
            let once = Position::new(&dom, node, offset).normalize(&dom);
            assert_eq!(
                once.normalize(&dom),
                once,
                "normalize moved an already normalized position"
            );
        }
    }
}

#[test]
fn order_is_a_strict_total_order_over_attached_positions() {
    let dom = dom_from("<p>ab<br>cd</p><div><b>x</b>y</div>");
    let mut positions = Vec::new();
    for node in dom.node_ids() {
        for offset in 0..=dom.node_len(node) {
            positions.push(Position::new(&dom, node, offset));
        }
        positions.push(Position::new(&dom, node, Offset::End));
    }

    for a in &positions {
        assert!(!a.is_after(&dom, a));
        for b in &positions {
            let equal = a == b;
            let forward = a.is_after(&dom, b);
            let backward = b.is_after(&dom, a);
            assert_eq!(
                u8::from(equal) + u8::from(forward) + u8::from(backward),
                1,
                "expected exactly one of equal/forward/backward for {a:?} vs {b:?}"
            );
        }
    }
}

#[test]
fn ties_on_the_same_offset_go_to_the_end_marker() {
    let dom = dom_from("<p></p>");
    let p = dom.children(dom.root())[0];

    let by_index = Position::new(&dom, p, 0);
    let by_end = Position::new(&dom, p, Offset::End);
    assert!(by_end.is_after(&dom, &by_index));
    assert!(!by_index.is_after(&dom, &by_end));
}

#[test]
fn move_by_shifts_and_clamps_on_the_same_node() {
    let dom = dom_from("<p>hello</p>");
    let p = dom.children(dom.root())[0];
    let text = dom.children(p)[0];
    let pos = Position::new(&dom, text, 2);

    assert_eq!(pos.move_by(&dom, 2).offset(), 4);
    assert_eq!(pos.move_by(&dom, -5).offset(), 0);
    let past = pos.move_by(&dom, 99);
    assert_eq!(past.offset(), 5);
    assert!(past.is_at_end());
}

#[test]
fn selection_ranges_order_their_ends() {
    let dom = dom_from("<p>hello</p>");
    let p = dom.children(dom.root())[0];
    let text = dom.children(p)[0];
    let early = Position::new(&dom, text, 1);
    let late = Position::new(&dom, text, 4);

    let range = SelectionRange::new(&dom, late, early);
    assert_eq!(range.start(), early);
    assert_eq!(range.end(), late);
    assert!(!range.is_collapsed());

    let caret = SelectionRange::collapsed(early);
    assert!(caret.is_collapsed());
    assert_eq!(caret.start(), caret.end());
}
