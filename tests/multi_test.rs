//! Tests for the multi-level outline engine

use rsoutline::{Line, OutlineError, OutlineMulti};

/// R
/// ├── C1
/// │   └── G1
/// └── C2
struct Fixture {
    outline: OutlineMulti<String>,
    r: Line,
    c1: Line,
    g1: Line,
    c2: Line,
}

fn tree() -> Fixture {
    let mut outline = OutlineMulti::new();
    let r = outline.insert_child("R".to_string(), None).unwrap();
    let c1 = outline.insert_child("C1".to_string(), Some(r)).unwrap();
    let g1 = outline.insert_child("G1".to_string(), Some(c1)).unwrap();
    let c2 = outline.insert_child("C2".to_string(), Some(r)).unwrap();
    Fixture { outline, r, c1, g1, c2 }
}

// ============================================================
// Structure Tests
// ============================================================

#[test]
fn given_children_when_listing_then_sibling_order_preserved() {
    let f = tree();

    assert_eq!(f.outline.child_lines(None), vec![f.r]);
    assert_eq!(f.outline.child_lines(Some(f.r)), vec![f.c1, f.c2]);
    assert_eq!(f.outline.child_lines(Some(f.c1)), vec![f.g1]);
    assert!(f.outline.child_lines(Some(f.g1)).is_empty());
}

#[test]
fn given_tree_when_querying_parents_then_back_references_resolve() {
    let f = tree();

    assert_eq!(f.outline.parent_line(f.g1), Some(f.c1));
    assert_eq!(f.outline.parent_line(f.c1), Some(f.r));
    assert!(f.outline.parent_line(f.r).is_none());
}

#[test]
fn given_tree_when_measuring_then_depth_counts_levels() {
    let f = tree();
    assert_eq!(f.outline.depth(), 3);
    assert_eq!(f.outline.len(), 4);
}

// ============================================================
// Traversal Tests
// ============================================================

#[test]
fn given_tree_when_iterating_then_depth_first_preorder() {
    let f = tree();
    let items: Vec<&str> = f.outline.items().map(String::as_str).collect();
    assert_eq!(items, vec!["R", "C1", "G1", "C2"]);
}

#[test]
fn given_every_line_when_checking_order_then_descendants_before_next_sibling() {
    // for every line L, every descendant of L appears strictly after L and
    // strictly before L's next sibling
    let f = tree();
    let order: Vec<Line> = f.outline.lines_section(None).collect();
    let position = |line: Line| order.iter().position(|&l| l == line).unwrap();

    for line in f.outline.lines() {
        let descendants: Vec<Line> = f.outline.lines_section(Some(line)).skip(1).collect();
        let siblings = match f.outline.parent_line(line) {
            Some(parent) => f.outline.child_lines(Some(parent)),
            None => f.outline.child_lines(None),
        };
        let next_sibling = siblings
            .iter()
            .skip_while(|&&sibling| sibling != line)
            .nth(1)
            .copied();

        for descendant in descendants {
            assert!(position(descendant) > position(line));
            if let Some(next) = next_sibling {
                assert!(position(descendant) < position(next));
            }
        }
    }
}

#[test]
fn given_section_root_when_iterating_then_only_subtree_inclusive() {
    let f = tree();

    let items: Vec<&str> = f
        .outline
        .items_section(Some(f.c1))
        .map(String::as_str)
        .collect();

    assert_eq!(items, vec!["C1", "G1"]);
}

#[test]
fn given_lines_when_looking_up_each_then_matches_items_sequence() {
    let f = tree();

    let by_line: Vec<&str> = f
        .outline
        .lines()
        .map(|line| f.outline.get_item(line).unwrap().as_str())
        .collect();
    let by_item: Vec<&str> = f.outline.items().map(String::as_str).collect();

    assert_eq!(by_line, by_item);
}

#[test]
fn given_section_traversal_when_restarting_then_same_sequence() {
    let f = tree();

    let first: Vec<Line> = f.outline.lines_section(Some(f.r)).collect();
    let second: Vec<Line> = f.outline.lines_section(Some(f.r)).collect();

    assert_eq!(first, second);
}

// ============================================================
// Sibling Insertion Tests
// ============================================================

#[test]
fn given_anchor_with_parent_when_inserting_before_then_new_sibling_under_same_parent() {
    let mut f = tree();

    let x = f.outline.insert_before("X".to_string(), Some(f.c2)).unwrap();

    assert_eq!(f.outline.parent_line(x), Some(f.r));
    assert_eq!(f.outline.child_lines(Some(f.r)), vec![f.c1, x, f.c2]);
}

#[test]
fn given_top_level_anchor_when_inserting_after_then_new_root_follows() {
    let mut f = tree();

    let s = f.outline.insert_after("S".to_string(), Some(f.r)).unwrap();

    assert_eq!(f.outline.child_lines(None), vec![f.r, s]);
    assert!(f.outline.parent_line(s).is_none());
}

#[test]
fn given_none_anchors_when_inserting_then_top_level_ends() {
    let mut f = tree();

    let last = f.outline.insert_before("LAST".to_string(), None).unwrap();
    let first = f.outline.insert_after("FIRST".to_string(), None).unwrap();

    assert_eq!(f.outline.child_lines(None), vec![first, f.r, last]);
}

// ============================================================
// Misuse Tests
// ============================================================

#[test]
fn given_removed_parent_when_inserting_child_then_stale_line_error() {
    let mut f = tree();
    f.outline.remove_section(Some(f.c1));

    let result = f.outline.insert_child("X".to_string(), Some(f.c1));

    assert!(matches!(result, Err(OutlineError::StaleLine(_))));
    assert_eq!(f.outline.len(), 2);
}

#[test]
fn given_removed_line_when_traversing_section_then_empty() {
    let mut f = tree();
    f.outline.remove_section(Some(f.c1));

    assert_eq!(f.outline.lines_section(Some(f.c1)).count(), 0);
    assert!(f.outline.get_item(f.g1).is_none());
}

// ============================================================
// Clear and Equality Tests
// ============================================================

#[test]
fn given_tree_when_clearing_twice_then_empty_both_times() {
    let mut f = tree();

    f.outline.clear();
    assert!(f.outline.is_empty());
    assert_eq!(f.outline.child_lines(None).len(), 0);

    f.outline.clear();
    assert!(f.outline.is_empty());
}

#[test]
fn given_same_shape_when_comparing_then_equal() {
    let left = tree().outline;
    let right = tree().outline;
    assert_eq!(left, right);
}

#[test]
fn given_same_items_different_shape_when_comparing_then_not_equal() {
    let left = tree().outline;

    // same four items, but G1 hangs off C2 instead of C1
    let mut right = OutlineMulti::new();
    let r = right.insert_child("R".to_string(), None).unwrap();
    right.insert_child("C1".to_string(), Some(r)).unwrap();
    let c2 = right.insert_child("C2".to_string(), Some(r)).unwrap();
    right.insert_child("G1".to_string(), Some(c2)).unwrap();

    assert_ne!(left, right);
}

#[test]
fn given_clone_when_comparing_then_equal_with_fresh_store() {
    let f = tree();
    let clone = f.outline.clone();

    assert_eq!(f.outline, clone);
    assert_ne!(f.outline.store(), clone.store());
    assert_eq!(clone.view_count(), 0);
}
