//! Property-based tests for the R-tree

use shared::*;

use grit::geometry::{Point, Rect};
use grit::rtree::RTree;
use proptest::prelude::*;

prop_compose! {
    fn arb_rect()(
        x in -200i32..200,
        y in -200i32..200,
        width in 0i32..60,
        height in 0i32..60
    ) -> Rect {
        Rect::new(Point::new(x, y), Point::new(x + width, y + height))
    }
}

prop_compose! {
    fn arb_window()(
        x in -260i32..260,
        y in -260i32..260,
        width in 0i32..200,
        height in 0i32..200
    ) -> Rect {
        Rect::new(Point::new(x, y), Point::new(x + width, y + height))
    }
}

proptest! {
    #[test]
    fn test_invariants_hold_after_every_build(
        rects in prop::collection::vec(arb_rect(), 1..120)
    ) {
        let tree = build_tree(&rects);
        check_invariants(&tree);
    }

    #[test]
    fn test_leaves_cover_exactly_the_inserted_multiset(
        rects in prop::collection::vec(arb_rect(), 1..120)
    ) {
        let tree = build_tree(&rects);
        let leaves = check_invariants(&tree);
        prop_assert_eq!(sorted_keys(&leaves), sorted_keys(&rects));
    }

    #[test]
    fn test_search_agrees_with_brute_force(
        rects in prop::collection::vec(arb_rect(), 1..120),
        window in arb_window()
    ) {
        let tree = build_tree(&rects);
        let got: Vec<Rect> = tree.range_search(&window).into_iter().copied().collect();
        let expected = brute_force_search(&rects, &window);
        prop_assert_eq!(sorted_keys(&got), sorted_keys(&expected));
    }

    #[test]
    fn test_search_emission_order_is_stable(
        rects in prop::collection::vec(arb_rect(), 1..80),
        window in arb_window()
    ) {
        let tree = build_tree(&rects);
        let first: Vec<Rect> = tree.range_search(&window).into_iter().copied().collect();
        let second: Vec<Rect> = tree.range_search(&window).into_iter().copied().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_visitor_and_collecting_search_agree(
        rects in prop::collection::vec(arb_rect(), 1..80),
        window in arb_window()
    ) {
        let tree = build_tree(&rects);
        let collected: Vec<Rect> = tree.range_search(&window).into_iter().copied().collect();
        let mut visited = Vec::new();
        tree.search(&window, |rect| visited.push(*rect));
        prop_assert_eq!(visited, collected);
    }

    #[test]
    fn test_membership_survives_permutation(
        rects in prop::collection::vec(arb_rect(), 1..80),
        seed in any::<u64>()
    ) {
        // Fisher-Yates with a seeded xorshift; structure may differ between
        // the two trees but membership must not.
        let mut permuted = rects.clone();
        let mut state = seed | 1;
        for i in (1..permuted.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            permuted.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let forward = build_tree(&rects);
        let shuffled = build_tree(&permuted);
        prop_assert_eq!(
            sorted_keys(&check_invariants(&forward)),
            sorted_keys(&check_invariants(&shuffled))
        );
    }

    #[test]
    fn test_every_inserted_rectangle_is_findable(
        rects in prop::collection::vec(arb_rect(), 1..60)
    ) {
        let tree = build_tree(&rects);
        for rect in &rects {
            let hits = tree.range_search(rect);
            prop_assert!(
                hits.iter().any(|hit| **hit == *rect),
                "rectangle {} not found by a search over itself", rect
            );
        }
    }
}
