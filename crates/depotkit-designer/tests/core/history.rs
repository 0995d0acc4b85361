use depotkit_core::Point2D;
use depotkit_designer::path_graph::{Path, PathGraphState, PathHistory};
use proptest::prelude::*;

fn state(tag: usize) -> PathGraphState {
    let x = tag as f64;
    PathGraphState {
        paths: vec![Path::segment(Point2D::new(x, 0.0), Point2D::new(x, 1.0))],
        drawing_start: None,
    }
}

#[test]
fn test_capacity_drops_oldest() {
    let mut history = PathHistory::new(3);
    for tag in 0..5 {
        history.push(state(tag));
    }
    assert_eq!(history.undo_depth(), 3);
    assert_eq!(history.undo(), Some(&state(3)));
    assert_eq!(history.undo(), Some(&state(2)));
    assert_eq!(history.undo(), None);
}

#[test]
fn test_reset_keeps_only_baseline() {
    let mut history = PathHistory::default();
    history.push(state(1));
    history.push(state(2));
    history.undo();
    history.reset(state(9));
    assert_eq!(history.undo_depth(), 1);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

proptest! {
    #[test]
    fn prop_undo_floor_is_first_mutation(n in 1usize..40) {
        let mut history = PathHistory::new(50);
        for tag in 1..=n {
            history.push(state(tag));
        }
        for step in 1..n {
            let restored = history.undo().cloned();
            prop_assert_eq!(restored, Some(state(n - step)));
        }
        prop_assert!(history.undo().is_none());
        prop_assert_eq!(history.undo_depth(), 1);
        prop_assert_eq!(history.redo_depth(), n - 1);
    }
}
