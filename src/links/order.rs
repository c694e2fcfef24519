use super::Category;

/// Height of one category row, in the same units as drag displacement.
/// The drag gesture's vertical displacement divided by this gives the
/// target row.
pub const ROW_HEIGHT: f32 = 50.0;

/// Map a drag gesture's vertical displacement to a target index.
///
/// Returns `None` when the rounded index falls outside `[0, len)` —
/// a drag past either end of the list is a no-op, not a clamp.
pub fn target_index(displacement: f32, len: usize) -> Option<usize> {
    let target = (displacement / ROW_HEIGHT).round();
    if !target.is_finite() || target < 0.0 || target >= len as f32 {
        return None;
    }
    Some(target as usize)
}

/// Compute the category order after dragging `dragged` by
/// `displacement`.
///
/// Returns `None` (no-op: nothing to apply, nothing to persist) when
/// the target index is out of bounds, equals `dragged`, or `dragged`
/// itself is out of bounds. Otherwise the result is a permutation of
/// the input with exactly the dragged element moved to the target
/// position.
pub fn reordered(categories: &[Category], dragged: usize, displacement: f32) -> Option<Vec<Category>> {
    if dragged >= categories.len() {
        return None;
    }
    let target = target_index(displacement, categories.len())?;
    if target == dragged {
        return None;
    }

    let mut next = categories.to_vec();
    let moved = next.remove(dragged);
    next.insert(target, moved);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn cats(names: &[&str]) -> Vec<Category> {
        names
            .iter()
            .map(|n| Category {
                id: n.to_lowercase(),
                name: Arc::from(*n),
            })
            .collect()
    }

    fn names(cats: &[Category]) -> Vec<&str> {
        cats.iter().map(|c| &*c.name).collect()
    }

    #[test]
    fn test_drag_to_later_position() {
        // [A,B,C,D], drag index 0 down two rows -> target 2 -> [B,C,A,D]
        let order = cats(&["A", "B", "C", "D"]);
        let next = reordered(&order, 0, 2.0 * ROW_HEIGHT).unwrap();
        assert_eq!(names(&next), ["B", "C", "A", "D"]);
    }

    #[test]
    fn test_drag_to_earlier_position() {
        let order = cats(&["A", "B", "C", "D"]);
        let next = reordered(&order, 3, 0.0).unwrap();
        assert_eq!(names(&next), ["D", "A", "B", "C"]);
    }

    #[test]
    fn test_same_target_is_noop() {
        let order = cats(&["A", "B", "C"]);
        assert!(reordered(&order, 1, ROW_HEIGHT).is_none());
        // Displacement that rounds to the dragged index is also a no-op
        assert!(reordered(&order, 1, ROW_HEIGHT * 1.2).is_none());
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let order = cats(&["A", "B", "C"]);
        assert!(reordered(&order, 0, -ROW_HEIGHT).is_none());
        assert!(reordered(&order, 0, 10.0 * ROW_HEIGHT).is_none());
        assert!(reordered(&order, 7, ROW_HEIGHT).is_none());
    }

    #[test]
    fn test_rounding_to_nearest_row() {
        let order = cats(&["A", "B", "C", "D"]);
        // 1.4 rows rounds down to 1, 1.6 rows rounds up to 2
        let next = reordered(&order, 0, 1.4 * ROW_HEIGHT).unwrap();
        assert_eq!(names(&next), ["B", "A", "C", "D"]);
        let next = reordered(&order, 0, 1.6 * ROW_HEIGHT).unwrap();
        assert_eq!(names(&next), ["B", "C", "A", "D"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(reordered(&[], 0, ROW_HEIGHT).is_none());
        let one = cats(&["A"]);
        assert!(reordered(&one, 0, ROW_HEIGHT).is_none());
    }

    #[test]
    fn test_nan_displacement_is_noop() {
        let order = cats(&["A", "B"]);
        assert!(reordered(&order, 0, f32::NAN).is_none());
    }

    proptest! {
        /// A valid reorder is always a permutation that moves exactly
        /// the dragged element: same multiset of ids, dragged element
        /// at the target index, everything else in original relative
        /// order.
        #[test]
        fn prop_reorder_is_a_minimal_permutation(
            len in 2usize..12,
            dragged in 0usize..12,
            rows in -15i32..15,
        ) {
            prop_assume!(dragged < len);
            let order: Vec<Category> = (0..len)
                .map(|i| Category { id: format!("c{i}"), name: Arc::from(format!("Cat {i}")) })
                .collect();
            let displacement = rows as f32 * ROW_HEIGHT;

            match reordered(&order, dragged, displacement) {
                None => {
                    let target = target_index(displacement, len);
                    prop_assert!(target.is_none() || target == Some(dragged));
                }
                Some(next) => {
                    let target = target_index(displacement, len).unwrap();
                    prop_assert_eq!(next.len(), order.len());
                    // Dragged element landed at the target
                    prop_assert_eq!(&next[target], &order[dragged]);
                    // Nothing duplicated or dropped
                    let mut a: Vec<&str> = order.iter().map(|c| c.id.as_str()).collect();
                    let mut b: Vec<&str> = next.iter().map(|c| c.id.as_str()).collect();
                    a.sort_unstable();
                    b.sort_unstable();
                    prop_assert_eq!(a, b);
                    // Remaining elements keep their relative order
                    let rest_a: Vec<&str> = order.iter().enumerate()
                        .filter(|(i, _)| *i != dragged)
                        .map(|(_, c)| c.id.as_str()).collect();
                    let rest_b: Vec<&str> = next.iter().enumerate()
                        .filter(|(i, _)| *i != target)
                        .map(|(_, c)| c.id.as_str()).collect();
                    prop_assert_eq!(rest_a, rest_b);
                }
            }
        }
    }
}
