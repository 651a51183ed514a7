//! Drag-and-drop reordering for ordered lists.

use crate::error::CoreError;

/// Move the item at `from` to position `to`, shifting the items between.
///
/// Both indices must be within `0..items.len()`.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), CoreError> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(CoreError::Validation(format!(
            "Reorder indices out of range: from {from}, to {to}, list has {len} items"
        )));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Dense `0..K-1` sort orders for a list already in its final order.
pub fn dense_sort_orders<I: Copy>(ids: &[I]) -> Vec<(I, i32)> {
    ids.iter().zip(0..).map(|(&id, order)| (id, order)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_forward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        reorder(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
    }

    #[test]
    fn move_backward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        reorder(&mut items, 3, 1).unwrap();
        assert_eq!(items, vec!['a', 'd', 'b', 'c']);
    }

    #[test]
    fn same_index_is_noop() {
        let mut items = vec![1, 2, 3];
        reorder(&mut items, 1, 1).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn out_of_range_rejected() {
        let mut items = vec![1, 2, 3];
        assert!(reorder(&mut items, 3, 0).is_err());
        assert!(reorder(&mut items, 0, 5).is_err());
        assert!(reorder(&mut Vec::<i32>::new(), 0, 0).is_err());
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn sort_orders_are_a_dense_permutation() {
        let mut ids = vec![10_i64, 11, 12, 13, 14];
        reorder(&mut ids, 4, 0).unwrap();
        let orders = dense_sort_orders(&ids);
        assert_eq!(orders, vec![(14, 0), (10, 1), (11, 2), (12, 3), (13, 4)]);
    }
}
