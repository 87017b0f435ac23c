//! Sibling ordering shared by every level of the hierarchy.

use prodcfg_model::{Attribute, Parameter, Product};
use prodcfg_types::{ChangeStatus, sort_order_at};
use serde::{Deserialize, Serialize};

/// Direction of a positional move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Index of the neighbour to swap with, or `None` at the boundary.
    pub(crate) fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Up => index.checked_sub(1),
            Self::Down => (index + 1 < len).then_some(index + 1),
        }
    }
}

pub(crate) trait Sibling {
    fn sort_order_mut(&mut self) -> &mut i64;
    fn status_mut(&mut self) -> &mut ChangeStatus;
}

macro_rules! impl_sibling {
    ($($ty:ty),*) => {
        $(impl Sibling for $ty {
            fn sort_order_mut(&mut self) -> &mut i64 {
                &mut self.sort_order
            }

            fn status_mut(&mut self) -> &mut ChangeStatus {
                &mut self.status
            }
        })*
    };
}

impl_sibling!(Product, Attribute, Parameter);

/// Rewrites `sortOrder` to `0, 10, 20, …` in list order. A sibling whose
/// value actually changes is touched.
pub(crate) fn renumber<T: Sibling>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        let target = sort_order_at(index);
        if *item.sort_order_mut() != target {
            *item.sort_order_mut() = target;
            let status = item.status_mut();
            *status = status.touched();
        }
    }
}

/// Swaps the element at `index` with its neighbour and renumbers. Returns
/// false (leaving `items` alone) at the boundary.
pub(crate) fn shift<T: Sibling>(items: &mut [T], index: usize, direction: Direction) -> bool {
    let Some(other) = direction.neighbour(index, items.len()) else {
        return false;
    };
    items.swap(index, other);
    renumber(items);
    true
}
