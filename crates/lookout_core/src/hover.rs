//! Pointer hover test

use crate::geometry::{PointerPosition, Rect};

/// Whether the pointer lies within the rect, edges included
pub fn is_hovering(pointer: &PointerPosition, rect: &Rect) -> bool {
    pointer.x >= rect.x
        && pointer.y >= rect.y
        && pointer.x <= rect.x + rect.width
        && pointer.y <= rect.y + rect.height
}
