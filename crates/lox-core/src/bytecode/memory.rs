//! Amortized-doubling growth for chunk buffers.
//!
//! Buffers are plain `Vec`s, but the logical capacity is tracked by the owner
//! so the sequence `0 → 8 → 16 → 32 …` stays observable and does not depend on
//! the allocator's own rounding.

/// Capacity of a buffer after its first growth.
pub const MIN_CAPACITY: usize = 8;

/// Factor applied to the capacity on each subsequent growth.
pub const GROWTH_FACTOR: usize = 2;

/// Next capacity for a full buffer: `MIN_CAPACITY` below the floor, doubling
/// thereafter.
#[must_use]
pub const fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * GROWTH_FACTOR
    }
}

/// Resize `buf` so it can hold `new_capacity` elements without reallocating.
///
/// Contents are preserved. Allocation failure goes through the global
/// allocator's failure path and never returns.
pub(crate) fn grow_array<T>(buf: &mut Vec<T>, new_capacity: usize) {
    debug_assert!(new_capacity >= buf.len());
    buf.reserve_exact(new_capacity - buf.len());
}
