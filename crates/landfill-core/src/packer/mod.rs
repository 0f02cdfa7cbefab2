//! Landfill placement.
//!
//! A per-column array of filled heights (the skyline) is kept for every atlas
//! layer together with a horizontal insertion cursor. An item of width `w` is
//! placed at the cursor, resting on the highest column it covers; those
//! columns are then raised to its top and the cursor moves past it. When the
//! next item doesn't fit horizontally anymore, the cursor resets and the next
//! row runs either in the same or in the opposite direction, which keeps the
//! filled height fairly level for height-sorted input.

pub(crate) mod landfill;
pub(crate) mod state;

pub(crate) use landfill::{SortedItem, place_sorted};
pub(crate) use state::PackerState;
