//! Layout calculation modules for card sheets
//!
//! This module handles all the geometric calculations:
//! - Grid layout (centering, cell placement, mirroring)
//! - Shared geometric types

mod grid;
mod types;

pub use grid::*;
pub use types::*;
