pub mod constants;
pub mod layout;
pub mod marks;
mod options;
pub mod render;
pub mod sheet;
mod stats;
mod types;

pub use layout::{CellPlacement, GridLayout, GridOrigin, GridPosition, LineSegment, Rect};
pub use marks::MarksConfig;
pub use options::*;
pub use render::{document_to_bytes, render_document, write_sheet};
pub use sheet::{Paginator, PlacedCard, SheetDocument, SheetPage};
pub use stats::calculate_statistics;
pub use types::*;

