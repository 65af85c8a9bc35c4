pub mod code;
pub mod color;
pub mod compose;
pub mod font;
mod input;
mod options;
mod pipeline;
pub mod symbol;
mod types;

pub use code::{PLACEHOLDER_CODE, derive_code, derive_code_or_placeholder};
pub use color::{CmykPlanes, ColorTransform};
pub use compose::{CardRaster, Compositor, flatten_on_white};
pub use input::*;
pub use options::*;
pub use pipeline::Pipeline;
pub use symbol::encode_symbol;
pub use types::*;
