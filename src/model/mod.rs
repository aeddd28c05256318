mod common;
mod draft;
mod record;

pub use common::*;
pub use draft::*;
pub use record::*;
