pub mod gallery_item;
pub mod placement;

pub use gallery_item::*;
pub use placement::*;
