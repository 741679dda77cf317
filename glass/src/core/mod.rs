mod assets;
mod geometry;
mod glass;
mod settings;
mod store;
mod timer;

pub use assets::*;
pub use geometry::*;
pub use glass::*;
pub use settings::*;
pub use store::*;
pub use timer::*;
