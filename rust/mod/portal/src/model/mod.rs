mod application;
mod category;
mod identity;
mod registry;

pub use application::*;
pub use category::*;
pub use identity::*;
pub use registry::*;
