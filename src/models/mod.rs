pub mod event;
pub mod resource;

pub use event::*;
pub use resource::*;
