pub mod booking;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use booking::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
