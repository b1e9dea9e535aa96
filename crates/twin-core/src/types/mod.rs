//! Core value types shared by the world model and the annotation layer

mod limits;
mod name;
mod pose;
mod scale;

pub use limits::*;
pub use name::*;
pub use pose::*;
pub use scale::*;
