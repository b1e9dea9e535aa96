//! Twin Core Data Structures
//!
//! Kinematic world model with a semantic annotation layer:
//! - World: bodies and connections forming a single-rooted tree, edited in
//!   transactional scopes
//! - Connection: fixed, revolute, prismatic and omni-drive edges owning their
//!   degrees of freedom
//! - Annotation: doors, drawers, hinges and other domain descriptors indexed
//!   by type and capability
//! - Import: URDF to world

pub mod annotation;
pub mod config;
pub mod connection;
pub mod dof;
pub mod error;
pub mod import;
pub mod publish;
pub mod types;
pub mod world;

pub use annotation::*;
pub use config::*;
pub use connection::*;
pub use dof::*;
pub use error::*;
pub use import::*;
pub use publish::*;
pub use types::*;
pub use world::*;
