//! Thread-shared world handle

use std::sync::Arc;

use parking_lot::RwLock;

use super::World;

/// Shared world type: readers take the read lock, an edit scope the write lock
pub type SharedWorld = Arc<RwLock<World>>;

/// Wrap a world for shared access
pub fn create_shared_world(world: World) -> SharedWorld {
    Arc::new(RwLock::new(world))
}
