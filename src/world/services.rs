use crate::cache::instance::CacheInstance;
use crate::random::GameRng;
use crate::world::position::{RegionId, TilePos};

/// Observer classes. Only mortals notice caches on the ground; spirits and other
/// ethereal actors pass them by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverCategory {
    Mortal,
    Spirit,
}

/// Context handed to the economy when a cache is opened.
#[derive(Debug, Clone, Default)]
pub struct OpenContext {
    pub opened_by: Option<String>,
}

/// Finds a tile a new cache may occupy: random within world bounds, snapped to
/// terrain height, adjusted to a navigable spot, rejected inside protected home
/// zones. `None` means "no valid tile this attempt" and is retried later.
pub trait Placement {
    fn find_spawn_tile(&mut self, region: RegionId, rng: &mut GameRng) -> Option<TilePos>;
}

pub trait Observer {
    fn category(&self) -> ObserverCategory;
    fn position(&self) -> TilePos;
    fn has_line_of_sight(&self, target: TilePos) -> bool;
}

pub trait Observers {
    fn in_region(&self, region: RegionId) -> Vec<&dyn Observer>;
}

/// Visual representation of live caches. The engine only signals; the renderer
/// owns the actual resources.
pub trait Presentation {
    fn attach(&mut self, instance: &CacheInstance);
    fn detach(&mut self, instance: &CacheInstance);
    fn set_visible(&mut self, instance: &CacheInstance, visible: bool);
}

/// Derives the monetary worth converted into loot when a cache is opened.
pub trait Economy {
    fn current_worth_budget(&mut self, context: &OpenContext) -> f32;
}
