//! Self-contained collaborator implementations for the demo binary and tests.
//! A real game wires its own terrain, perception and economy in through the
//! traits in `world::services`; these stand-ins are deliberately flat and
//! deterministic.

use crate::cache::instance::{CacheId, CacheInstance};
use crate::random::GameRng;
use crate::world::position::{RegionId, TilePos, Zone};
use crate::world::services::{
    Economy, Observer, ObserverCategory, Observers, OpenContext, Placement, Presentation,
};

/// Flat square world with a protected home zone around the origin.
#[derive(Debug)]
pub struct FlatTerrainPlacement {
    pub radius: i32,
    pub home: Zone,
}

impl FlatTerrainPlacement {
    pub fn new(radius: i32, home: Zone) -> Self {
        Self { radius, home }
    }
}

impl Placement for FlatTerrainPlacement {
    fn find_spawn_tile(&mut self, _region: RegionId, rng: &mut GameRng) -> Option<TilePos> {
        let span = (self.radius.max(1) as u32).saturating_mul(2);
        let x = rng.roll_range(0, span) as i32 - self.radius;
        let z = rng.roll_range(0, span) as i32 - self.radius;
        // flat terrain: every tile is at height 0 and navigable as-is
        let tile = TilePos::new(x, 0, z).clamped(self.radius);
        if self.home.contains(tile) {
            return None;
        }
        Some(tile)
    }
}

/// An observer standing at a fixed position with a simple range-limited view.
#[derive(Debug, Clone)]
pub struct StaticObserver {
    pub category: ObserverCategory,
    pub position: TilePos,
    pub sight_range: f32,
}

impl Observer for StaticObserver {
    fn category(&self) -> ObserverCategory {
        self.category
    }

    fn position(&self) -> TilePos {
        self.position
    }

    fn has_line_of_sight(&self, target: TilePos) -> bool {
        self.position.distance_to(target) <= self.sight_range
    }
}

/// Fixed observer roster, all in one region.
#[derive(Debug)]
pub struct StaticObservers {
    pub region: RegionId,
    pub members: Vec<StaticObserver>,
}

impl Observers for StaticObservers {
    fn in_region(&self, region: RegionId) -> Vec<&dyn Observer> {
        if region != self.region {
            return Vec::new();
        }
        self.members
            .iter()
            .map(|member| member as &dyn Observer)
            .collect()
    }
}

/// Empty observer set; nothing ever gets discovered.
#[derive(Debug, Default)]
pub struct NoObservers;

impl Observers for NoObservers {
    fn in_region(&self, _region: RegionId) -> Vec<&dyn Observer> {
        Vec::new()
    }
}

/// Presentation stub that tracks which instances are attached, so tests can
/// assert attach/detach stay balanced.
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub attached: Vec<CacheId>,
    pub total_attached: usize,
    pub visibility_refreshes: usize,
}

impl Presentation for RecordingPresentation {
    fn attach(&mut self, instance: &CacheInstance) {
        self.attached.push(instance.id);
        self.total_attached += 1;
    }

    fn detach(&mut self, instance: &CacheInstance) {
        self.attached.retain(|id| *id != instance.id);
    }

    fn set_visible(&mut self, _instance: &CacheInstance, _visible: bool) {
        self.visibility_refreshes += 1;
    }
}

/// Economy that always grants the same budget.
#[derive(Debug)]
pub struct FixedEconomy {
    pub worth: f32,
}

impl Economy for FixedEconomy {
    fn current_worth_budget(&mut self, _context: &OpenContext) -> f32 {
        self.worth
    }
}

/// Economy that scales the budget off a ruler's prestige: up to half of it,
/// squared-uniform so most openings land well below the ceiling, floored at 5.
#[derive(Debug)]
pub struct PrestigeEconomy {
    pub prestige: f32,
    rng: GameRng,
}

impl PrestigeEconomy {
    pub fn new(prestige: f32, seed: u64) -> Self {
        Self {
            prestige,
            rng: GameRng::from_seed(seed),
        }
    }
}

impl Economy for PrestigeEconomy {
    fn current_worth_budget(&mut self, _context: &OpenContext) -> f32 {
        let spread = self.rng.distributed(0.0, 0.5);
        let bias = self.rng.unit().powi(2);
        (self.prestige * bias * spread).max(5.0)
    }
}
