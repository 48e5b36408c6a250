use serde::{Deserialize, Serialize};

use crate::cache::template::TemplateId;
use crate::world::position::{RegionId, TilePos};
use crate::world::services::{Observers, ObserverCategory};

/// Unique id of a spawned cache, stable for the life of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheId(pub u64);

/// Forward-only lifecycle of a spawned cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheState {
    Hidden,
    Discovered,
    Removed,
}

/// How close an observer has to be before a cache can be discovered, in world
/// units.
pub const DISCOVERY_RADIUS: f32 = 5.0;

/// One cache sitting in the world, waiting to be found, opened or to rot away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInstance {
    pub id: CacheId,
    pub template: TemplateId,
    pub position: TilePos,
    pub region: RegionId,
    pub dropped_at: f64,
    pub discovered_at: Option<f64>,
    pub state: CacheState,
}

/// What a lifecycle tick observed, reported back to the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    /// Seconds left until decay, reported once on the tick that discovered it.
    pub discovered: Option<f64>,
    /// The instance decayed and must be removed from the live set.
    pub removed: bool,
}

impl CacheInstance {
    pub fn new(
        id: CacheId,
        template: TemplateId,
        position: TilePos,
        region: RegionId,
        now: f64,
    ) -> Self {
        Self {
            id,
            template,
            position,
            region,
            dropped_at: now,
            discovered_at: None,
            state: CacheState::Hidden,
        }
    }

    pub fn decays_at(&self, decay_days: f32, seconds_per_day: f64) -> f64 {
        self.dropped_at + f64::from(decay_days) * seconds_per_day
    }

    /// Advance this instance by one scheduler tick.
    pub fn tick(
        &mut self,
        now: f64,
        decay_days: f32,
        seconds_per_day: f64,
        observers: &dyn Observers,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.state == CacheState::Removed {
            return outcome;
        }

        let decays_at = self.decays_at(decay_days, seconds_per_day);

        if self.state == CacheState::Hidden {
            for observer in observers.in_region(self.region) {
                if observer.category() != ObserverCategory::Mortal {
                    continue;
                }
                if observer.position().distance_to(self.position) >= DISCOVERY_RADIUS {
                    continue;
                }
                if !observer.has_line_of_sight(self.position) {
                    continue;
                }
                self.state = CacheState::Discovered;
                self.discovered_at = Some(now);
                outcome.discovered = Some((decays_at - now).max(0.0));
                break;
            }
        }

        if now > decays_at {
            self.state = CacheState::Removed;
            outcome.removed = true;
        }

        outcome
    }

    /// Mark the instance opened. Valid from Hidden or Discovered alike.
    pub fn open(&mut self) {
        self.state = CacheState::Removed;
    }
}
