use serde::{Deserialize, Serialize};

use crate::cache::instance::{CacheId, CacheInstance};
use crate::cache::template::{CacheTemplate, TemplateId, TemplateRegistry};
use crate::loot::catalog::Catalog;
use crate::loot::decompose::{decompose, LootDraw};
use crate::loot::picker::pick_weighted;
use crate::random::GameRng;
use crate::telemetry::logging;
use crate::world::clock::WorldClock;
use crate::world::position::RegionId;
use crate::world::services::{Economy, Observers, OpenContext, Placement, Presentation};

/// Spawn pacing and lifetime tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Average spawn attempts per game day.
    pub attempts_per_day: f32,
    /// Maximum number of live caches at any time.
    pub concurrency_limit: usize,
    /// Days a cache survives before it rots away.
    pub decay_days: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            attempts_per_day: 2.0,
            concurrency_limit: 3,
            decay_days: 3.0,
        }
    }
}

/// Everything the world supplies for one scheduler tick.
pub struct TickContext<'a> {
    pub placement: &'a mut dyn Placement,
    pub observers: &'a dyn Observers,
    pub presentation: &'a mut dyn Presentation,
}

/// Terminal result of the external open interaction, fed back into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionResult {
    Succeeded,
    Interrupted,
    Failed,
}

/// What came of an open request.
#[derive(Debug)]
pub enum OpenOutcome {
    Completed(Vec<LootDraw>),
    /// The interaction was cut short; the cache is untouched and can be retried.
    Interrupted,
    /// The interaction failed or the cache no longer exists.
    Failed,
}

type DiscoveredCallback = Box<dyn FnMut(&CacheInstance, f64)>;
type RemovedCallback = Box<dyn FnMut(&CacheInstance)>;

/// Tick-driven owner of every live cache.
///
/// Single-threaded by construction: the host calls `tick` once per frame/step
/// and all mutation of the live set happens inside those calls or inside the
/// explicit open/session operations. Nothing here blocks.
pub struct SpawnScheduler {
    clock: WorldClock,
    rng: GameRng,
    templates: TemplateRegistry,
    live: Vec<CacheInstance>,
    next_attempt_at: f64,
    next_cache_id: u64,
    config: SchedulerConfig,
    playing: bool,
    region: Option<RegionId>,
    discovered_callbacks: Vec<DiscoveredCallback>,
    removed_callbacks: Vec<RemovedCallback>,
}

impl SpawnScheduler {
    pub fn new(config: SchedulerConfig, clock: WorldClock, seed: u64) -> Self {
        Self {
            clock,
            rng: GameRng::from_seed(seed),
            templates: TemplateRegistry::new(),
            live: Vec::new(),
            next_attempt_at: 0.0,
            next_cache_id: 1,
            config,
            playing: false,
            region: None,
            discovered_callbacks: Vec::new(),
            removed_callbacks: Vec::new(),
        }
    }

    pub fn register_template(&mut self, template: CacheTemplate) -> TemplateId {
        self.templates.register(template)
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn next_attempt_at(&self) -> f64 {
        self.next_attempt_at
    }

    pub fn live(&self) -> &[CacheInstance] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn on_discovered<F>(&mut self, callback: F)
    where
        F: FnMut(&CacheInstance, f64) + 'static,
    {
        self.discovered_callbacks.push(Box::new(callback));
    }

    pub fn on_removed<F>(&mut self, callback: F)
    where
        F: FnMut(&CacheInstance) + 'static,
    {
        self.removed_callbacks.push(Box::new(callback));
    }

    /// Begin playing on a fresh timeline. Caches left over from a previous
    /// session are force-removed first, so back-to-back sessions never inherit
    /// stale instances. The first spawn attempt is eligible immediately.
    pub fn start_session(&mut self, presentation: &mut dyn Presentation) {
        let mut index = self.live.len();
        while index > 0 {
            index -= 1;
            self.remove_at(index, presentation);
        }
        self.clock.reset();
        self.playing = true;
        self.next_attempt_at = self.clock.now();
    }

    /// Tear the session down: every live cache is force-removed, newest first.
    /// A non-empty live set afterwards is a programming defect, not a runtime
    /// condition.
    pub fn end_session(&mut self, presentation: &mut dyn Presentation) {
        let mut index = self.live.len();
        while index > 0 {
            index -= 1;
            self.remove_at(index, presentation);
        }
        assert!(
            self.live.is_empty(),
            "live caches survived a session reset"
        );
        self.playing = false;
    }

    pub fn region_loaded(&mut self, region: RegionId) {
        self.region = Some(region);
    }

    pub fn region_unloaded(&mut self) {
        self.region = None;
    }

    /// Region visibility changed: re-signal presentation for every live cache.
    /// Scheduling state is untouched.
    pub fn refresh_visible(&self, presentation: &mut dyn Presentation) {
        for instance in &self.live {
            presentation.set_visible(instance, true);
        }
    }

    /// Advance the engine by `dt` seconds of virtual time.
    pub fn tick(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        let Some(region) = self.region else {
            return;
        };
        if !self.playing {
            return;
        }

        self.clock.advance(dt);
        let now = self.clock.now();

        if now > self.next_attempt_at {
            if self.live.len() < self.config.concurrency_limit {
                self.attempt_spawn(region, now, ctx);
            }
            // reschedule even when the attempt was skipped or found nothing,
            // so the next attempt never goes stale
            let jitter = self.rng.distributed(0.5, 2.0);
            self.next_attempt_at =
                now + self.clock.seconds_per_day() / f64::from(self.config.attempts_per_day * jitter);
        }

        // newest first: an instance that decays during its own tick is removed
        // in place without disturbing the rest of the walk
        let decay_days = self.config.decay_days;
        let seconds_per_day = self.clock.seconds_per_day();
        let mut index = self.live.len();
        while index > 0 {
            index -= 1;
            if index >= self.live.len() {
                continue;
            }
            let outcome = self.live[index].tick(now, decay_days, seconds_per_day, ctx.observers);
            if let Some(remaining) = outcome.discovered {
                let snapshot = self.live[index].clone();
                logging::log_game(&format!(
                    "cache {} discovered at {:?}, {:.0}s until decay",
                    snapshot.id.0, snapshot.position, remaining
                ));
                for callback in &mut self.discovered_callbacks {
                    callback(&snapshot, remaining);
                }
            }
            if outcome.removed {
                logging::log_game(&format!("cache {} decayed", self.live[index].id.0));
                self.remove_at(index, ctx.presentation);
            }
        }
    }

    fn attempt_spawn(&mut self, region: RegionId, now: f64, ctx: &mut TickContext<'_>) {
        let Some(tile) = ctx.placement.find_spawn_tile(region, &mut self.rng) else {
            return;
        };
        let rng = &mut self.rng;
        let Some(template_id) =
            pick_weighted(self.templates.iter(), |(_, t)| t.spawn_weight, rng)
                .map(|(id, _)| id)
        else {
            return;
        };

        let id = CacheId(self.next_cache_id);
        self.next_cache_id += 1;
        let instance = CacheInstance::new(id, template_id, tile, region, now);
        ctx.presentation.attach(&instance);
        logging::log_game(&format!(
            "cache {} ({}) spawned at {:?}",
            id.0,
            self.templates
                .get(template_id)
                .map(|t| t.name.as_str())
                .unwrap_or("?"),
            tile
        ));
        self.live.push(instance);
    }

    /// Resolve the terminal result of an external open interaction. Anything
    /// short of success leaves the cache exactly as it was; no part of the loot
    /// budget is consumed until the interaction completes.
    pub fn resolve_interaction(
        &mut self,
        id: CacheId,
        result: InteractionResult,
        context: &OpenContext,
        economy: &mut dyn Economy,
        catalog: &Catalog,
        presentation: &mut dyn Presentation,
    ) -> OpenOutcome {
        match result {
            InteractionResult::Succeeded => {
                self.request_open(id, context, economy, catalog, presentation)
            }
            InteractionResult::Interrupted => OpenOutcome::Interrupted,
            InteractionResult::Failed => OpenOutcome::Failed,
        }
    }

    /// Open a cache now: derive the worth budget, decompose it into draws, then
    /// destroy the cache. The draws are handed back for the item-placement
    /// collaborator to realize; the engine itself places nothing.
    pub fn request_open(
        &mut self,
        id: CacheId,
        context: &OpenContext,
        economy: &mut dyn Economy,
        catalog: &Catalog,
        presentation: &mut dyn Presentation,
    ) -> OpenOutcome {
        let Some(index) = self.live.iter().position(|instance| instance.id == id) else {
            return OpenOutcome::Failed;
        };

        let worth = economy.current_worth_budget(context);
        let filter = self
            .templates
            .get(self.live[index].template)
            .and_then(|template| template.item_filter.clone());
        let draws = decompose(worth, filter.as_ref(), catalog, &mut self.rng);

        logging::log_game(&format!(
            "cache {} opened for worth {:.1}: {} draws",
            id.0,
            worth,
            draws.len()
        ));
        self.remove_at(index, presentation);
        OpenOutcome::Completed(draws)
    }

    fn remove_at(&mut self, index: usize, presentation: &mut dyn Presentation) {
        let mut instance = self.live.remove(index);
        instance.open();
        presentation.detach(&instance);
        for callback in &mut self.removed_callbacks {
            callback(&instance);
        }
    }
}
