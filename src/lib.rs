mod assets;
pub mod cache;
mod config;
pub mod content;
pub mod loot;
pub mod random;
pub mod telemetry;
pub mod world;

pub use cache::instance::{CacheId, CacheInstance, CacheState, DISCOVERY_RADIUS};
pub use cache::scheduler::{
    InteractionResult, OpenOutcome, SchedulerConfig, SpawnScheduler, TickContext,
};
pub use cache::template::{CacheTemplate, TemplateId};
pub use loot::catalog::{Catalog, ItemFilter, ItemKind, ItemTypeDescriptor, ItemTypeId};
pub use loot::decompose::{decompose, DrawOutcome, LootDraw};
pub use loot::picker::WeightedPicker;
pub use random::GameRng;
pub use world::clock::WorldClock;
pub use world::position::{RegionId, TilePos, Zone};
pub use world::services::{
    Economy, Observer, ObserverCategory, Observers, OpenContext, Placement, Presentation,
};

use std::cell::Cell;
use std::rc::Rc;

use world::demo::{FlatTerrainPlacement, PrestigeEconomy, RecordingPresentation, StaticObserver, StaticObservers};

/// Load a content root, simulate a session of the configured length with the
/// demo collaborators, then open whatever survived and report what happened.
pub fn run(args: &[String]) -> Result<(), String> {
    let config = config::AppConfig::from_args(args)?;
    telemetry::logging::init(&config.root)?;

    let summary = assets::scan(&config.root)?;
    let report = content::validate_content(&config.root);
    println!("supplydrop: content scan");
    println!("- root: {}", config.root.display());
    println!("- yaml files: {}", summary.yaml_files);
    println!(
        "- item types: {}, cache templates: {}, errors: {}",
        report.item_types,
        report.templates,
        report.errors.len()
    );
    for err in &report.errors {
        eprintln!("supplydrop: content validate {}", err);
        telemetry::logging::log_error(err);
    }
    if !report.errors.is_empty() {
        return Err("content validation failed".to_string());
    }

    let catalog = content::load_catalog(&config.root)?;
    let templates = content::load_templates(&config.root)?;

    let mut scheduler = SpawnScheduler::new(
        SchedulerConfig::default(),
        WorldClock::default(),
        config.seed,
    );
    for template in templates {
        scheduler.register_template(template);
    }

    let discovered = Rc::new(Cell::new(0u32));
    let discovered_probe = Rc::clone(&discovered);
    scheduler.on_discovered(move |_, _| discovered_probe.set(discovered_probe.get() + 1));

    let region = RegionId(0);
    let mut placement = FlatTerrainPlacement::new(60, Zone::new("home", -5, -5, 5, 5));
    let observers = StaticObservers {
        region,
        members: vec![
            StaticObserver {
                category: ObserverCategory::Mortal,
                position: TilePos::new(20, 0, 20),
                sight_range: 30.0,
            },
            StaticObserver {
                category: ObserverCategory::Mortal,
                position: TilePos::new(-30, 0, 10),
                sight_range: 30.0,
            },
        ],
    };
    let mut presentation = RecordingPresentation::default();

    scheduler.region_loaded(region);
    scheduler.start_session(&mut presentation);

    let total_seconds = f64::from(config.days) * WorldClock::default().seconds_per_day();
    let steps = (total_seconds / f64::from(config.tick_seconds)).ceil() as u64;
    for _ in 0..steps {
        let mut ctx = TickContext {
            placement: &mut placement,
            observers: &observers,
            presentation: &mut presentation,
        };
        scheduler.tick(config.tick_seconds, &mut ctx);
    }

    // crack open whatever survived the session
    let mut economy = PrestigeEconomy::new(200.0, config.seed ^ 0x5eed);
    let survivors: Vec<CacheId> = scheduler.live().iter().map(|instance| instance.id).collect();
    let mut opened = 0usize;
    let mut draws_total = 0usize;
    let mut value_total = 0.0f32;
    for id in survivors {
        if let OpenOutcome::Completed(draws) = scheduler.request_open(
            id,
            &OpenContext::default(),
            &mut economy,
            &catalog,
            &mut presentation,
        ) {
            opened += 1;
            draws_total += draws.len();
            value_total += draws.iter().map(|draw| draw.value_consumed).sum::<f32>();
        }
    }

    scheduler.end_session(&mut presentation);

    println!("supplydrop: simulated {} days", config.days);
    println!("- caches spawned: {}", presentation.total_attached);
    println!("- caches discovered: {}", discovered.get());
    println!("- caches opened at session end: {}", opened);
    println!("- loot draws: {}, total value: {:.1}", draws_total, value_total);
    telemetry::logging::log_game(&format!(
        "session summary: spawned={}, discovered={}, opened={}, draws={}, value={:.1}",
        presentation.total_attached,
        discovered.get(),
        opened,
        draws_total,
        value_total
    ));
    Ok(())
}
