//! Headless scenario execution
//!
//! Runs a scripted scenario against the ace plugin without any graphical
//! output, suitable for automated testing and balance checks.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::combat::damage::AmmoRegistry;
use crate::combat::events::{DamageEvent, HeadGibEvent, LootDroppedEvent, ShieldDroppedEvent};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::CombatPlugin;
use crate::npc::components::{CombineAce, GameRng, Player, Vehicle};
use crate::npc::items::ItemKind;
use crate::npc::rules::GameRules;
use crate::npc::spawn::spawn_combine_ace;
use crate::npc::systems::AceSystemPhase;
use crate::npc::AcePlugin;
use crate::tunables::{insert_tunables, Tunables};

use super::config::{ScenarioConfig, ScriptedAttacker, ScriptedHit};

/// Simulated time per frame
const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Result of a completed scenario
///
/// This struct provides programmatic access to scenario results for testing and analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Simulated seconds until the scenario ended
    pub elapsed: f32,
    /// Whether the time limit ended the scenario
    pub timed_out: bool,
    /// One entry per configured ace, in config order
    pub aces: Vec<AceResult>,
    /// Every item dropped, in drop order
    pub drops: Vec<DropRecord>,
    /// Head gibs counted by the game rules
    pub headshot_count: u32,
    /// One entry per configured player, in config order
    pub players: Vec<PlayerResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Final state of one ace
#[derive(Debug, Clone, Serialize)]
pub struct AceResult {
    pub final_health: f32,
    pub dead: bool,
    pub beheaded: bool,
    pub shield_dropped: bool,
    pub grenades: u32,
}

/// One dropped item
#[derive(Debug, Clone, Serialize)]
pub struct DropRecord {
    /// Index of the ace that dropped it
    pub ace: usize,
    pub item: ItemKind,
    pub dissolving: bool,
}

/// Final state of one player
#[derive(Debug, Clone, Serialize)]
pub struct PlayerResult {
    pub name: String,
    pub money: u32,
    pub xp: u32,
}

/// Resource to track headless scenario state
#[derive(Resource)]
pub struct ScenarioState {
    config: ScenarioConfig,
    /// Script sorted by time
    script: Vec<ScriptedHit>,
    next_hit: usize,
    aces: Vec<Entity>,
    players: Vec<Entity>,
    vehicles: Vec<Entity>,
    drops: Vec<DropRecord>,
    beheaded: HashSet<Entity>,
    shields_dropped: HashSet<Entity>,
    /// Elapsed scenario time
    pub elapsed_time: f32,
    /// Whether the scenario has completed
    pub complete: bool,
    /// Scenario result (populated when the scenario completes)
    pub result: Option<ScenarioResult>,
}

impl ScenarioState {
    fn new(config: ScenarioConfig) -> Self {
        let mut script = config.script.clone();
        script.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));

        Self {
            config,
            script,
            next_hit: 0,
            aces: Vec::new(),
            players: Vec::new(),
            vehicles: Vec::new(),
            drops: Vec::new(),
            beheaded: HashSet::new(),
            shields_dropped: HashSet::new(),
            elapsed_time: 0.0,
            complete: false,
            result: None,
        }
    }

    fn ace_index(&self, entity: Entity) -> Option<usize> {
        self.aces.iter().position(|e| *e == entity)
    }

    fn script_exhausted(&self) -> bool {
        self.next_hit >= self.script.len()
    }
}

/// Plugin for headless scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        let game_rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        app.insert_resource(game_rng)
            .insert_resource(ScenarioState::new(self.config.clone()))
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .add_systems(Startup, scenario_setup)
            .add_systems(
                Update,
                (scenario_track_time, scenario_feed_script)
                    .chain()
                    .after(AceSystemPhase::Behavior)
                    .before(AceSystemPhase::Damage),
            )
            .add_systems(
                Update,
                (scenario_record_events, scenario_check_end)
                    .chain()
                    .after(AceSystemPhase::Death)
                    .before(AceSystemPhase::Cleanup),
            )
            .add_systems(PostUpdate, scenario_exit_on_complete);
    }
}

/// Spawn the scenario's actors
fn scenario_setup(
    mut commands: Commands,
    mut state: ResMut<ScenarioState>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Scenario started (headless mode)!".to_string(),
    );

    let players: Vec<Entity> = state
        .config
        .players
        .iter()
        .map(|config| {
            let mut player = Player::new(config.name.clone(), config.active_weapon);
            player.health = config.health;
            player.max_health = config.max_health;
            commands.spawn(player).id()
        })
        .collect();

    let vehicles: Vec<Entity> = state
        .config
        .vehicles
        .iter()
        .map(|config| {
            commands
                .spawn(Vehicle {
                    driver: config.driver.and_then(|i| players.get(i).copied()),
                })
                .id()
        })
        .collect();

    let aces: Vec<Entity> = state
        .config
        .aces
        .iter()
        .map(|config| spawn_combine_ace(&mut commands, &config.to_spawn(), &tunables, &mut rng))
        .collect();

    info!(
        "Scenario setup complete: {} ace(s), {} player(s), {} vehicle(s), {} scripted hit(s)",
        aces.len(),
        players.len(),
        vehicles.len(),
        state.script.len()
    );

    state.players = players;
    state.vehicles = vehicles;
    state.aces = aces;
}

fn scenario_track_time(time: Res<Time>, mut state: ResMut<ScenarioState>) {
    state.elapsed_time += time.delta_secs();
}

/// Send every scripted hit whose time has come
fn scenario_feed_script(
    mut state: ResMut<ScenarioState>,
    ammo: Res<AmmoRegistry>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    while let Some(hit) = state.script.get(state.next_hit) {
        if hit.at_secs > state.elapsed_time {
            break;
        }

        let attacker = match hit.attacker {
            ScriptedAttacker::Player(i) => state.players.get(i).copied(),
            ScriptedAttacker::Vehicle(i) => state.vehicles.get(i).copied(),
            ScriptedAttacker::World => None,
        };

        match (state.aces.get(hit.target), hit.to_damage_info(&ammo)) {
            (Some(&target), Ok(mut info)) => {
                info.attacker = attacker;
                damage_events.send(DamageEvent {
                    target,
                    hit_group: hit.hit_group,
                    info,
                });
            }
            (None, _) => warn!("Scripted hit targets missing ace {}", hit.target),
            (_, Err(e)) => warn!("Skipping scripted hit: {}", e),
        }

        state.next_hit += 1;
    }
}

/// Collect drops, shields and head gibs for the result
fn scenario_record_events(
    mut state: ResMut<ScenarioState>,
    mut loot_events: EventReader<LootDroppedEvent>,
    mut shield_events: EventReader<ShieldDroppedEvent>,
    mut head_gibs: EventReader<HeadGibEvent>,
) {
    for event in loot_events.read() {
        if let Some(ace) = state.ace_index(event.ace) {
            state.drops.push(DropRecord {
                ace,
                item: event.kind,
                dissolving: event.dissolving,
            });
        }
    }
    for event in shield_events.read() {
        state.shields_dropped.insert(event.ace);
    }
    for event in head_gibs.read() {
        state.beheaded.insert(event.ace);
    }
}

/// End the scenario once the script ran out and every ace is dead, or on timeout
fn scenario_check_end(
    aces: Query<&CombineAce>,
    players: Query<&Player>,
    rules: Res<GameRules>,
    combat_log: Res<CombatLog>,
    mut state: ResMut<ScenarioState>,
) {
    if state.complete {
        return;
    }

    let all_dead = state
        .aces
        .iter()
        .all(|e| aces.get(*e).map_or(true, |ace| ace.is_dead));
    let timed_out = state.elapsed_time >= state.config.max_duration_secs;

    if !(timed_out || (state.script_exhausted() && all_dead)) {
        return;
    }

    if timed_out {
        info!("Scenario timed out after {:.1}s", state.elapsed_time);
    } else {
        info!("Scenario ended after {:.1}s, all aces dead", state.elapsed_time);
    }

    let result = build_scenario_result(&state, &aces, &players, &rules, timed_out);

    if let Some(path) = &state.config.output_path {
        match combat_log.save_to_file(path) {
            Ok(filename) => println!("Scenario complete. Log saved to: {}", filename),
            Err(e) => eprintln!("Failed to save combat log: {}", e),
        }
    }

    state.result = Some(result);
    state.complete = true;
}

/// Build the ScenarioResult from current world state
fn build_scenario_result(
    state: &ScenarioState,
    aces: &Query<&CombineAce>,
    players: &Query<&Player>,
    rules: &GameRules,
    timed_out: bool,
) -> ScenarioResult {
    let aces = state
        .aces
        .iter()
        .map(|entity| {
            let ace = aces.get(*entity).ok();
            AceResult {
                final_health: ace.map_or(0.0, |a| a.health),
                dead: ace.map_or(true, |a| a.is_dead),
                beheaded: state.beheaded.contains(entity),
                shield_dropped: state.shields_dropped.contains(entity),
                grenades: ace.map_or(0, |a| a.grenades),
            }
        })
        .collect();

    let players = state
        .players
        .iter()
        .filter_map(|entity| players.get(*entity).ok())
        .map(|player| PlayerResult {
            name: player.name.clone(),
            money: player.money,
            xp: player.xp,
        })
        .collect();

    ScenarioResult {
        elapsed: state.elapsed_time,
        timed_out,
        aces,
        drops: state.drops.clone(),
        headshot_count: rules.headshot_count,
        players,
        random_seed: state.config.random_seed,
    }
}

/// Exit the app when the scenario is complete
fn scenario_exit_on_complete(state: Res<ScenarioState>, mut exit: EventWriter<AppExit>) {
    if state.complete {
        exit.send(AppExit::Success);
    }
}

fn add_scenario_plugins(app: &mut App, config: ScenarioConfig, tunables: Tunables) {
    app
        // Minimal plugins - no window, no rendering
        .add_plugins(MinimalPlugins)
        // Transform and hierarchy plugins needed for entity positions and armor
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin);

    insert_tunables(app, tunables);

    app.add_plugins((CombatPlugin, AcePlugin, ScenarioPlugin { config }));
}

/// Build an app that runs `config`, without logging. Drive it with
/// [`step_scenario`].
pub fn build_scenario_app(config: ScenarioConfig, tunables: Tunables) -> App {
    let mut app = App::new();
    add_scenario_plugins(&mut app, config, tunables);
    app
}

/// Frames needed to reach the scenario's time limit, plus slack
pub fn frame_budget(config: &ScenarioConfig) -> u32 {
    (config.max_duration_secs / FRAME.as_secs_f32()).ceil() as u32 + 10
}

/// Update `app` until its scenario completes or `max_frames` pass
pub fn step_scenario(app: &mut App, max_frames: u32) -> Option<ScenarioResult> {
    for _ in 0..max_frames {
        app.update();

        let result = app
            .world()
            .get_resource::<ScenarioState>()
            .and_then(|state| state.result.clone());
        if result.is_some() {
            return result;
        }
    }
    None
}

/// Run a scenario to completion with logging and a printed summary
pub fn run_scenario(config: ScenarioConfig, tunables: Tunables) -> Result<ScenarioResult, String> {
    println!("Starting headless scenario...");
    println!("  Aces: {}", config.aces.len());
    println!("  Players: {}", config.players.len());
    println!("  Scripted hits: {}", config.script.len());
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let max_frames = frame_budget(&config);

    let mut app = App::new();
    app.add_plugins(LogPlugin::default());
    add_scenario_plugins(&mut app, config, tunables);
    app.finish();
    app.cleanup();

    let result = step_scenario(&mut app, max_frames)
        .ok_or_else(|| format!("Scenario did not finish within {} frames", max_frames))?;

    println!(
        "Scenario finished in {:.1}s{}",
        result.elapsed,
        if result.timed_out { " (timed out)" } else { "" }
    );
    for (i, ace) in result.aces.iter().enumerate() {
        println!(
            "  Ace {}: {} ({:.0} HP){}{}",
            i,
            if ace.dead { "dead" } else { "alive" },
            ace.final_health,
            if ace.beheaded { ", beheaded" } else { "" },
            if ace.shield_dropped { ", shield dropped" } else { "" }
        );
    }
    println!("  Drops: {}", result.drops.len());
    println!("  Headshots: {}", result.headshot_count);
    for player in &result.players {
        println!("  {}: {} money, {} xp", player.name, player.money, player.xp);
    }

    Ok(result)
}
