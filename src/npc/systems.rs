//! Ace Systems
//!
//! Bevy systems that feed host events into the classifier and death resolver
//! and play their outcomes out in the world.
//!
//! ## System Phases
//!
//! Ace systems run in four ordered phases each frame:
//!
//! 1. **Behavior** - Match clock, activity requests, animation events
//! 2. **Damage** - Hit classification, head gibs, headshot rewards
//! 3. **Death** - Death resolution, loot, shield props
//! 4. **Cleanup** - Gib, dissolve and corpse timers
//!
//! ## Usage
//!
//! ```ignore
//! use combine_ace::npc::systems;
//!
//! systems::configure_ace_system_ordering(&mut app);
//! systems::add_ace_systems(&mut app, || true);
//! ```

use bevy::prelude::*;

use crate::combat::damage::{AmmoRegistry, DamageInfo, DamageTypeFlags};
use crate::combat::events::*;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::tunables::Tunables;
use super::activity::{handle_anim_event, on_change_activity, translate_activity};
use super::classifier::DamageClassifier;
use super::components::{CombineAce, Corpse, Dissolving, GameRng, Gib, PhysicsBody, PhysicsProp, Player};
use super::constants::HEAD_HEIGHT;
use super::death::DeathResolver;
use super::items::{spawn_item, Item, PickupManager};
use super::policy::{resolve_attacker, Actors, BaseNpcPolicy, CombatContext, DamageHandler};
use super::rules::GameRules;

/// System set labels for ace system ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AceSystemPhase {
    /// Phase 1: Match clock, activities, animation events
    Behavior,
    /// Phase 2: Incoming damage and head gibs
    Damage,
    /// Phase 3: Death resolution
    Death,
    /// Phase 4: Timed removal of gibs, dissolving items and corpses
    Cleanup,
}

/// Configures the ordering between ace system phases.
///
/// Call this once during app setup before adding ace systems.
pub fn configure_ace_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            AceSystemPhase::Behavior,
            AceSystemPhase::Damage,
            AceSystemPhase::Death,
            AceSystemPhase::Cleanup,
        )
            .chain(),
    );
}

/// Adds the ace systems to the app under `run_condition`.
pub fn add_ace_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        (
            advance_match_clock,
            process_activity_requests,
            process_animation_events,
        )
            .chain()
            .in_set(AceSystemPhase::Behavior)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (process_damage_events, grant_headshot_rewards)
            .chain()
            .in_set(AceSystemPhase::Damage)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        resolve_ace_deaths
            .in_set(AceSystemPhase::Death)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (
            expire_gibs,
            expire_dissolving,
            cleanup_corpses,
            forget_removed_pickups,
        )
            .chain()
            .in_set(AceSystemPhase::Cleanup)
            .run_if(run_condition),
    );
}

/// Human-readable label for an ace in logs
pub fn ace_label(entity: Entity) -> String {
    format!("Ace #{}", entity.index())
}

// ============================================================================
// Phase 1: Behavior
// ============================================================================

pub fn advance_match_clock(
    time: Res<Time>,
    mut rules: ResMut<GameRules>,
    mut combat_log: ResMut<CombatLog>,
) {
    rules.now += time.delta_secs();
    combat_log.match_time = rules.now;
}

/// Translate requested activities and start them
pub fn process_activity_requests(
    mut requests: EventReader<ActivityRequestEvent>,
    mut aces: Query<&mut CombineAce>,
    base: Res<BaseNpcPolicy>,
    mut rng: ResMut<GameRng>,
) {
    for request in requests.read() {
        let Ok(mut ace) = aces.get_mut(request.ace) else {
            continue;
        };
        if ace.is_dead {
            continue;
        }

        let activity = translate_activity(&mut ace, request.activity, &base);
        if activity != ace.activity {
            on_change_activity(&mut ace, activity, &mut rng);
        }
    }
}

pub fn process_animation_events(
    mut anim_events: EventReader<AnimationEvent>,
    mut aces: Query<&mut CombineAce>,
    base: Res<BaseNpcPolicy>,
) {
    for event in anim_events.read() {
        if let Ok(mut ace) = aces.get_mut(event.ace) {
            handle_anim_event(&mut ace, event.event, &base);
        }
    }
}

// ============================================================================
// Phase 2: Damage
// ============================================================================

/// Scale incoming hits on aces and play out head gibs.
///
/// Hits on anything that is not a living ace are left to the host.
#[allow(clippy::too_many_arguments)]
pub fn process_damage_events(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut aces: Query<(&mut CombineAce, &Transform)>,
    actors: Actors,
    tunables: Res<Tunables>,
    base: Res<BaseNpcPolicy>,
    ammo: Res<AmmoRegistry>,
    mut rules: ResMut<GameRules>,
    mut rng: ResMut<GameRng>,
    mut combat_log: ResMut<CombatLog>,
    mut head_gibs: EventWriter<HeadGibEvent>,
    mut sounds: EventWriter<SoundCueEvent>,
    mut particles: EventWriter<ParticleEffectEvent>,
) {
    for event in damage_events.read() {
        let Ok((mut ace, transform)) = aces.get_mut(event.target) else {
            continue;
        };
        if !ace.is_alive() {
            debug!("Ignoring hit on dead {}", ace_label(event.target));
            continue;
        }

        let attacker = resolve_attacker(event.info.attacker, &actors);
        let mut ctx = CombatContext {
            tunables: &tunables,
            base: &base,
            ammo: &ammo,
            rules: &mut rules,
            rng: &mut rng,
            attacker: &attacker,
        };

        let outcome = DamageClassifier.classify(&mut ace, event.hit_group, &event.info, &mut ctx);
        let heavy = DamageClassifier.is_heavy_damage(&event.info, &ctx);

        let damage = if event.info.is_well_formed() {
            event.info.amount * outcome.multiplier
        } else {
            warn!(
                "Malformed damage amount {} on {}, ignoring",
                event.info.amount,
                ace_label(event.target)
            );
            0.0
        };

        ace.health = (ace.health - damage).max(0.0);
        ace.heavy_damage_taken = heavy;
        ace.last_damage = Some(event.info.clone());

        combat_log.log(
            CombatLogEventType::Damage,
            format!(
                "{} took {:.1} damage to {} (x{:.1}){}",
                ace_label(event.target),
                damage,
                event.hit_group.name(),
                outcome.multiplier,
                if heavy { ", heavy" } else { "" }
            ),
        );

        let Some(gib) = outcome.head_gib else {
            continue;
        };

        let head = transform.translation + Vec3::Y * HEAD_HEIGHT;
        for fragment in &gib.fragments {
            commands.spawn((
                Gib {
                    model: fragment.model,
                    lifetime: fragment.lifetime,
                },
                Transform::from_translation(head),
                PhysicsBody {
                    linear_velocity: fragment.velocity,
                    angular_velocity: Vec3::ZERO,
                },
            ));
        }

        particles.send(ParticleEffectEvent {
            entity: event.target,
            effect: gib.particle,
            attachment: gib.attachment,
        });
        sounds.send(SoundCueEvent {
            source: event.target,
            cue: gib.sound,
        });
        combat_log.log(
            CombatLogEventType::Headshot,
            format!(
                "{} lost its head ({} fragments)",
                ace_label(event.target),
                gib.fragments.len()
            ),
        );
        head_gibs.send(HeadGibEvent {
            ace: event.target,
            reward: gib.reward,
        });
    }
}

/// Pay out headshot rewards to the credited players
pub fn grant_headshot_rewards(
    mut head_gibs: EventReader<HeadGibEvent>,
    mut players: Query<&mut Player>,
    mut combat_log: ResMut<CombatLog>,
) {
    for event in head_gibs.read() {
        let Some(reward) = event.reward else {
            continue;
        };
        let Ok(mut player) = players.get_mut(reward.player) else {
            warn!("Headshot reward for missing player {:?}", reward.player);
            continue;
        };

        player.money += reward.money;
        player.xp += reward.xp;

        combat_log.log(
            CombatLogEventType::Reward,
            format!(
                "{} earned {} money and {} xp for a headshot",
                player.name, reward.money, reward.xp
            ),
        );
    }
}

// ============================================================================
// Phase 3: Death
// ============================================================================

/// Resolve every ace whose health reached zero this frame
#[allow(clippy::too_many_arguments)]
pub fn resolve_ace_deaths(
    mut commands: Commands,
    mut aces: Query<(Entity, &mut CombineAce, &Transform)>,
    actors: Actors,
    tunables: Res<Tunables>,
    base: Res<BaseNpcPolicy>,
    ammo: Res<AmmoRegistry>,
    mut rules: ResMut<GameRules>,
    mut rng: ResMut<GameRng>,
    mut pickups: ResMut<PickupManager>,
    mut combat_log: ResMut<CombatLog>,
    mut killed: EventWriter<AceKilledEvent>,
    mut loot_events: EventWriter<LootDroppedEvent>,
    mut shield_events: EventWriter<ShieldDroppedEvent>,
    mut sounds: EventWriter<SoundCueEvent>,
) {
    for (entity, mut ace, transform) in aces.iter_mut() {
        if ace.death_resolved || ace.health > 0.0 {
            continue;
        }

        let kill = ace
            .last_damage
            .clone()
            .unwrap_or_else(|| DamageInfo::new(0.0, DamageTypeFlags::empty()));
        let attacker = resolve_attacker(kill.attacker, &actors);
        let mut ctx = CombatContext {
            tunables: &tunables,
            base: &base,
            ammo: &ammo,
            rules: &mut rules,
            rng: &mut rng,
            attacker: &attacker,
        };

        let Some(outcome) = DeathResolver.resolve(&mut ace, transform.translation, &kill, &mut ctx) else {
            continue;
        };
        let label = ace_label(entity);

        if let Some(shield) = &outcome.shield {
            if let Some(mut armor) = commands.get_entity(shield.armor) {
                armor.despawn_recursive();
            }
            let prop = commands
                .spawn((
                    PhysicsProp { model: shield.model },
                    Transform::from_translation(shield.position),
                    PhysicsBody::default(),
                ))
                .id();

            shield_events.send(ShieldDroppedEvent { ace: entity, prop });
            combat_log.log(
                CombatLogEventType::ShieldDropped,
                format!("{} dropped its shield", label),
            );
        }

        for drop in &outcome.loot {
            let item = spawn_item(&mut commands, drop, tunables.dissolve_duration);

            if drop.managed {
                for evicted in pickups.register(item) {
                    debug!("Pickup limit reached, removing {:?}", evicted);
                    if let Some(mut old) = commands.get_entity(evicted) {
                        old.despawn_recursive();
                    }
                }
            }

            loot_events.send(LootDroppedEvent {
                ace: entity,
                item,
                kind: drop.item,
                dissolving: drop.dissolve,
            });
            combat_log.log(
                CombatLogEventType::LootDrop,
                format!(
                    "{} dropped {}{}",
                    label,
                    drop.item.classname(),
                    if drop.dissolve { " (dissolving)" } else { "" }
                ),
            );
        }

        commands.entity(entity).insert(Corpse {
            cleanup_in: outcome.generic.corpse_cleanup_in,
        });
        if let Some(sentence) = outcome.generic.death_sentence {
            sounds.send(SoundCueEvent {
                source: entity,
                cue: sentence,
            });
        }

        combat_log.log(
            CombatLogEventType::Death,
            format!(
                "{} died{}",
                label,
                if ace.beheaded { " (headshot)" } else { "" }
            ),
        );
        killed.send(AceKilledEvent {
            ace: entity,
            info: kill,
        });
    }
}

// ============================================================================
// Phase 4: Cleanup
// ============================================================================

pub fn expire_gibs(mut commands: Commands, time: Res<Time>, mut gibs: Query<(Entity, &mut Gib)>) {
    let dt = time.delta_secs();
    for (entity, mut gib) in gibs.iter_mut() {
        gib.lifetime -= dt;
        if gib.lifetime <= 0.0 {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub fn expire_dissolving(
    mut commands: Commands,
    time: Res<Time>,
    mut dissolving: Query<(Entity, &mut Dissolving)>,
) {
    let dt = time.delta_secs();
    for (entity, mut dissolve) in dissolving.iter_mut() {
        dissolve.remaining -= dt;
        if dissolve.remaining <= 0.0 {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub fn cleanup_corpses(
    mut commands: Commands,
    time: Res<Time>,
    mut corpses: Query<(Entity, &mut Corpse)>,
) {
    let dt = time.delta_secs();
    for (entity, mut corpse) in corpses.iter_mut() {
        corpse.cleanup_in -= dt;
        if corpse.cleanup_in <= 0.0 {
            debug!("Removing corpse of {}", ace_label(entity));
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Stop tracking pickups that left the world
pub fn forget_removed_pickups(mut removed: RemovedComponents<Item>, mut pickups: ResMut<PickupManager>) {
    for entity in removed.read() {
        pickups.forget(entity);
    }
}
