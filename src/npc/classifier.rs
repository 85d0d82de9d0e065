//! Damage classification
//!
//! Decides how hard each hit lands on an ace: the hit-group multiplier, the
//! one-time head gib, and whether a hit is heavy enough to flinch.
//!
//! ## Head hits
//!
//! Every head hit rolls an integer in `[0, 6]`. A roll of 0, or any sniper hit,
//! gibs the head as long as the hit is not flagged never-gib, gore is
//! permitted and the head is still attached. Head hits that do not gib take a
//! flat double damage.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::combat::damage::{DamageInfo, DamageTypeFlags, HitGroup};
use super::components::{CombineAce, GameRng};
use super::constants::*;
use super::policy::{CombatContext, DamageHandler};

/// One flying gib fragment
#[derive(Debug, Clone, PartialEq)]
pub struct GibFragment {
    pub model: &'static str,
    pub velocity: Vec3,
    pub lifetime: f32,
}

/// Reward for the player who gibbed a head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub player: Entity,
    pub money: u32,
    pub xp: u32,
}

/// Cosmetic side effects of a head gib for the host to play out
#[derive(Debug, Clone, PartialEq)]
pub struct HeadGib {
    pub model: &'static str,
    pub particle: &'static str,
    pub attachment: &'static str,
    pub sound: &'static str,
    pub fragments: SmallVec<[GibFragment; 12]>,
    /// `None` when no player is credited with the hit
    pub reward: Option<Reward>,
}

/// Result of classifying a hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitgroupOutcome {
    pub multiplier: f32,
    pub head_gib: Option<HeadGib>,
}

impl HitgroupOutcome {
    pub fn plain(multiplier: f32) -> Self {
        Self {
            multiplier,
            head_gib: None,
        }
    }

    pub fn gib_triggered(&self) -> bool {
        self.head_gib.is_some()
    }
}

/// Damage handler of the Combine Ace
#[derive(Debug, Clone, Copy, Default)]
pub struct DamageClassifier;

impl DamageClassifier {
    /// Classify a hit: `(multiplier, gib triggered)` plus the gib effects
    pub fn classify(
        &self,
        ace: &mut CombineAce,
        hit_group: HitGroup,
        info: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> HitgroupOutcome {
        self.hitgroup_damage_multiplier(ace, hit_group, info, ctx)
    }

    fn gib_head(&self, ace: &mut CombineAce, ctx: &mut CombatContext<'_>) -> HeadGib {
        ace.model = BEHEADED_MODEL;
        ace.beheaded = true;
        // Guarantees the death pass picks the ace up
        ace.health = 0.0;

        let mut fragments = SmallVec::new();
        for model in GIB_MODELS {
            for _ in 0..GIBS_PER_BATCH {
                fragments.push(gib_fragment(model, ctx.rng));
            }
        }

        ctx.rules.record_headshot();

        // Nothing to pay when both the economy and experience are off
        let reward = ctx
            .attacker
            .player()
            .map(|player| Reward {
                player: player.entity,
                money: if ctx.rules.economy { HEADSHOT_MONEY_REWARD } else { 0 },
                xp: if ctx.rules.classic { 0 } else { HEADSHOT_XP_REWARD },
            })
            .filter(|reward| reward.money > 0 || reward.xp > 0);

        HeadGib {
            model: BEHEADED_MODEL,
            particle: HEADSHOT_PARTICLE,
            attachment: BLOOD_ATTACHMENT,
            sound: HEADSHOT_SOUND,
            fragments,
            reward,
        }
    }
}

fn gib_fragment(model: &'static str, rng: &mut GameRng) -> GibFragment {
    let direction = rng
        .random_vector(-1.0, 1.0)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    let speed = rng.random_range(GIB_MIN_SPEED, GIB_MAX_SPEED);
    let lifetime = rng.random_range(GIB_LIFETIME * 0.5, GIB_LIFETIME);

    GibFragment {
        model,
        velocity: direction * speed,
        lifetime,
    }
}

impl DamageHandler for DamageClassifier {
    fn hitgroup_damage_multiplier(
        &self,
        ace: &mut CombineAce,
        hit_group: HitGroup,
        info: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> HitgroupOutcome {
        if hit_group != HitGroup::Head || !info.is_well_formed() {
            return HitgroupOutcome::plain(ctx.base.hitgroup_damage_multiplier(hit_group));
        }

        let roll = ctx.rng.random_int(0, HEADSHOT_ROLL_MAX);
        let gib_eligible = (roll == 0 || info.has(DamageTypeFlags::SNIPER))
            && !info.has(DamageTypeFlags::NEVER_GIB)
            && !ace.beheaded;

        if !ctx.tunables.gore_permitted() || !gib_eligible {
            return HitgroupOutcome::plain(HEADSHOT_MULTIPLIER);
        }

        let head_gib = self.gib_head(ace, ctx);
        info!(
            "Ace head gibbed (roll {}, sniper {}), headshots this match: {}",
            roll,
            info.has(DamageTypeFlags::SNIPER),
            ctx.rules.headshot_count
        );

        HitgroupOutcome {
            multiplier: ctx.base.hitgroup_damage_multiplier(hit_group),
            head_gib: Some(head_gib),
        }
    }

    fn is_heavy_damage(&self, info: &DamageInfo, ctx: &CombatContext<'_>) -> bool {
        // Rifle and magnum rounds always count
        if ctx.ammo.is(info.ammo_type, "AR2") || ctx.ammo.is(info.ammo_type, "357") {
            return true;
        }

        // Shotgun blasts where at least half the pellets hit
        if info.has(DamageTypeFlags::BUCKSHOT)
            && info.amount >= ctx.tunables.half_buckshot_payload() as f32
        {
            return true;
        }

        // Rollermine shocks
        if info.has(DamageTypeFlags::SHOCK) && ctx.rules.episodic {
            return true;
        }

        ctx.base.is_heavy_damage(info)
    }
}
