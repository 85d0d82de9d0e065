//! Activity translation and animation events
//!
//! The host's AI asks for generic activities; the ace swaps in its own
//! variants and drives its eye glow as a side effect.

use serde::{Deserialize, Serialize};

use super::components::{CombineAce, GameRng, WeaponClass};
use super::eyes::EyeState;
use super::policy::BaseNpcPolicy;

/// Awareness level of an NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NpcState {
    #[default]
    Idle,
    Alert,
    Combat,
}

/// Animation activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Idle,
    IdleAngry,
    Walk,
    WalkEasy,
    WalkMarch,
    Run,
    RangeAttack1,
    RangeAttack2,
    ThrowGrenade,
    LaunchGrenade,
    Flinch,
}

/// Animation events fired by playing sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimEvent {
    /// Bracing against an incoming physics object
    BlockPhysics,
    Other(i32),
}

impl AnimEvent {
    const BLOCK_PHYSICS_ID: i32 = 20;

    pub fn from_id(id: i32) -> Self {
        if id == Self::BLOCK_PHYSICS_ID {
            AnimEvent::BlockPhysics
        } else {
            AnimEvent::Other(id)
        }
    }
}

/// Translate a requested activity into the ace's variant
pub fn translate_activity(ace: &mut CombineAce, requested: Activity, base: &BaseNpcPolicy) -> Activity {
    match requested {
        Activity::Walk if ace.use_march => Activity::WalkMarch,
        Activity::Idle => {
            ace.set_eye_state(EyeState::Dormant);

            if !ace.crouching && matches!(ace.npc_state, NpcState::Combat | NpcState::Alert) {
                ace.set_eye_state(EyeState::Activated);
                base.translate_activity(Activity::IdleAngry)
            } else {
                base.translate_activity(Activity::Idle)
            }
        }
        Activity::RangeAttack1 => {
            ace.set_eye_state(EyeState::Activated);
            base.translate_activity(requested)
        }
        // Thrown or launched grenade, depending on what the ace carries
        Activity::RangeAttack2 => {
            ace.set_eye_state(EyeState::Activated);
            if ace.owns_weapon(WeaponClass::GrenadeLauncher) {
                Activity::LaunchGrenade
            } else {
                Activity::ThrowGrenade
            }
        }
        other => base.translate_activity(other),
    }
}

/// Called whenever the ace starts a new activity
pub fn on_change_activity(ace: &mut CombineAce, activity: Activity, rng: &mut GameRng) {
    // Any new sequence stops us blocking
    ace.blocking = false;
    ace.activity = activity;

    if ace.use_march {
        ace.casual_pose = rng.random_f32();
    }
}

pub fn handle_anim_event(ace: &mut CombineAce, event: AnimEvent, base: &BaseNpcPolicy) {
    match event {
        AnimEvent::BlockPhysics => ace.blocking = true,
        other => base.handle_anim_event(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::eyes::EyeGlow;

    fn ace() -> CombineAce {
        let mut ace = CombineAce::new(100.0, Some(WeaponClass::Ar2));
        ace.eyes = Some(EyeGlow::default());
        ace
    }

    #[test]
    fn test_idle_in_combat_is_angry() {
        let base = BaseNpcPolicy::default();
        let mut ace = ace();
        ace.npc_state = NpcState::Combat;

        assert_eq!(translate_activity(&mut ace, Activity::Idle, &base), Activity::IdleAngry);
        assert_eq!(ace.eye_state, EyeState::Activated);
    }

    #[test]
    fn test_crouching_idle_stays_dormant() {
        let base = BaseNpcPolicy::default();
        let mut ace = ace();
        ace.npc_state = NpcState::Alert;
        ace.crouching = true;

        assert_eq!(translate_activity(&mut ace, Activity::Idle, &base), Activity::Idle);
        assert_eq!(ace.eye_state, EyeState::Dormant);
    }

    #[test]
    fn test_grenade_attack_depends_on_launcher() {
        let base = BaseNpcPolicy::default();
        let mut ace = ace();
        assert_eq!(
            translate_activity(&mut ace, Activity::RangeAttack2, &base),
            Activity::ThrowGrenade
        );

        ace.weapons.push(WeaponClass::GrenadeLauncher);
        assert_eq!(
            translate_activity(&mut ace, Activity::RangeAttack2, &base),
            Activity::LaunchGrenade
        );
        assert_eq!(ace.eye_state, EyeState::Activated);
    }

    #[test]
    fn test_march_walk() {
        let base = BaseNpcPolicy::default();
        let mut ace = ace();
        assert_eq!(translate_activity(&mut ace, Activity::Walk, &base), Activity::Walk);

        ace.use_march = true;
        assert_eq!(translate_activity(&mut ace, Activity::Walk, &base), Activity::WalkMarch);
    }

    #[test]
    fn test_block_event_and_activity_change() {
        let base = BaseNpcPolicy::default();
        let mut rng = GameRng::from_seed(9);
        let mut ace = ace();

        handle_anim_event(&mut ace, AnimEvent::from_id(20), &base);
        assert!(ace.blocking);

        handle_anim_event(&mut ace, AnimEvent::from_id(7), &base);
        assert!(ace.blocking);

        on_change_activity(&mut ace, Activity::Run, &mut rng);
        assert!(!ace.blocking);
        assert_eq!(ace.activity, Activity::Run);
    }

    #[test]
    fn test_marching_rerolls_casual_pose() {
        let mut rng = GameRng::from_seed(9);
        let mut ace = ace();
        ace.use_march = true;

        on_change_activity(&mut ace, Activity::WalkMarch, &mut rng);
        assert!((0.0..1.0).contains(&ace.casual_pose));
    }
}
