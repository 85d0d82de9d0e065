//! Combine Ace NPC
//!
//! The Combine Ace archetype: an elite soldier with a shoulder shield that
//! reacts to head hits with a one-time head gib, flinches from rifle and
//! shotgun hits, and sheds loot and its shield on death.
//!
//! The archetype's behavior lives in two handlers, the
//! [`DamageClassifier`](classifier::DamageClassifier) and the
//! [`DeathResolver`](death::DeathResolver). [`AcePlugin`] wires them into a
//! Bevy app through the systems in [`systems`].

use bevy::prelude::*;

pub mod activity;
pub mod classifier;
pub mod components;
pub mod constants;
pub mod death;
pub mod eyes;
pub mod items;
pub mod policy;
pub mod rules;
pub mod spawn;
pub mod systems;

use crate::combat::damage::AmmoRegistry;
use crate::tunables::Tunables;
use components::GameRng;
use items::PickupManager;
use policy::BaseNpcPolicy;
use rules::GameRules;

/// Plugin for the Combine Ace archetype.
///
/// Expects the [`CombatPlugin`](crate::combat::CombatPlugin) for its events.
/// Resources that were not inserted beforehand (usually by the
/// [`TunablesPlugin`](crate::tunables::TunablesPlugin)) start at defaults.
pub struct AcePlugin;

impl Plugin for AcePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Tunables>()
            .init_resource::<BaseNpcPolicy>()
            .init_resource::<GameRules>()
            .init_resource::<AmmoRegistry>()
            .init_resource::<PickupManager>()
            .init_resource::<GameRng>();

        systems::configure_ace_system_ordering(app);
        systems::add_ace_systems(app, || true);
    }
}
