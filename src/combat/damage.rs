//! Damage descriptions
//!
//! Value types carried by every incoming hit: what kind of damage it is,
//! which ammunition caused it, where it landed and who is responsible.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Damage-type bit set carried by a hit. Scenario files name flags by
    /// their constant name, e.g. `"NEVER_GIB"`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DamageTypeFlags: u32 {
        const BULLET    = 0x0000_0002;
        const CLUB      = 0x0000_0080;
        const SHOCK     = 0x0000_0100;
        const BLAST     = 0x0000_0040;
        const CRUSH     = 0x0000_0001;
        const NEVER_GIB = 0x0000_1000;
        const DISSOLVE  = 0x0400_0000;
        const BUCKSHOT  = 0x2000_0000;
        const SNIPER    = 0x0010_0000;
    }
}

/// Body region a trace hit landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HitGroup {
    #[default]
    Generic,
    Head,
    Chest,
    Stomach,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Gear,
}

impl HitGroup {
    pub fn name(&self) -> &'static str {
        match self {
            HitGroup::Generic => "generic",
            HitGroup::Head => "head",
            HitGroup::Chest => "chest",
            HitGroup::Stomach => "stomach",
            HitGroup::LeftArm => "left arm",
            HitGroup::RightArm => "right arm",
            HitGroup::LeftLeg => "left leg",
            HitGroup::RightLeg => "right leg",
            HitGroup::Gear => "gear",
        }
    }
}

/// Index into the [`AmmoRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmmoId(pub u16);

/// Ammunition type table, resolving names to numeric ids.
///
/// Ids are positions in registration order, so the same table always yields
/// the same ids.
#[derive(Resource, Debug, Clone)]
pub struct AmmoRegistry {
    names: Vec<String>,
}

impl Default for AmmoRegistry {
    fn default() -> Self {
        Self::new(&[
            "AR2",
            "AR2AltFire",
            "Pistol",
            "SMG1",
            "357",
            "XBowBolt",
            "Buckshot",
            "RPG_Round",
            "SMG1_Grenade",
            "Grenade",
            "SniperRound",
        ])
    }
}

impl AmmoRegistry {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Resolve an ammo name to its id
    pub fn index(&self, name: &str) -> Option<AmmoId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| AmmoId(i as u16))
    }

    /// Name registered for an id
    pub fn name(&self, id: AmmoId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Whether `ammo` is the ammo registered under `name`.
    /// An unregistered name never matches.
    pub fn is(&self, ammo: Option<AmmoId>, name: &str) -> bool {
        match (ammo, self.index(name)) {
            (Some(ammo), Some(id)) => ammo == id,
            _ => false,
        }
    }
}

/// Immutable description of a single hit
#[derive(Debug, Clone, PartialEq)]
pub struct DamageInfo {
    /// Raw damage amount before hit-group scaling
    pub amount: f32,
    pub damage_type: DamageTypeFlags,
    pub ammo_type: Option<AmmoId>,
    /// Entity responsible for the hit, if any
    pub attacker: Option<Entity>,
}

impl DamageInfo {
    pub fn new(amount: f32, damage_type: DamageTypeFlags) -> Self {
        Self {
            amount,
            damage_type,
            ammo_type: None,
            attacker: None,
        }
    }

    pub fn with_ammo(mut self, ammo: Option<AmmoId>) -> Self {
        self.ammo_type = ammo;
        self
    }

    pub fn with_attacker(mut self, attacker: Entity) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn has(&self, flags: DamageTypeFlags) -> bool {
        self.damage_type.intersects(flags)
    }

    /// A usable damage amount: finite and not negative
    pub fn is_well_formed(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_in_registration_order() {
        let registry = AmmoRegistry::new(&["AR2", "357"]);
        assert_eq!(registry.index("AR2"), Some(AmmoId(0)));
        assert_eq!(registry.index("357"), Some(AmmoId(1)));
        assert_eq!(registry.index("Buckshot"), None);
        assert_eq!(registry.name(AmmoId(1)), Some("357"));
    }

    #[test]
    fn test_unregistered_name_never_matches() {
        let registry = AmmoRegistry::new(&["AR2"]);
        assert!(!registry.is(Some(AmmoId(0)), "357"));
        assert!(!registry.is(None, "AR2"));
        assert!(registry.is(Some(AmmoId(0)), "AR2"));
    }

    #[test]
    fn test_flag_names() {
        assert_eq!(DamageTypeFlags::from_name("SNIPER"), Some(DamageTypeFlags::SNIPER));
        assert_eq!(DamageTypeFlags::from_name("NEVER_GIB"), Some(DamageTypeFlags::NEVER_GIB));
        assert_eq!(DamageTypeFlags::from_name("LASER"), None);
    }

    #[test]
    fn test_malformed_amounts() {
        assert!(DamageInfo::new(10.0, DamageTypeFlags::BULLET).is_well_formed());
        assert!(!DamageInfo::new(f32::NAN, DamageTypeFlags::BULLET).is_well_formed());
        assert!(!DamageInfo::new(-1.0, DamageTypeFlags::BULLET).is_well_formed());
    }
}
