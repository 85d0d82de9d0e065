//! Eye glow
//!
//! An ace's eyes are a glow sprite plus a short trail, both attached to the
//! `eyes` attachment. Their look follows a three-state machine.

use serde::Serialize;

use super::constants::{EYES_ATTACHMENT, EYE_SPRITE, EYE_TRAIL};

const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [255, 0, 0];

/// Eye visual state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EyeState {
    #[default]
    Dormant,
    Activated,
    Dead,
}

/// Glow sprite parameters. Fades are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EyeSprite {
    pub material: &'static str,
    pub color: [u8; 3],
    pub brightness: u8,
    pub brightness_fade: f32,
    pub scale: f32,
    pub scale_fade: f32,
}

/// Trail parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EyeTrail {
    pub material: &'static str,
    pub color: [u8; 3],
    pub brightness: u8,
    pub scale: f32,
    pub start_width: f32,
    pub lifetime: f32,
}

/// Eye sprite and trail of one ace
#[derive(Debug, Clone, PartialEq)]
pub struct EyeGlow {
    /// Attachment both effects follow
    pub attachment: &'static str,
    pub sprite: EyeSprite,
    pub trail: EyeTrail,
}

impl Default for EyeGlow {
    fn default() -> Self {
        Self {
            attachment: EYES_ATTACHMENT,
            sprite: EyeSprite {
                material: EYE_SPRITE,
                color: WHITE,
                brightness: 200,
                brightness_fade: 0.0,
                scale: 0.25,
                scale_fade: 0.0,
            },
            trail: EyeTrail {
                material: EYE_TRAIL,
                color: RED,
                brightness: 200,
                scale: 1.0,
                start_width: 8.0,
                lifetime: 0.75,
            },
        }
    }
}

impl EyeGlow {
    /// Drive sprite and trail to the look of `state`
    pub fn apply(&mut self, state: EyeState) {
        match state {
            // Fade in and scale up
            EyeState::Activated => {
                self.sprite.color = RED;
                self.set_brightness(164, 0.1);
                self.set_scale(0.8, 0.1);

                self.trail.color = RED;
                self.trail.scale = 2.0;
                self.trail.brightness = 164;
            }
            // Fade out and scale down
            EyeState::Dormant => {
                self.set_scale(0.4, 0.5);
                self.set_brightness(64, 0.5);

                self.trail.scale = 0.8;
                self.trail.brightness = 64;
            }
            // Fade out slowly
            EyeState::Dead => {
                self.sprite.color = RED;
                self.set_scale(0.1, 5.0);
                self.set_brightness(0, 5.0);

                self.trail.color = RED;
                self.trail.scale = 0.1;
                self.trail.brightness = 0;
            }
        }
    }

    fn set_brightness(&mut self, brightness: u8, fade: f32) {
        self.sprite.brightness = brightness;
        self.sprite.brightness_fade = fade;
    }

    fn set_scale(&mut self, scale: f32, fade: f32) {
        self.sprite.scale = scale;
        self.sprite.scale_fade = fade;
    }
}
