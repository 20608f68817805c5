//! Homing attack balloons
//!
//! A balloon leaves with a strong launch impulse that fades out over
//! `launch_duration`, while a constant-speed pull toward the target takes
//! over. Speed is capped, and every balloon pops after a fixed lifespan.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{EPSILON, MIN_DRIFT_SPEED};
use crate::settings::ProjectileSettings;
use crate::{Color, PlayerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Player who launched it (never damaged by it)
    pub owner: PlayerId,
    /// Player it homes in on; resolved by id every frame
    pub target: Option<PlayerId>,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub launch_vel: Vec2,
    pub vel: Vec2,
    /// Seconds since launch
    pub age: f32,
}

impl Projectile {
    pub fn new(
        id: u32,
        owner: PlayerId,
        target: Option<PlayerId>,
        pos: Vec2,
        radius: f32,
        color: Color,
    ) -> Self {
        Self {
            id,
            owner,
            target,
            pos,
            radius,
            color,
            launch_vel: Vec2::ZERO,
            vel: Vec2::ZERO,
            age: 0.0,
        }
    }

    /// Record the launch impulse and restart the age clock
    pub fn launch(&mut self, initial_vel: Vec2) {
        self.launch_vel = initial_vel;
        self.vel = initial_vel;
        self.age = 0.0;
    }

    /// Remaining share of the launch impulse at the current age
    pub fn attenuation(&self, tuning: &ProjectileSettings) -> f32 {
        if self.age < tuning.launch_duration {
            let t = self.age / tuning.launch_duration;
            (1.0 - t).powf(tuning.attenuation_exponent)
        } else {
            0.0
        }
    }

    /// Advance one step.
    ///
    /// `target_pos` is the position of a live target, or `None` when the
    /// target is gone or eliminated.
    pub fn update(&mut self, dt: f32, target_pos: Option<Vec2>, tuning: &ProjectileSettings) {
        self.age += dt;

        let tracking = target_pos
            .map(|target| target - self.pos)
            .filter(|to_target| to_target.length() > EPSILON)
            .map(|to_target| to_target.normalize() * tuning.tracking_speed)
            .unwrap_or(Vec2::ZERO);

        let attenuation = self.attenuation(tuning);
        let mut vel = self.launch_vel * attenuation + tracking;

        let speed = vel.length();
        if speed > tuning.max_speed {
            vel = vel / speed * tuning.max_speed;
        } else if attenuation == 0.0 && (tracking == Vec2::ZERO || speed < MIN_DRIFT_SPEED) {
            vel = Vec2::ZERO;
        }

        self.vel = vel;
        self.pos += self.vel * dt;
    }

    pub fn is_expired(&self, tuning: &ProjectileSettings) -> bool {
        self.age >= tuning.lifespan
    }
}
