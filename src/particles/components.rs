// src/particles/components.rs

use bevy::prelude::*;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Smoke,
    Sun,
}

/// Emits world-space particles from its entity's position.
#[derive(Component, Clone, Debug)]
pub struct ParticleEmitter {
    pub kind: ParticleKind,
    /// Particles per second.
    pub rate: f32,
    pub max_particles: usize,
    pub lifetime: (f32, f32),
    pub speed: (f32, f32),
    /// Half-angle of the emission cone around `direction`, radians.
    pub spread: f32,
    pub direction: Vec3,
    pub gravity: Vec3,
    pub size: (f32, f32),
    pub enabled: bool,
    accumulator: f32,
}

impl ParticleEmitter {
    /// Grey puffs that rise and swell.
    pub fn smoke() -> Self {
        Self {
            kind: ParticleKind::Smoke,
            rate: 30.0,
            max_particles: 200,
            lifetime: (2.0, 4.0),
            speed: (0.5, 1.5),
            spread: 0.4,
            direction: Vec3::Y,
            gravity: Vec3::new(0.0, 0.3, 0.0),
            size: (0.5, 2.5),
            enabled: true,
            accumulator: 0.0,
        }
    }

    /// Slow glowing flares around a fixed point.
    pub fn sun() -> Self {
        Self {
            kind: ParticleKind::Sun,
            rate: 6.0,
            max_particles: 40,
            lifetime: (4.0, 8.0),
            speed: (0.1, 0.6),
            spread: std::f32::consts::PI,
            direction: Vec3::Y,
            gravity: Vec3::ZERO,
            size: (6.0, 14.0),
            enabled: true,
            accumulator: 0.0,
        }
    }

    /// How many particles to spawn this tick given `live` already out.
    pub fn tick(&mut self, dt: f32, live: usize) -> usize {
        if !self.enabled {
            return 0;
        }
        self.accumulator += self.rate * dt;
        let whole = self.accumulator.floor().max(0.0);
        self.accumulator -= whole;
        (whole as usize).min(self.max_particles.saturating_sub(live))
    }

    /// Fresh particle with a random direction inside the cone.
    pub fn spawn(&self, owner: Entity, rng: &mut impl Rng) -> Particle {
        let dir = self.direction.try_normalize().unwrap_or(Vec3::Y);
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        let phi = rng.random_range(0.0..=self.spread.max(0.0));

        let helper = if dir.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
        let right = dir.cross(helper).normalize();
        let up = right.cross(dir);
        let emit = dir * phi.cos() + (right * theta.cos() + up * theta.sin()) * phi.sin();

        let speed = draw(rng, self.speed);
        Particle {
            emitter: owner,
            velocity: emit * speed,
            gravity: self.gravity,
            age: 0.0,
            lifetime: draw(rng, self.lifetime).max(f32::EPSILON),
            size: self.size,
        }
    }
}

fn draw(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Particle {
    pub emitter: Entity,
    pub velocity: Vec3,
    pub gravity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    /// Start and end scale.
    pub size: (f32, f32),
}

impl Particle {
    /// Advance by `dt`; returns the position offset to apply, or `None` once expired.
    pub fn advance(&mut self, dt: f32) -> Option<Vec3> {
        self.age += dt;
        if self.age >= self.lifetime {
            return None;
        }
        self.velocity += self.gravity * dt;
        Some(self.velocity * dt)
    }

    /// 0 at birth, 1 at death.
    pub fn progress(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn scale(&self) -> f32 {
        self.size.0 + (self.size.1 - self.size.0) * self.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn emission_follows_rate() {
        let mut e = ParticleEmitter::smoke();
        let total: usize = (0..60).map(|_| e.tick(1.0 / 60.0, 0)).sum();
        assert!((29..=30).contains(&total), "got {total}");
    }

    #[test]
    fn emission_respects_max_particles() {
        let mut e = ParticleEmitter::smoke();
        assert_eq!(e.tick(10.0, e.max_particles - 3), 3);
        assert_eq!(e.tick(10.0, e.max_particles), 0);
    }

    #[test]
    fn disabled_emitter_is_silent() {
        let mut e = ParticleEmitter { enabled: false, ..ParticleEmitter::sun() };
        assert_eq!(e.tick(5.0, 0), 0);
    }

    #[test]
    fn particles_stay_in_the_cone() {
        let e = ParticleEmitter::smoke();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let p = e.spawn(Entity::from_raw(0), &mut rng);
            let v = p.velocity.normalize();
            assert!(v.angle_between(Vec3::Y) <= e.spread + 1e-4);
            assert!((e.lifetime.0..=e.lifetime.1).contains(&p.lifetime));
        }
    }

    #[test]
    fn particles_expire_at_end_of_life() {
        let mut p = Particle {
            emitter: Entity::from_raw(0),
            velocity: Vec3::X,
            gravity: Vec3::ZERO,
            age: 0.0,
            lifetime: 1.0,
            size: (1.0, 3.0),
        };
        assert_eq!(p.advance(0.5), Some(Vec3::new(0.5, 0.0, 0.0)));
        assert!((p.scale() - 2.0).abs() < 1e-6);
        assert_eq!(p.advance(0.5), None);
    }
}
