//! Animated scalar values stepped by an external clock.
//!
//! Every animated quantity in the transform state is an [`AnimatedValue`]: a
//! current value plus a small state machine
//!
//! ```text
//! Idle ──spring_to/decay──▶ Animating(Motion) ──arrives──▶ Idle
//!                               │
//!                               └──set/cancel/new motion──▶ Cancelled
//! ```
//!
//! Nothing advances on its own; the owner calls [`AnimatedValue::step`] with
//! the elapsed milliseconds. Both motions are evaluated in closed form from
//! the time since they started, so results do not depend on the frame rate.
//! Writing the value or starting a new motion replaces the running one at
//! once; a replaced motion never applies another update.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::consts;
use crate::geometry::Vector;

/// Damped harmonic oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from the target under which the spring may settle.
    pub rest_displacement: f64,
    /// Speed (units/s) under which the spring may settle.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: consts::SPRING_STIFFNESS,
            damping: consts::SPRING_DAMPING,
            mass: consts::SPRING_MASS,
            rest_displacement: consts::SPRING_REST_DISPLACEMENT,
            rest_speed: consts::SPRING_REST_SPEED,
        }
    }
}

/// Velocity-seeded, friction-damped motion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    /// Fraction of velocity kept per millisecond, in `(0, 1)`.
    pub deceleration: f64,
    /// Hard bounds; the decay snaps to a bound and stops when it would cross it.
    pub clamp: Option<(f64, f64)>,
    pub rest_speed: f64,
}

impl DecayConfig {
    #[must_use]
    pub fn new(deceleration: f64) -> Self {
        Self { deceleration, clamp: None, rest_speed: consts::DECAY_REST_SPEED }
    }

    #[must_use]
    pub fn with_clamp(mut self, lo: f64, hi: f64) -> Self {
        self.clamp = Some((lo.min(hi), lo.max(hi)));
        self
    }
}

/// A running spring toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringMotion {
    pub target: f64,
    from: f64,
    initial_velocity: f64,
    elapsed_ms: f64,
    config: SpringConfig,
}

impl SpringMotion {
    /// Displacement from the target and velocity `t` seconds after start.
    fn sample(&self, t: f64) -> (f64, f64) {
        let SpringConfig { stiffness, damping, mass, .. } = self.config;
        let x0 = self.from - self.target;
        let v0 = self.initial_velocity;
        let omega0 = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());

        if (zeta - 1.0).abs() < 1e-6 {
            let envelope = (-omega0 * t).exp();
            let slope = v0 + omega0 * x0;
            let linear = x0 + slope * t;
            (envelope * linear, envelope * (slope - omega0 * linear))
        } else if zeta < 1.0 {
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let decay_rate = zeta * omega0;
            let envelope = (-decay_rate * t).exp();
            let cos_amp = x0;
            let sin_amp = (v0 + decay_rate * x0) / omega_d;
            let (sin, cos) = (omega_d * t).sin_cos();
            let displacement = envelope * (cos_amp * cos + sin_amp * sin);
            let velocity = envelope
                * ((sin_amp * omega_d - decay_rate * cos_amp) * cos - (cos_amp * omega_d + decay_rate * sin_amp) * sin);
            (displacement, velocity)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let slow = -omega0 * (zeta - root);
            let fast = -omega0 * (zeta + root);
            let fast_amp = (v0 - slow * x0) / (fast - slow);
            let slow_amp = x0 - fast_amp;
            let (slow_term, fast_term) = ((slow * t).exp(), (fast * t).exp());
            (
                slow_amp * slow_term + fast_amp * fast_term,
                slow * slow_amp * slow_term + fast * fast_amp * fast_term,
            )
        }
    }
}

/// A running decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayMotion {
    from: f64,
    initial_velocity: f64,
    elapsed_ms: f64,
    config: DecayConfig,
}

impl DecayMotion {
    /// Friction rate per second derived from the per-millisecond retention.
    fn rate(&self) -> f64 {
        -self.config.deceleration.ln() * 1000.0
    }

    fn sample(&self, t: f64) -> (f64, f64) {
        let rate = self.rate();
        let falloff = (-rate * t).exp();
        let x = self.from + self.initial_velocity / rate * (1.0 - falloff);
        (x, self.initial_velocity * falloff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Spring(SpringMotion),
    Decay(DecayMotion),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating(Motion),
    /// The last motion was interrupted before it arrived.
    Cancelled,
}

/// A scalar that may be driven by a spring or decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    value: f64,
    velocity: f64,
    state: AnimationState,
}

impl AnimatedValue {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value, velocity: 0.0, state: AnimationState::Idle }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current velocity in units per second (zero when idle).
    #[cfg(test)]
    #[must_use]
    pub(crate) fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    #[must_use]
    pub fn is_decaying(&self) -> bool {
        matches!(self.state, AnimationState::Animating(Motion::Decay(_)))
    }

    /// Where a running spring is heading; decays report `None`.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        match self.state {
            AnimationState::Animating(Motion::Spring(spring)) => Some(spring.target),
            _ => None,
        }
    }

    /// Write the value directly, cancelling any running motion.
    pub fn set(&mut self, value: f64) {
        self.interrupt();
        self.value = value;
    }

    /// Stop any running motion where it is. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_animating();
        self.interrupt();
        was_running
    }

    fn interrupt(&mut self) {
        self.state = if self.is_animating() { AnimationState::Cancelled } else { AnimationState::Idle };
        self.velocity = 0.0;
    }

    /// Spring toward `target`, keeping the current velocity.
    pub fn spring_to(&mut self, target: f64, config: SpringConfig) {
        let velocity = self.velocity;
        if (self.value - target).abs() < config.rest_displacement && velocity.abs() < config.rest_speed {
            self.set(target);
            return;
        }
        self.state = AnimationState::Animating(Motion::Spring(SpringMotion {
            target,
            from: self.value,
            initial_velocity: velocity,
            elapsed_ms: 0.0,
            config,
        }));
    }

    /// Start a decay seeded with `velocity` (units per second).
    pub fn decay(&mut self, velocity: f64, config: DecayConfig) {
        if let Some((lo, hi)) = config.clamp {
            if self.value < lo || self.value > hi {
                self.set(self.value.clamp(lo, hi));
                return;
            }
        }
        if velocity.abs() < config.rest_speed || config.deceleration <= 0.0 || config.deceleration >= 1.0 {
            self.set(self.value);
            return;
        }
        self.velocity = velocity;
        self.state = AnimationState::Animating(Motion::Decay(DecayMotion {
            from: self.value,
            initial_velocity: velocity,
            elapsed_ms: 0.0,
            config,
        }));
    }

    /// Advance a running motion by `dt_ms`. Returns whether the value changed.
    pub fn step(&mut self, dt_ms: f64) -> bool {
        if dt_ms.is_nan() || dt_ms <= 0.0 {
            return false;
        }
        let before = self.value;
        let (value, velocity, arrived) = match &mut self.state {
            AnimationState::Animating(Motion::Spring(spring)) => {
                spring.elapsed_ms += dt_ms;
                let (x, v) = spring.sample(spring.elapsed_ms / 1000.0);
                let config = spring.config;
                if !x.is_finite() || (x.abs() < config.rest_displacement && v.abs() < config.rest_speed) {
                    (spring.target, 0.0, true)
                } else {
                    (spring.target + x, v, false)
                }
            }
            AnimationState::Animating(Motion::Decay(decay)) => {
                decay.elapsed_ms += dt_ms;
                let (x, v) = decay.sample(decay.elapsed_ms / 1000.0);
                match decay.config.clamp {
                    Some((lo, hi)) if x <= lo || x >= hi => (x.clamp(lo, hi), 0.0, true),
                    _ if v.abs() < decay.config.rest_speed || !x.is_finite() => (x, 0.0, true),
                    _ => (x, v, false),
                }
            }
            AnimationState::Idle | AnimationState::Cancelled => return false,
        };
        self.value = if value.is_finite() { value } else { before };
        self.velocity = velocity;
        if arrived {
            self.state = AnimationState::Idle;
        }
        (self.value - before).abs() > 0.0
    }
}

/// Two animated axes moved together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedVector {
    pub x: AnimatedValue,
    pub y: AnimatedValue,
}

impl Default for AnimatedVector {
    fn default() -> Self {
        Self { x: AnimatedValue::new(0.0), y: AnimatedValue::new(0.0) }
    }
}

impl AnimatedVector {
    #[must_use]
    pub fn value(&self) -> Vector {
        Vector::new(self.x.value(), self.y.value())
    }

    pub fn set(&mut self, v: Vector) {
        self.x.set(v.x);
        self.y.set(v.y);
    }

    pub fn cancel(&mut self) -> bool {
        let x = self.x.cancel();
        let y = self.y.cancel();
        x || y
    }

    pub fn spring_to(&mut self, target: Vector, config: SpringConfig) {
        self.x.spring_to(target.x, config);
        self.y.spring_to(target.y, config);
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    /// Stop a decay on either axis, leaving springs running. Returns whether
    /// one was stopped.
    pub fn cancel_decay(&mut self) -> bool {
        let mut stopped = false;
        for axis in [&mut self.x, &mut self.y] {
            if axis.is_decaying() {
                stopped |= axis.cancel();
            }
        }
        stopped
    }

    pub fn step(&mut self, dt_ms: f64) -> bool {
        let x = self.x.step(dt_ms);
        let y = self.y.step(dt_ms);
        x || y
    }
}
