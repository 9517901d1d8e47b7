//! Clock-driven animations.
//!
//! Animations are not callbacks. An [`Animation`] is a pure function of the shared [`Clock`], so
//! the current value can be sampled any number of times per frame. Completion is observed by
//! whoever owns the animation, usually in an `advance_animations()` pass, which means replacing an
//! animation also cancels whatever was supposed to happen when it finished.

use std::time::Duration;

use keyframe::functions::{EaseInCubic, EaseInOutQuad, EaseOutCubic, EaseOutQuad, Linear};
use keyframe::EasingFunction;

mod clock;

pub use clock::Clock;

#[derive(Debug, Clone)]
pub struct Animation {
    from: f64,
    to: f64,
    duration: Duration,
    start_time: Duration,
    is_off: bool,
    curve: Curve,
    clock: Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
}

impl Animation {
    pub fn new(
        clock: Clock,
        from: f64,
        to: f64,
        config: taskbar_previews_config::Animation,
    ) -> Self {
        let start_time = clock.now();
        Self {
            from,
            to,
            duration: Duration::from_millis(u64::from(config.duration_ms)),
            start_time,
            is_off: config.off,
            curve: Curve::from(config.curve),
            clock,
        }
    }

    pub fn is_done(&self) -> bool {
        if self.is_off || self.clock.should_complete_instantly() {
            return true;
        }

        self.clock.now() >= self.start_time + self.duration
    }

    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }

        let passed = self.clock.now().saturating_sub(self.start_time);
        let x = passed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.curve.y(x.clamp(0., 1.))
    }

    /// Returns the current value, clamped to the range between `from` and `to`.
    pub fn clamped_value(&self) -> f64 {
        let (min, max) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        self.value().clamp(min, max)
    }

    pub fn to(&self) -> f64 {
        self.to
    }
}

impl Curve {
    pub fn y(self, x: f64) -> f64 {
        match self {
            Curve::Linear => Linear.y(x),
            Curve::EaseOutQuad => EaseOutQuad.y(x),
            Curve::EaseInOutQuad => EaseInOutQuad.y(x),
            Curve::EaseInCubic => EaseInCubic.y(x),
            Curve::EaseOutCubic => EaseOutCubic.y(x),
        }
    }
}

impl From<taskbar_previews_config::Curve> for Curve {
    fn from(value: taskbar_previews_config::Curve) -> Self {
        match value {
            taskbar_previews_config::Curve::Linear => Curve::Linear,
            taskbar_previews_config::Curve::EaseOutQuad => Curve::EaseOutQuad,
            taskbar_previews_config::Curve::EaseInOutQuad => Curve::EaseInOutQuad,
            taskbar_previews_config::Curve::EaseInCubic => Curve::EaseInCubic,
            taskbar_previews_config::Curve::EaseOutCubic => Curve::EaseOutCubic,
        }
    }
}

/// A value that is either static or animating toward a target.
#[derive(Debug, Clone)]
pub enum AnimatedValue {
    /// The value is static.
    Static(f64),
    /// The value is animating toward a target.
    Animation(Animation),
}

impl AnimatedValue {
    /// Creates a new static value.
    pub fn new(value: f64) -> Self {
        Self::Static(value)
    }

    /// Returns the current value.
    pub fn current(&self) -> f64 {
        match self {
            AnimatedValue::Static(value) => *value,
            AnimatedValue::Animation(anim) => anim.value(),
        }
    }

    /// Returns the value this will settle at.
    pub fn target(&self) -> f64 {
        match self {
            AnimatedValue::Static(value) => *value,
            AnimatedValue::Animation(anim) => anim.to(),
        }
    }

    /// Returns `true` if the value is static.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// Returns `true` if an animation is still running.
    pub fn is_animation_ongoing(&self) -> bool {
        match self {
            AnimatedValue::Static(_) => false,
            AnimatedValue::Animation(anim) => !anim.is_done(),
        }
    }

    /// Jumps to the given value, dropping any animation.
    pub fn set(&mut self, value: f64) {
        *self = AnimatedValue::Static(value);
    }

    /// Animates from the current value to `to`.
    ///
    /// Does nothing if the value is already heading to `to`.
    pub fn animate_to(
        &mut self,
        clock: &Clock,
        to: f64,
        config: taskbar_previews_config::Animation,
    ) {
        if self.target() == to {
            return;
        }

        let from = self.current();
        *self = AnimatedValue::Animation(Animation::new(clock.clone(), from, to, config));
    }

    /// Turns a finished animation into a static value.
    pub fn advance_animations(&mut self) {
        if let AnimatedValue::Animation(anim) = self {
            if anim.is_done() {
                *self = AnimatedValue::Static(anim.to());
            }
        }
    }
}
