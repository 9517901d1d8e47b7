use smithay::utils::{Logical, Size};

use crate::animation::{AnimatedValue, Clock};

/// Live copy of a window's content inside a preview.
#[derive(Debug)]
pub struct WindowClone<W> {
    window: W,
    width: AnimatedValue,
    height: AnimatedValue,
    opacity: AnimatedValue,
    /// Whether this clone was replaced and is on its way out.
    fading_out: bool,
}

/// What the embedder needs to draw a clone.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneFrame<W> {
    pub window: W,
    /// Size of the clone, centered in the preview's content area.
    pub size: Size<f64, Logical>,
    pub opacity: f64,
}

impl<W: Clone> WindowClone<W> {
    /// Creates a transparent clone of the given size.
    pub fn new(window: W, size: Size<f64, Logical>) -> Self {
        Self {
            window,
            width: AnimatedValue::new(size.w),
            height: AnimatedValue::new(size.h),
            opacity: AnimatedValue::new(0.),
            fading_out: false,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn size(&self) -> Size<f64, Logical> {
        Size::from((self.width.current(), self.height.current()))
    }

    pub fn target_size(&self) -> Size<f64, Logical> {
        Size::from((self.width.target(), self.height.target()))
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.current().clamp(0., 1.)
    }

    pub fn is_fading_out(&self) -> bool {
        self.fading_out
    }

    pub fn width_mut(&mut self) -> &mut AnimatedValue {
        &mut self.width
    }

    pub fn height_mut(&mut self) -> &mut AnimatedValue {
        &mut self.height
    }

    pub fn fade_in(&mut self, clock: &Clock, config: taskbar_previews_config::Animation) {
        self.opacity.animate_to(clock, 1., config);
    }

    pub fn fade_out(&mut self, clock: &Clock, config: taskbar_previews_config::Animation) {
        self.fading_out = true;
        self.opacity.animate_to(clock, 0., config);
    }

    /// Whether this clone finished fading out and can be dropped.
    pub fn is_gone(&self) -> bool {
        self.fading_out && !self.opacity.is_animation_ongoing()
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.width.is_animation_ongoing()
            || self.height.is_animation_ongoing()
            || self.opacity.is_animation_ongoing()
    }

    pub fn advance_animations(&mut self) {
        self.width.advance_animations();
        self.height.advance_animations();
        self.opacity.advance_animations();
    }

    pub fn frame(&self) -> CloneFrame<W> {
        CloneFrame {
            window: self.window.clone(),
            size: self.size(),
            opacity: self.opacity(),
        }
    }
}
