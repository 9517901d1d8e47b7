//! Temporarily bringing one window forward for inspection.
//!
//! While peeking, the target window is raised above everything and every other window is dimmed.
//! If the target lives on another workspace, that workspace is switched to first. Ending the
//! peek puts the target back at its stacking position, undims everything and, unless asked to
//! stay, switches back to the workspace that was active when the peek began.

use std::fmt::Debug;
use std::time::Duration;

use crate::animation::{AnimatedValue, Clock};
use crate::host::PreviewHost;
use crate::options::Options;

/// Delay between switching to the peeked window's workspace and focusing the window.
pub const WORKSPACE_SWITCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum PeekState<W, WS> {
    Idle,
    /// The enter delay is running.
    Pending { window: W },
    Active {
        window: W,
        /// Workspace to return to when the peek ends.
        initial_workspace: WS,
        /// Whether the window was raised and the others dimmed.
        dimmed: bool,
    },
}

/// What the peek wants to happen after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeekStep<W> {
    /// Enter peek on the window once the enter delay ran out.
    Enter(W),
    /// Focus the window after its workspace was switched to.
    Focus(W),
}

#[derive(Debug)]
pub struct Peek<W, WS> {
    state: PeekState<W, WS>,
    /// Stacking index of the peeked window before it was raised.
    saved_indices: Vec<(W, usize)>,
    /// Window opacities being animated or held dimmed.
    opacities: Vec<(W, AnimatedValue)>,
    clock: Clock,
}

impl<W: Clone + PartialEq + Debug, WS: Clone + PartialEq + Debug> Peek<W, WS> {
    pub fn new(clock: Clock) -> Self {
        Self {
            state: PeekState::Idle,
            saved_indices: Vec::new(),
            opacities: Vec::new(),
            clock,
        }
    }

    pub fn state(&self) -> &PeekState<W, WS> {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PeekState::Active { .. })
    }

    pub fn peeked_window(&self) -> Option<&W> {
        match &self.state {
            PeekState::Active { window, .. } => Some(window),
            _ => None,
        }
    }

    /// Marks the enter delay for `window` as running.
    pub fn set_pending(&mut self, window: W) {
        if !self.is_active() {
            self.state = PeekState::Pending { window };
        }
    }

    /// Drops a pending peek whose timeout was cancelled.
    pub fn cancel_pending(&mut self) {
        if matches!(self.state, PeekState::Pending { .. }) {
            self.state = PeekState::Idle;
        }
    }

    pub fn is_pending_for(&self, target: &W) -> bool {
        matches!(&self.state, PeekState::Pending { window } if window == target)
    }

    /// Enters or re-targets the peek.
    ///
    /// Returns a step to run after [`WORKSPACE_SWITCH_DELAY`] when the workspace had to be
    /// switched first.
    pub fn enter<H>(&mut self, host: &mut H, options: &Options, window: W) -> Option<PeekStep<W>>
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        self.restore_stack(host);

        let current = host.active_workspace();
        let initial_workspace = match &self.state {
            PeekState::Active {
                initial_workspace, ..
            } => initial_workspace.clone(),
            _ => current.clone(),
        };

        self.state = PeekState::Active {
            window: window.clone(),
            initial_workspace,
            dimmed: false,
        };

        match host.window_workspace(&window) {
            Some(workspace) if workspace != current => {
                debug!("switching workspace to peek at {window:?}");
                host.activate_workspace(&workspace, true);
                Some(PeekStep::Focus(window))
            }
            _ => {
                self.focus(host, options, &window);
                None
            }
        }
    }

    /// Raises the peeked window and dims the others.
    pub fn focus<H>(&mut self, host: &mut H, options: &Options, target: &W)
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        let PeekState::Active { window, dimmed, .. } = &mut self.state else {
            return;
        };
        if window != target {
            return;
        }

        if host.is_overview_visible() {
            debug!("not peeking while the overview is visible");
            return;
        }

        let stack = host.window_stack();
        if let Some(idx) = stack.iter().position(|w| w == target) {
            self.saved_indices.retain(|(w, _)| w != target);
            self.saved_indices.push((target.clone(), idx));
        }
        host.raise_window(target);

        if host.is_minimized(target) {
            host.set_window_shown(target, true);
        }

        *dimmed = true;

        for w in stack {
            let opacity = if &w == target {
                1.
            } else {
                options.peek.dim_opacity
            };
            self.animate_opacity(options, w, opacity);
        }
    }

    /// Ends the peek, switching back to the initial workspace unless `stay_here` is set.
    pub fn end<H>(&mut self, host: &mut H, options: &Options, stay_here: bool)
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        match &self.state {
            PeekState::Idle => return,
            PeekState::Pending { .. } => {
                self.state = PeekState::Idle;
                return;
            }
            PeekState::Active { .. } => (),
        }

        self.restore_stack(host);

        let state = std::mem::replace(&mut self.state, PeekState::Idle);
        if let PeekState::Active {
            initial_workspace, ..
        } = state
        {
            if !stay_here && host.active_workspace() != initial_workspace {
                host.activate_workspace(&initial_workspace, true);
            }
        }

        let config = options.animations.peek_dim;
        for (_, opacity) in &mut self.opacities {
            opacity.animate_to(&self.clock, 1., config);
        }

        self.saved_indices.clear();
    }

    /// Pushes window opacities to the host.
    pub fn advance_animations<H>(&mut self, host: &mut H)
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        self.opacities.retain_mut(|(window, opacity)| {
            if host.window_size(window).is_none() {
                return false;
            }

            if opacity.is_static() {
                return opacity.current() != 1.;
            }

            opacity.advance_animations();
            host.set_window_opacity(window, opacity.current().clamp(0., 1.));

            !(opacity.is_static() && opacity.current() == 1.)
        });
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.opacities.iter().any(|(_, o)| !o.is_static())
    }

    /// Sets every touched window back to full opacity without animating.
    pub fn reset_opacities<H>(&mut self, host: &mut H)
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        for (window, _) in self.opacities.drain(..) {
            if host.window_size(&window).is_some() {
                host.set_window_opacity(&window, 1.);
            }
        }
    }

    /// Puts the peeked window back where it was in the stack.
    fn restore_stack<H>(&mut self, host: &mut H)
    where
        H: PreviewHost<Window = W, Workspace = WS>,
    {
        let PeekState::Active {
            window,
            dimmed: true,
            ..
        } = &self.state
        else {
            return;
        };

        if host.window_size(window).is_none() {
            self.saved_indices.retain(|(w, _)| w != window);
            return;
        }

        if let Some(pos) = self.saved_indices.iter().position(|(w, _)| w == window) {
            let (_, idx) = self.saved_indices.remove(pos);
            host.restack_window(window, idx);
        }

        if host.is_minimized(window) {
            host.set_window_shown(window, false);
        }
    }

    fn animate_opacity(&mut self, options: &Options, window: W, to: f64) {
        let config = options.animations.peek_dim;

        match self.opacities.iter_mut().find(|(w, _)| *w == window) {
            Some((_, opacity)) => opacity.animate_to(&self.clock, to, config),
            None => {
                // Windows start out opaque.
                if to == 1. {
                    return;
                }
                let mut opacity = AnimatedValue::new(1.);
                opacity.animate_to(&self.clock, to, config);
                self.opacities.push((window, opacity));
            }
        }
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        if !self.is_active() {
            assert!(
                self.saved_indices.is_empty(),
                "saved stacking indices must be cleared when the peek ends"
            );
        }

        if let PeekState::Active {
            window,
            dimmed: false,
            ..
        } = &self.state
        {
            assert!(
                !self.saved_indices.iter().any(|(w, _)| w == window),
                "an undimmed peek can't have raised its window"
            );
        }
    }
}
