//! Popup with the window previews of one taskbar icon.
//!
//! The taskbar asks the menu to open and close as the pointer moves over its icons. Both requests
//! are debounced through named timeouts, so quickly sweeping over the taskbar only opens the menu
//! for the icon the pointer settles on. While the menu is open for an icon, window changes of that
//! icon are merged into the existing previews instead of rebuilding them.
//!
//! Nothing happens behind the embedder's back: timeouts fire and animations retire from
//! [`PreviewMenu::advance_animations`], which the embedder calls once per frame.

use std::collections::HashSet;
use std::rc::Rc;

use smithay::utils::{Logical, Point, Rectangle, Size};
use taskbar_previews_config::{Config, PanelPosition};

use crate::animation::{AnimatedValue, Clock};
use crate::geometry;
use crate::host::PreviewHost;
use crate::options::{DisplayContext, Options};
use crate::preview::{Preview, PreviewFrame, PreviewId, PreviewRequest};
use crate::timeouts::{Named, TimeoutName, Timeouts};

mod input;
mod peek;
mod reconcile;

pub use input::{ScrollDirection, ScrollEvent};
pub use peek::{PeekState, PeekStep, WORKSPACE_SWITCH_DELAY};

use self::peek::Peek;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Open,
    /// The close animation is running; the menu resets once it ends.
    Closing,
}

/// Work scheduled to run after a delay.
#[derive(Debug, Clone, PartialEq)]
enum Deferred<I, W> {
    Open(I),
    Close,
    Peek(PeekStep<W>),
}

impl<I, W> Named for Deferred<I, W> {
    fn name(&self) -> TimeoutName {
        match self {
            Deferred::Open(_) => TimeoutName::Open,
            Deferred::Close => TimeoutName::Close,
            Deferred::Peek(_) => TimeoutName::Peek,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuGeometry {
    /// Area the popup is confined to, in global coordinates.
    pub clip: Rectangle<f64, Logical>,
    /// Popup location relative to the clip, not including the slide translation.
    pub loc: Point<f64, Logical>,
    /// Popup size with the preview headers.
    pub size: Size<f64, Logical>,
}

/// Everything the embedder needs to draw the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuFrame<W> {
    pub clip: Rectangle<f64, Logical>,
    /// Popup geometry in global coordinates, translation included.
    pub popup: Rectangle<f64, Logical>,
    pub opacity: f64,
    pub previews: Vec<PreviewFrame<W>>,
}

#[derive(Debug)]
pub struct PreviewMenu<H: PreviewHost> {
    /// Whether the menu is attached to its panel.
    enabled: bool,

    /// Edge of the monitor the panel is on.
    position: PanelPosition,

    /// Settings the options were derived from.
    config: Config,

    /// Configurable properties, shared with the previews.
    options: Rc<Options>,

    /// Clock for driving animations and timeouts.
    clock: Clock,

    /// Icon the menu is open or opening for.
    current_icon: Option<H::Icon>,

    /// Whether the menu was opened and not yet reset to its hidden state.
    opened: bool,

    state: MenuState,

    /// Previews in taskbar order, including those animating out.
    previews: Vec<Preview<H::Window>>,

    focused: Option<PreviewId>,

    /// Preview under the pointer.
    hovered_preview: Option<PreviewId>,

    /// Whether the pointer is over the popup.
    hovered: bool,

    peek: Peek<H::Window, H::Workspace>,

    timeouts: Timeouts<Deferred<H::Icon, H::Window>>,

    opacity: AnimatedValue,

    /// Slide offset along the translation axis.
    translation: AnimatedValue,

    loc_x: AnimatedValue,
    loc_y: AnimatedValue,

    monitor: Rectangle<f64, Logical>,

    clip: Rectangle<f64, Logical>,

    /// Scroll position along the layout axis.
    scroll_offset: f64,
}

impl<H: PreviewHost> PreviewMenu<H> {
    pub fn new(config: &Config, clock: Clock, position: PanelPosition) -> Self {
        let options = Options::new(config, position, DisplayContext::default());
        let hidden = geometry::hidden_translation(position, options.panel_size);
        let empty = Rectangle::new(Point::from((0., 0.)), Size::from((0., 0.)));

        let mut menu = Self {
            enabled: false,
            position,
            config: config.clone(),
            options: Rc::new(options),
            clock: clock.clone(),
            current_icon: None,
            opened: false,
            state: MenuState::Hidden,
            previews: Vec::new(),
            focused: None,
            hovered_preview: None,
            hovered: false,
            peek: Peek::new(clock.clone()),
            timeouts: Timeouts::new(clock),
            opacity: AnimatedValue::new(0.),
            translation: AnimatedValue::new(hidden),
            loc_x: AnimatedValue::new(0.),
            loc_y: AnimatedValue::new(0.),
            monitor: empty,
            clip: empty,
            scroll_offset: 0.,
        };
        menu.apply_clock_settings();
        menu
    }

    /// Attaches the menu to its panel.
    pub fn enable(&mut self, host: &mut H) {
        if self.enabled {
            return;
        }

        debug!("enabling preview menu on the {:?} panel", self.position);
        self.enabled = true;
        self.rebuild_options(host);
        self.reset_hidden_state(host);
        self.update_clip(host);
    }

    /// Detaches the menu. Every later call is ignored until the next [`enable`](Self::enable).
    pub fn disable(&mut self, host: &mut H) {
        if !self.enabled {
            return;
        }

        debug!("disabling preview menu");
        self.timeouts.clear();
        self.close(host, true);
        self.peek.reset_opacities(host);
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Applies new settings.
    pub fn update_config(&mut self, host: &mut H, config: &Config) {
        self.config = config.clone();

        if !self.enabled {
            return;
        }

        self.rebuild_options(host);
        self.update_clip(host);

        if self.state == MenuState::Hidden {
            self.translation.set(self.hidden_translation());
        }

        if self.opened && self.current_icon.is_some() {
            self.update_position(host);
            self.update_input_region(host);
        }
    }

    /// Opens the menu for `icon` once the open delay runs out.
    pub fn request_open(&mut self, icon: H::Icon) {
        if !self.enabled {
            return;
        }

        self.end_open_close_timeouts();
        self.timeouts
            .add(self.options.open_delay, Deferred::Open(icon));
    }

    /// Closes the menu once the close delay runs out.
    pub fn request_close(&mut self) {
        if !self.enabled {
            return;
        }

        self.end_open_close_timeouts();
        self.add_close_timeout();
    }

    pub fn open(&mut self, host: &mut H, icon: H::Icon) {
        if !self.enabled || self.current_icon.as_ref() == Some(&icon) {
            return;
        }

        let _span = tracy_client::span!("PreviewMenu::open");

        if self.state == MenuState::Closing {
            debug!("interrupting the close animation to open for {icon:?}");
            self.reset_hidden_state(host);
        }

        trace!("opening for {icon:?}");
        self.current_icon = Some(icon.clone());

        if !self.opened {
            self.rebuild_options(host);
            self.update_clip(host);
        }

        let windows = resolve_windows(host, host.icon_windows(&icon));
        self.merge_windows(host, windows);
        self.update_position(host);
        self.animate_open_or_close(true);

        self.opened = true;
        self.state = MenuState::Open;
        self.update_input_region(host);
    }

    pub fn close(&mut self, host: &mut H, immediate: bool) {
        if !self.enabled {
            return;
        }

        trace!("closing, immediate: {immediate}");

        self.end_open_close_timeouts();
        self.remove_focus();
        self.end_peek(host);
        self.hovered_preview = None;

        if immediate || !self.opened {
            self.reset_hidden_state(host);
        } else {
            self.state = MenuState::Closing;
            self.animate_open_or_close(false);
        }

        self.current_icon = None;
    }

    /// Merges the windows of `icon` into the open menu.
    ///
    /// With `None`, the windows are read from the host.
    pub fn update(&mut self, host: &mut H, icon: &H::Icon, windows: Option<Vec<H::Window>>) {
        if !self.enabled || self.current_icon.as_ref() != Some(icon) {
            return;
        }

        let _span = tracy_client::span!("PreviewMenu::update");

        let windows = windows.unwrap_or_else(|| host.icon_windows(icon));
        let windows = resolve_windows(host, windows);

        if windows.is_empty() {
            self.close(host, false);
            return;
        }

        self.add_and_remove_windows(host, windows);
        self.update_position(host);
        self.update_input_region(host);
    }

    /// Moves the focus to the next preview, wrapping around.
    ///
    /// Returns the index of the newly focused preview.
    pub fn focus_next(&mut self, host: &mut H) -> Option<usize> {
        if !self.enabled {
            return None;
        }

        let candidates: Vec<usize> = self
            .previews
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_interactive())
            .map(|(idx, _)| idx)
            .collect();

        let current = self.focused.and_then(|id| {
            candidates
                .iter()
                .position(|&idx| self.previews[idx].id() == id)
        });

        let next = match current {
            Some(current) => candidates[(current + 1) % candidates.len()],
            None => *candidates.first()?,
        };

        let id = self.previews[next].id();
        self.focus_preview(host, id);
        Some(next)
    }

    pub fn activate_focused(&mut self, host: &mut H) {
        if !self.enabled || !self.opened {
            return;
        }

        let Some(preview) = self.focused_preview() else {
            return;
        };

        let request = preview.activate();
        self.handle_request(host, request);
    }

    /// Starts peeking at `window`, or switches the ongoing peek over to it.
    pub fn request_peek(&mut self, host: &mut H, window: H::Window) {
        if !self.enabled || self.peek.peeked_window() == Some(&window) {
            return;
        }

        if host.is_overview_visible() {
            debug!("not peeking at {window:?} while the overview is visible");
            return;
        }

        self.timeouts.remove(TimeoutName::Peek);
        self.peek.cancel_pending();

        if !self.options.peek.enabled {
            return;
        }

        if self.peek.is_active() {
            self.enter_peek(host, window);
        } else {
            self.peek.set_pending(window.clone());
            self.timeouts.add(
                self.options.peek.enter_delay,
                Deferred::Peek(PeekStep::Enter(window)),
            );
        }
    }

    /// Ends the peek while staying on the peeked window's workspace.
    pub fn end_peek_here(&mut self, host: &mut H) {
        if !self.enabled {
            return;
        }

        self.timeouts.remove(TimeoutName::Peek);
        self.peek.end(host, &self.options, true);
    }

    pub fn window_title_changed(&mut self, host: &H, window: &H::Window) {
        if !self.enabled {
            return;
        }

        for preview in &mut self.previews {
            preview.window_title_changed(host, window);
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn current_icon(&self) -> Option<&H::Icon> {
        self.current_icon.as_ref()
    }

    pub fn previews(&self) -> &[Preview<H::Window>] {
        &self.previews
    }

    pub fn focused_index(&self) -> Option<usize> {
        let id = self.focused?;
        self.previews.iter().position(|p| p.id() == id)
    }

    pub fn is_peeking(&self) -> bool {
        self.peek.is_active()
    }

    pub fn peek_state(&self) -> &PeekState<H::Window, H::Workspace> {
        self.peek.state()
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    pub fn geometry(&self) -> MenuGeometry {
        MenuGeometry {
            clip: self.clip,
            loc: Point::from((self.loc_x.current(), self.loc_y.current())),
            size: self.popup_size(),
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.current().clamp(0., 1.)
    }

    pub fn translation(&self) -> f64 {
        self.translation.current()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Popup geometry in global coordinates as currently drawn.
    pub fn popup_rect(&self) -> Rectangle<f64, Logical> {
        let geo = self.geometry();
        let loc = geo.clip.loc
            + geo.loc
            + geometry::translation_offset(self.position, self.translation.current());
        Rectangle::new(loc, geo.size)
    }

    /// Geometry of every preview in global coordinates, in the order of [`Self::previews`].
    pub fn preview_geometry(&self) -> Vec<Rectangle<f64, Logical>> {
        let popup = self.popup_rect();
        let vertical = self.options.is_vertical();
        let mut offset = -self.scroll_offset;

        self.previews
            .iter()
            .map(|preview| {
                let size = preview.render_size();
                let loc = if vertical {
                    popup.loc + Point::from((0., offset))
                } else {
                    popup.loc + Point::from((offset, 0.))
                };
                offset += if vertical { size.h } else { size.w };
                Rectangle::new(loc, size)
            })
            .collect()
    }

    pub fn frame(&self) -> MenuFrame<H::Window> {
        let previews = self
            .previews
            .iter()
            .zip(self.preview_geometry())
            .map(|(preview, geo)| preview.frame(geo.loc))
            .collect();

        MenuFrame {
            clip: self.clip,
            popup: self.popup_rect(),
            opacity: self.opacity(),
            previews,
        }
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.state == MenuState::Closing
            || self.opacity.is_animation_ongoing()
            || self.translation.is_animation_ongoing()
            || self.loc_x.is_animation_ongoing()
            || self.loc_y.is_animation_ongoing()
            || self.previews.iter().any(|p| p.are_animations_ongoing())
            || self.peek.are_animations_ongoing()
    }

    /// Returns when the earliest pending timeout is due, on the unadjusted clock.
    pub fn next_deadline(&self) -> Option<std::time::Duration> {
        if !self.enabled {
            return None;
        }

        self.timeouts.next_deadline()
    }

    /// Fires due timeouts and steps every animation to the current clock time.
    pub fn advance_animations(&mut self, host: &mut H) {
        if !self.enabled {
            return;
        }

        let _span = tracy_client::span!("PreviewMenu::advance_animations");

        while let Some(deferred) = self.timeouts.pop_due() {
            self.fire(host, deferred);
        }

        for preview in &mut self.previews {
            preview.advance_animations();
        }

        let count = self.previews.len();
        self.previews.retain(|p| !p.is_done_animating_out());
        if self.previews.len() != count {
            trace!("retired {} previews", count - self.previews.len());
            let hovered = self.hovered_preview;
            if !self.previews.iter().any(|p| Some(p.id()) == hovered) {
                self.hovered_preview = None;
            }
        }

        self.opacity.advance_animations();
        self.translation.advance_animations();
        self.loc_x.advance_animations();
        self.loc_y.advance_animations();

        if self.state == MenuState::Closing
            && !self.opacity.is_animation_ongoing()
            && !self.translation.is_animation_ongoing()
        {
            self.reset_hidden_state(host);
        }

        self.peek.advance_animations(host);
        self.clamp_scroll();
    }

    fn fire(&mut self, host: &mut H, deferred: Deferred<H::Icon, H::Window>) {
        match deferred {
            Deferred::Open(icon) => self.open(host, icon),
            Deferred::Close => self.close(host, false),
            Deferred::Peek(_) if host.is_overview_visible() => {
                debug!("dropping peek step while the overview is visible");
                self.peek.cancel_pending();
            }
            Deferred::Peek(PeekStep::Enter(window)) => {
                if !self.peek.is_pending_for(&window) || host.window_size(&window).is_none() {
                    self.peek.cancel_pending();
                    return;
                }
                self.enter_peek(host, window);
            }
            Deferred::Peek(PeekStep::Focus(window)) => {
                self.peek.focus(host, &self.options, &window);
            }
        }
    }

    fn handle_request(&mut self, host: &mut H, request: PreviewRequest<H::Window>) {
        match request {
            PreviewRequest::Peek(window) => self.request_peek(host, window),
            PreviewRequest::Activate(window) => {
                self.end_peek_here(host);
                self.close(host, false);
                host.activate_window(&window);
            }
            PreviewRequest::CloseWindow { window, close_menu } => {
                host.close_window(&window);
                if close_menu {
                    self.close(host, false);
                }
            }
        }
    }

    fn enter_peek(&mut self, host: &mut H, window: H::Window) {
        if let Some(step) = self.peek.enter(host, &self.options, window) {
            self.timeouts
                .add(peek::WORKSPACE_SWITCH_DELAY, Deferred::Peek(step));
        }
    }

    fn end_peek(&mut self, host: &mut H) {
        self.timeouts.remove(TimeoutName::Peek);
        self.peek.end(host, &self.options, false);
    }

    fn focused_preview(&self) -> Option<&Preview<H::Window>> {
        let id = self.focused?;
        self.previews.iter().find(|p| p.id() == id)
    }

    fn focus_preview(&mut self, host: &mut H, id: PreviewId) {
        self.remove_focus();

        let Some(preview) = self.previews.iter_mut().find(|p| p.id() == id) else {
            return;
        };
        if !preview.is_interactive() {
            return;
        }

        let request = preview.set_focus(true);
        self.focused = Some(id);

        if let Some(request) = request {
            self.handle_request(host, request);
        }
    }

    fn remove_focus(&mut self) {
        let Some(id) = self.focused.take() else {
            return;
        };

        if let Some(preview) = self.previews.iter_mut().find(|p| p.id() == id) {
            preview.set_focus(false);
        }
    }

    fn end_open_close_timeouts(&mut self) {
        self.timeouts.remove(TimeoutName::Open);
        self.timeouts.remove(TimeoutName::Close);
    }

    fn add_close_timeout(&mut self) {
        self.timeouts.add(self.options.close_delay, Deferred::Close);
    }

    fn animate_open_or_close(&mut self, show: bool) {
        let animations = &self.options.animations;
        let (config, opacity, translation) = if show {
            (animations.menu_open, 1., 0.)
        } else {
            (animations.menu_close, 0., self.hidden_translation())
        };

        self.opacity.animate_to(&self.clock, opacity, config);
        self.translation
            .animate_to(&self.clock, translation, config);
    }

    fn reset_hidden_state(&mut self, host: &mut H) {
        trace!("resetting to the hidden state");

        self.state = MenuState::Hidden;
        self.opened = false;
        self.opacity.set(0.);
        self.translation.set(self.hidden_translation());
        self.previews.clear();
        self.focused = None;
        self.hovered_preview = None;
        self.hovered = false;
        self.scroll_offset = 0.;
        host.set_input_region(None);
    }

    fn hidden_translation(&self) -> f64 {
        geometry::hidden_translation(self.position, self.options.panel_size)
    }

    /// Recomputes the options from the settings and the display, pushing them to the previews.
    fn rebuild_options(&mut self, host: &H) {
        let options = Options::new(&self.config, self.position, DisplayContext::from_host(host));
        if *self.options == options {
            return;
        }

        self.options = Rc::new(options);
        self.apply_clock_settings();

        let app_name = self
            .current_icon
            .as_ref()
            .and_then(|icon| host.icon_app_name(icon));
        for preview in &mut self.previews {
            preview.update_options(self.options.clone());
            preview.refresh(host, app_name.clone());
        }
    }

    fn apply_clock_settings(&mut self) {
        let animations = &self.options.animations;
        let rate = if animations.slowdown > 0. {
            1. / animations.slowdown
        } else {
            1.
        };
        let off = animations.off;

        self.clock.set_rate(rate);
        self.clock.set_complete_instantly(off);
    }

    fn update_clip(&mut self, host: &H) {
        let options = &self.options;
        self.monitor = host.monitor_geometry();
        self.clip = geometry::menu_clip(
            self.position,
            self.monitor,
            options.panel_size * options.scale(),
            options.slot_thickness(),
            options.header_height,
        );
    }

    /// Size for centering the popup on its icon, from the previews that are not animating out.
    ///
    /// Headers are left out.
    fn placement_size(&self) -> Size<f64, Logical> {
        let size = geometry::stacked_size(
            self.position,
            self.previews
                .iter()
                .filter(|p| !p.is_animating_out())
                .map(|p| p.get_size()),
        );
        geometry::clamp_to_monitor(self.monitor, size)
    }

    /// Settled size of the drawn popup, headers included.
    fn popup_size(&self) -> Size<f64, Logical> {
        let size = geometry::stacked_size(
            self.position,
            self.previews
                .iter()
                .filter(|p| !p.is_animating_out())
                .map(|p| p.full_size()),
        );
        geometry::clamp_to_monitor(self.monitor, size)
    }

    /// Centers the popup on the current icon.
    fn update_position(&mut self, host: &H) {
        let Some(icon) = &self.current_icon else {
            return;
        };

        let _span = tracy_client::span!("PreviewMenu::update_position");

        let icon_geo = host.icon_geometry(icon);
        let loc = geometry::menu_location(
            self.position,
            self.monitor,
            icon_geo,
            self.placement_size(),
            self.popup_size(),
        );

        if self.opened {
            let config = self.options.animations.menu_move;
            self.loc_x.animate_to(&self.clock, loc.x, config);
            self.loc_y.animate_to(&self.clock, loc.y, config);
        } else {
            self.loc_x.set(loc.x);
            self.loc_y.set(loc.y);
        }

        self.clamp_scroll();
    }

    fn update_input_region(&mut self, host: &mut H) {
        let loc = Point::from((self.loc_x.target(), self.loc_y.target()));
        let region = Rectangle::new(self.clip.loc + loc, self.popup_size());
        host.set_input_region(Some(region));
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        let mut windows = HashSet::new();
        for preview in &self.previews {
            assert!(
                Rc::ptr_eq(preview.options(), &self.options),
                "previews must share the menu options"
            );
            assert!(preview.clock() == &self.clock, "previews must share the menu clock");
            preview.verify_invariants();

            if !preview.is_animating_out() {
                assert!(
                    windows.insert(preview.window().clone()),
                    "window {:?} is shown twice",
                    preview.window()
                );
            }
        }

        if let Some(id) = self.focused {
            let preview = self
                .previews
                .iter()
                .find(|p| p.id() == id)
                .expect("focused preview must be a child");
            assert!(!preview.is_animating_out());
            assert!(preview.is_focused());
        }
        let focused_count = self.previews.iter().filter(|p| p.is_focused()).count();
        assert!(focused_count <= 1, "at most one preview can be focused");

        assert_eq!(
            self.current_icon.is_some(),
            self.state == MenuState::Open,
            "current icon must be set exactly while the menu is open"
        );
        assert_eq!(self.opened, self.state != MenuState::Hidden);

        if self.state == MenuState::Hidden {
            assert!(self.previews.is_empty(), "hidden menu must have no previews");
            assert_eq!(self.opacity(), 0.);
        }

        if !self.enabled {
            assert!(self.timeouts.is_empty());
        }

        self.peek.verify_invariants();
    }
}

/// Drops windows that are gone and duplicates, then sorts in taskbar order.
fn resolve_windows<H: PreviewHost>(host: &H, windows: Vec<H::Window>) -> Vec<H::Window> {
    let mut seen = HashSet::new();
    let mut windows: Vec<_> = windows
        .into_iter()
        .filter(|w| {
            if host.window_size(w).is_none() {
                debug!("ignoring window that is gone: {w:?}");
                return false;
            }
            seen.insert(w.clone())
        })
        .collect();

    windows.sort_by(|a, b| host.compare_windows(a, b));
    windows
}
