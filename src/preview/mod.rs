//! Thumbnail of a single window.
//!
//! A preview shows a live clone of its window's content, optionally below a header with the
//! application icon, a workspace badge and the window title. A preview can be pointed at another
//! window at any time; the old clone then cross-fades into the new one so the popup can reuse
//! previews instead of destroying and recreating them.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use smithay::utils::{Logical, Point, Rectangle, Size};
use taskbar_previews_config::TitleFont;

use crate::animation::{AnimatedValue, Animation, Clock};
use crate::host::PreviewHost;
use crate::options::Options;

mod clone;

pub use clone::{CloneFrame, WindowClone};

/// Size of the close button square, before scaling.
pub const CLOSE_BUTTON_SIZE: f64 = 24.;

/// Inset of the close button when there is no header to center it in, before scaling.
const CLOSE_BUTTON_INSET: f64 = 4.;

static PREVIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(u64);

impl PreviewId {
    fn next() -> PreviewId {
        PreviewId(PREVIEW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Something a preview needs its menu to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRequest<W> {
    /// Start or retarget a peek at the window.
    Peek(W),
    /// End the peek on the window's workspace, close the menu and activate the window.
    Activate(W),
    /// The window was asked to close; the menu should close too if `close_menu` is set.
    CloseWindow { window: W, close_menu: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Application icon name, drawn in a square of the header height.
    pub app_name: Option<String>,
    /// Size of the icon itself, unscaled.
    pub icon_size: f64,
    /// One-based index of the window's workspace, unless workspaces are isolated.
    pub workspace_badge: Option<String>,
    pub title: String,
    pub title_font: TitleFont,
    /// Whether the badge and the title follow the close button on the left.
    pub buttons_on_left: bool,
}

#[derive(Debug)]
pub struct Preview<W> {
    id: PreviewId,

    /// The window this preview currently shows.
    window: W,

    /// Displayed thumbnail size of the current window.
    clone_size: Size<i32, Logical>,

    /// Clones of windows, the live one last.
    ///
    /// Any other clone is fading out after a window change.
    clones: Vec<WindowClone<W>>,

    header: Option<Header>,

    close_button_opacity: AnimatedValue,

    focused: bool,

    /// Cleared once the window was asked to close.
    interactive: bool,

    /// Progress of the exit animation, from 1 down to 0.
    out_animation: Option<Animation>,

    /// Clock for driving animations.
    clock: Clock,

    /// Configurable properties of the previews.
    options: Rc<Options>,
}

/// Everything the embedder needs to draw a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame<W> {
    pub id: PreviewId,
    /// Geometry of the whole preview relative to the popup.
    pub geometry: Rectangle<f64, Logical>,
    /// Area with the clones, below the header.
    pub content: Rectangle<f64, Logical>,
    pub opacity: f64,
    pub focused: bool,
    pub header: Option<Header>,
    /// Clones to draw centered in `content`, bottom first.
    pub clones: Vec<CloneFrame<W>>,
    pub close_button: Rectangle<f64, Logical>,
    pub close_button_opacity: f64,
}

/// Computes the thumbnail size for a window, preserving its aspect ratio.
///
/// Windows are only ever scaled down. The result is rounded down to whole logical pixels.
pub fn thumbnail_size(
    window_size: Size<i32, Logical>,
    max_size: Size<f64, Logical>,
) -> Size<i32, Logical> {
    let w = f64::from(window_size.w);
    let h = f64::from(window_size.h);

    let ratio = f64::min(max_size.w / w, max_size.h / h);
    let ratio = f64::min(ratio, 1.);

    Size::from(((w * ratio).floor() as i32, (h * ratio).floor() as i32))
}

impl<W: Clone + PartialEq + std::fmt::Debug> Preview<W> {
    pub fn new<H: PreviewHost<Window = W>>(
        host: &H,
        window: W,
        app_name: Option<String>,
        animate_size: bool,
        clock: Clock,
        options: Rc<Options>,
    ) -> Self {
        let mut preview = Self {
            id: PreviewId::next(),
            window: window.clone(),
            clone_size: Size::from((0, 0)),
            clones: Vec::new(),
            header: None,
            close_button_opacity: AnimatedValue::new(0.),
            focused: false,
            interactive: true,
            out_animation: None,
            clock,
            options,
        };
        preview.assign_window(host, window, app_name, animate_size);
        preview
    }

    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn clone_size(&self) -> Size<i32, Logical> {
        self.clone_size
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive && self.out_animation.is_none()
    }

    pub fn is_animating_out(&self) -> bool {
        self.out_animation.is_some()
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clones(&self) -> &[WindowClone<W>] {
        &self.clones
    }

    pub fn close_button_opacity(&self) -> f64 {
        self.close_button_opacity.current()
    }

    /// Points this preview at a window.
    ///
    /// With `animate_size`, a preview that had no clone yet grows into place along the layout
    /// axis instead of appearing at full size.
    pub fn assign_window<H: PreviewHost<Window = W>>(
        &mut self,
        host: &H,
        window: W,
        app_name: Option<String>,
        animate_size: bool,
    ) {
        self.window = window;
        self.update_header(host, app_name);

        let window_size = host.window_size(&self.window).unwrap_or_else(|| {
            debug!("assigning a window that is gone: {:?}", self.window);
            Size::from((0, 0))
        });
        self.clone_size = thumbnail_size(window_size, self.options.preview_dimensions());

        self.add_clone(animate_size);
    }

    /// Starts the exit animation. The menu drops the preview once it is done.
    pub fn animate_out(&mut self) {
        if self.out_animation.is_some() {
            return;
        }

        let config = self.options.animations.preview;
        self.out_animation = Some(Animation::new(self.clock.clone(), 1., 0., config));
        self.focused = false;
        self.set_close_button_visible(false);
    }

    /// Size used to place the popup, before the layout settles.
    pub fn get_size(&self) -> Size<f64, Logical> {
        let padding = self.options.padding * 2.;
        let (bin_w, bin_h) = self.bin_size();

        let w = f64::from(self.clone_size.w) + padding;
        let h = f64::from(self.clone_size.h) + padding;

        Size::from((
            bin_w.map_or(w, |bin_w| f64::max(bin_w, w)),
            bin_h.map_or(h, |bin_h| f64::max(bin_h, h)),
        ))
    }

    /// Size of the settled preview, header included.
    pub fn full_size(&self) -> Size<f64, Logical> {
        let size = self.get_size();
        Size::from((size.w, size.h + self.options.header_height))
    }

    /// Size of the preview as currently drawn, header included.
    pub fn render_size(&self) -> Size<f64, Logical> {
        let padding = self.options.padding * 2.;
        let (bin_w, bin_h) = self.bin_size();

        let content = self.content_size();
        let w = content.w + padding;
        let h = content.h + padding;
        let mut w = bin_w.map_or(w, |bin_w| f64::max(bin_w, w));
        let mut h = bin_h.map_or(h, |bin_h| f64::max(bin_h, h)) + self.options.header_height;

        if let Some(out) = &self.out_animation {
            let progress = out.clamped_value();
            if self.options.is_vertical() {
                h *= progress;
            } else {
                w *= progress;
            }
        }

        Size::from((w, h))
    }

    /// Sets or clears the keyboard and hover focus.
    ///
    /// The close button is revealed while focused and hidden otherwise. Returns a peek request
    /// when the preview becomes focused.
    pub fn set_focus(&mut self, focused: bool) -> Option<PreviewRequest<W>> {
        if focused && !self.is_interactive() {
            return None;
        }

        let was_focused = self.focused;
        self.focused = focused;
        self.set_close_button_visible(focused && self.interactive);

        (focused && !was_focused).then(|| PreviewRequest::Peek(self.window.clone()))
    }

    pub fn activate(&self) -> PreviewRequest<W> {
        PreviewRequest::Activate(self.window.clone())
    }

    /// Handles a click on the close button.
    pub fn close_button_clicked(&mut self) -> Option<PreviewRequest<W>> {
        if !self.interactive {
            return None;
        }

        self.interactive = false;
        self.set_close_button_visible(false);

        Some(PreviewRequest::CloseWindow {
            window: self.window.clone(),
            close_menu: !self.options.group_apps,
        })
    }

    /// Handles a button release anywhere else on the preview.
    pub fn button_released(&mut self, button: MouseButton) -> Option<PreviewRequest<W>> {
        if !self.is_interactive() {
            return None;
        }

        match button {
            MouseButton::Left => Some(self.activate()),
            MouseButton::Middle if self.options.middle_click_close => self.close_button_clicked(),
            _ => None,
        }
    }

    /// Refreshes the title if this preview shows `window`.
    pub fn window_title_changed<H: PreviewHost<Window = W>>(&mut self, host: &H, window: &W) {
        if &self.window != window {
            return;
        }

        if let Some(header) = &mut self.header {
            header.title = host.window_title(window).unwrap_or_default();
        }
    }

    pub fn update_options(&mut self, options: Rc<Options>) {
        self.options = options;
    }

    /// Recomputes the thumbnail size and the header after an options change.
    pub fn refresh<H: PreviewHost<Window = W>>(&mut self, host: &H, app_name: Option<String>) {
        self.update_header(host, app_name);

        let Some(window_size) = host.window_size(&self.window) else {
            return;
        };
        self.clone_size = thumbnail_size(window_size, self.options.preview_dimensions());

        let size = self.clone_size.to_f64();
        if let Some(clone) = self.clones.iter_mut().rfind(|c| !c.is_fading_out()) {
            clone.width_mut().set(size.w);
            clone.height_mut().set(size.h);
        }
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.close_button_opacity.is_animation_ongoing()
            || self.out_animation.is_some()
            || self.clones.iter().any(|c| c.are_animations_ongoing() || c.is_fading_out())
    }

    pub fn advance_animations(&mut self) {
        self.close_button_opacity.advance_animations();

        for clone in &mut self.clones {
            clone.advance_animations();
        }
        self.clones.retain(|c| !c.is_gone());
    }

    /// Whether the exit animation finished and the preview can be dropped.
    pub fn is_done_animating_out(&self) -> bool {
        self.out_animation.as_ref().is_some_and(|out| out.is_done())
    }

    pub fn frame(&self, loc: Point<f64, Logical>) -> PreviewFrame<W> {
        let size = self.render_size();
        let geometry = Rectangle::new(loc, size);

        let header_height = self.options.header_height;
        let content = Rectangle::new(
            loc + Point::from((0., header_height)),
            Size::from((size.w, f64::max(0., size.h - header_height))),
        );

        let opacity = self
            .out_animation
            .as_ref()
            .map_or(1., |out| out.clamped_value());

        PreviewFrame {
            id: self.id,
            geometry,
            content,
            opacity,
            focused: self.focused,
            header: self.header.clone(),
            clones: self.clones.iter().map(|c| c.frame()).collect(),
            close_button: self.close_button_geometry(geometry),
            close_button_opacity: self.close_button_opacity.current().clamp(0., 1.),
        }
    }

    /// Geometry of the close button for a preview drawn at `geometry`.
    pub fn close_button_geometry(
        &self,
        geometry: Rectangle<f64, Logical>,
    ) -> Rectangle<f64, Logical> {
        let scale = self.options.scale();
        let side = CLOSE_BUTTON_SIZE * scale;

        let inset = if self.options.header_height > 0. {
            f64::max(0., (self.options.header_height - side) / 2.)
        } else {
            CLOSE_BUTTON_INSET * scale
        };

        let x = if self.options.display.close_button_on_left {
            geometry.loc.x + inset
        } else {
            geometry.loc.x + geometry.size.w - inset - side
        };
        let y = geometry.loc.y + inset;

        Rectangle::new(Point::from((x, y)), Size::from((side, side)))
    }

    fn set_close_button_visible(&mut self, visible: bool) {
        let config = self.options.animations.preview;
        let target = if visible { 1. } else { 0. };
        self.close_button_opacity
            .animate_to(&self.clock, target, config);
    }

    /// Size of the preview bin, or `None` along the layout axis where it follows the clone.
    fn bin_size(&self) -> (Option<f64>, Option<f64>) {
        let dims = self.options.preview_dimensions();
        let padding = self.options.padding * 2.;

        if self.options.is_vertical() {
            (Some(dims.w + padding), None)
        } else {
            (None, Some(dims.h + padding))
        }
    }

    /// Size of the clone area as currently drawn.
    fn content_size(&self) -> Size<f64, Logical> {
        self.clones
            .iter()
            .map(|c| c.size())
            .fold(Size::from((0., 0.)), |acc: Size<f64, Logical>, size| {
                Size::from((f64::max(acc.w, size.w), f64::max(acc.h, size.h)))
            })
    }

    fn update_header<H: PreviewHost<Window = W>>(&mut self, host: &H, app_name: Option<String>) {
        if self.options.header_height <= 0. {
            self.header = None;
            return;
        }

        let workspace_badge = if self.options.isolate_workspaces {
            None
        } else {
            host.window_workspace(&self.window)
                .map(|ws| (host.workspace_index(&ws) + 1).to_string())
        };

        self.header = Some(Header {
            app_name,
            icon_size: self.options.header_icon_size(),
            workspace_badge,
            title: host.window_title(&self.window).unwrap_or_default(),
            title_font: self.options.title_font,
            buttons_on_left: self.options.display.close_button_on_left,
        });
    }

    /// Cross-fades from the current clone to a clone of the current window.
    fn add_clone(&mut self, animate_size: bool) {
        let config = self.options.animations.preview;
        let size = self.clone_size.to_f64();

        let mut new = WindowClone::new(self.window.clone(), size);
        new.fade_in(&self.clock, config);

        // Only the live clone takes part in the cross-fade; older ones are dropped right away.
        let live = self.clones.iter().rposition(|c| !c.is_fading_out());
        let mut current = live.map(|idx| self.clones.remove(idx));
        self.clones.clear();

        if let Some(current) = &mut current {
            let current_size = current.size();

            if size.w > current_size.w {
                new.width_mut().set(current_size.w);
                new.width_mut().animate_to(&self.clock, size.w, config);
            } else {
                current.width_mut().animate_to(&self.clock, size.w, config);
            }

            if size.h > current_size.h {
                new.height_mut().set(current_size.h);
                new.height_mut().animate_to(&self.clock, size.h, config);
            } else {
                current.height_mut().animate_to(&self.clock, size.h, config);
            }

            current.fade_out(&self.clock, config);
        } else if animate_size {
            if self.options.is_vertical() {
                new.height_mut().set(0.);
                new.height_mut().animate_to(&self.clock, size.h, config);
            } else {
                new.width_mut().set(0.);
                new.width_mut().animate_to(&self.clock, size.w, config);
            }
        }

        self.clones.extend(current);
        self.clones.push(new);
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        let live = self.clones.iter().filter(|c| !c.is_fading_out()).count();
        assert_eq!(live, 1, "a preview must have exactly one live clone");

        let last = self.clones.last().unwrap();
        assert!(!last.is_fading_out(), "the live clone must be on top");
        assert!(last.window() == &self.window, "the live clone must show the window");

        let max = self.options.preview_dimensions();
        assert!(f64::from(self.clone_size.w) <= max.w.floor() + 1e-9);
        assert!(f64::from(self.clone_size.h) <= max.h.floor() + 1e-9);

        if self.out_animation.is_some() {
            assert!(!self.focused, "previews animating out can't be focused");
        }
    }
}
