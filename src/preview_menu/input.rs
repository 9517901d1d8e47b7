use smithay::utils::{Logical, Point};

use crate::host::PreviewHost;
use crate::preview::{MouseButton, PreviewId};

use super::{MenuState, PreviewMenu};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    /// Continuous scroll in steps, as reported by touchpads.
    Smooth { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub direction: ScrollDirection,
    /// Discrete events synthesized from smooth scrolling, which the menu ignores.
    pub is_pointer_emulated: bool,
}

impl ScrollEvent {
    pub fn new(direction: ScrollDirection) -> Self {
        Self {
            direction,
            is_pointer_emulated: false,
        }
    }
}

impl<H: PreviewHost> PreviewMenu<H> {
    /// Handles pointer motion in global coordinates.
    pub fn pointer_motion(&mut self, host: &mut H, pos: Point<f64, Logical>) {
        if !self.enabled || self.state != MenuState::Open {
            return;
        }

        let inside = self.popup_rect().contains(pos);
        self.set_hovered(inside);

        let target = if inside { self.preview_at(pos) } else { None };
        self.set_hovered_preview(host, target);
    }

    pub fn pointer_leave(&mut self, host: &mut H) {
        if !self.enabled {
            return;
        }

        self.set_hovered(false);
        self.set_hovered_preview(host, None);
    }

    /// Handles a button release in global coordinates.
    pub fn pointer_button(&mut self, host: &mut H, pos: Point<f64, Logical>, button: MouseButton) {
        if !self.enabled || self.state != MenuState::Open {
            return;
        }

        let geometry = self.preview_geometry();
        let Some(idx) = (0..geometry.len())
            .find(|&idx| self.previews[idx].is_interactive() && geometry[idx].contains(pos))
        else {
            return;
        };

        let preview = &mut self.previews[idx];
        let on_close_button =
            preview.is_focused() && preview.close_button_geometry(geometry[idx]).contains(pos);

        let request = if on_close_button {
            preview.close_button_clicked()
        } else {
            preview.button_released(button)
        };

        if let Some(request) = request {
            self.handle_request(host, request);
        }
    }

    pub fn scroll(&mut self, event: ScrollEvent) {
        if !self.enabled || self.state != MenuState::Open || event.is_pointer_emulated {
            return;
        }

        let step = self.scroll_step();
        let delta = match event.direction {
            ScrollDirection::Up => -step,
            ScrollDirection::Down | ScrollDirection::Left | ScrollDirection::Right => step,
            ScrollDirection::Smooth { dx, dy } => (dx + dy) * step,
        };

        self.scroll_offset += delta;
        self.clamp_scroll();
    }

    /// Keeps the scroll offset within the content.
    pub(super) fn clamp_scroll(&mut self) {
        let vertical = self.options.is_vertical();

        let content: f64 = self
            .previews
            .iter()
            .map(|p| {
                let size = p.render_size();
                if vertical {
                    size.h
                } else {
                    size.w
                }
            })
            .sum();

        let viewport = self.popup_size();
        let viewport = if vertical { viewport.h } else { viewport.w };

        let max = f64::max(0., content - viewport);
        self.scroll_offset = self.scroll_offset.clamp(0., max);
    }

    /// Half of a preview slot along the layout axis.
    fn scroll_step(&self) -> f64 {
        let dims = self.options.preview_dimensions();
        let padding = self.options.padding * 2.;

        let slot = if self.options.is_vertical() {
            dims.h + padding
        } else {
            dims.w + padding
        };
        slot / 2.
    }

    fn preview_at(&self, pos: Point<f64, Logical>) -> Option<PreviewId> {
        self.previews
            .iter()
            .zip(self.preview_geometry())
            .find(|(preview, geo)| preview.is_interactive() && geo.contains(pos))
            .map(|(preview, _)| preview.id())
    }

    fn set_hovered(&mut self, hovered: bool) {
        if self.hovered == hovered {
            return;
        }

        self.hovered = hovered;
        self.end_open_close_timeouts();

        if self.current_icon.is_some() && !hovered {
            self.add_close_timeout();
        }
    }

    fn set_hovered_preview(&mut self, host: &mut H, target: Option<PreviewId>) {
        if self.hovered_preview == target {
            return;
        }

        if let Some(old) = self.hovered_preview.take() {
            if self.focused == Some(old) {
                self.remove_focus();
            }
        }

        self.hovered_preview = target;

        if let Some(id) = target {
            self.focus_preview(host, id);
        }
    }
}
