//! Values derived from the settings and the display, shared by the menu and its previews.

use std::time::Duration;

use smithay::utils::{Logical, Size};
use taskbar_previews_config::{Animations, Config, PanelPosition, TitleFont};

use crate::host::PreviewHost;

/// Height of the preview header with the icon and title, before scaling.
pub const HEADER_HEIGHT: f64 = 38.;

/// Aspect ratio of the preview slot, and the smallest slot size.
pub const DEFAULT_RATIO: (f64, f64) = (160., 90.);

/// Appearance inputs that come from the environment rather than the settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayContext {
    pub scale: f64,
    pub close_button_on_left: bool,
}

impl DisplayContext {
    pub fn from_host<H: PreviewHost>(host: &H) -> Self {
        Self {
            scale: host.scale(),
            close_button_on_left: host.close_button_on_left(),
        }
    }
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self {
            scale: 1.,
            close_button_on_left: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub position: PanelPosition,
    pub display: DisplayContext,
    /// Panel thickness, unscaled.
    pub panel_size: f64,
    /// Configured preview size, unscaled.
    pub preview_size: f64,
    /// Padding around thumbnails, scaled.
    pub padding: f64,
    /// Header height, scaled, zero when titles are hidden.
    pub header_height: f64,
    pub title_font: TitleFont,
    pub open_delay: Duration,
    pub close_delay: Duration,
    pub middle_click_close: bool,
    pub group_apps: bool,
    pub isolate_workspaces: bool,
    pub peek: PeekOptions,
    pub animations: Animations,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeekOptions {
    pub enabled: bool,
    pub enter_delay: Duration,
    /// Opacity of the other windows while peeking, from 0 to 1.
    pub dim_opacity: f64,
}

impl Options {
    pub fn new(config: &Config, position: PanelPosition, display: DisplayContext) -> Self {
        let previews = &config.window_previews;
        let scale = display.scale;

        let header_height = if previews.show_title() {
            HEADER_HEIGHT * scale
        } else {
            0.
        };

        Self {
            position,
            display,
            panel_size: f64::from(config.panel.size),
            preview_size: f64::from(previews.size),
            padding: f64::from(previews.padding) * scale,
            header_height,
            title_font: previews.title_font,
            open_delay: Duration::from_millis(u64::from(previews.open_delay_ms)),
            close_delay: Duration::from_millis(u64::from(previews.close_delay_ms)),
            middle_click_close: previews.middle_click_close,
            group_apps: config.taskbar.group_apps(),
            isolate_workspaces: config.taskbar.isolate_workspaces,
            peek: PeekOptions {
                enabled: !previews.peek.off,
                enter_delay: Duration::from_millis(u64::from(previews.peek.enter_delay_ms)),
                dim_opacity: f64::from(previews.peek.opacity) / 255.,
            },
            animations: config.animations,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.position.is_vertical()
    }

    pub fn scale(&self) -> f64 {
        self.display.scale
    }

    /// Largest thumbnail size.
    ///
    /// The configured size sets the thumbnail height in a horizontal panel and its width in a
    /// vertical one. The other dimension follows the default ratio.
    pub fn preview_dimensions(&self) -> Size<f64, Logical> {
        let size = self.preview_size * self.scale();
        let (ratio_w, ratio_h) = DEFAULT_RATIO;

        if self.is_vertical() {
            let w = f64::max(ratio_w, size);
            Size::from((w, w * ratio_h / ratio_w))
        } else {
            let h = f64::max(ratio_h, size);
            Size::from((h * ratio_w / ratio_h, h))
        }
    }

    /// Thickness of the preview strip across the layout axis, without the header.
    pub fn slot_thickness(&self) -> f64 {
        self.preview_size * self.scale() + self.padding * 2.
    }

    /// Size of the icon drawn in the preview header, unscaled.
    pub fn header_icon_size(&self) -> f64 {
        self.header_height / self.scale() * 0.6
    }
}
