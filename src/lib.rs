//! Window preview popups for a desktop taskbar.
//!
//! Hovering an application icon in the taskbar opens a [`PreviewMenu`] with live thumbnails of
//! the application's windows. The menu never touches windows directly: everything it needs from
//! the windowing environment goes through the [`PreviewHost`] trait, and everything it shows is
//! exposed as geometry and opacity for the embedder to draw.

#[macro_use]
extern crate tracing;

pub mod animation;
pub mod geometry;
pub mod host;
pub mod options;
pub mod preview;
pub mod preview_menu;
pub mod timeouts;

#[cfg(test)]
mod test_host;

pub use taskbar_previews_config::Config;

pub use crate::animation::Clock;
pub use crate::host::PreviewHost;
pub use crate::preview::{MouseButton, Preview, PreviewId};
pub use crate::preview_menu::{MenuState, PreviewMenu, ScrollDirection, ScrollEvent};
