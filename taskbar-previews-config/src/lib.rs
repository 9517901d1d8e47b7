//! Settings for the taskbar window previews.
//!
//! The settings are stored in a KDL document. Every section and every value is optional; missing
//! values take their defaults.

#[macro_use]
extern crate tracing;

use std::fs;
use std::path::Path;

use miette::{Context as _, IntoDiagnostic as _};

pub mod animations;
pub mod appearance;
pub mod panel;
pub mod taskbar;
pub mod window_previews;

pub use crate::animations::{Animation, Animations, Curve};
pub use crate::appearance::{Color, FontWeight};
pub use crate::panel::{Panel, PanelPosition};
pub use crate::taskbar::Taskbar;
pub use crate::window_previews::{Peek, TitleFont, WindowPreviews};

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub panel: Panel,
    #[knuffel(child, default)]
    pub window_previews: WindowPreviews,
    #[knuffel(child, default)]
    pub taskbar: Taskbar,
    #[knuffel(child, default)]
    pub animations: Animations,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let _span = tracy_client::span!("Config::load");

        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[track_caller]
    fn do_parse(text: &str) -> Config {
        Config::parse("test.kdl", text)
            .map_err(miette::Report::new)
            .unwrap()
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(do_parse(""), Config::default());
    }

    #[test]
    fn empty_sections_are_default() {
        let parsed = do_parse(
            r#"
            panel {}
            window-previews {
                title-font {}
                peek {}
            }
            taskbar {}
            animations {}
            "#,
        );
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn parse_full() {
        let parsed = do_parse(
            r##"
            panel {
                position "left"
                size 64
            }

            window-previews {
                size 180
                padding 4
                hide-title
                title-font {
                    color "#ff0000"
                    size 12
                    weight "600"
                }
                open-delay-ms 100
                close-delay-ms 250
                middle-click-close
                peek {
                    off
                    enter-delay-ms 800
                    opacity 0
                }
            }

            taskbar {
                ungroup-apps
                isolate-workspaces
            }

            animations {
                slowdown 2.0
                menu-open {
                    duration-ms 150
                    curve "linear"
                }
                peek-dim {
                    off
                }
            }
            "##,
        );

        assert_eq!(
            parsed,
            Config {
                panel: Panel {
                    position: PanelPosition::Left,
                    size: 64,
                },
                window_previews: WindowPreviews {
                    size: 180,
                    padding: 4,
                    hide_title: true,
                    title_font: TitleFont {
                        color: Color::from_rgba8_unpremul(255, 0, 0, 255),
                        size: 12,
                        weight: FontWeight::Numeric(600),
                    },
                    open_delay_ms: 100,
                    close_delay_ms: 250,
                    middle_click_close: true,
                    peek: Peek {
                        off: true,
                        enter_delay_ms: 800,
                        opacity: 0,
                    },
                },
                taskbar: Taskbar {
                    ungroup_apps: true,
                    isolate_workspaces: true,
                },
                animations: Animations {
                    off: false,
                    slowdown: 2.,
                    menu_open: Animation::new(150, Curve::Linear),
                    peek_dim: Animation {
                        off: true,
                        ..Animation::default_peek_dim()
                    },
                    ..Animations::default()
                },
            }
        );

        assert!(!parsed.window_previews.show_title());
        assert!(!parsed.taskbar.group_apps());
        assert!(parsed.panel.position.is_vertical());
        assert!(parsed.panel.position.is_leading());
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(Config::parse("test.kdl", r#"panel { position "middle"; }"#).is_err());
        assert!(Config::parse(
            "test.kdl",
            r#"window-previews { title-font { color "nope"; }; }"#
        )
        .is_err());
        assert!(Config::parse(
            "test.kdl",
            r#"window-previews { title-font { weight "heavy"; }; }"#
        )
        .is_err());
        assert!(Config::parse("test.kdl", r#"window-previews { peek { opacity 300; }; }"#).is_err());
    }

    #[test]
    fn load_missing_file_is_error() {
        let err = Config::load(Path::new("/nonexistent/taskbar-previews.kdl")).unwrap_err();
        assert!(format!("{err:?}").contains("error reading"));
    }
}
