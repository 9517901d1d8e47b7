//! Placement of the popup for each panel edge.
//!
//! The popup lives inside a clip rectangle glued to the inner side of the panel and spanning the
//! monitor along the panel. Inside the clip, the popup is centered on the icon that opened it.
//! Sliding in and out happens by translating the popup across the clip edge that touches the
//! panel.

use smithay::utils::{Logical, Point, Rectangle, Size};
use taskbar_previews_config::PanelPosition;

/// Largest distance the popup slides when opening and closing.
pub const MAX_TRANSLATION: f64 = 40.;

/// Translation of the fully hidden popup along its translation axis.
///
/// The popup slides from under the panel, so the offset points toward the panel's edge.
pub fn hidden_translation(position: PanelPosition, panel_size: f64) -> f64 {
    let offset = f64::min(panel_size, MAX_TRANSLATION);
    if position.is_leading() {
        -offset
    } else {
        offset
    }
}

/// Converts a translation along the popup's translation axis into a 2D offset.
pub fn translation_offset(position: PanelPosition, translation: f64) -> Point<f64, Logical> {
    if position.is_vertical() {
        Point::from((translation, 0.))
    } else {
        Point::from((0., translation))
    }
}

/// Computes the clip rectangle of the popup in global coordinates.
///
/// `panel_size` is the scaled panel thickness, `slot` the scaled preview strip thickness.
pub fn menu_clip(
    position: PanelPosition,
    monitor: Rectangle<f64, Logical>,
    panel_size: f64,
    slot: f64,
    header_height: f64,
) -> Rectangle<f64, Logical> {
    let (mut x, mut y) = (monitor.loc.x, monitor.loc.y);
    let size = if position.is_vertical() {
        Size::from((slot, monitor.size.h))
    } else {
        Size::from((monitor.size.w, slot + header_height))
    };

    match position {
        PanelPosition::Left => x = monitor.loc.x + panel_size,
        PanelPosition::Right => x = monitor.loc.x + monitor.size.w - (panel_size + slot),
        PanelPosition::Top => y = monitor.loc.y + panel_size,
        PanelPosition::Bottom => {
            y = monitor.loc.y + monitor.size.h - (panel_size + slot + header_height)
        }
    }

    Rectangle::new(Point::from((x, y)), size)
}

/// Sums preview sizes along the layout axis and takes the largest across it.
pub fn stacked_size(
    position: PanelPosition,
    sizes: impl IntoIterator<Item = Size<f64, Logical>>,
) -> Size<f64, Logical> {
    sizes
        .into_iter()
        .fold(Size::from((0., 0.)), |acc: Size<f64, Logical>, size| {
            if position.is_vertical() {
                Size::from((f64::max(acc.w, size.w), acc.h + size.h))
            } else {
                Size::from((acc.w + size.w, f64::max(acc.h, size.h)))
            }
        })
}

/// Computes the popup location relative to the clip origin.
///
/// The popup is centered on the icon along the panel using `center_size`, then pushed back so
/// that `popup_size`, the extent actually drawn, stays inside the monitor.
pub fn menu_location(
    position: PanelPosition,
    monitor: Rectangle<f64, Logical>,
    icon: Rectangle<f64, Logical>,
    center_size: Size<f64, Logical>,
    popup_size: Size<f64, Logical>,
) -> Point<f64, Logical> {
    let center_size = clamp_to_monitor(monitor, center_size);
    let popup_size = clamp_to_monitor(monitor, popup_size);

    if position.is_vertical() {
        let y = icon.loc.y - monitor.loc.y + (icon.size.h - center_size.h) * 0.5;
        let y = f64::max(y, 0.);
        let y = f64::min(y, monitor.size.h - popup_size.h);
        Point::from((0., y))
    } else {
        let x = icon.loc.x - monitor.loc.x + (icon.size.w - center_size.w) * 0.5;
        let x = f64::max(x, 0.);
        let x = f64::min(x, monitor.size.w - popup_size.w);
        Point::from((x, 0.))
    }
}

/// Caps a popup size so it fits on the monitor.
pub fn clamp_to_monitor(
    monitor: Rectangle<f64, Logical>,
    size: Size<f64, Logical>,
) -> Size<f64, Logical> {
    Size::from((
        f64::min(size.w, monitor.size.w),
        f64::min(size.h, monitor.size.h),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> Rectangle<f64, Logical> {
        Rectangle::new(Point::from((1920., 0.)), Size::from((1920., 1080.)))
    }

    #[test]
    fn translation_points_at_the_panel() {
        assert_eq!(hidden_translation(PanelPosition::Top, 48.), -40.);
        assert_eq!(hidden_translation(PanelPosition::Left, 30.), -30.);
        assert_eq!(hidden_translation(PanelPosition::Bottom, 48.), 40.);
        assert_eq!(hidden_translation(PanelPosition::Right, 24.), 24.);

        assert_eq!(
            translation_offset(PanelPosition::Bottom, 40.),
            Point::from((0., 40.))
        );
        assert_eq!(
            translation_offset(PanelPosition::Left, -40.),
            Point::from((-40., 0.))
        );
    }

    #[test]
    fn clip_for_each_edge() {
        let mon = monitor();

        assert_eq!(
            menu_clip(PanelPosition::Bottom, mon, 48., 256., 38.),
            Rectangle::new(
                Point::from((1920., 1080. - (48. + 256. + 38.))),
                Size::from((1920., 294.))
            )
        );
        assert_eq!(
            menu_clip(PanelPosition::Top, mon, 48., 256., 38.),
            Rectangle::new(Point::from((1920., 48.)), Size::from((1920., 294.)))
        );
        assert_eq!(
            menu_clip(PanelPosition::Left, mon, 48., 256., 38.),
            Rectangle::new(Point::from((1968., 0.)), Size::from((256., 1080.)))
        );
        assert_eq!(
            menu_clip(PanelPosition::Right, mon, 48., 256., 38.),
            Rectangle::new(
                Point::from((1920. + 1920. - 304., 0.)),
                Size::from((256., 1080.))
            )
        );
    }

    #[test]
    fn stacking_follows_layout_axis() {
        let sizes = [Size::from((100., 50.)), Size::from((80., 70.))];
        assert_eq!(
            stacked_size(PanelPosition::Bottom, sizes),
            Size::from((180., 70.))
        );
        assert_eq!(
            stacked_size(PanelPosition::Right, sizes),
            Size::from((100., 120.))
        );
        assert_eq!(
            stacked_size(PanelPosition::Top, []),
            Size::from((0., 0.))
        );
    }

    #[test]
    fn location_centers_on_icon() {
        let icon = Rectangle::new(Point::from((1920. + 500., 1040.)), Size::from((40., 40.)));
        let size = Size::from((300., 200.));
        let loc = menu_location(PanelPosition::Bottom, monitor(), icon, size, size);
        assert_eq!(loc, Point::from((500. + (40. - 300.) / 2., 0.)));
    }

    #[test]
    fn headers_only_affect_clamping() {
        let mon = monitor();
        let center = Size::from((200., 300.));
        let drawn = Size::from((200., 376.));

        let icon = Rectangle::new(Point::from((1920., 400.)), Size::from((40., 40.)));
        let loc = menu_location(PanelPosition::Left, mon, icon, center, drawn);
        assert_eq!(loc, Point::from((0., 400. + (40. - 300.) / 2.)));

        let icon = Rectangle::new(Point::from((1920., 1040.)), Size::from((40., 40.)));
        let loc = menu_location(PanelPosition::Left, mon, icon, center, drawn);
        assert_eq!(loc, Point::from((0., 1080. - 376.)));
    }

    #[test]
    fn location_clamps_to_monitor() {
        let mon = monitor();

        let icon = Rectangle::new(Point::from((1920. + 10., 1040.)), Size::from((40., 40.)));
        let size = Size::from((300., 200.));
        let loc = menu_location(PanelPosition::Top, mon, icon, size, size);
        assert_eq!(loc, Point::from((0., 0.)));

        let icon = Rectangle::new(Point::from((3840. - 20., 1040.)), Size::from((40., 40.)));
        let size = Size::from((300., 200.));
        let loc = menu_location(PanelPosition::Top, mon, icon, size, size);
        assert_eq!(loc, Point::from((1920. - 300., 0.)));

        // Too large to fit at all.
        let size = Size::from((5000., 200.));
        let loc = menu_location(PanelPosition::Top, mon, icon, size, size);
        assert_eq!(loc, Point::from((0., 0.)));

        let icon = Rectangle::new(Point::from((1920., 1060.)), Size::from((40., 40.)));
        let size = Size::from((200., 300.));
        let loc = menu_location(PanelPosition::Left, mon, icon, size, size);
        assert_eq!(loc, Point::from((0., 1080. - 300.)));
    }
}
