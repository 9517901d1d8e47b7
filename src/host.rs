//! Interface to the windowing environment hosting the previews.
//!
//! The preview menu never owns windows, workspaces or taskbar icons. It refers to them through
//! cheap handles and asks the host whenever it needs to know or change something about them.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use smithay::utils::{Logical, Rectangle, Size};

pub trait PreviewHost {
    /// Handle to a toplevel window.
    type Window: Clone + Eq + Hash + Debug;
    /// Handle to a workspace.
    type Workspace: Clone + PartialEq + Debug;
    /// Handle to a taskbar icon that can own the popup.
    type Icon: Clone + PartialEq + Debug;

    // Windows.

    /// Returns the size of the window's content, or `None` if the window is gone.
    fn window_size(&self, window: &Self::Window) -> Option<Size<i32, Logical>>;
    fn window_title(&self, window: &Self::Window) -> Option<String>;
    fn window_workspace(&self, window: &Self::Window) -> Option<Self::Workspace>;
    fn is_minimized(&self, window: &Self::Window) -> bool;
    /// Shows or hides a window's actor without changing its minimized state.
    fn set_window_shown(&mut self, window: &Self::Window, shown: bool);
    fn activate_window(&mut self, window: &Self::Window);
    /// Asks the window to close. The window may take a while to go away, or refuse.
    fn close_window(&mut self, window: &Self::Window);
    /// Returns the windows in stacking order, bottom first.
    fn window_stack(&self) -> Vec<Self::Window>;
    /// Moves the window to the top of the stack.
    fn raise_window(&mut self, window: &Self::Window);
    /// Moves the window to the given position in the stack, bottom being 0.
    fn restack_window(&mut self, window: &Self::Window, idx: usize);
    /// Sets the opacity of the window's actor, from 0 to 1.
    fn set_window_opacity(&mut self, window: &Self::Window, opacity: f64);

    // Workspaces.

    fn active_workspace(&self) -> Self::Workspace;
    fn workspace_index(&self, workspace: &Self::Workspace) -> usize;
    /// Switches to the workspace, skipping the switch animation when `immediate` is set.
    fn activate_workspace(&mut self, workspace: &Self::Workspace, immediate: bool);

    // Shell.

    /// Whether the overview is showing, during which peeking is suppressed.
    fn is_overview_visible(&self) -> bool;
    /// Geometry of the monitor that has the panel.
    fn monitor_geometry(&self) -> Rectangle<f64, Logical>;
    fn scale(&self) -> f64;
    /// Whether the window buttons sit on the left side of titlebars.
    fn close_button_on_left(&self) -> bool;
    /// Sets the region where the popup receives input, `None` to release it.
    fn set_input_region(&mut self, region: Option<Rectangle<f64, Logical>>);

    // Taskbar.

    /// Returns the windows an icon represents, in no particular order.
    fn icon_windows(&self, icon: &Self::Icon) -> Vec<Self::Window>;
    /// Returns the content box of the icon in global coordinates.
    fn icon_geometry(&self, icon: &Self::Icon) -> Rectangle<f64, Logical>;
    /// Name of the application icon shown in preview headers.
    fn icon_app_name(&self, icon: &Self::Icon) -> Option<String>;
    /// Canonical taskbar ordering of windows.
    fn compare_windows(&self, a: &Self::Window, b: &Self::Window) -> Ordering;
}
