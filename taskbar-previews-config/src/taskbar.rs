/// Taskbar behavior that the preview popup depends on.
#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Taskbar {
    /// Show one taskbar icon per window rather than per application.
    ///
    /// With ungrouped icons a popup only ever previews a single window, so closing that window
    /// closes the popup as well.
    #[knuffel(child)]
    pub ungroup_apps: bool,
    /// Only show windows from the active workspace.
    #[knuffel(child)]
    pub isolate_workspaces: bool,
}

impl Taskbar {
    pub fn group_apps(&self) -> bool {
        !self.ungroup_apps
    }
}
