//! Merging window lists into the existing previews.
//!
//! Previews are reused wherever possible. Opening the menu for another icon repoints existing
//! previews at the new windows slot by slot, so switching between icons cross-fades instead of
//! rebuilding the row. Window changes while open keep the previews of windows that stayed, add
//! previews for new windows in taskbar order and animate out the rest.

use crate::host::PreviewHost;
use crate::preview::{Preview, PreviewId};

use super::PreviewMenu;

impl<H: PreviewHost> PreviewMenu<H> {
    /// Repoints previews at `windows` by position.
    pub(super) fn merge_windows(&mut self, host: &H, windows: Vec<H::Window>) {
        let _span = tracy_client::span!("PreviewMenu::merge_windows");

        let app_name = self.app_name(host);
        let animate = self.opened;

        let live: Vec<PreviewId> = self
            .previews
            .iter()
            .filter(|p| !p.is_animating_out())
            .map(|p| p.id())
            .collect();

        let count = usize::max(live.len(), windows.len());
        for idx in 0..count {
            match (live.get(idx), windows.get(idx)) {
                (Some(&id), Some(window)) => {
                    let Some(preview) = self.previews.iter_mut().find(|p| p.id() == id) else {
                        continue;
                    };
                    if preview.window() != window {
                        trace!("reassigning preview {id:?} to {window:?}");
                        preview.assign_window(host, window.clone(), app_name.clone(), animate);
                    }
                }
                (None, Some(window)) => {
                    let preview = self.new_preview(host, window.clone(), app_name.clone());
                    self.previews.push(preview);
                }
                (Some(&id), None) => self.remove_preview(id, animate),
                (None, None) => (),
            }
        }
    }

    /// Adds previews for new windows and animates out those whose window is gone.
    pub(super) fn add_and_remove_windows(&mut self, host: &H, windows: Vec<H::Window>) {
        let _span = tracy_client::span!("PreviewMenu::add_and_remove_windows");

        let app_name = self.app_name(host);
        let mut kept = Vec::with_capacity(windows.len());
        let mut insert_idx = 0;

        for window in windows {
            let existing = self
                .previews
                .iter()
                .position(|p| !p.is_animating_out() && p.window() == &window);

            match existing {
                Some(idx) => {
                    kept.push(self.previews[idx].id());
                    insert_idx = idx + 1;
                }
                None => {
                    trace!("adding preview for {window:?}");
                    let preview = self.new_preview(host, window, app_name.clone());
                    kept.push(preview.id());
                    self.previews.insert(insert_idx, preview);
                    insert_idx += 1;
                }
            }
        }

        let removed: Vec<PreviewId> = self
            .previews
            .iter()
            .filter(|p| !p.is_animating_out() && !kept.contains(&p.id()))
            .map(|p| p.id())
            .collect();
        for id in removed {
            self.remove_preview(id, true);
        }
    }

    fn new_preview(
        &self,
        host: &H,
        window: H::Window,
        app_name: Option<String>,
    ) -> Preview<H::Window> {
        Preview::new(
            host,
            window,
            app_name,
            self.opened,
            self.clock.clone(),
            self.options.clone(),
        )
    }

    /// Destroys a preview, or starts its exit animation if `animate` is set.
    fn remove_preview(&mut self, id: PreviewId, animate: bool) {
        if self.focused == Some(id) {
            self.remove_focus();
        }
        if self.hovered_preview == Some(id) {
            self.hovered_preview = None;
        }

        if animate {
            trace!("animating out preview {id:?}");
            if let Some(preview) = self.previews.iter_mut().find(|p| p.id() == id) {
                preview.animate_out();
            }
        } else {
            trace!("destroying preview {id:?}");
            self.previews.retain(|p| p.id() != id);
        }
    }

    fn app_name(&self, host: &H) -> Option<String> {
        self.current_icon
            .as_ref()
            .and_then(|icon| host.icon_app_name(icon))
    }
}
