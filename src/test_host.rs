//! In-memory host that records every change the preview menu asks for.

use std::cmp::Ordering;
use std::fmt;

use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::host::PreviewHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestWindow(pub u32);

impl fmt::Display for TestWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestIcon(pub u32);

#[derive(Debug, Clone)]
pub struct TestWindowParams {
    id: u32,
    size: Size<i32, Logical>,
    title: String,
    workspace: usize,
    minimized: bool,
}

impl TestWindowParams {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            size: Size::from((1280, 720)),
            title: format!("Window {id}"),
            workspace: 0,
            minimized: false,
        }
    }

    pub fn size(mut self, w: i32, h: i32) -> Self {
        self.size = Size::from((w, h));
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = String::from(title);
        self
    }

    pub fn workspace(mut self, workspace: usize) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn minimized(mut self, minimized: bool) -> Self {
        self.minimized = minimized;
        self
    }
}

#[derive(Debug)]
struct TestIconState {
    icon: TestIcon,
    windows: Vec<TestWindow>,
    geometry: Rectangle<f64, Logical>,
}

#[derive(Debug)]
pub struct TestHost {
    windows: Vec<TestWindowParams>,
    /// Stacking order, bottom first.
    stack: Vec<TestWindow>,
    shown: Vec<TestWindow>,
    icons: Vec<TestIconState>,
    pub active_workspace: usize,
    pub overview_visible: bool,
    pub monitor: Rectangle<f64, Logical>,
    pub scale: f64,
    pub close_button_on_left: bool,
    pub input_region: Option<Rectangle<f64, Logical>>,
    log: Vec<String>,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            stack: Vec::new(),
            shown: Vec::new(),
            icons: Vec::new(),
            active_workspace: 0,
            overview_visible: false,
            monitor: Rectangle::new(Point::from((0., 0.)), Size::from((1920., 1080.))),
            scale: 1.,
            close_button_on_left: false,
            input_region: None,
            log: Vec::new(),
        }
    }

    pub fn add_window(&mut self, params: TestWindowParams) -> TestWindow {
        let window = TestWindow(params.id);
        self.windows.push(params);
        self.stack.push(window);
        window
    }

    pub fn remove_window(&mut self, window: TestWindow) {
        self.windows.retain(|w| w.id != window.0);
        self.stack.retain(|w| *w != window);
        for icon in &mut self.icons {
            icon.windows.retain(|w| *w != window);
        }
    }

    /// Adds a taskbar icon with its geometry along a bottom panel.
    pub fn add_icon(&mut self, id: u32, x: f64, windows: &[TestWindow]) -> TestIcon {
        let icon = TestIcon(id);
        let y = self.monitor.loc.y + self.monitor.size.h - 48.;
        self.icons.push(TestIconState {
            icon,
            windows: windows.to_vec(),
            geometry: Rectangle::new(Point::from((x, y)), Size::from((48., 48.))),
        });
        icon
    }

    pub fn set_icon_windows(&mut self, icon: TestIcon, windows: &[TestWindow]) {
        if let Some(state) = self.icons.iter_mut().find(|s| s.icon == icon) {
            state.windows = windows.to_vec();
        }
    }

    pub fn set_title(&mut self, window: TestWindow, title: &str) {
        if let Some(params) = self.params_mut(window) {
            params.title = String::from(title);
        }
    }

    pub fn stack(&self) -> &[TestWindow] {
        &self.stack
    }

    pub fn is_shown(&self, window: TestWindow) -> bool {
        self.shown.contains(&window)
    }

    /// Returns the recorded calls since the last time and forgets them.
    pub fn take_log(&mut self) -> String {
        let log = self.log.join("\n");
        self.log.clear();
        log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn params(&self, window: &TestWindow) -> Option<&TestWindowParams> {
        self.windows.iter().find(|w| w.id == window.0)
    }

    fn params_mut(&mut self, window: TestWindow) -> Option<&mut TestWindowParams> {
        self.windows.iter_mut().find(|w| w.id == window.0)
    }

    fn icon(&self, icon: &TestIcon) -> Option<&TestIconState> {
        self.icons.iter().find(|s| s.icon == *icon)
    }
}

impl PreviewHost for TestHost {
    type Window = TestWindow;
    type Workspace = usize;
    type Icon = TestIcon;

    fn window_size(&self, window: &TestWindow) -> Option<Size<i32, Logical>> {
        self.params(window).map(|p| p.size)
    }

    fn window_title(&self, window: &TestWindow) -> Option<String> {
        self.params(window).map(|p| p.title.clone())
    }

    fn window_workspace(&self, window: &TestWindow) -> Option<usize> {
        self.params(window).map(|p| p.workspace)
    }

    fn is_minimized(&self, window: &TestWindow) -> bool {
        self.params(window).is_some_and(|p| p.minimized)
    }

    fn set_window_shown(&mut self, window: &TestWindow, shown: bool) {
        self.log.push(format!("set shown {window} {shown}"));
        self.shown.retain(|w| w != window);
        if shown {
            self.shown.push(*window);
        }
    }

    fn activate_window(&mut self, window: &TestWindow) {
        self.log.push(format!("activate {window}"));
    }

    fn close_window(&mut self, window: &TestWindow) {
        self.log.push(format!("close {window}"));
    }

    fn window_stack(&self) -> Vec<TestWindow> {
        self.stack.clone()
    }

    fn raise_window(&mut self, window: &TestWindow) {
        self.log.push(format!("raise {window}"));
        self.stack.retain(|w| w != window);
        self.stack.push(*window);
    }

    fn restack_window(&mut self, window: &TestWindow, idx: usize) {
        self.log.push(format!("restack {window} at {idx}"));
        self.stack.retain(|w| w != window);
        let idx = idx.min(self.stack.len());
        self.stack.insert(idx, *window);
    }

    fn set_window_opacity(&mut self, window: &TestWindow, opacity: f64) {
        self.log.push(format!("opacity {window} {opacity:.2}"));
    }

    fn active_workspace(&self) -> usize {
        self.active_workspace
    }

    fn workspace_index(&self, workspace: &usize) -> usize {
        *workspace
    }

    fn activate_workspace(&mut self, workspace: &usize, immediate: bool) {
        self.log.push(format!("activate workspace {workspace} immediate={immediate}"));
        self.active_workspace = *workspace;
    }

    fn is_overview_visible(&self) -> bool {
        self.overview_visible
    }

    fn monitor_geometry(&self) -> Rectangle<f64, Logical> {
        self.monitor
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn close_button_on_left(&self) -> bool {
        self.close_button_on_left
    }

    fn set_input_region(&mut self, region: Option<Rectangle<f64, Logical>>) {
        if self.input_region != region {
            match region {
                Some(r) => self.log.push(format!(
                    "input region {}x{} at ({}, {})",
                    r.size.w, r.size.h, r.loc.x, r.loc.y
                )),
                None => self.log.push(String::from("input region cleared")),
            }
        }
        self.input_region = region;
    }

    fn icon_windows(&self, icon: &TestIcon) -> Vec<TestWindow> {
        self.icon(icon).map(|s| s.windows.clone()).unwrap_or_default()
    }

    fn icon_geometry(&self, icon: &TestIcon) -> Rectangle<f64, Logical> {
        self.icon(icon)
            .map(|s| s.geometry)
            .unwrap_or_else(|| Rectangle::new(Point::from((0., 0.)), Size::from((0., 0.))))
    }

    fn icon_app_name(&self, icon: &TestIcon) -> Option<String> {
        self.icon(icon).map(|s| format!("app-{}", s.icon.0))
    }

    fn compare_windows(&self, a: &TestWindow, b: &TestWindow) -> Ordering {
        a.0.cmp(&b.0)
    }
}

/// Installs a subscriber printing to the test output, honoring `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
