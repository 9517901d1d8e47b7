/// Screen edge the panel is attached to.
#[derive(knuffel::DecodeScalar, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl PanelPosition {
    /// Whether the panel runs along a vertical screen edge.
    pub fn is_vertical(self) -> bool {
        matches!(self, PanelPosition::Left | PanelPosition::Right)
    }

    /// Whether the panel sits at the start of its axis (top or left edge).
    pub fn is_leading(self) -> bool {
        matches!(self, PanelPosition::Top | PanelPosition::Left)
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    #[knuffel(child, unwrap(argument), default)]
    pub position: PanelPosition,
    /// Thickness of the panel in logical pixels.
    #[knuffel(child, unwrap(argument), default = Self::default().size)]
    pub size: u16,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            position: PanelPosition::Bottom,
            size: 48,
        }
    }
}
