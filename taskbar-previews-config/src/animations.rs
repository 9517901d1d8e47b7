#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Animations {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument), default = 1.)]
    pub slowdown: f64,
    #[knuffel(child, default = Animation::default_menu_open())]
    pub menu_open: Animation,
    #[knuffel(child, default = Animation::default_menu_close())]
    pub menu_close: Animation,
    #[knuffel(child, default = Animation::default_menu_move())]
    pub menu_move: Animation,
    #[knuffel(child, default = Animation::default_preview())]
    pub preview: Animation,
    #[knuffel(child, default = Animation::default_peek_dim())]
    pub peek_dim: Animation,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            off: false,
            slowdown: 1.,
            menu_open: Animation::default_menu_open(),
            menu_close: Animation::default_menu_close(),
            menu_move: Animation::default_menu_move(),
            preview: Animation::default_preview(),
            peek_dim: Animation::default_peek_dim(),
        }
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument), default = 300)]
    pub duration_ms: u32,
    #[knuffel(child, unwrap(argument), default)]
    pub curve: Curve,
}

impl Animation {
    pub const fn new(duration_ms: u32, curve: Curve) -> Self {
        Self {
            off: false,
            duration_ms,
            curve,
        }
    }

    pub const fn default_menu_open() -> Self {
        Self::new(300, Curve::EaseInOutQuad)
    }

    pub const fn default_menu_close() -> Self {
        Self::new(300, Curve::EaseInCubic)
    }

    pub const fn default_menu_move() -> Self {
        Self::new(300, Curve::EaseInOutQuad)
    }

    pub const fn default_preview() -> Self {
        Self::new(300, Curve::EaseInOutQuad)
    }

    pub const fn default_peek_dim() -> Self {
        Self::new(300, Curve::EaseInOutQuad)
    }
}

#[derive(knuffel::DecodeScalar, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    EaseOutQuad,
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
}
