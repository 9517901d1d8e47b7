use crate::appearance::{Color, FontWeight};

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct WindowPreviews {
    /// Height of a preview in a horizontal panel, width in a vertical one.
    #[knuffel(child, unwrap(argument), default = Self::default().size)]
    pub size: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().padding)]
    pub padding: u16,
    #[knuffel(child)]
    pub hide_title: bool,
    #[knuffel(child, default)]
    pub title_font: TitleFont,
    /// Hover time before the popup opens.
    #[knuffel(child, unwrap(argument), default = Self::default().open_delay_ms)]
    pub open_delay_ms: u32,
    /// Time after the pointer leaves before the popup closes.
    #[knuffel(child, unwrap(argument), default = Self::default().close_delay_ms)]
    pub close_delay_ms: u32,
    #[knuffel(child)]
    pub middle_click_close: bool,
    #[knuffel(child, default)]
    pub peek: Peek,
}

impl Default for WindowPreviews {
    fn default() -> Self {
        Self {
            size: 240,
            padding: 8,
            hide_title: false,
            title_font: TitleFont::default(),
            open_delay_ms: 400,
            close_delay_ms: 400,
            middle_click_close: false,
            peek: Peek::default(),
        }
    }
}

impl WindowPreviews {
    pub fn show_title(&self) -> bool {
        !self.hide_title
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct TitleFont {
    #[knuffel(child, unwrap(argument), default = Color::default_title())]
    pub color: Color,
    #[knuffel(child, unwrap(argument), default = Self::default().size)]
    pub size: u16,
    #[knuffel(child, unwrap(argument), default)]
    pub weight: FontWeight,
}

impl Default for TitleFont {
    fn default() -> Self {
        Self {
            color: Color::default_title(),
            size: 14,
            weight: FontWeight::Bold,
        }
    }
}

/// Peeking at a window by focusing its preview.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peek {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument), default = Self::default().enter_delay_ms)]
    pub enter_delay_ms: u32,
    /// Opacity of the other windows while peeking, from 0 to 255.
    #[knuffel(child, unwrap(argument), default = Self::default().opacity)]
    pub opacity: u8,
}

impl Default for Peek {
    fn default() -> Self {
        Self {
            off: false,
            enter_delay_ms: 500,
            opacity: 40,
        }
    }
}
