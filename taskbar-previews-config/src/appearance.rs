use std::str::FromStr;

use knuffel::errors::DecodeError;
use miette::IntoDiagnostic as _;

/// RGB color in [0, 1] with unpremultiplied alpha.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new_unpremul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8_unpremul(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_array_unpremul([r, g, b, a].map(|c| f32::from(c) / 255.))
    }

    /// Default window title color.
    pub fn default_title() -> Self {
        Self::from_rgba8_unpremul(0xdd, 0xdd, 0xdd, 0xff)
    }

    pub fn from_array_unpremul([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array_unpremul(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Formats the color as a `#rrggbbaa` hex string.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_array_unpremul().map(|c| (c.clamp(0., 1.) * 255.).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl FromStr for Color {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = csscolorparser::parse(s).into_diagnostic()?.to_array();
        Ok(Self::from_array_unpremul(color))
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for Color {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Color, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) => match Color::from_str(s) {
                Ok(color) => Ok(color),
                Err(err) => {
                    ctx.emit_error(DecodeError::unexpected(
                        val,
                        "color",
                        format!("invalid color {s:?}: {err}"),
                    ));
                    Ok(Color::default())
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(val, "colors must be strings"));
                Ok(Color::default())
            }
        }
    }
}

/// Weight of the window title font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
    Lighter,
    Bolder,
    /// Numeric CSS weight, 100 to 900.
    Numeric(u16),
}

impl FontWeight {
    /// Returns the weight in CSS notation.
    pub fn to_css(self) -> String {
        match self {
            FontWeight::Normal => String::from("normal"),
            FontWeight::Bold => String::from("bold"),
            FontWeight::Lighter => String::from("lighter"),
            FontWeight::Bolder => String::from("bolder"),
            FontWeight::Numeric(weight) => weight.to_string(),
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            "lighter" => Ok(Self::Lighter),
            "bolder" => Ok(Self::Bolder),
            _ => match s.parse::<u16>() {
                Ok(weight) if (100..=900).contains(&weight) && weight % 100 == 0 => {
                    Ok(Self::Numeric(weight))
                }
                _ => Err(format!(
                    "expected normal, bold, lighter, bolder or a multiple of 100 \
                     between 100 and 900, got {s:?}"
                )),
            },
        }
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for FontWeight {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<FontWeight, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) => match s.parse() {
                Ok(weight) => Ok(weight),
                Err(msg) => {
                    ctx.emit_error(DecodeError::unexpected(val, "font weight", msg));
                    Ok(FontWeight::default())
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "font weights must be strings",
                ));
                Ok(FontWeight::default())
            }
        }
    }
}
