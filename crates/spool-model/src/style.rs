//! Cell styles.
//!
//! A [`Style`] is a record of optional attributes. The engine only forwards
//! style ids from fields to cells; renderers interpret the attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl HorizontalAlign {
    pub const ALL: [HorizontalAlign; 4] = [
        HorizontalAlign::Left,
        HorizontalAlign::Center,
        HorizontalAlign::Right,
        HorizontalAlign::Justify,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
            HorizontalAlign::Justify => "justify",
        }
    }
}

/// Vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Bottom,
    Center,
    Justify,
}

impl VerticalAlign {
    pub const ALL: [VerticalAlign; 4] = [
        VerticalAlign::Top,
        VerticalAlign::Bottom,
        VerticalAlign::Center,
        VerticalAlign::Justify,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Bottom => "bottom",
            VerticalAlign::Center => "center",
            VerticalAlign::Justify => "justify",
        }
    }
}

/// Border line styles, numbered as spreadsheet border indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Border {
    NoLine = 0,
    Thin = 1,
    Medium = 2,
    Dashed = 3,
    Dotted = 4,
    Thick = 5,
    Double = 6,
    Hair = 7,
    MediumDashed = 8,
    ThinDashDotted = 9,
    MediumDashDotted = 10,
    ThinDashDotDotted = 11,
    MediumDashDotDotted = 12,
    SlantedMediumDashDotted = 13,
}

impl Border {
    pub const ALL: [Border; 14] = [
        Border::NoLine,
        Border::Thin,
        Border::Medium,
        Border::Dashed,
        Border::Dotted,
        Border::Thick,
        Border::Double,
        Border::Hair,
        Border::MediumDashed,
        Border::ThinDashDotted,
        Border::MediumDashDotted,
        Border::ThinDashDotDotted,
        Border::MediumDashDotDotted,
        Border::SlantedMediumDashDotted,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Border::NoLine => "no_line",
            Border::Thin => "thin",
            Border::Medium => "medium",
            Border::Dashed => "dashed",
            Border::Dotted => "dotted",
            Border::Thick => "thick",
            Border::Double => "double",
            Border::Hair => "hair",
            Border::MediumDashed => "medium_dashed",
            Border::ThinDashDotted => "thin_dash_dotted",
            Border::MediumDashDotted => "medium_dash_dotted",
            Border::ThinDashDotDotted => "thin_dash_dot_dotted",
            Border::MediumDashDotDotted => "medium_dash_dot_dotted",
            Border::SlantedMediumDashDotted => "slanted_medium_dash_dotted",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Named palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Black,
    Blue,
    Brown,
    Cyan,
    Gray,
    Green,
    Lime,
    Magenta,
    Navy,
    Orange,
    Pink,
    Purple,
    Red,
    Silver,
    White,
    Yellow,
}

impl ColorName {
    pub const ALL: [ColorName; 16] = [
        ColorName::Black,
        ColorName::Blue,
        ColorName::Brown,
        ColorName::Cyan,
        ColorName::Gray,
        ColorName::Green,
        ColorName::Lime,
        ColorName::Magenta,
        ColorName::Navy,
        ColorName::Orange,
        ColorName::Pink,
        ColorName::Purple,
        ColorName::Red,
        ColorName::Silver,
        ColorName::White,
        ColorName::Yellow,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            ColorName::Black => "black",
            ColorName::Blue => "blue",
            ColorName::Brown => "brown",
            ColorName::Cyan => "cyan",
            ColorName::Gray => "gray",
            ColorName::Green => "green",
            ColorName::Lime => "lime",
            ColorName::Magenta => "magenta",
            ColorName::Navy => "navy",
            ColorName::Orange => "orange",
            ColorName::Pink => "pink",
            ColorName::Purple => "purple",
            ColorName::Red => "red",
            ColorName::Silver => "silver",
            ColorName::White => "white",
            ColorName::Yellow => "yellow",
        }
    }

    /// `0xRRGGBB` value of the palette entry.
    pub fn rgb(self) -> u32 {
        match self {
            ColorName::Black => 0x000000,
            ColorName::Blue => 0x0000FF,
            ColorName::Brown => 0x800000,
            ColorName::Cyan => 0x00FFFF,
            ColorName::Gray => 0x808080,
            ColorName::Green => 0x008000,
            ColorName::Lime => 0x00FF00,
            ColorName::Magenta => 0xFF00FF,
            ColorName::Navy => 0x000080,
            ColorName::Orange => 0xFF6600,
            ColorName::Pink => 0xFF00FF,
            ColorName::Purple => 0x800080,
            ColorName::Red => 0xFF0000,
            ColorName::Silver => 0xC0C0C0,
            ColorName::White => 0xFFFFFF,
            ColorName::Yellow => 0xFFFF00,
        }
    }
}

/// A palette name or a `#RRGGBB` code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(ColorName),
    Rgb(String),
}

impl Color {
    /// `0xRRGGBB` value, `None` for a malformed code.
    pub fn rgb(&self) -> Option<u32> {
        match self {
            Color::Named(name) => Some(name.rgb()),
            Color::Rgb(code) => u32::from_str_radix(code.trim_start_matches('#'), 16).ok(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name) => f.write_str(name.keyword()),
            Color::Rgb(code) => f.write_str(code),
        }
    }
}

/// Named set of cell formatting attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<HorizontalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<Color>,
    pub unlocked: bool,
    pub hidden: bool,
    pub wrap: bool,
    pub shrink: bool,
}

impl Style {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attributes that are set, as `(name, value)` pairs in declaration order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(format) = &self.num_format {
            out.push(("num_format", format!("\"{format}\"")));
        }
        if let Some(font) = &self.font_name {
            out.push(("font_name", format!("\"{font}\"")));
        }
        if let Some(size) = self.font_size {
            out.push(("font_size", size.to_string()));
        }
        let flags = [
            ("bold", self.bold),
            ("italic", self.italic),
            ("underline", self.underline),
            ("strikeout", self.strikeout),
        ];
        out.extend(flags.into_iter().filter(|(_, on)| *on).map(|(name, _)| (name, "true".to_string())));
        if let Some(align) = self.align {
            out.push(("align", align.keyword().to_string()));
        }
        if let Some(valign) = self.valign {
            out.push(("valign", valign.keyword().to_string()));
        }
        if let Some(border) = self.border {
            out.push(("border", border.keyword().to_string()));
        }
        for (name, color) in [
            ("border_color", &self.border_color),
            ("background", &self.background),
            ("font_color", &self.font_color),
        ] {
            if let Some(color) = color {
                out.push((name, color.to_string()));
            }
        }
        let flags = [
            ("unlocked", self.unlocked),
            ("hidden", self.hidden),
            ("wrap", self.wrap),
            ("shrink", self.shrink),
        ];
        out.extend(flags.into_iter().filter(|(_, on)| *on).map(|(name, _)| (name, "true".to_string())));
        out
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "style {}", self.id)?;
        for (name, value) in self.attributes() {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_indices_follow_declaration() {
        for (index, border) in Border::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(border.index()), index);
        }
    }

    #[test]
    fn lists_only_set_attributes() {
        let style = Style {
            bold: true,
            border: Some(Border::Thin),
            background: Some(Color::Rgb("#AABB11".into())),
            ..Style::new("total")
        };
        assert_eq!(
            style.to_string(),
            "style total bold=true border=thin background=#AABB11"
        );
        assert_eq!(Color::Rgb("#AABB11".into()).rgb(), Some(0xAABB11));
    }
}
