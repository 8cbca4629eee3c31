// src/ui.rs
use iced::widget::{button, container};
use iced::{Background, Color, Theme, Vector};
use once_cell::sync::Lazy;

pub struct Styles {
    pub window_bg: Color,
    pub drop_zone_bg: Color,
    pub text: Color,
    pub muted: Color,
    pub browse_bg: Color,
    pub browse_hover: Color,
    pub convert_bg: Color,
    pub convert_hover: Color,
    pub disabled_bg: Color,
    pub status_bg: Color,
}

pub static PALETTE: Lazy<Styles> = Lazy::new(|| Styles {
    window_bg: Color::from_rgb8(0x2C, 0x3E, 0x50),
    drop_zone_bg: Color::from_rgb8(0x34, 0x49, 0x5E),
    text: Color::from_rgb8(0xEC, 0xF0, 0xF1),
    muted: Color::from_rgb8(0xBD, 0xC3, 0xC7),
    browse_bg: Color::from_rgb8(0x34, 0x98, 0xDB),
    browse_hover: Color::from_rgb8(0x29, 0x80, 0xB9),
    convert_bg: Color::from_rgb8(0x27, 0xAE, 0x60),
    convert_hover: Color::from_rgb8(0x22, 0x99, 0x54),
    disabled_bg: Color::from_rgb8(0x5D, 0x6D, 0x7E),
    status_bg: Color::from_rgb8(0x1C, 0x28, 0x33),
});

/// Tone of the status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Working,
    Success,
    Error,
}

impl StatusKind {
    pub fn color(self) -> Color {
        match self {
            StatusKind::Info => PALETTE.text,
            StatusKind::Working => Color::from_rgb8(0xF1, 0xC4, 0x0F),
            StatusKind::Success => Color::from_rgb8(0x2E, 0xCC, 0x71),
            StatusKind::Error => Color::from_rgb8(0xE7, 0x4C, 0x3C),
        }
    }
}

pub struct ContainerStyle {
    pub bg: Color,
    pub border: Option<Color>,
}

impl ContainerStyle {
    pub fn plain(bg: Color) -> Self {
        ContainerStyle { bg, border: None }
    }
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(PALETTE.text),
            background: Some(Background::Color(self.bg)),
            border_radius: 0.0.into(),
            border_width: if self.border.is_some() { 2.0 } else { 0.0 },
            border_color: self.border.unwrap_or(Color::TRANSPARENT),
        }
    }
}

pub struct ButtonStyle {
    pub bg: Color,
    pub fg: Color,
    pub hover_bg: Color,
}

impl ButtonStyle {
    pub fn browse() -> Self {
        ButtonStyle {
            bg: PALETTE.browse_bg,
            fg: PALETTE.text,
            hover_bg: PALETTE.browse_hover,
        }
    }

    pub fn convert() -> Self {
        ButtonStyle {
            bg: PALETTE.convert_bg,
            fg: PALETTE.text,
            hover_bg: PALETTE.convert_hover,
        }
    }
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 0.0.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            text_color: self.fg,
            shadow_offset: Vector::new(0.0, 0.0),
            ..button::Appearance::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }

    fn pressed(&self, style: &Self::Style) -> button::Appearance {
        self.hovered(style)
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(PALETTE.disabled_bg)),
            text_color: PALETTE.muted,
            ..self.active(style)
        }
    }
}
