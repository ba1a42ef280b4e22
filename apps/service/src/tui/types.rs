use ratatui::style::Color;

/// Colour scheme, toggled with `d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colours used by every pane
pub struct Palette {
    pub brand: Color,
    pub label: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub up: Color,
    pub down: Color,
    pub pending: Color,
    pub background: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                brand: Color::Magenta,
                label: Color::Gray,
                text: Color::White,
                muted: Color::DarkGray,
                border: Color::Cyan,
                up: Color::Green,
                down: Color::Red,
                pending: Color::Yellow,
                background: Color::Reset,
            },
            Theme::Light => Palette {
                brand: Color::Blue,
                label: Color::DarkGray,
                text: Color::Black,
                muted: Color::Gray,
                border: Color::Blue,
                up: Color::Green,
                down: Color::Red,
                pending: Color::Rgb(180, 120, 0),
                background: Color::White,
            },
        }
    }
}
