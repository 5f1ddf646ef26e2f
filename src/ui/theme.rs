use ratatui::style::{Color, Modifier, Style};

use crate::models::Theme;

/// Catppuccin colours for one flavour.
pub(crate) struct Palette {
    pub(crate) header_bg: Color,
    pub(crate) header_fg: Color,
    pub(crate) accent: Color,
    pub(crate) green: Color,
    pub(crate) red: Color,
    pub(crate) yellow: Color,
    pub(crate) surface: Color,
    pub(crate) text: Color,
    pub(crate) text_dim: Color,
    pub(crate) overlay: Color,
    pub(crate) command_bg: Color,
}

/// Mocha.
pub(crate) const DARK: Palette = Palette {
    header_bg: Color::Rgb(30, 30, 46),
    header_fg: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(137, 180, 250),
    green: Color::Rgb(166, 227, 161),
    red: Color::Rgb(243, 139, 168),
    yellow: Color::Rgb(249, 226, 175),
    surface: Color::Rgb(49, 50, 68),
    text: Color::Rgb(205, 214, 244),
    text_dim: Color::Rgb(127, 132, 156),
    overlay: Color::Rgb(69, 71, 90),
    command_bg: Color::Rgb(24, 24, 37),
};

/// Latte.
pub(crate) const LIGHT: Palette = Palette {
    header_bg: Color::Rgb(239, 241, 245),
    header_fg: Color::Rgb(76, 79, 105),
    accent: Color::Rgb(30, 102, 245),
    green: Color::Rgb(64, 160, 43),
    red: Color::Rgb(210, 15, 57),
    yellow: Color::Rgb(223, 142, 29),
    surface: Color::Rgb(204, 208, 218),
    text: Color::Rgb(76, 79, 105),
    text_dim: Color::Rgb(140, 143, 161),
    overlay: Color::Rgb(156, 160, 176),
    command_bg: Color::Rgb(230, 233, 239),
};

/// Terminals give no reliable way to detect their background, so `Auto`
/// uses the dark flavour.
pub(crate) fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark | Theme::Auto => &DARK,
    }
}

impl Palette {
    pub(crate) fn header(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selected(&self) -> Style {
        Style::default().fg(self.header_bg).bg(self.accent)
    }

    pub(crate) fn normal(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub(crate) fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub(crate) fn enabled(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub(crate) fn disabled(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub(crate) fn group(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn title(&self, focused: bool) -> Style {
        Style::default()
            .fg(if focused { self.accent } else { self.text_dim })
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.overlay })
    }

    pub(crate) fn command_bar(&self) -> Style {
        Style::default().fg(self.text).bg(self.command_bg)
    }

    pub(crate) fn status_bar(&self) -> Style {
        Style::default().fg(self.text_dim).bg(self.surface)
    }
}
