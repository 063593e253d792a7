use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Source of the light/dark preference. The core only asks for a toggle.
pub trait ThemeProvider {
    fn mode(&self) -> ThemeMode;
    fn set_mode(&mut self, mode: ThemeMode);

    fn toggle(&mut self) -> ThemeMode {
        let next = self.mode().toggled();
        self.set_mode(next);
        next
    }
}

/// Keeps the preference for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct SessionTheme {
    mode: ThemeMode,
}

impl ThemeProvider for SessionTheme {
    fn mode(&self) -> ThemeMode {
        self.mode
    }

    fn set_mode(&mut self, mode: ThemeMode) {
        self.mode = mode;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub background: Color,
    pub accent: Color,
    pub muted: Color,
    pub selection: Color,
    pub error: Color,
    pub status_bg: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                text: Color::White,
                background: Color::Black,
                accent: Color::Cyan,
                muted: Color::Gray,
                selection: Color::Yellow,
                error: Color::LightRed,
                status_bg: Color::DarkGray,
            },
            ThemeMode::Light => Self {
                text: Color::Black,
                background: Color::White,
                accent: Color::Blue,
                muted: Color::DarkGray,
                selection: Color::Magenta,
                error: Color::Red,
                status_bg: Color::Gray,
            },
        }
    }
}
