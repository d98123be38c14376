use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    /// Usage colors for <50%, <85% and the rest.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" | "monochrome" => Self::mono(),
            _ => Self::dark(),
        }
    }

    pub fn usage_color(&self, percent: f64) -> Color {
        if percent < 50.0 {
            self.heat_colors[0]
        } else if percent < 85.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[2]
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            heat_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            status_err: Color::Red,
            statusbar_bg: Color::Rgb(220, 220, 220),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            heat_colors: [
                Color::Rgb(60, 160, 60),
                Color::Rgb(220, 140, 40),
                Color::Rgb(200, 60, 60),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            status_err: Color::White,
            statusbar_bg: Color::Black,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::Black,
            heat_colors: [Color::Gray, Color::White, Color::White],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(Theme::from_config("solarized").name, "dark");
        assert_eq!(Theme::from_config("LIGHT").name, "light");
    }

    #[test]
    fn usage_color_steps_at_thresholds() {
        let theme = Theme::dark();
        assert_eq!(theme.usage_color(10.0), theme.heat_colors[0]);
        assert_eq!(theme.usage_color(50.0), theme.heat_colors[1]);
        assert_eq!(theme.usage_color(99.0), theme.heat_colors[2]);
    }
}
