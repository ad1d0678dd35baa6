use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub table_header_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    /// Memory share colors: low, moderate, heavy.
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

    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::mono(),
            _ => Self::dark(),
        }
    }

    /// Color for a memory percentage cell.
    pub fn heat_color(&self, memory_percent: f64) -> Color {
        if memory_percent >= 10.0 {
            self.heat_colors[2]
        } else if memory_percent >= 2.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            table_header_fg: Color::Green,
            selection_bg: Color::Cyan,
            selection_fg: Color::Black,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            heat_colors: [
                Color::Rgb(148, 163, 184),
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
            status_ok: Color::Rgb(0, 120, 0),
            status_err: Color::Red,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            table_header_fg: Color::Blue,
            selection_bg: Color::Rgb(70, 130, 180),
            selection_fg: Color::White,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            heat_colors: [
                Color::Rgb(90, 90, 90),
                Color::Rgb(200, 120, 0),
                Color::Rgb(200, 40, 40),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            status_ok: Color::White,
            status_err: Color::White,
            statusbar_bg: Color::Black,
            overlay_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            table_header_fg: Color::White,
            selection_bg: Color::White,
            selection_fg: Color::Black,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::Gray,
            surface_bg: Color::Black,
            gauge_filled: Color::White,
            gauge_unfilled: Color::Black,
            heat_colors: [Color::Gray, Color::White, Color::White],
        }
    }
}
