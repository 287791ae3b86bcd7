//! Gestione dei temi per l'interfaccia utente (TUI)
//!
//! Il verde è il colore di evidenziazione delle sorgenti selezionate in tutti i temi.

use cursive::theme::{BaseColor, BorderStyle, Color, Palette, PaletteColor, Theme};

/// Temi disponibili
pub const AVAILABLE_THEMES: [&str; 3] = ["default", "dark", "high_contrast"];

/// Costruisce un tema a partire dai colori principali
fn build_theme(background: Color, primary: Color, accent: Color, secondary: Color, borders: BorderStyle) -> Theme {
    let mut palette = Palette::default();

    palette[PaletteColor::Background] = background;
    palette[PaletteColor::View] = background;
    palette[PaletteColor::Primary] = primary;

    // Titoli ed elementi evidenziati
    palette[PaletteColor::TitlePrimary] = accent;
    palette[PaletteColor::Highlight] = accent;
    palette[PaletteColor::Secondary] = secondary;
    palette[PaletteColor::HighlightInactive] = secondary;

    let mut theme = Theme::default();
    theme.shadow = false;
    theme.borders = borders;
    theme.palette = palette;

    theme
}

/// Tema di default, rispetta i colori del terminale
pub fn default_theme() -> Theme {
    build_theme(
        Color::TerminalDefault,
        Color::Dark(BaseColor::White),
        Color::Dark(BaseColor::Green),
        Color::Dark(BaseColor::Blue),
        BorderStyle::Simple,
    )
}

/// Tema dark mode
pub fn dark_theme() -> Theme {
    build_theme(
        Color::Dark(BaseColor::Black),
        Color::Light(BaseColor::White),
        Color::Light(BaseColor::Green),
        Color::Light(BaseColor::Blue),
        BorderStyle::Simple,
    )
}

/// Tema high contrast
pub fn high_contrast_theme() -> Theme {
    build_theme(
        Color::Dark(BaseColor::Black),
        Color::Light(BaseColor::White),
        Color::Light(BaseColor::Yellow),
        Color::Light(BaseColor::White),
        BorderStyle::Outset,
    )
}

/// Ottiene un tema in base al nome; i nomi sconosciuti usano il default
pub fn get_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "dark" => dark_theme(),
        "high_contrast" => high_contrast_theme(),
        _ => default_theme(),
    }
}
