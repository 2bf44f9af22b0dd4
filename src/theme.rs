use ratatui::style::Color;
use std::env;

use crate::store::PreferenceStore;

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => ThemePreference::Light,
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::System,
        }
    }

    fn concrete(self) -> Option<EffectiveTheme> {
        match self {
            ThemePreference::Light => Some(EffectiveTheme::Light),
            ThemePreference::Dark => Some(EffectiveTheme::Dark),
            ThemePreference::System => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn opposite(self) -> Self {
        match self {
            EffectiveTheme::Light => EffectiveTheme::Dark,
            EffectiveTheme::Dark => EffectiveTheme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            EffectiveTheme::Light => Palette {
                background: Color::Rgb(250, 250, 250),
                text: Color::Black,
                muted: Color::Rgb(110, 110, 110),
                accent: Color::Rgb(30, 120, 220),
                highlight: Color::Rgb(255, 181, 92),
                key: Color::Rgb(150, 150, 150),
                chip_saturation: 0.65,
                chip_lightness: 0.38,
            },
            EffectiveTheme::Dark => Palette {
                background: Color::Rgb(24, 26, 31),
                text: Color::Rgb(230, 230, 230),
                muted: Color::Rgb(140, 140, 140),
                accent: Color::Rgb(72, 166, 255),
                highlight: Color::Rgb(255, 181, 92),
                key: Color::Rgb(150, 150, 150),
                chip_saturation: 0.6,
                chip_lightness: 0.62,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub key: Color,
    pub chip_saturation: f32,
    pub chip_lightness: f32,
}

impl Palette {
    /// Stable per-tag hue, shaded to stay readable on this palette's background.
    pub fn tag_color(&self, tag: &str) -> Color {
        let hash = tag
            .bytes()
            .fold(0x811c_9dc5u32, |acc, byte| (acc ^ byte as u32).wrapping_mul(0x0100_0193));
        let hue = (hash % 360) as f32;
        let (r, g, b) = hsl_to_rgb(hue, self.chip_saturation, self.chip_lightness);
        Color::Rgb(r, g, b)
    }
}

fn hsl_to_rgb(hue: f32, sat: f32, light: f32) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * light - 1.0).abs()) * sat;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };
    let base = light - chroma / 2.0;
    let channel = |value: f32| ((value + base) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// Light/dark/system state machine backed by a preference store.
///
/// The platform signal is sampled once, when the controller is activated.
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    prefers_dark: bool,
    preference: ThemePreference,
    effective: EffectiveTheme,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn activate(store: S, prefers_dark: bool) -> Self {
        let stored = store.get(THEME_KEY);
        let preference = ThemePreference::from_stored(stored.as_deref());
        let mut controller = Self {
            store,
            prefers_dark,
            preference,
            effective: EffectiveTheme::Light,
        };
        controller.apply(preference);
        controller
    }

    pub fn apply(&mut self, preference: ThemePreference) {
        let result = match preference.concrete() {
            Some(effective) => {
                self.effective = effective;
                self.store.set(THEME_KEY, preference.label())
            }
            None => {
                self.effective = if self.prefers_dark {
                    EffectiveTheme::Dark
                } else {
                    EffectiveTheme::Light
                };
                self.store.remove(THEME_KEY)
            }
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to persist theme preference");
        }
        self.preference = preference;
        tracing::debug!(
            preference = preference.label(),
            effective = ?self.effective,
            "theme applied"
        );
    }

    /// Flips between light and dark. System is never a target.
    pub fn toggle(&mut self) -> EffectiveTheme {
        let next = match self.effective.opposite() {
            EffectiveTheme::Light => ThemePreference::Light,
            EffectiveTheme::Dark => ThemePreference::Dark,
        };
        self.apply(next);
        self.effective
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn effective(&self) -> EffectiveTheme {
        self.effective
    }

    /// Icon for the action on offer, not the current state.
    pub fn indicator(&self) -> &'static str {
        match self.effective {
            EffectiveTheme::Dark => "☀",
            EffectiveTheme::Light => "🌙",
        }
    }

    pub fn palette(&self) -> Palette {
        self.effective.palette()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

pub fn detect_prefers_dark(fallback: bool) -> bool {
    prefers_dark_from(
        env::var("FOLIO_COLOR_SCHEME").ok().as_deref(),
        env::var("COLORFGBG").ok().as_deref(),
        fallback,
    )
}

fn prefers_dark_from(scheme: Option<&str>, colorfgbg: Option<&str>, fallback: bool) -> bool {
    match scheme.map(|value| value.trim().to_lowercase()).as_deref() {
        Some("dark") => return true,
        Some("light") => return false,
        _ => {}
    }
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|value| value.trim().parse::<u8>().ok());
    match background {
        Some(index) => index <= 6 || index == 8,
        None => fallback,
    }
}
