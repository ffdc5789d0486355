//! Colors used by the tag indicators.
//!
//! [`Palette::default`] is a neutral white/grey theme.  With an accent
//! color configured, [`Palette::from_accent`] tints the occupied and vacant
//! greys toward the accent and uses the accent itself for the active
//! highlight.  A palette is derived once per session.

use std::fmt;
use std::str::FromStr;

/// Default share of the accent mixed into the base greys.
pub const DEFAULT_TINT_STRENGTH: f64 = 0.35;

/// Base grey of an occupied tag label.
const OCCUPIED_GREY: u8 = 0xff;
/// Base grey of a vacant tag label.
const VACANT_GREY: u8 = 0x88;

/// Alpha values of the focused / unfocused variants.
const OPAQUE: u8 = 0xff;
const DIMMED: u8 = 0x80;
const VACANT_DIMMED: u8 = 0x40;
const ACTIVE_BG_FOCUSED: u8 = 0x40;
const ACTIVE_BG_UNFOCUSED: u8 = 0x20;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A string that is not `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
pub struct ColorError(String);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: OPAQUE }
    }

    pub const fn grey(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Each channel divided by the brightest channel, so the dominant
    /// channel is `1.0`.  Black yields `[1.0; 3]` (no hue to carry over).
    pub fn channel_ratios(&self) -> [f64; 3] {
        let max = self.r.max(self.g).max(self.b);
        if max == 0 {
            return [1.0; 3];
        }
        let max = max as f64;
        [self.r as f64 / max, self.g as f64 / max, self.b as f64 / max]
    }

    /// Tint a grey of brightness `base` toward the hue of `self`.
    ///
    /// Every channel becomes `base * ((1 - strength) + strength * ratio)`,
    /// so `strength == 0` returns the grey unchanged and `strength == 1`
    /// scales the grey by the accent's channel ratios.
    pub fn tint_grey(&self, base: u8, strength: f64) -> Color {
        let strength = strength.clamp(0.0, 1.0);
        let [r, g, b] = self.channel_ratios();
        let mix = |ratio: f64| -> u8 {
            let v = base as f64 * ((1.0 - strength) + strength * ratio);
            v.round().clamp(0.0, 255.0) as u8
        };
        Color::rgb(mix(r), mix(g), mix(b))
    }
}

impl fmt::Display for Color {
    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != OPAQUE {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Color {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: if hex.len() == 8 { byte(6)? } else { OPAQUE },
        })
    }
}

/// One visual family: the color used on the focused display and the
/// reduced-opacity variant used elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade {
    pub focused: Color,
    pub unfocused: Color,
}

impl Shade {
    pub fn pick(&self, focused: bool) -> Color {
        if focused {
            self.focused
        } else {
            self.unfocused
        }
    }
}

/// Session-wide colors for every tag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub active_label: Shade,
    pub active_background: Shade,
    pub occupied_label: Shade,
    pub vacant_label: Shade,
    /// Border drawn around the active tag of the focused display.  The
    /// default theme has none.
    pub indicator: Option<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        let white = Color::grey(0xff);
        let grey = Color::grey(VACANT_GREY);
        Self {
            active_label: Shade {
                focused: white,
                unfocused: white.with_alpha(DIMMED),
            },
            active_background: Shade {
                focused: white.with_alpha(ACTIVE_BG_FOCUSED),
                unfocused: white.with_alpha(ACTIVE_BG_UNFOCUSED),
            },
            occupied_label: Shade {
                focused: white,
                unfocused: white.with_alpha(DIMMED),
            },
            vacant_label: Shade {
                focused: grey,
                unfocused: grey.with_alpha(VACANT_DIMMED),
            },
            indicator: None,
        }
    }
}

impl Palette {
    /// Derive a palette from an accent color.
    ///
    /// Occupied and vacant labels are the default greys tinted by
    /// `strength`; the active background and indicator use the accent.
    pub fn from_accent(accent: Color, strength: f64) -> Self {
        let base = Self::default();
        let occupied = accent.tint_grey(OCCUPIED_GREY, strength);
        let vacant = accent.tint_grey(VACANT_GREY, strength);
        let accent = accent.with_alpha(OPAQUE);
        Self {
            active_background: Shade {
                focused: accent.with_alpha(ACTIVE_BG_FOCUSED),
                unfocused: accent.with_alpha(ACTIVE_BG_UNFOCUSED),
            },
            occupied_label: Shade {
                focused: occupied,
                unfocused: occupied.with_alpha(DIMMED),
            },
            vacant_label: Shade {
                focused: vacant,
                unfocused: vacant.with_alpha(VACANT_DIMMED),
            },
            indicator: Some(accent),
            ..base
        }
    }
}
