//! Colours, palette rotation and per-mode colour resolution.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::schema::DisplayMode;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Randomly perturb each channel by a normal sample with standard deviation `jitter`.
    pub fn jittered<R: Rng + ?Sized>(&self, rng: &mut R, jitter: f32) -> Color {
        if jitter <= 0.0 {
            return *self;
        }
        let Ok(normal) = Normal::new(0.0f32, jitter) else {
            return *self;
        };
        let mut shift = |channel: u8| {
            (f32::from(channel) + normal.sample(&mut *rng))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
        }
    }
}

/// Base colours handed to new selections in turn.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0xE6, 0x39, 0x46),
    Color::rgb(0xF4, 0xA2, 0x61),
    Color::rgb(0xE9, 0xC4, 0x6A),
    Color::rgb(0x2A, 0x9D, 0x8F),
    Color::rgb(0x26, 0x46, 0x53),
    Color::rgb(0x8E, 0x44, 0xAD),
    Color::rgb(0x3A, 0x86, 0xFF),
    Color::rgb(0x06, 0xD6, 0xA0),
];

/// Explicit colour rotation. Each engine owns its own sequence.
#[derive(Debug, Clone)]
pub struct ColorSequence {
    palette: Vec<Color>,
    index: usize,
}

impl ColorSequence {
    /// Rotate through `palette`; an empty palette falls back to `DEFAULT_PALETTE`.
    pub fn new(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self { palette, index: 0 }
    }

    /// Start the rotation at a given position.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.index = index % self.palette.len();
        self
    }

    pub fn next_color(&mut self) -> Color {
        let color = self.palette[self.index];
        self.index = (self.index + 1) % self.palette.len();
        color
    }
}

impl Default for ColorSequence {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec())
    }
}

/// Fixed colours used when resolving cell colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePalette {
    pub background: Color,
    pub life: Color,
    pub pattern: Color,
}

impl Default for ModePalette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            life: Color::rgb(0x7C, 0xFC, 0x00),
            pattern: Color::rgb(0x00, 0xBF, 0xFF),
        }
    }
}

/// What a cell is showing, per display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVariant {
    Automaton { active: bool },
    Pattern { active: bool },
    Growth { color: Option<Color> },
}

impl CellVariant {
    /// Blank cell for a mode.
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Life => CellVariant::Automaton { active: false },
            DisplayMode::LifeHash => CellVariant::Pattern { active: false },
            DisplayMode::Latix => CellVariant::Growth { color: None },
        }
    }

    pub fn is_active(&self) -> bool {
        match *self {
            CellVariant::Automaton { active } | CellVariant::Pattern { active } => active,
            CellVariant::Growth { color } => color.is_some(),
        }
    }

    /// Colour this cell should be drawn with.
    pub fn resolve_color(&self, palette: &ModePalette) -> Color {
        match *self {
            CellVariant::Automaton { active: true } => palette.life,
            CellVariant::Pattern { active: true } => palette.pattern,
            CellVariant::Growth { color: Some(color) } => color,
            _ => palette.background,
        }
    }
}
