//! Tunable thresholds of the assembly heuristics
//!
//! Every distance is an interline [`Fraction`], converted to pixels with the
//! page [`Scale`](crate::glyph::Scale). The configuration can be loaded from
//! TOML, each section and field falling back to its default.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::glyph::Fraction;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How the reference abscissa of a time slot is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Abscissa of the stem that created the slot
    #[default]
    Stem,
    /// Mean location of every note head in the slot
    Head,
}

/// Time slot building
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub policy: SlotPolicy,
    /// Maximum horizontal distance between a slot and a glyph joining it
    pub max_dx: Fraction,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            policy: SlotPolicy::Stem,
            max_dx: Fraction(1.25),
        }
    }
}

/// Chord lookup and notation placement
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Shift applied to a point before looking for its chord (half a head)
    pub head_shift: Fraction,
    /// Maximum vertical distance between an articulation and its chord
    pub articulation_max_dy: Fraction,
    /// Shift from an arpeggiato to the chords it applies to
    pub arpeggiate_shift: Fraction,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            head_shift: Fraction(0.5),
            articulation_max_dy: Fraction(4.0),
            arpeggiate_shift: Fraction(1.5),
        }
    }
}

/// Beam pack decomposition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Maximum realistic slope of a beam glyph line
    pub max_slope: f64,
    /// Maximum horizontal gap between two items of the same beam
    pub join_dx: Fraction,
    /// Maximum vertical gap between two items of the same beam
    pub join_dy: Fraction,
    /// Maximum vertical distance between a beam line and a stem tail
    pub stem_dy: Fraction,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            max_slope: 1.0,
            join_dx: Fraction(0.5),
            join_dy: Fraction(0.5),
            stem_dy: Fraction(0.75),
        }
    }
}

/// Barline component assignment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarlineConfig {
    /// Maximum horizontal distance between a component and the measure edge
    pub max_dx: Fraction,
}

impl Default for BarlineConfig {
    fn default() -> Self {
        Self {
            max_dx: Fraction(2.0),
        }
    }
}

/// Dynamics accretion
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    pub merge_dx: Fraction,
    pub merge_dy: Fraction,
    /// Register dynamics as directions of their chord
    pub register_on_chord: bool,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            merge_dx: Fraction(1.5),
            merge_dy: Fraction(0.5),
            register_on_chord: true,
        }
    }
}

/// Time and key signatures
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Minimum distance from the measure start to a time signature
    pub time_min_offset: Fraction,
    /// Maximum distance between the center of a time signature and a digit
    /// joining it
    pub time_max_distance: Fraction,
    /// Margin around a key component where no head or stem may lie
    pub key_margin: Fraction,
    /// Tolerance on the ordinate of the first component of a key
    pub key_y_margin: Fraction,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            time_min_offset: Fraction(1.0),
            time_max_distance: Fraction(4.0),
            key_margin: Fraction(1.0),
            key_y_margin: Fraction(0.25),
        }
    }
}

/// Slur end lookup and connection across systems
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlurConfig {
    /// Width of the lookup area, outwards from a slur end
    pub area_dx: Fraction,
    /// Width of the lookup area, inwards from a slur end
    pub area_x_margin: Fraction,
    /// Height of the lookup area, towards the notes
    pub area_dy: Fraction,
    /// Maximum ordinate difference between two halves of a slur
    pub max_delta_y: Fraction,
}

impl Default for SlurConfig {
    fn default() -> Self {
        Self {
            area_dx: Fraction(2.0),
            area_x_margin: Fraction(1.0),
            area_dy: Fraction(6.0),
            max_delta_y: Fraction(4.0),
        }
    }
}

/// Lyrics lines and syllable mapping
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Maximum ordinate difference between an item and its line mean
    pub line_dy: Fraction,
    /// Horizontal margin around measures and between syllable and note
    pub note_dx: Fraction,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            line_dy: Fraction(2.0),
            note_dx: Fraction(3.0),
        }
    }
}

/// Complete assembly configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub slots: SlotConfig,
    pub placement: PlacementConfig,
    pub beams: BeamConfig,
    pub barlines: BarlineConfig,
    pub dynamics: DynamicsConfig,
    pub signatures: SignatureConfig,
    pub slurs: SlurConfig,
    pub lyrics: LyricsConfig,
}

impl ScoreConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the slot policy
    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.slots.policy = policy;
        self
    }

    /// Set the maximum articulation distance
    pub fn with_articulation_max_dy(mut self, max_dy: Fraction) -> Self {
        self.placement.articulation_max_dy = max_dy;
        self
    }

    /// Set the barline edge distance
    pub fn with_barline_max_dx(mut self, max_dx: Fraction) -> Self {
        self.barlines.max_dx = max_dx;
        self
    }

    /// Enable or disable chord registration of dynamics
    pub fn with_dynamics_on_chord(mut self, register: bool) -> Self {
        self.dynamics.register_on_chord = register;
        self
    }

    /// Set the lyrics note margin
    pub fn with_lyrics_note_dx(mut self, note_dx: Fraction) -> Self {
        self.lyrics.note_dx = note_dx;
        self
    }
}
