//! Classified glyph shapes and their families

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Error returned when a shape name is not known
#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown shape '{0}'")]
pub struct UnknownShape(pub String);

macro_rules! shapes {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Shape assigned to a glyph by the classifier
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(try_from = "String")]
        pub enum Shape {
            $($variant,)*
        }

        impl Shape {
            /// Every known shape, in declaration order
            pub const ALL: &'static [Shape] = &[$(Shape::$variant,)*];

            /// Canonical upper-case name
            pub fn name(&self) -> &'static str {
                match self {
                    $(Shape::$variant => $name,)*
                }
            }
        }

        impl FromStr for Shape {
            type Err = UnknownShape;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Shape::$variant),)*
                    _ => Err(UnknownShape(s.to_string())),
                }
            }
        }
    };
}

shapes! {
    NoteheadBlack => "NOTEHEAD_BLACK",
    NoteheadVoid => "NOTEHEAD_VOID",
    WholeNote => "WHOLE_NOTE",
    WholeRest => "WHOLE_REST",
    HalfRest => "HALF_REST",
    QuarterRest => "QUARTER_REST",
    EighthRest => "EIGHTH_REST",
    Stem => "STEM",

    Beam => "BEAM",
    Beam2 => "BEAM_2",
    Beam3 => "BEAM_3",
    BeamHook => "BEAM_HOOK",

    ThinBarline => "THIN_BARLINE",
    ThickBarline => "THICK_BARLINE",
    PartDefiningBarline => "PART_DEFINING_BARLINE",
    DoubleBarline => "DOUBLE_BARLINE",
    FinalBarline => "FINAL_BARLINE",
    ReverseFinalBarline => "REVERSE_FINAL_BARLINE",
    LeftRepeatSign => "LEFT_REPEAT_SIGN",
    RightRepeatSign => "RIGHT_REPEAT_SIGN",
    BackToBackRepeatSign => "BACK_TO_BACK_REPEAT_SIGN",
    RepeatDot => "REPEAT_DOT",
    DotSet => "DOT_SET",

    DynamicsCharM => "DYNAMICS_CHAR_M",
    DynamicsCharR => "DYNAMICS_CHAR_R",
    DynamicsCharS => "DYNAMICS_CHAR_S",
    DynamicsCharZ => "DYNAMICS_CHAR_Z",
    DynamicsF => "DYNAMICS_F",
    DynamicsFf => "DYNAMICS_FF",
    DynamicsFff => "DYNAMICS_FFF",
    DynamicsFp => "DYNAMICS_FP",
    DynamicsFz => "DYNAMICS_FZ",
    DynamicsMf => "DYNAMICS_MF",
    DynamicsMp => "DYNAMICS_MP",
    DynamicsP => "DYNAMICS_P",
    DynamicsPp => "DYNAMICS_PP",
    DynamicsPpp => "DYNAMICS_PPP",
    DynamicsRf => "DYNAMICS_RF",
    DynamicsRfz => "DYNAMICS_RFZ",
    DynamicsSf => "DYNAMICS_SF",
    DynamicsSffz => "DYNAMICS_SFFZ",
    DynamicsSfp => "DYNAMICS_SFP",
    DynamicsSfpp => "DYNAMICS_SFPP",
    DynamicsSfz => "DYNAMICS_SFZ",

    Accent => "ACCENT",
    Tenuto => "TENUTO",
    Staccato => "STACCATO",
    Staccatissimo => "STACCATISSIMO",
    StrongAccent => "STRONG_ACCENT",
    Arpeggiato => "ARPEGGIATO",
    Fermata => "FERMATA",
    FermataBelow => "FERMATA_BELOW",

    Tr => "TR",
    Turn => "TURN",
    TurnInverted => "TURN_INVERTED",
    TurnUp => "TURN_UP",
    TurnSlash => "TURN_SLASH",
    Mordent => "MORDENT",
    MordentInverted => "MORDENT_INVERTED",

    Coda => "CODA",
    Segno => "SEGNO",
    PedalMark => "PEDAL_MARK",
    PedalUpMark => "PEDAL_UP_MARK",
    Crescendo => "CRESCENDO",
    Decrescendo => "DECRESCENDO",

    TimeZero => "TIME_ZERO",
    TimeOne => "TIME_ONE",
    TimeTwo => "TIME_TWO",
    TimeThree => "TIME_THREE",
    TimeFour => "TIME_FOUR",
    TimeFive => "TIME_FIVE",
    TimeSix => "TIME_SIX",
    TimeSeven => "TIME_SEVEN",
    TimeEight => "TIME_EIGHT",
    TimeNine => "TIME_NINE",
    TimeTwelve => "TIME_TWELVE",
    TimeSixteen => "TIME_SIXTEEN",
    TimeFourFour => "TIME_FOUR_FOUR",
    TimeTwoTwo => "TIME_TWO_TWO",
    TimeTwoFour => "TIME_TWO_FOUR",
    TimeThreeFour => "TIME_THREE_FOUR",
    TimeSixEight => "TIME_SIX_EIGHT",
    CommonTime => "COMMON_TIME",
    CutTime => "CUT_TIME",

    Sharp => "SHARP",
    Flat => "FLAT",
    KeySharp1 => "KEY_SHARP_1",
    KeySharp2 => "KEY_SHARP_2",
    KeySharp3 => "KEY_SHARP_3",
    KeySharp4 => "KEY_SHARP_4",
    KeySharp5 => "KEY_SHARP_5",
    KeySharp6 => "KEY_SHARP_6",
    KeySharp7 => "KEY_SHARP_7",
    KeyFlat1 => "KEY_FLAT_1",
    KeyFlat2 => "KEY_FLAT_2",
    KeyFlat3 => "KEY_FLAT_3",
    KeyFlat4 => "KEY_FLAT_4",
    KeyFlat5 => "KEY_FLAT_5",
    KeyFlat6 => "KEY_FLAT_6",
    KeyFlat7 => "KEY_FLAT_7",

    Slur => "SLUR",

    GClef => "G_CLEF",
    GClef8va => "G_CLEF_8VA",
    GClef8vb => "G_CLEF_8VB",
    CClef => "C_CLEF",
    FClef => "F_CLEF",
    FClef8va => "F_CLEF_8VA",
    FClef8vb => "F_CLEF_8VB",
    PercussionClef => "PERCUSSION_CLEF",

    Text => "TEXT",
    Character => "CHARACTER",
}

impl TryFrom<String> for Shape {
    type Error = UnknownShape;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse grouping of shapes, driving which assembly rule handles a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    NoteHead,
    Rest,
    Stem,
    Beam,
    Barline,
    Dynamics,
    Articulation,
    Arpeggiate,
    Fermata,
    Ornament,
    Coda,
    Segno,
    Pedal,
    Wedge,
    TimeSignature,
    KeySignature,
    Slur,
    Clef,
    Text,
}

impl Shape {
    pub fn family(&self) -> ShapeFamily {
        use Shape::*;
        match self {
            NoteheadBlack | NoteheadVoid | WholeNote => ShapeFamily::NoteHead,
            WholeRest | HalfRest | QuarterRest | EighthRest => ShapeFamily::Rest,
            Stem => ShapeFamily::Stem,
            Beam | Beam2 | Beam3 | BeamHook => ShapeFamily::Beam,
            ThinBarline | ThickBarline | PartDefiningBarline | DoubleBarline | FinalBarline
            | ReverseFinalBarline | LeftRepeatSign | RightRepeatSign | BackToBackRepeatSign
            | RepeatDot | DotSet => ShapeFamily::Barline,
            DynamicsCharM | DynamicsCharR | DynamicsCharS | DynamicsCharZ | DynamicsF
            | DynamicsFf | DynamicsFff | DynamicsFp | DynamicsFz | DynamicsMf | DynamicsMp
            | DynamicsP | DynamicsPp | DynamicsPpp | DynamicsRf | DynamicsRfz | DynamicsSf
            | DynamicsSffz | DynamicsSfp | DynamicsSfpp | DynamicsSfz => ShapeFamily::Dynamics,
            Accent | Tenuto | Staccato | Staccatissimo | StrongAccent => ShapeFamily::Articulation,
            Arpeggiato => ShapeFamily::Arpeggiate,
            Fermata | FermataBelow => ShapeFamily::Fermata,
            Tr | Turn | TurnInverted | TurnUp | TurnSlash | Mordent | MordentInverted => {
                ShapeFamily::Ornament
            }
            Coda => ShapeFamily::Coda,
            Segno => ShapeFamily::Segno,
            PedalMark | PedalUpMark => ShapeFamily::Pedal,
            Crescendo | Decrescendo => ShapeFamily::Wedge,
            TimeZero | TimeOne | TimeTwo | TimeThree | TimeFour | TimeFive | TimeSix
            | TimeSeven | TimeEight | TimeNine | TimeTwelve | TimeSixteen | TimeFourFour
            | TimeTwoTwo | TimeTwoFour | TimeThreeFour | TimeSixEight | CommonTime | CutTime => {
                ShapeFamily::TimeSignature
            }
            Sharp | Flat | KeySharp1 | KeySharp2 | KeySharp3 | KeySharp4 | KeySharp5
            | KeySharp6 | KeySharp7 | KeyFlat1 | KeyFlat2 | KeyFlat3 | KeyFlat4 | KeyFlat5
            | KeyFlat6 | KeyFlat7 => ShapeFamily::KeySignature,
            Slur => ShapeFamily::Slur,
            GClef | GClef8va | GClef8vb | CClef | FClef | FClef8va | FClef8vb | PercussionClef => {
                ShapeFamily::Clef
            }
            Text | Character => ShapeFamily::Text,
        }
    }

    /// Whole rests sit outside time slots and last the whole measure
    pub fn is_whole_rest(&self) -> bool {
        matches!(self, Shape::WholeRest)
    }

    /// Number of parallel beams in a beam pack glyph
    pub fn beam_cardinality(&self) -> Option<usize> {
        match self {
            Shape::Beam | Shape::BeamHook => Some(1),
            Shape::Beam2 => Some(2),
            Shape::Beam3 => Some(3),
            _ => None,
        }
    }

    /// Signature code of a barline component
    ///
    /// `DOT_SET` and `REPEAT_DOT` share the dot code.
    pub fn barline_code(&self) -> Option<char> {
        match self {
            Shape::ThinBarline | Shape::PartDefiningBarline => Some('N'),
            Shape::ThickBarline => Some('K'),
            Shape::RepeatDot | Shape::DotSet => Some('O'),
            _ => None,
        }
    }

    /// Value of a single time signature digit
    pub fn time_digit(&self) -> Option<u32> {
        use Shape::*;
        let value = match self {
            TimeZero => 0,
            TimeOne => 1,
            TimeTwo => 2,
            TimeThree => 3,
            TimeFour => 4,
            TimeFive => 5,
            TimeSix => 6,
            TimeSeven => 7,
            TimeEight => 8,
            TimeNine => 9,
            TimeTwelve => 12,
            TimeSixteen => 16,
            _ => return None,
        };
        Some(value)
    }

    /// Key contribution: sharps count positive, flats negative
    pub fn key_value(&self) -> Option<i32> {
        use Shape::*;
        let value = match self {
            Sharp | KeySharp1 => 1,
            KeySharp2 => 2,
            KeySharp3 => 3,
            KeySharp4 => 4,
            KeySharp5 => 5,
            KeySharp6 => 6,
            KeySharp7 => 7,
            Flat | KeyFlat1 => -1,
            KeyFlat2 => -2,
            KeyFlat3 => -3,
            KeyFlat4 => -4,
            KeyFlat5 => -5,
            KeyFlat6 => -6,
            KeyFlat7 => -7,
            _ => return None,
        };
        Some(value)
    }

    /// Signature contribution of a dynamics component
    pub fn dynamics_code(&self) -> Option<&'static str> {
        use Shape::*;
        let code = match self {
            DynamicsCharM => "m",
            DynamicsCharR => "r",
            DynamicsCharS => "s",
            DynamicsCharZ => "z",
            DynamicsF => "f",
            DynamicsFf => "ff",
            DynamicsFff => "fff",
            DynamicsFp => "fp",
            DynamicsFz => "fz",
            DynamicsMf => "mf",
            DynamicsMp => "mp",
            DynamicsP => "p",
            DynamicsPp => "pp",
            DynamicsPpp => "ppp",
            DynamicsRf => "rf",
            DynamicsRfz => "rfz",
            DynamicsSf => "sf",
            DynamicsSffz => "sffz",
            DynamicsSfp => "sfp",
            DynamicsSfpp => "sfpp",
            DynamicsSfz => "sfz",
            _ => return None,
        };
        Some(code)
    }
}
