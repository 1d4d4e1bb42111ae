//! Lookup tables decoding composite glyph signatures
//!
//! The tables are built once and handed by reference to the assembler.

use std::collections::HashMap;

use crate::glyph::Shape;
use crate::score::TimeRational;

/// Signature to shape tables for barlines and dynamics, dynamics sound
/// levels and the values of whole time signatures
#[derive(Debug, Clone)]
pub struct SignatureTables {
    barlines: HashMap<&'static str, Shape>,
    dynamics: HashMap<&'static str, Shape>,
    sounds: HashMap<Shape, u32>,
    /// Ordered: the first shape of a value is its canonical one
    whole_times: Vec<(Shape, TimeRational)>,
}

impl SignatureTables {
    pub fn standard() -> Self {
        let barlines = HashMap::from([
            ("N", Shape::ThinBarline),
            ("NN", Shape::DoubleBarline),
            ("NK", Shape::FinalBarline),
            ("KN", Shape::ReverseFinalBarline),
            ("ONK", Shape::RightRepeatSign),
            ("KNO", Shape::LeftRepeatSign),
            ("ONKNO", Shape::BackToBackRepeatSign),
            // tolerate a missing dot on either side
            ("NKNO", Shape::BackToBackRepeatSign),
            ("ONKN", Shape::BackToBackRepeatSign),
            ("NKN", Shape::BackToBackRepeatSign),
        ]);

        let dynamics = HashMap::from([
            ("f", Shape::DynamicsF),
            ("ff", Shape::DynamicsFf),
            ("fff", Shape::DynamicsFff),
            ("fp", Shape::DynamicsFp),
            ("fz", Shape::DynamicsFz),
            ("mf", Shape::DynamicsMf),
            ("mp", Shape::DynamicsMp),
            ("p", Shape::DynamicsP),
            ("pp", Shape::DynamicsPp),
            ("ppp", Shape::DynamicsPpp),
            ("rf", Shape::DynamicsRf),
            ("rfz", Shape::DynamicsRfz),
            ("sf", Shape::DynamicsSf),
            ("sffz", Shape::DynamicsSffz),
            ("sfp", Shape::DynamicsSfp),
            ("sfpp", Shape::DynamicsSfpp),
            ("sfz", Shape::DynamicsSfz),
        ]);

        // Percentages of the default forte velocity
        let sounds = HashMap::from([
            (Shape::DynamicsPpp, 18),
            (Shape::DynamicsPp, 36),
            (Shape::DynamicsP, 54),
            (Shape::DynamicsMp, 71),
            (Shape::DynamicsMf, 89),
            (Shape::DynamicsF, 106),
            (Shape::DynamicsFf, 124),
            (Shape::DynamicsFff, 141),
            (Shape::DynamicsFp, 106),
            (Shape::DynamicsFz, 112),
            (Shape::DynamicsRf, 112),
            (Shape::DynamicsRfz, 112),
            (Shape::DynamicsSf, 112),
            (Shape::DynamicsSffz, 124),
            (Shape::DynamicsSfp, 112),
            (Shape::DynamicsSfpp, 112),
            (Shape::DynamicsSfz, 112),
        ]);

        let whole_times = vec![
            (Shape::TimeFourFour, TimeRational::new(4, 4)),
            (Shape::TimeTwoTwo, TimeRational::new(2, 2)),
            (Shape::TimeTwoFour, TimeRational::new(2, 4)),
            (Shape::TimeThreeFour, TimeRational::new(3, 4)),
            (Shape::TimeSixEight, TimeRational::new(6, 8)),
            (Shape::CommonTime, TimeRational::new(4, 4)),
            (Shape::CutTime, TimeRational::new(2, 2)),
        ];

        Self {
            barlines,
            dynamics,
            sounds,
            whole_times,
        }
    }

    pub fn barline_shape(&self, signature: &str) -> Option<Shape> {
        self.barlines.get(signature).copied()
    }

    pub fn dynamics_shape(&self, signature: &str) -> Option<Shape> {
        self.dynamics.get(signature).copied()
    }

    /// Value of a time signature drawn as one glyph
    pub fn whole_time(&self, shape: Shape) -> Option<TimeRational> {
        self.whole_times
            .iter()
            .find(|(s, _)| *s == shape)
            .map(|(_, rational)| *rational)
    }

    /// Single-glyph shape drawing a time value, if there is one
    pub fn time_shape(&self, rational: TimeRational) -> Option<Shape> {
        self.whole_times
            .iter()
            .find(|(_, r)| *r == rational)
            .map(|(shape, _)| *shape)
    }

    /// MusicXML `sound dynamics` level of a dynamics shape
    pub fn sound_level(&self, shape: Shape) -> Option<u32> {
        self.sounds.get(&shape).copied()
    }
}

impl Default for SignatureTables {
    fn default() -> Self {
        Self::standard()
    }
}
