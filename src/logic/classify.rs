//! Fixed boundary tables mapping a raw sensor value to a qualitative label.
//!
//! Each table is an ordered list of steps checked top to bottom; the first
//! step whose boundary matches wins, and `otherwise` catches the rest. The
//! `<` / `<=` / `>` of every step is significant.

use crate::error::{Result, SoilSenseError};
use crate::models::{Attribute, Label, SensorReading};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    Below(f64),
    AtMost(f64),
    Above(f64),
}

impl Boundary {
    fn matches(&self, value: f64) -> bool {
        match *self {
            Boundary::Below(b) => value < b,
            Boundary::AtMost(b) => value <= b,
            Boundary::Above(b) => value > b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub boundary: Boundary,
    pub label: Label,
}

const fn below(bound: f64, label: Label) -> Step {
    Step {
        boundary: Boundary::Below(bound),
        label,
    }
}

const fn at_most(bound: f64, label: Label) -> Step {
    Step {
        boundary: Boundary::AtMost(bound),
        label,
    }
}

const fn above(bound: f64, label: Label) -> Step {
    Step {
        boundary: Boundary::Above(bound),
        label,
    }
}

#[derive(Debug, PartialEq)]
pub struct BoundaryTable {
    steps: &'static [Step],
    otherwise: Label,
}

impl BoundaryTable {
    fn lookup(&self, value: f64) -> Label {
        self.steps
            .iter()
            .find(|step| step.boundary.matches(value))
            .map(|step| step.label)
            .unwrap_or(self.otherwise)
    }
}

// Soil temperature (°C). 30-35 is deliberately still optimal.
static TEMPERATURE: BoundaryTable = BoundaryTable {
    steps: &[
        below(10.0, Label::Cold),
        below(18.0, Label::Cool),
        at_most(30.0, Label::Optimal),
        above(35.0, Label::TooHot),
    ],
    otherwise: Label::Optimal,
};

static MOISTURE: BoundaryTable = BoundaryTable {
    steps: &[
        below(15.0, Label::Dry),
        below(35.0, Label::Moderate),
        below(60.0, Label::Wet),
    ],
    otherwise: Label::Saturated,
};

static NITROGEN: BoundaryTable = BoundaryTable {
    steps: &[
        below(20.0, Label::Low),
        below(50.0, Label::Moderate),
        below(100.0, Label::Good),
    ],
    otherwise: Label::VeryHigh,
};

static PHOSPHORUS: BoundaryTable = BoundaryTable {
    steps: &[
        below(10.0, Label::Low),
        below(30.0, Label::Moderate),
        below(60.0, Label::Good),
    ],
    otherwise: Label::High,
};

static POTASSIUM: BoundaryTable = BoundaryTable {
    steps: &[
        below(50.0, Label::Low),
        below(100.0, Label::Adequate),
        below(200.0, Label::High),
    ],
    otherwise: Label::VeryHigh,
};

// The separate <2 and <3 steps both yield "low"; the split is redundant but
// kept so the table reads the same as the published UV index scale.
static UV: BoundaryTable = BoundaryTable {
    steps: &[
        below(1.0, Label::Indoor),
        below(2.0, Label::Low),
        below(3.0, Label::Low),
        below(6.0, Label::Moderate),
        below(8.0, Label::High),
        below(11.0, Label::VeryHigh),
    ],
    otherwise: Label::Critical,
};

static WATER_LEVEL: BoundaryTable = BoundaryTable {
    steps: &[below(20.0, Label::Low)],
    otherwise: Label::Normal,
};

static PH: BoundaryTable = BoundaryTable {
    steps: &[below(6.0, Label::Acidic), above(6.5, Label::Alkaline)],
    otherwise: Label::Optimal,
};

// µS/cm
static ELECTRIC_CONDUCTIVITY: BoundaryTable = BoundaryTable {
    steps: &[
        below(300.0, Label::VeryLow),
        below(700.0, Label::Low),
        below(1200.0, Label::Moderate),
        below(2000.0, Label::High),
    ],
    otherwise: Label::VeryHigh,
};

pub fn boundaries(attribute: Attribute) -> &'static BoundaryTable {
    match attribute {
        Attribute::Temperature => &TEMPERATURE,
        Attribute::Moisture => &MOISTURE,
        Attribute::Nitrogen => &NITROGEN,
        Attribute::Phosphorus => &PHOSPHORUS,
        Attribute::Potassium => &POTASSIUM,
        Attribute::Ph => &PH,
        Attribute::ElectricConductivity => &ELECTRIC_CONDUCTIVITY,
        Attribute::Uv => &UV,
        Attribute::WaterLevel => &WATER_LEVEL,
    }
}

/// Classify one value. Fails only on a non-finite value.
pub fn classify(attribute: Attribute, value: f64) -> Result<Label> {
    if !value.is_finite() {
        return Err(SoilSenseError::invalid_reading(
            attribute.reading_key(),
            format!("cannot classify non-finite value {}", value),
        ));
    }
    Ok(boundaries(attribute).lookup(value))
}

pub fn classify_named(name: &str, value: f64) -> Result<Label> {
    let attribute =
        Attribute::from_str(name).ok_or_else(|| SoilSenseError::UnknownAttribute(name.into()))?;
    classify(attribute, value)
}

/// Classify every attribute present in `reading`, one result per attribute,
/// in [`Attribute::ALL`] order.
pub fn classify_reading(reading: &SensorReading) -> Vec<(Attribute, Result<Label>)> {
    Attribute::ALL
        .into_iter()
        .filter(|a| reading.contains(a.reading_key()))
        .map(|a| {
            let label = reading
                .attribute_value(a)
                .and_then(|value| classify(a, value));
            if let Err(e) = &label {
                tracing::debug!("Skipping {}: {}", a.reading_key(), e);
            }
            (a, label)
        })
        .collect()
}

/// The fixed set of labels an attribute can produce, in table order.
pub fn labels_for(attribute: Attribute) -> Vec<Label> {
    let table = boundaries(attribute);
    let mut labels: Vec<Label> = Vec::new();
    for label in table
        .steps
        .iter()
        .map(|s| s.label)
        .chain(std::iter::once(table.otherwise))
    {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
