//! Caliper measurements of the physical parts the fan attaches to.

const PEN_OUTER_RADIUS_SAMPLES: [f64; 5] = [7.10, 7.10, 7.06, 7.12, 7.11];
const PEN_THICKNESS_SAMPLES: [f64; 3] = [0.85, 0.89, 0.93];

/// Median of a list of samples.
///
/// Even-length input yields the mean of the two middle values.
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Measurements of the pen barrel the fan is mounted on (mm).
pub struct PenMeasurements;

impl PenMeasurements {
    pub fn outer_radius() -> f64 {
        median(&PEN_OUTER_RADIUS_SAMPLES).unwrap_or(PEN_OUTER_RADIUS_SAMPLES[0])
    }

    pub fn thickness() -> f64 {
        median(&PEN_THICKNESS_SAMPLES).unwrap_or(PEN_THICKNESS_SAMPLES[0])
    }
}

/// Datasheet dimensions of the Z1 coreless motor (mm).
pub struct Z1MotorMeasurements;

impl Z1MotorMeasurements {
    pub const DIAMETER: f64 = 8.06;
    pub const LENGTH: f64 = 16.0;

    pub fn radius() -> f64 {
        Self::DIAMETER / 2.0
    }
}
