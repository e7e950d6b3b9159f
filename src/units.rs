//! Display formatting for measured distances.

/// Meters to inches conversion factor.
pub const METERS_TO_INCHES: f64 = 39.370_078_7;

const INCHES_PER_FOOT: f64 = 12.0;

/// Below this many inches the imperial format stays in inches only.
const INCHES_DISPLAY_LIMIT: f64 = 36.0;

/// Display unit for measured distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Meters,
    Centimeters,
    Millimeters,
    /// Feet and inches; short distances render as inches only.
    FeetInches,
}

/// Formats a distance in meters for on-screen display.
#[must_use]
pub fn format_distance(meters: f64, unit: LengthUnit) -> String {
    match unit {
        LengthUnit::Meters => format!("{meters:.2} m"),
        LengthUnit::Centimeters => format!("{:.1} cm", meters * 100.0),
        LengthUnit::Millimeters => format!("{:.0} mm", meters * 1000.0),
        LengthUnit::FeetInches => {
            let inches = meters * METERS_TO_INCHES;
            if inches < INCHES_DISPLAY_LIMIT {
                format!("{inches:.1} in")
            } else {
                let feet = (inches / INCHES_PER_FOOT).floor();
                let rest = inches - feet * INCHES_PER_FOOT;
                format!("{feet:.0} ft {rest:.1} in")
            }
        }
    }
}
