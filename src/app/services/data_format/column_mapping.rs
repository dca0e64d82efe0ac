//! Coordinate column mapping for the sensor and topography blocks
//!
//! The sensor block accepts `x`, `y`, `z` in metres and `x/mm`, `y/mm`,
//! `z/mm` in millimetres, either letter case. The topography block accepts
//! metres only.

use crate::app::models::Pos;
use crate::constants::coordinates;

/// Coordinate a column feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Store a value into the matching coordinate of a position
    pub fn assign(self, pos: &mut Pos, value: f64) {
        match self {
            Axis::X => pos.x = value,
            Axis::Y => pos.y = value,
            Axis::Z => pos.z = value,
        }
    }

    /// Matching coordinate of a position
    pub fn of(self, pos: &Pos) -> f64 {
        match self {
            Axis::X => pos.x,
            Axis::Y => pos.y,
            Axis::Z => pos.z,
        }
    }
}

/// Coordinate column with the number of file units per metre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateColumn {
    pub axis: Axis,
    pub units_per_metre: f64,
}

impl CoordinateColumn {
    fn metres(axis: Axis) -> Self {
        Self {
            axis,
            units_per_metre: 1.0,
        }
    }

    fn millimetres(axis: Axis) -> Self {
        Self {
            axis,
            units_per_metre: coordinates::MM_PER_M,
        }
    }

    /// Metres from a file value
    pub fn to_metres(&self, value: f64) -> f64 {
        value / self.units_per_metre
    }

    /// File value from metres
    pub fn from_metres(&self, value: f64) -> f64 {
        value * self.units_per_metre
    }
}

/// Mapping of a token in the sensor block
pub fn sensor_column(token: &str) -> Option<CoordinateColumn> {
    topography_column(token).or_else(|| {
        if coordinates::X_MM.contains(&token) {
            Some(CoordinateColumn::millimetres(Axis::X))
        } else if coordinates::Y_MM.contains(&token) {
            Some(CoordinateColumn::millimetres(Axis::Y))
        } else if coordinates::Z_MM.contains(&token) {
            Some(CoordinateColumn::millimetres(Axis::Z))
        } else {
            None
        }
    })
}

/// Mapping of a token in the topography block
pub fn topography_column(token: &str) -> Option<CoordinateColumn> {
    if coordinates::X.contains(&token) {
        Some(CoordinateColumn::metres(Axis::X))
    } else if coordinates::Y.contains(&token) {
        Some(CoordinateColumn::metres(Axis::Y))
    } else if coordinates::Z.contains(&token) {
        Some(CoordinateColumn::metres(Axis::Z))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_columns() {
        assert_eq!(sensor_column("x"), Some(CoordinateColumn::metres(Axis::X)));
        assert_eq!(sensor_column("Z"), Some(CoordinateColumn::metres(Axis::Z)));
        let y_mm = sensor_column("Y/mm").unwrap();
        assert_eq!(y_mm.axis, Axis::Y);
        assert_eq!(y_mm.to_metres(1500.0), 1.5);
        assert_eq!(y_mm.from_metres(1.5), 1500.0);
        assert_eq!(sensor_column("u"), None);
        assert_eq!(sensor_column("x/cm"), None);
    }

    #[test]
    fn test_topography_rejects_millimetres() {
        assert!(topography_column("y").is_some());
        assert_eq!(topography_column("x/mm"), None);
    }

    #[test]
    fn test_axis_assign() {
        let mut pos = Pos::default();
        Axis::Y.assign(&mut pos, 2.0);
        Axis::Z.assign(&mut pos, -1.0);
        assert_eq!(pos, Pos::new(0.0, 2.0, -1.0));
        assert_eq!(Axis::Y.of(&pos), 2.0);
    }
}
