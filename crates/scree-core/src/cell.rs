//! Tagged sentinel values.
//!
//! Layers travel between plugins as plain `f32` buffers where `NaN` and
//! `+inf` carry meaning. Inside a kernel that overloading is easy to get
//! wrong, so scratch maps and search results use [`Cell`] and only
//! convert to raw floats when written to an output grid.

/// A cell value with its sentinel meaning made explicit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    /// No data. Encoded as `NaN`.
    Unknown,
    /// Blocked, maximal cost, or "no answer known". Encoded as `+inf`.
    Blocked,
    /// End-of-path marker in path scratch maps. Encoded as `+inf`.
    Terminal,
    /// A measurement, cost, distance, or bearing.
    Finite(f32),
}

impl Cell {
    /// Decode a raw layer value.
    ///
    /// `+inf` decodes as [`Cell::Blocked`]; raw layers cannot distinguish
    /// it from [`Cell::Terminal`].
    #[inline]
    pub fn from_raw(value: f32) -> Self {
        if value.is_nan() {
            Self::Unknown
        } else if value == f32::INFINITY {
            Self::Blocked
        } else {
            Self::Finite(value)
        }
    }

    /// Encode for an output layer.
    #[inline]
    pub fn to_raw(self) -> f32 {
        match self {
            Self::Unknown => f32::NAN,
            Self::Blocked | Self::Terminal => f32::INFINITY,
            Self::Finite(v) => v,
        }
    }

    /// `true` for anything other than [`Cell::Unknown`].
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// The finite payload, if any.
    #[inline]
    pub fn finite(self) -> Option<f32> {
        match self {
            Self::Finite(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Cell> for f32 {
    fn from(cell: Cell) -> f32 {
        cell.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip_of_sentinels() {
        assert!(Cell::Unknown.to_raw().is_nan());
        assert_eq!(Cell::Blocked.to_raw(), f32::INFINITY);
        assert_eq!(Cell::Terminal.to_raw(), f32::INFINITY);
        assert_eq!(Cell::Finite(1.5).to_raw(), 1.5);

        assert_eq!(Cell::from_raw(f32::NAN), Cell::Unknown);
        assert_eq!(Cell::from_raw(f32::INFINITY), Cell::Blocked);
        assert_eq!(Cell::from_raw(-2.0), Cell::Finite(-2.0));
    }

    #[test]
    fn known_and_finite() {
        assert!(!Cell::Unknown.is_known());
        assert!(Cell::Terminal.is_known());
        assert_eq!(Cell::Finite(0.0).finite(), Some(0.0));
        assert_eq!(Cell::Blocked.finite(), None);
    }
}
