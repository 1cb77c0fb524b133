//! # Trapezoid Section Properties
//!
//! Girder and deck shapes are described as stacks of horizontal trapezoids.
//! These formulas give the gross properties used by the capacity model and
//! to derive concrete part properties from a shape.
//!
//! ## Notation
//!
//! - `y1`, `y2` = depth of the top and bottom edge (downward from the top of girder)
//! - `b1`, `b2` = width at the top and bottom edge
//! - `h` = y2 - y1
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// =============================================================================
// TRAPEZOID FORMULAS
// =============================================================================

/// Area of a trapezoid with parallel horizontal edges
///
/// ```text
///      b1
///   ┌───────┐   y1
///    \     /
///     \___/     y2
///      b2
/// ```
///
/// # Formula
/// A = h (b1 + b2) / 2
///
/// # Example
/// ```rust
/// use girder_core::section::properties::trapezoid_area;
///
/// assert_eq!(trapezoid_area(12.0, 12.0, 10.0), 120.0);
/// assert_eq!(trapezoid_area(20.0, 10.0, 6.0), 90.0);
/// ```
#[inline]
pub fn trapezoid_area(b1: f64, b2: f64, h: f64) -> f64 {
    0.5 * h * (b1 + b2)
}

/// Distance from the top edge to the centroid
///
/// # Formula
/// ȳ = h (b1 + 2 b2) / (3 (b1 + b2))
///
/// A triangle pointing down (b2 = 0) has its centroid at h/3.
///
/// # Example
/// ```rust
/// use girder_core::section::properties::trapezoid_centroid_from_top;
///
/// assert_eq!(trapezoid_centroid_from_top(8.0, 8.0, 10.0), 5.0);
/// assert!((trapezoid_centroid_from_top(6.0, 0.0, 9.0) - 3.0).abs() < 1e-12);
/// ```
#[inline]
pub fn trapezoid_centroid_from_top(b1: f64, b2: f64, h: f64) -> f64 {
    h * (b1 + 2.0 * b2) / (3.0 * (b1 + b2))
}

/// Moment of inertia about the trapezoid's own horizontal centroidal axis
///
/// # Formula
/// I = h³ (b1² + 4 b1 b2 + b2²) / (36 (b1 + b2))
///
/// Reduces to bh³/12 for a rectangle.
///
/// # Example
/// ```rust
/// use girder_core::section::properties::trapezoid_moment_of_inertia;
///
/// let i = trapezoid_moment_of_inertia(12.0, 12.0, 10.0);
/// assert!((i - 1000.0).abs() < 1e-9);
/// ```
#[inline]
pub fn trapezoid_moment_of_inertia(b1: f64, b2: f64, h: f64) -> f64 {
    h.powi(3) * (b1 * b1 + 4.0 * b1 * b2 + b2 * b2) / (36.0 * (b1 + b2))
}

/// Section modulus for a fiber at distance `c` from the centroid
///
/// # Formula
/// S = I / c
#[inline]
pub fn section_modulus(inertia: f64, c: f64) -> f64 {
    inertia / c.abs()
}

// =============================================================================
// SHAPES
// =============================================================================

/// Horizontal trapezoid in girder coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trapezoid {
    pub y_top_in: f64,
    pub y_bottom_in: f64,
    pub width_top_in: f64,
    pub width_bottom_in: f64,
}

impl Trapezoid {
    pub fn rectangle(y_top_in: f64, width_in: f64, height_in: f64) -> Self {
        Trapezoid {
            y_top_in,
            y_bottom_in: y_top_in + height_in,
            width_top_in: width_in,
            width_bottom_in: width_in,
        }
    }

    pub fn height_in(&self) -> f64 {
        self.y_bottom_in - self.y_top_in
    }

    pub fn area_in2(&self) -> f64 {
        trapezoid_area(self.width_top_in, self.width_bottom_in, self.height_in())
    }

    pub fn centroid_in(&self) -> f64 {
        self.y_top_in + trapezoid_centroid_from_top(self.width_top_in, self.width_bottom_in, self.height_in())
    }

    pub fn inertia_in4(&self) -> f64 {
        trapezoid_moment_of_inertia(self.width_top_in, self.width_bottom_in, self.height_in())
    }

    /// Width at depth `y` (zero outside the trapezoid)
    pub fn width_at(&self, y: f64) -> f64 {
        if y < self.y_top_in || y > self.y_bottom_in {
            return 0.0;
        }
        let t = (y - self.y_top_in) / self.height_in();
        self.width_top_in + (self.width_bottom_in - self.width_top_in) * t
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.height_in() > 0.0) {
            return Err(CalcError::invalid_input(
                "y_bottom_in",
                self.y_bottom_in.to_string(),
                "Bottom edge must lie below the top edge",
            ));
        }
        if self.width_top_in < 0.0 || self.width_bottom_in < 0.0 || self.width_top_in + self.width_bottom_in <= 0.0 {
            return Err(CalcError::invalid_input(
                "width_in",
                format!("{} / {}", self.width_top_in, self.width_bottom_in),
                "Widths must be non-negative and not both zero",
            ));
        }
        Ok(())
    }
}

/// Area, centroid and inertia of a plane shape
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GrossProperties {
    pub area_in2: f64,
    /// Depth of the centroid below the top of girder
    pub centroid_in: f64,
    /// About the centroid
    pub inertia_in4: f64,
    pub y_top_in: f64,
    pub y_bottom_in: f64,
}

impl GrossProperties {
    /// Combine stacked trapezoids with the parallel axis theorem
    ///
    /// # Example
    /// ```rust
    /// use girder_core::section::properties::{GrossProperties, Trapezoid};
    ///
    /// // 12 x 20 rectangle split in two
    /// let props = GrossProperties::from_trapezoids(&[
    ///     Trapezoid::rectangle(0.0, 12.0, 10.0),
    ///     Trapezoid::rectangle(10.0, 12.0, 10.0),
    /// ]).unwrap();
    /// assert_eq!(props.area_in2, 240.0);
    /// assert_eq!(props.centroid_in, 10.0);
    /// assert!((props.inertia_in4 - 12.0 * 20.0_f64.powi(3) / 12.0).abs() < 1e-9);
    /// ```
    pub fn from_trapezoids(shapes: &[Trapezoid]) -> CalcResult<Self> {
        if shapes.is_empty() {
            return Err(CalcError::missing_field("trapezoids"));
        }
        for t in shapes {
            t.validate()?;
        }
        let area: f64 = shapes.iter().map(Trapezoid::area_in2).sum();
        let centroid = shapes.iter().map(|t| t.area_in2() * t.centroid_in()).sum::<f64>() / area;
        let inertia = shapes
            .iter()
            .map(|t| t.inertia_in4() + t.area_in2() * (t.centroid_in() - centroid).powi(2))
            .sum();
        let y_top = shapes.iter().map(|t| t.y_top_in).fold(f64::INFINITY, f64::min);
        let y_bottom = shapes.iter().map(|t| t.y_bottom_in).fold(f64::NEG_INFINITY, f64::max);
        Ok(GrossProperties {
            area_in2: area,
            centroid_in: centroid,
            inertia_in4: inertia,
            y_top_in: y_top,
            y_bottom_in: y_bottom,
        })
    }

    pub fn section_modulus_top_in3(&self) -> f64 {
        section_modulus(self.inertia_in4, self.centroid_in - self.y_top_in)
    }

    pub fn section_modulus_bottom_in3(&self) -> f64 {
        section_modulus(self.inertia_in4, self.y_bottom_in - self.centroid_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_reduces_to_bd3_over_12() {
        let t = Trapezoid::rectangle(0.0, 10.0, 30.0);
        assert_relative_eq!(t.inertia_in4(), 10.0 * 27_000.0 / 12.0, epsilon = 1e-9);
        assert_eq!(t.centroid_in(), 15.0);
    }

    #[test]
    fn test_triangle_inertia() {
        // bh^3/36 for a triangle
        let t = Trapezoid {
            y_top_in: 0.0,
            y_bottom_in: 12.0,
            width_top_in: 6.0,
            width_bottom_in: 0.0,
        };
        assert_relative_eq!(t.inertia_in4(), 6.0 * 1728.0 / 36.0, epsilon = 1e-9);
        assert_relative_eq!(t.width_at(6.0), 3.0);
        assert_eq!(t.width_at(13.0), 0.0);
    }

    #[test]
    fn test_tee_section() {
        // 48 x 8 flange on a 12 x 32 web
        let props = GrossProperties::from_trapezoids(&[
            Trapezoid::rectangle(0.0, 48.0, 8.0),
            Trapezoid::rectangle(8.0, 12.0, 32.0),
        ])
        .unwrap();
        let area = 384.0 + 384.0;
        assert_relative_eq!(props.area_in2, area);
        assert_relative_eq!(props.centroid_in, (384.0 * 4.0 + 384.0 * 24.0) / area);
        let yc = props.centroid_in;
        let i = 48.0 * 512.0 / 12.0 + 384.0 * (4.0 - yc).powi(2) + 12.0 * 32_768.0 / 12.0 + 384.0 * (24.0 - yc).powi(2);
        assert_relative_eq!(props.inertia_in4, i, epsilon = 1e-9);
        assert_relative_eq!(props.section_modulus_bottom_in3(), i / (40.0 - yc), epsilon = 1e-9);
    }

    #[test]
    fn test_inverted_trapezoid_rejected() {
        let t = Trapezoid {
            y_top_in: 5.0,
            y_bottom_in: 2.0,
            width_top_in: 1.0,
            width_bottom_in: 1.0,
        };
        assert!(t.validate().is_err());
        assert!(GrossProperties::from_trapezoids(&[]).is_err());
    }
}
