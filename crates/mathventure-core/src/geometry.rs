//! Right circular cylinder formulas.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Volumes closer than this are considered equal.
pub const VOLUME_EPSILON: f64 = 0.01;

/// Cubic centimetres per litre.
const CM3_PER_LITRE: f64 = 1000.0;

/// A right circular cylinder. Units are whatever the caller uses (cm, m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub radius: f64,
    pub height: f64,
}

impl Cylinder {
    pub fn new(radius: f64, height: f64) -> Self {
        Self { radius, height }
    }

    /// Area of one circular end, πr².
    pub fn base_area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Curved (lateral) surface, 2πrh.
    pub fn curved_surface_area(&self) -> f64 {
        2.0 * PI * self.radius * self.height
    }

    /// Curved surface plus both ends, 2πrh + 2πr².
    pub fn total_surface_area(&self) -> f64 {
        self.curved_surface_area() + 2.0 * self.base_area()
    }

    /// πr²h.
    pub fn volume(&self) -> f64 {
        self.base_area() * self.height
    }

    /// Volume in litres, assuming centimetre dimensions.
    pub fn capacity_litres(&self) -> f64 {
        self.volume() / CM3_PER_LITRE
    }

    /// The label peeled off and laid flat: a `2πr × h` rectangle.
    pub fn label_dimensions(&self) -> (f64, f64) {
        (2.0 * PI * self.radius, self.height)
    }

    pub fn same_volume_as(&self, other: &Cylinder) -> bool {
        (self.volume() - other.volume()).abs() < VOLUME_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn adaptive_check_cylinder() {
        let c = Cylinder::new(7.0, 10.0);
        assert!(close(c.curved_surface_area(), 439.82));
    }

    #[test]
    fn tower_csa() {
        let c = Cylinder::new(7.0, 72.0);
        assert!(close(c.curved_surface_area(), 3166.73));
    }

    #[test]
    fn simulation_defaults() {
        let c = Cylinder::new(4.0, 10.0);
        assert!(close(c.curved_surface_area(), 251.33));
        assert!(close(c.total_surface_area(), 351.86));
        assert!(close(c.volume(), 502.65));
        assert!(close(c.capacity_litres(), 0.50));
        let (w, h) = c.label_dimensions();
        assert!(close(w, 25.13));
        assert_eq!(h, 10.0);
    }

    #[test]
    fn tall_and_wide_beakers_match() {
        let tall = Cylinder::new(3.0, 100.0);
        let wide = Cylinder::new(15.0, 4.0);
        assert!(close(tall.volume(), 2827.43));
        assert!(tall.same_volume_as(&wide));
        assert!(!tall.same_volume_as(&Cylinder::new(15.0, 5.0)));
    }
}
