//! Small helpers over [`nalgebra::Vector3`] used by the filter paths.

use nalgebra::Vector3;

/// Magnitude below which a vector is treated as degenerate.
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Normalize `v`, returning the zero vector when its magnitude is below
/// 1e-6.
pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let magnitude = v.norm();
    if magnitude < DEGENERATE_EPSILON {
        return Vector3::zeros();
    }
    v / magnitude
}

/// Angle between two vectors in radians; 0.0 when either is near zero.
pub fn angle_between(a: Vector3<f64>, b: Vector3<f64>) -> f64 {
    let mag_a = a.norm();
    let mag_b = b.norm();
    if mag_a < DEGENERATE_EPSILON || mag_b < DEGENERATE_EPSILON {
        return 0.0;
    }
    let cos_angle = (a.dot(&b) / (mag_a * mag_b)).clamp(-1.0, 1.0);
    cos_angle.acos()
}

/// Componentwise comparison within `epsilon`.
pub fn approx_eq(a: Vector3<f64>, b: Vector3<f64>, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon && (a.z - b.z).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_result() {
        let v = normalize_or_zero(Vector3::new(3.0, 0.0, 4.0));
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v - Vector3::new(0.6, 0.0, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn test_normalize_near_zero_is_zero() {
        let v = normalize_or_zero(Vector3::new(1e-9, -1e-9, 0.0));
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn test_angle_between_orthogonal() {
        let angle = angle_between(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0));
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_between_degenerate() {
        let angle = angle_between(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_angle_clamps_rounding() {
        // Parallel vectors whose cosine can drift past 1.0 in floating point.
        let a = Vector3::new(0.1, 0.2, 0.3);
        let angle = angle_between(a, a * 7.0);
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn test_approx_eq() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0 + 1e-7, 2.0, 3.0 - 1e-7);
        assert!(approx_eq(a, b, 1e-6));
        assert!(!approx_eq(a, b, 1e-8));
    }
}
