//! One-shot derivation of the NED reference magnetic field.
//!
//! Runs at most once during startup, while the vehicle is stationary,
//! and produces the reference vector the magnetometer update compares
//! against.

use nalgebra::{Matrix3, Vector3};

use crate::types::vector::normalize_or_zero;

/// Fallback reference field (NED, normalized-ish mid-latitude values)
/// used when no usable field survey is available.
pub fn default_reference_field() -> Vector3<f64> {
    Vector3::new(0.29, -0.05, 0.42)
}

/// Derive the NED-frame reference field from paired stationary samples.
///
/// Both sample sets are averaged, a body-to-NED direction cosine matrix
/// is built from the averaged accelerometer, and the averaged field is
/// projected through it and normalized. Empty or length-mismatched
/// sample sets yield [`default_reference_field`].
///
/// The frame is seeded from gravity alone, so its North axis is
/// consistent but not aligned with the magnetic meridian; callers that
/// need true geographic alignment must supply the reference field
/// directly.
pub fn derive_reference_field(
    mag_samples: &[Vector3<f64>],
    accel_samples: &[Vector3<f64>],
) -> Vector3<f64> {
    if mag_samples.is_empty() || mag_samples.len() != accel_samples.len() {
        return default_reference_field();
    }

    let inv_count = 1.0 / mag_samples.len() as f64;
    let avg_mag = mag_samples
        .iter()
        .fold(Vector3::zeros(), |acc, v| acc + v)
        * inv_count;
    let avg_accel = accel_samples
        .iter()
        .fold(Vector3::zeros(), |acc, v| acc + v)
        * inv_count;

    let dcm = ned_transform_from_gravity(avg_accel);
    normalize_or_zero(dcm * avg_mag)
}

/// Body-to-NED direction cosine matrix from a stationary accelerometer
/// average.
///
/// Down opposes the sensed specific force; North and East complete a
/// right-handed triad from the (0, 1, 0) seed.
fn ned_transform_from_gravity(accel: Vector3<f64>) -> Matrix3<f64> {
    let down = normalize_or_zero(-accel);
    let east_seed = Vector3::new(0.0, 1.0, 0.0);
    let north = normalize_or_zero(down.cross(&east_seed));
    let east = normalize_or_zero(north.cross(&down));

    Matrix3::new(
        north.x, north.y, north.z, //
        east.x, east.y, east.z, //
        down.x, down.y, down.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples_fall_back_to_default() {
        let field = derive_reference_field(&[], &[]);
        assert_eq!(field, default_reference_field());
    }

    #[test]
    fn test_mismatched_lengths_fall_back_to_default() {
        let mags = vec![Vector3::new(0.3, 0.0, 0.4)];
        let accels = vec![Vector3::new(0.0, 0.0, 9.8), Vector3::new(0.0, 0.0, 9.8)];
        let field = derive_reference_field(&mags, &accels);
        assert_eq!(field, default_reference_field());
    }

    #[test]
    fn test_level_samples_produce_unit_field() {
        // Level sensor: specific force straight up in body coordinates.
        let accels = vec![Vector3::new(0.0, 0.0, 9.80665); 8];
        let mags = vec![Vector3::new(0.29, -0.05, 0.42); 8];

        let field = derive_reference_field(&mags, &accels);
        assert!((field.norm() - 1.0).abs() < 1e-9);
        // The vertical component survives the gravity-seeded projection.
        assert!(field.z.abs() > 0.5);
    }

    #[test]
    fn test_averaging_rejects_sample_noise() {
        let accels = vec![
            Vector3::new(0.1, 0.0, 9.8),
            Vector3::new(-0.1, 0.0, 9.8),
            Vector3::new(0.0, 0.1, 9.8),
            Vector3::new(0.0, -0.1, 9.8),
        ];
        let base = Vector3::new(0.3, 0.0, 0.45);
        let mags = vec![
            base + Vector3::new(0.01, 0.0, 0.0),
            base - Vector3::new(0.01, 0.0, 0.0),
            base + Vector3::new(0.0, 0.01, 0.0),
            base - Vector3::new(0.0, 0.01, 0.0),
        ];

        let noisy = derive_reference_field(&mags, &accels);
        let clean = derive_reference_field(
            &vec![base; 4],
            &vec![Vector3::new(0.0, 0.0, 9.8); 4],
        );
        assert!((noisy - clean).norm() < 1e-9);
    }

    #[test]
    fn test_degenerate_accel_produces_zero_field() {
        let accels = vec![Vector3::zeros()];
        let mags = vec![Vector3::new(0.3, 0.0, 0.4)];
        let field = derive_reference_field(&mags, &accels);
        assert_eq!(field, Vector3::zeros());
    }

    #[test]
    fn test_sub_threshold_accel_also_produces_zero_field() {
        // A tiny but non-zero gravity estimate is still degenerate:
        // normalization zeroes it rather than passing the residual
        // through, so the derived field is exactly zero, not a scaled
        // remnant of the survey.
        let accels = vec![Vector3::new(0.0, 0.0, 1e-9)];
        let mags = vec![Vector3::new(0.3, 0.0, 0.4)];
        let field = derive_reference_field(&mags, &accels);
        assert_eq!(field, Vector3::zeros());
    }
}
