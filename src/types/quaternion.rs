//! Hamilton quaternion algebra for the attitude sub-state.

use std::ops::Mul;

use nalgebra::Vector3;

/// Magnitude below which a quaternion is treated as degenerate.
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Attitude quaternion, Hamilton convention, scalar-first.
///
/// Represents the body-to-NED rotation. The filter carries the four
/// components directly in its state vector, so a quaternion is not
/// unit-norm in general between corrections; normalize before using one
/// as a rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Scale to unit length. A near-zero quaternion normalizes to the
    /// identity rather than dividing by a vanishing magnitude.
    pub fn normalize(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude < DEGENERATE_EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / magnitude;
        Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Multiplicative inverse, conjugate / |q|²; identity on a near-zero
    /// magnitude.
    pub fn inverse(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq < DEGENERATE_EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / mag_sq;
        let c = self.conjugate();
        Self::new(c.w * inv, c.x * inv, c.y * inv, c.z * inv)
    }

    /// Rotate a body-frame vector into NED, v' = q ⊗ v ⊗ q*.
    ///
    /// Expects a unit quaternion.
    pub fn rotate(&self, v: Vector3<f64>) -> Vector3<f64> {
        let qw2 = self.w * self.w;
        let qx2 = self.x * self.x;
        let qy2 = self.y * self.y;
        let qz2 = self.z * self.z;

        let qwx = self.w * self.x;
        let qwy = self.w * self.y;
        let qwz = self.w * self.z;
        let qxy = self.x * self.y;
        let qxz = self.x * self.z;
        let qyz = self.y * self.z;

        let r00 = qw2 + qx2 - qy2 - qz2;
        let r01 = 2.0 * (qxy - qwz);
        let r02 = 2.0 * (qxz + qwy);

        let r10 = 2.0 * (qxy + qwz);
        let r11 = qw2 - qx2 + qy2 - qz2;
        let r12 = 2.0 * (qyz - qwx);

        let r20 = 2.0 * (qxz - qwy);
        let r21 = 2.0 * (qyz + qwx);
        let r22 = qw2 - qx2 - qy2 + qz2;

        Vector3::new(
            r00 * v.x + r01 * v.y + r02 * v.z,
            r10 * v.x + r11 * v.y + r12 * v.z,
            r20 * v.x + r21 * v.y + r22 * v.z,
        )
    }

    /// Rotate an NED-frame vector into the body frame, v' = q* ⊗ v ⊗ q.
    pub fn rotate_inverse(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.conjugate().rotate(v)
    }

    /// Attitude kinematics, q̇ = ½ · q ⊗ (0, ω) for a body-frame angular
    /// rate ω.
    pub fn derivative(&self, omega: Vector3<f64>) -> Self {
        let omega_quat = Self::new(0.0, omega.x, omega.y, omega.z);
        let q_dot = *self * omega_quat;
        Self::new(0.5 * q_dot.w, 0.5 * q_dot.x, 0.5 * q_dot.y, 0.5 * q_dot.z)
    }

    /// Build from roll/pitch/yaw in the ZYX aerospace convention
    /// (intrinsic yaw, then pitch, then roll). The result is normalized.
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let cr = (roll * 0.5).cos();
        let sr = (roll * 0.5).sin();
        let cp = (pitch * 0.5).cos();
        let sp = (pitch * 0.5).sin();
        let cy = (yaw * 0.5).cos();
        let sy = (yaw * 0.5).sin();

        Self::new(
            cr * cp * cy + sr * sp * sy,
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
        )
        .normalize()
    }

    /// Recover (roll, pitch, yaw) in the ZYX aerospace convention.
    ///
    /// Pitch saturates at ±π/2 at the gimbal singularity.
    pub fn to_euler(&self) -> (f64, f64, f64) {
        let q = self.normalize();

        let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));

        let sinp = 2.0 * (q.w * q.y - q.z * q.x);
        let pitch = if sinp.abs() >= 1.0 {
            (std::f64::consts::PI / 2.0).copysign(sinp)
        } else {
            sinp.asin()
        };

        let yaw = (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));

        (roll, pitch, yaw)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    /// Hamilton product.
    fn mul(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}
