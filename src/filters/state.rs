//! Layout of the 16-element navigation state.
//!
//! The index constants are part of the filter contract: the propagation
//! and measurement Jacobians address the quaternion and bias entries by
//! these positions, so they must not be reordered.

use serde::{Deserialize, Serialize};

// ===== State vector indices =====
pub const STATE_POS_N: usize = 0;
pub const STATE_POS_E: usize = 1;
pub const STATE_POS_D: usize = 2;
pub const STATE_VEL_N: usize = 3;
pub const STATE_VEL_E: usize = 4;
pub const STATE_VEL_D: usize = 5;
pub const STATE_QUAT_W: usize = 6;
pub const STATE_QUAT_X: usize = 7;
pub const STATE_QUAT_Y: usize = 8;
pub const STATE_QUAT_Z: usize = 9;
pub const STATE_GYRO_BIAS_X: usize = 10;
pub const STATE_GYRO_BIAS_Y: usize = 11;
pub const STATE_GYRO_BIAS_Z: usize = 12;
pub const STATE_ACC_BIAS_X: usize = 13;
pub const STATE_ACC_BIAS_Y: usize = 14;
pub const STATE_ACC_BIAS_Z: usize = 15;

/// Covariance diagonal installed by `set_initial_state`.
pub(crate) const INITIAL_P_DIAG: [f64; 16] = [
    10.0, 10.0, 10.0, // position uncertainty (m²)
    1.0, 1.0, 1.0, // velocity uncertainty (m/s)²
    0.1, 0.1, 0.1, 0.1, // quaternion components (unitless)
    0.01, 0.01, 0.01, // gyro bias uncertainty (rad/s)²
    0.1, 0.1, 0.1, // accel bias uncertainty (m/s²)²
];

/// Inflated covariance diagonal installed by `reset`.
pub(crate) const RESET_P_DIAG: [f64; 16] = [
    100.0, 100.0, 100.0, // position uncertainty (m²)
    10.0, 10.0, 10.0, // velocity uncertainty (m/s)²
    1.0, 1.0, 1.0, 1.0, // quaternion components (unitless)
    0.01, 0.01, 0.01, // gyro bias uncertainty (rad/s)²
    0.1, 0.1, 0.1, // accel bias uncertainty (m/s²)²
];

/// Snapshot of the filter outputs for logging and telemetry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavState {
    /// Position in the NED tangent frame [meters]
    pub position: (f64, f64, f64),

    /// Velocity in the NED tangent frame [m/s]
    pub velocity: (f64, f64, f64),

    /// Quaternion (w, x, y, z) representing body-to-NED attitude
    pub quaternion: (f64, f64, f64, f64),

    /// Roll, pitch, yaw in the ZYX aerospace convention [rad]
    pub euler: (f64, f64, f64),

    /// Gyro bias estimate [rad/s]
    pub gyro_bias: (f64, f64, f64),

    /// Accel bias estimate [m/s²]
    pub accel_bias: (f64, f64, f64),

    /// Covariance trace for uncertainty (negative roundoff clamped)
    pub covariance_trace: f64,

    /// Sqrt of the mean N/E position variance [meters]
    pub horizontal_uncertainty_m: f64,

    /// Step counters
    pub predict_count: u64,
    pub gps_updates: u64,
    pub baro_updates: u64,
    pub mag_updates: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_cover_state() {
        assert_eq!(STATE_POS_N, 0);
        assert_eq!(STATE_QUAT_W, 6);
        assert_eq!(STATE_GYRO_BIAS_X, STATE_QUAT_Z + 1);
        assert_eq!(STATE_ACC_BIAS_Z, 15);
    }

    #[test]
    fn test_nav_state_serde_round_trip() {
        let state = NavState {
            position: (1.0, 2.0, -3.0),
            velocity: (0.1, 0.0, -0.2),
            quaternion: (1.0, 0.0, 0.0, 0.0),
            euler: (0.0, 0.0, 0.0),
            gyro_bias: (0.001, -0.002, 0.0),
            accel_bias: (0.01, 0.0, -0.03),
            covariance_trace: 12.5,
            horizontal_uncertainty_m: 3.1,
            predict_count: 100,
            gps_updates: 4,
            baro_updates: 9,
            mag_updates: 2,
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: NavState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position, state.position);
        assert_eq!(back.covariance_trace, state.covariance_trace);
        assert_eq!(back.mag_updates, state.mag_updates);
    }
}
