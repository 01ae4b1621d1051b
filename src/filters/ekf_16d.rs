//! 16-state Extended Kalman Filter for strapdown inertial navigation.
//!
//! State vector (16D):
//! - `[0-2]`   position (N, E, D) in the local tangent frame (meters)
//! - `[3-5]`   velocity (N, E, D) (m/s)
//! - `[6-9]`   quaternion (qw, qx, qy, qz), body-to-NED attitude
//! - `[10-12]` gyro bias (bx, by, bz) in body frame (rad/s)
//! - `[13-15]` accel bias (bx, by, bz) in body frame (m/s²)
//!
//! High-rate inertial samples drive [`Ekf16d::predict`]; GNSS,
//! barometer, and magnetometer samples drive the matching `update_*`
//! correction. The quaternion lives directly in the state vector and is
//! renormalized after every additive correction.

use nalgebra::Vector3;

use crate::error::{EkfError, EkfResult};
use crate::filters::mag_reference;
use crate::filters::state::{
    NavState, INITIAL_P_DIAG, RESET_P_DIAG, STATE_ACC_BIAS_X, STATE_ACC_BIAS_Y, STATE_ACC_BIAS_Z,
    STATE_GYRO_BIAS_X, STATE_GYRO_BIAS_Y, STATE_GYRO_BIAS_Z, STATE_POS_D, STATE_POS_E,
    STATE_POS_N, STATE_QUAT_W, STATE_QUAT_X, STATE_QUAT_Y, STATE_QUAT_Z, STATE_VEL_D, STATE_VEL_E,
    STATE_VEL_N,
};
use crate::types::linalg::{
    Matrix, MEASURE_DIM_BARO, MEASURE_DIM_GPS_POS, MEASURE_DIM_GPS_PV, MEASURE_DIM_MAG, STATE_DIM,
};
use crate::types::quaternion::Quaternion;

const DEFAULT_GRAVITY: f64 = 9.80665; // m/s², +Down in NED

/// 16-state inertial navigation filter.
pub struct Ekf16d {
    /// State vector [16x1]
    x: Matrix,

    /// Covariance matrix [16x16]
    p: Matrix,

    /// Process noise, variance per second [16x16]
    q: Matrix,

    /// GNSS position+velocity measurement noise [6x6]
    r_gps: Matrix,

    /// Barometric altitude measurement noise [1x1]
    r_baro: Matrix,

    /// Magnetometer measurement noise [3x3]
    r_mag: Matrix,

    /// Gravity magnitude along NED Down [m/s²]
    gravity: f64,

    /// Earth magnetic field reference in NED
    earth_mag_ned: Vector3<f64>,

    /// True once a valid initial state has been supplied
    initialized: bool,

    /// Step counters
    predict_count: u64,
    gps_updates: u64,
    baro_updates: u64,
    mag_updates: u64,
}

impl Default for Ekf16d {
    fn default() -> Self {
        Self::new()
    }
}

impl Ekf16d {
    /// Create a filter with the default noise configuration.
    ///
    /// Defaults: P = I, Q = 0.01·I, GNSS noise 5 m / 0.5 m/s horizontal
    /// and 10 m / 1 m/s vertical, baro 1 m, magnetometer 0.1, gravity
    /// 9.80665 m/s², and the fallback reference field. The filter starts
    /// uninitialized and rejects predict/update until
    /// [`Ekf16d::set_initial_state`] runs.
    pub fn new() -> Self {
        let mut x = Matrix::new(STATE_DIM, 1);
        x[(STATE_QUAT_W, 0)] = 1.0;

        let p = Matrix::identity(STATE_DIM);

        let mut q = Matrix::new(STATE_DIM, STATE_DIM);
        q.set_diagonal(0.01);

        let mut r_gps = Matrix::new(MEASURE_DIM_GPS_PV, MEASURE_DIM_GPS_PV);
        r_gps.set_diagonal_vector(&[25.0, 25.0, 100.0, 0.25, 0.25, 1.0]);

        let mut r_baro = Matrix::new(MEASURE_DIM_BARO, MEASURE_DIM_BARO);
        r_baro.set_diagonal(1.0);

        let mut r_mag = Matrix::new(MEASURE_DIM_MAG, MEASURE_DIM_MAG);
        r_mag.set_diagonal(0.01);

        Self {
            x,
            p,
            q,
            r_gps,
            r_baro,
            r_mag,
            gravity: DEFAULT_GRAVITY,
            earth_mag_ned: mag_reference::default_reference_field(),
            initialized: false,
            predict_count: 0,
            gps_updates: 0,
            baro_updates: 0,
            mag_updates: 0,
        }
    }

    // ===== Configuration =====

    /// Set the diagonal process noise from per-state standard deviations.
    ///
    /// Units are "per square-root second": Q is applied as Q·dt during
    /// propagation.
    pub fn set_process_noise(
        &mut self,
        pos_std: f64,
        vel_std: f64,
        att_std: f64,
        gyro_bias_std: f64,
        acc_bias_std: f64,
    ) {
        let pos_var = pos_std * pos_std;
        let vel_var = vel_std * vel_std;
        let att_var = att_std * att_std;
        let gyro_var = gyro_bias_std * gyro_bias_std;
        let acc_var = acc_bias_std * acc_bias_std;

        self.q.set_diagonal_vector(&[
            pos_var, pos_var, pos_var, //
            vel_var, vel_var, vel_var, //
            att_var, att_var, att_var, att_var, //
            gyro_var, gyro_var, gyro_var, //
            acc_var, acc_var, acc_var,
        ]);
    }

    /// Set the GNSS measurement noise from position/velocity standard
    /// deviations, applied to all three axes of each.
    pub fn set_gps_noise(&mut self, pos_std: f64, vel_std: f64) {
        let pos_var = pos_std * pos_std;
        let vel_var = vel_std * vel_std;
        self.r_gps
            .set_diagonal_vector(&[pos_var, pos_var, pos_var, vel_var, vel_var, vel_var]);
    }

    /// Set the barometric altitude noise standard deviation.
    pub fn set_baro_noise(&mut self, baro_std: f64) {
        self.r_baro.set_diagonal(baro_std * baro_std);
    }

    /// Set the magnetometer noise standard deviation, applied per axis.
    pub fn set_mag_noise(&mut self, mag_std: f64) {
        self.r_mag.set_diagonal(mag_std * mag_std);
    }

    /// Set the NED-frame Earth magnetic field reference directly.
    pub fn set_earth_magnetic_field(&mut self, mag_ned: Vector3<f64>) {
        self.earth_mag_ned = mag_ned;
    }

    /// Derive the reference field from paired stationary samples; falls
    /// back to the documented default on empty or mismatched input.
    pub fn initialize_magnetic_field(
        &mut self,
        mag_samples: &[Vector3<f64>],
        accel_samples: &[Vector3<f64>],
    ) {
        self.earth_mag_ned = mag_reference::derive_reference_field(mag_samples, accel_samples);
        log::debug!(
            "magnetic reference initialized: ({:.3}, {:.3}, {:.3})",
            self.earth_mag_ned.x,
            self.earth_mag_ned.y,
            self.earth_mag_ned.z
        );
    }

    /// Override the gravity magnitude (m/s², +Down).
    pub fn set_gravity(&mut self, gravity: f64) -> EkfResult<()> {
        if gravity <= 0.0 {
            return Err(EkfError::InvalidGravity(gravity));
        }
        self.gravity = gravity;
        Ok(())
    }

    // ===== Initialization =====

    /// Install the initial state and the documented initial covariance
    /// diagonal, and enable predict/update.
    pub fn set_initial_state(
        &mut self,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        attitude: Quaternion,
    ) {
        self.write_position(pos);
        self.write_velocity(vel);
        self.write_attitude(attitude.normalize());

        self.x[(STATE_GYRO_BIAS_X, 0)] = 0.0;
        self.x[(STATE_GYRO_BIAS_Y, 0)] = 0.0;
        self.x[(STATE_GYRO_BIAS_Z, 0)] = 0.0;
        self.x[(STATE_ACC_BIAS_X, 0)] = 0.0;
        self.x[(STATE_ACC_BIAS_Y, 0)] = 0.0;
        self.x[(STATE_ACC_BIAS_Z, 0)] = 0.0;

        self.p.set_diagonal_vector(&INITIAL_P_DIAG);
        self.initialized = true;
    }

    /// Zero the state, restore the identity attitude, inflate the
    /// covariance, and drop back to the uninitialized lifecycle stage.
    pub fn reset(&mut self) {
        self.x.set_zero();
        self.x[(STATE_QUAT_W, 0)] = 1.0;
        self.p.set_diagonal_vector(&RESET_P_DIAG);
        self.initialized = false;
        self.predict_count = 0;
        self.gps_updates = 0;
        self.baro_updates = 0;
        self.mag_updates = 0;
        log::debug!("filter reset");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ===== Prediction =====

    /// Strapdown propagation from one inertial sample.
    ///
    /// Bias-corrects the gyro and accelerometer, Euler-integrates the
    /// attitude kinematics, rotates the specific force into NED, removes
    /// gravity, integrates velocity then position, and propagates the
    /// covariance with the analytic transition Jacobian:
    /// P ← F·P·Fᵀ + Q·dt.
    ///
    /// The specific force is rotated by the freshly integrated attitude,
    /// and the Jacobian is evaluated at the propagated state; both
    /// choices are fixed and matched in the tests.
    pub fn predict(
        &mut self,
        gyro: Vector3<f64>,
        accel: Vector3<f64>,
        dt: f64,
    ) -> EkfResult<()> {
        if dt <= 0.0 {
            return Err(EkfError::InvalidTimeStep(dt));
        }
        if !self.initialized {
            return Err(EkfError::NotInitialized);
        }

        let gyro_bias = self.gyro_bias_raw();
        let accel_bias = self.accel_bias_raw();
        let gyro_corrected = gyro - gyro_bias;
        let accel_corrected = accel - accel_bias;

        // 1. Attitude integration.
        let q = self.attitude_raw().normalize();
        let q_dot = q.derivative(gyro_corrected);
        let q = Quaternion::new(
            q.w + q_dot.w * dt,
            q.x + q_dot.x * dt,
            q.y + q_dot.y * dt,
            q.z + q_dot.z * dt,
        )
        .normalize();

        // 2. Specific force to NED, gravity removed.
        let accel_ned = q.rotate(accel_corrected) - Vector3::new(0.0, 0.0, self.gravity);

        // 3. Velocity, then position from the updated velocity.
        let vel = self.velocity_raw() + accel_ned * dt;
        let pos = self.position_raw() + vel * dt;

        self.write_position(pos);
        self.write_velocity(vel);
        self.write_attitude(q);
        // Biases are corrected only by measurement updates.

        // 4. Covariance propagation.
        let f = self.transition_jacobian(dt);
        let propagated = f.multiply(&self.p)?.multiply(&f.transpose())?;
        self.p = propagated.add(&self.q.scale(dt))?;

        self.predict_count += 1;
        Ok(())
    }

    /// State transition Jacobian F = ∂f/∂x, evaluated at the current
    /// state.
    ///
    /// Identity plus three blocks: ∂pos/∂vel = dt·I₃, the 4x3
    /// attitude/gyro-bias coupling from q̇ = ½·q ⊗ (ω − b_g), and
    /// ∂vel/∂b_a = −R(q)·dt.
    fn transition_jacobian(&self, dt: f64) -> Matrix {
        let mut f = Matrix::identity(STATE_DIM);

        f[(STATE_POS_N, STATE_VEL_N)] = dt;
        f[(STATE_POS_E, STATE_VEL_E)] = dt;
        f[(STATE_POS_D, STATE_VEL_D)] = dt;

        let q = self.attitude_raw().normalize();
        let (qw, qx, qy, qz) = (q.w, q.x, q.y, q.z);

        f[(STATE_QUAT_W, STATE_GYRO_BIAS_X)] = -0.5 * qx * dt;
        f[(STATE_QUAT_W, STATE_GYRO_BIAS_Y)] = -0.5 * qy * dt;
        f[(STATE_QUAT_W, STATE_GYRO_BIAS_Z)] = -0.5 * qz * dt;

        f[(STATE_QUAT_X, STATE_GYRO_BIAS_X)] = 0.5 * qw * dt;
        f[(STATE_QUAT_X, STATE_GYRO_BIAS_Y)] = -0.5 * qz * dt;
        f[(STATE_QUAT_X, STATE_GYRO_BIAS_Z)] = 0.5 * qy * dt;

        f[(STATE_QUAT_Y, STATE_GYRO_BIAS_X)] = 0.5 * qz * dt;
        f[(STATE_QUAT_Y, STATE_GYRO_BIAS_Y)] = 0.5 * qw * dt;
        f[(STATE_QUAT_Y, STATE_GYRO_BIAS_Z)] = -0.5 * qx * dt;

        f[(STATE_QUAT_Z, STATE_GYRO_BIAS_X)] = -0.5 * qy * dt;
        f[(STATE_QUAT_Z, STATE_GYRO_BIAS_Y)] = 0.5 * qx * dt;
        f[(STATE_QUAT_Z, STATE_GYRO_BIAS_Z)] = 0.5 * qw * dt;

        // Body-to-NED rotation matrix from the unit quaternion.
        let r00 = 1.0 - 2.0 * (qy * qy + qz * qz);
        let r01 = 2.0 * (qx * qy - qw * qz);
        let r02 = 2.0 * (qx * qz + qw * qy);
        let r10 = 2.0 * (qx * qy + qw * qz);
        let r11 = 1.0 - 2.0 * (qx * qx + qz * qz);
        let r12 = 2.0 * (qy * qz - qw * qx);
        let r20 = 2.0 * (qx * qz - qw * qy);
        let r21 = 2.0 * (qy * qz + qw * qx);
        let r22 = 1.0 - 2.0 * (qx * qx + qy * qy);

        f[(STATE_VEL_N, STATE_ACC_BIAS_X)] = -r00 * dt;
        f[(STATE_VEL_N, STATE_ACC_BIAS_Y)] = -r01 * dt;
        f[(STATE_VEL_N, STATE_ACC_BIAS_Z)] = -r02 * dt;

        f[(STATE_VEL_E, STATE_ACC_BIAS_X)] = -r10 * dt;
        f[(STATE_VEL_E, STATE_ACC_BIAS_Y)] = -r11 * dt;
        f[(STATE_VEL_E, STATE_ACC_BIAS_Z)] = -r12 * dt;

        f[(STATE_VEL_D, STATE_ACC_BIAS_X)] = -r20 * dt;
        f[(STATE_VEL_D, STATE_ACC_BIAS_Y)] = -r21 * dt;
        f[(STATE_VEL_D, STATE_ACC_BIAS_Z)] = -r22 * dt;

        f
    }

    // ===== Measurement updates =====

    /// GNSS position + velocity correction (6D measurement).
    pub fn update_gps(&mut self, pos: Vector3<f64>, vel: Vector3<f64>) -> EkfResult<()> {
        if !self.initialized {
            return Err(EkfError::NotInitialized);
        }

        let mut h = Matrix::new(MEASURE_DIM_GPS_PV, STATE_DIM);
        h[(0, STATE_POS_N)] = 1.0;
        h[(1, STATE_POS_E)] = 1.0;
        h[(2, STATE_POS_D)] = 1.0;
        h[(3, STATE_VEL_N)] = 1.0;
        h[(4, STATE_VEL_E)] = 1.0;
        h[(5, STATE_VEL_D)] = 1.0;

        let pos_pred = self.position_raw();
        let vel_pred = self.velocity_raw();
        let mut y = Matrix::new(MEASURE_DIM_GPS_PV, 1);
        y[(0, 0)] = pos.x - pos_pred.x;
        y[(1, 0)] = pos.y - pos_pred.y;
        y[(2, 0)] = pos.z - pos_pred.z;
        y[(3, 0)] = vel.x - vel_pred.x;
        y[(4, 0)] = vel.y - vel_pred.y;
        y[(5, 0)] = vel.z - vel_pred.z;

        self.apply_update(h, self.r_gps, y)?;
        self.gps_updates += 1;
        Ok(())
    }

    /// GNSS position-only correction (3D measurement), for receivers
    /// that report no usable velocity. Uses the position block of the
    /// GNSS noise matrix.
    pub fn update_gps_position(&mut self, pos: Vector3<f64>) -> EkfResult<()> {
        if !self.initialized {
            return Err(EkfError::NotInitialized);
        }

        let mut h = Matrix::new(MEASURE_DIM_GPS_POS, STATE_DIM);
        h[(0, STATE_POS_N)] = 1.0;
        h[(1, STATE_POS_E)] = 1.0;
        h[(2, STATE_POS_D)] = 1.0;

        let mut r = Matrix::new(MEASURE_DIM_GPS_POS, MEASURE_DIM_GPS_POS);
        for i in 0..MEASURE_DIM_GPS_POS {
            for j in 0..MEASURE_DIM_GPS_POS {
                r[(i, j)] = self.r_gps[(i, j)];
            }
        }

        let pos_pred = self.position_raw();
        let mut y = Matrix::new(MEASURE_DIM_GPS_POS, 1);
        y[(0, 0)] = pos.x - pos_pred.x;
        y[(1, 0)] = pos.y - pos_pred.y;
        y[(2, 0)] = pos.z - pos_pred.z;

        self.apply_update(h, r, y)?;
        self.gps_updates += 1;
        Ok(())
    }

    /// Barometric altitude correction. The measurement is the Down
    /// coordinate in NED, so altitudes above the origin are negative.
    pub fn update_baro(&mut self, altitude_down: f64) -> EkfResult<()> {
        if !self.initialized {
            return Err(EkfError::NotInitialized);
        }

        let mut h = Matrix::new(MEASURE_DIM_BARO, STATE_DIM);
        h[(0, STATE_POS_D)] = 1.0;

        let mut y = Matrix::new(MEASURE_DIM_BARO, 1);
        y[(0, 0)] = altitude_down - self.x[(STATE_POS_D, 0)];

        self.apply_update(h, self.r_baro, y)?;
        self.baro_updates += 1;
        Ok(())
    }

    /// Magnetometer correction. Predicts the body-frame field as
    /// R(q)ᵀ · m_ref and corrects the attitude through the analytic
    /// measurement Jacobian.
    pub fn update_mag(&mut self, mag: Vector3<f64>) -> EkfResult<()> {
        if !self.initialized {
            return Err(EkfError::NotInitialized);
        }

        let h = self.mag_jacobian();

        let q = self.attitude_raw().normalize();
        let mag_pred = q.rotate_inverse(self.earth_mag_ned);
        let mut y = Matrix::new(MEASURE_DIM_MAG, 1);
        y[(0, 0)] = mag.x - mag_pred.x;
        y[(1, 0)] = mag.y - mag_pred.y;
        y[(2, 0)] = mag.z - mag_pred.z;

        self.apply_update(h, self.r_mag, y)?;
        self.mag_updates += 1;
        Ok(())
    }

    /// Measurement Jacobian of the body-frame field prediction with
    /// respect to the quaternion sub-state, ∂(R(q)ᵀ·m)/∂q.
    fn mag_jacobian(&self) -> Matrix {
        let mut h = Matrix::new(MEASURE_DIM_MAG, STATE_DIM);

        let q = self.attitude_raw();
        let (qw, qx, qy, qz) = (q.w, q.x, q.y, q.z);
        let (mx, my, mz) = (
            self.earth_mag_ned.x,
            self.earth_mag_ned.y,
            self.earth_mag_ned.z,
        );

        h[(0, STATE_QUAT_W)] = 2.0 * (-qz * my + qy * mz);
        h[(1, STATE_QUAT_W)] = 2.0 * (qz * mx - qx * mz);
        h[(2, STATE_QUAT_W)] = 2.0 * (-qy * mx + qx * my);

        h[(0, STATE_QUAT_X)] = 2.0 * (qy * my + qz * mz);
        h[(1, STATE_QUAT_X)] = 2.0 * (qy * mx - 2.0 * qx * my - qw * mz);
        h[(2, STATE_QUAT_X)] = 2.0 * (qz * mx + qw * my - 2.0 * qx * mz);

        h[(0, STATE_QUAT_Y)] = 2.0 * (-2.0 * qy * mx + qx * my + qw * mz);
        h[(1, STATE_QUAT_Y)] = 2.0 * (qx * mx + qz * mz);
        h[(2, STATE_QUAT_Y)] = 2.0 * (-qw * mx + qz * my - 2.0 * qy * mz);

        h[(0, STATE_QUAT_Z)] = 2.0 * (-2.0 * qz * mx - qw * my + qx * mz);
        h[(1, STATE_QUAT_Z)] = 2.0 * (qw * mx - 2.0 * qz * my + qy * mz);
        h[(2, STATE_QUAT_Z)] = 2.0 * (qx * mx + qy * my);

        h
    }

    /// Shared Kalman correction:
    /// y already holds z − h(x); compute S = H·P·Hᵀ + R,
    /// K = P·Hᵀ·S⁻¹, apply x += K·y, renormalize the quaternion
    /// sub-state, then P = (I − K·H)·P symmetrized as ½(P + Pᵀ).
    ///
    /// A singular innovation covariance aborts the update with the state
    /// and covariance untouched.
    fn apply_update(&mut self, h: Matrix, r: Matrix, y: Matrix) -> EkfResult<()> {
        let h_t = h.transpose();
        let s = h.multiply(&self.p)?.multiply(&h_t)?.add(&r)?;
        let s_inv = match s.inverse() {
            Ok(inv) => inv,
            Err(err) => {
                log::warn!("measurement update aborted: singular innovation covariance");
                return Err(err);
            }
        };

        let k = self.p.multiply(&h_t)?.multiply(&s_inv)?;

        let dx = k.multiply(&y)?;
        self.x = self.x.add(&dx)?;
        self.write_attitude(self.attitude_raw().normalize());

        let kh = k.multiply(&h)?;
        let i_kh = Matrix::identity(STATE_DIM).subtract(&kh)?;
        let p_new = i_kh.multiply(&self.p)?;
        self.p = p_new.add(&p_new.transpose())?.scale(0.5);

        Ok(())
    }

    // ===== Queries =====

    /// Position in NED (meters); zero before initialization.
    pub fn get_position(&self) -> Vector3<f64> {
        if !self.initialized {
            return Vector3::zeros();
        }
        self.position_raw()
    }

    /// Velocity in NED (m/s); zero before initialization.
    pub fn get_velocity(&self) -> Vector3<f64> {
        if !self.initialized {
            return Vector3::zeros();
        }
        self.velocity_raw()
    }

    /// Attitude quaternion, renormalized; identity before initialization.
    pub fn get_attitude(&self) -> Quaternion {
        if !self.initialized {
            return Quaternion::identity();
        }
        self.attitude_raw().normalize()
    }

    /// Roll, pitch, yaw (rad); zeros before initialization.
    pub fn get_euler(&self) -> (f64, f64, f64) {
        self.get_attitude().to_euler()
    }

    /// Gyro bias estimate (rad/s); zero before initialization.
    pub fn get_gyro_bias(&self) -> Vector3<f64> {
        if !self.initialized {
            return Vector3::zeros();
        }
        self.gyro_bias_raw()
    }

    /// Accel bias estimate (m/s²); zero before initialization.
    pub fn get_accel_bias(&self) -> Vector3<f64> {
        if !self.initialized {
            return Vector3::zeros();
        }
        self.accel_bias_raw()
    }

    /// Snapshot of the filter outputs for logging and telemetry.
    ///
    /// Covariance-derived fields clamp small negative roundoff on the
    /// diagonal to zero.
    pub fn get_state(&self) -> NavState {
        let position = self.get_position();
        let velocity = self.get_velocity();
        let attitude = self.get_attitude();
        let euler = self.get_euler();
        let gyro_bias = self.get_gyro_bias();
        let accel_bias = self.get_accel_bias();

        let trace: f64 = (0..STATE_DIM).map(|i| self.p[(i, i)].max(0.0)).sum();
        let horizontal_var = (self.p[(STATE_POS_N, STATE_POS_N)].max(0.0)
            + self.p[(STATE_POS_E, STATE_POS_E)].max(0.0))
            / 2.0;

        NavState {
            position: (position.x, position.y, position.z),
            velocity: (velocity.x, velocity.y, velocity.z),
            quaternion: (attitude.w, attitude.x, attitude.y, attitude.z),
            euler,
            gyro_bias: (gyro_bias.x, gyro_bias.y, gyro_bias.z),
            accel_bias: (accel_bias.x, accel_bias.y, accel_bias.z),
            covariance_trace: trace,
            horizontal_uncertainty_m: horizontal_var.sqrt(),
            predict_count: self.predict_count,
            gps_updates: self.gps_updates,
            baro_updates: self.baro_updates,
            mag_updates: self.mag_updates,
        }
    }

    // ===== State vector access =====

    fn position_raw(&self) -> Vector3<f64> {
        Vector3::new(
            self.x[(STATE_POS_N, 0)],
            self.x[(STATE_POS_E, 0)],
            self.x[(STATE_POS_D, 0)],
        )
    }

    fn velocity_raw(&self) -> Vector3<f64> {
        Vector3::new(
            self.x[(STATE_VEL_N, 0)],
            self.x[(STATE_VEL_E, 0)],
            self.x[(STATE_VEL_D, 0)],
        )
    }

    fn attitude_raw(&self) -> Quaternion {
        Quaternion::new(
            self.x[(STATE_QUAT_W, 0)],
            self.x[(STATE_QUAT_X, 0)],
            self.x[(STATE_QUAT_Y, 0)],
            self.x[(STATE_QUAT_Z, 0)],
        )
    }

    fn gyro_bias_raw(&self) -> Vector3<f64> {
        Vector3::new(
            self.x[(STATE_GYRO_BIAS_X, 0)],
            self.x[(STATE_GYRO_BIAS_Y, 0)],
            self.x[(STATE_GYRO_BIAS_Z, 0)],
        )
    }

    fn accel_bias_raw(&self) -> Vector3<f64> {
        Vector3::new(
            self.x[(STATE_ACC_BIAS_X, 0)],
            self.x[(STATE_ACC_BIAS_Y, 0)],
            self.x[(STATE_ACC_BIAS_Z, 0)],
        )
    }

    fn write_position(&mut self, pos: Vector3<f64>) {
        self.x[(STATE_POS_N, 0)] = pos.x;
        self.x[(STATE_POS_E, 0)] = pos.y;
        self.x[(STATE_POS_D, 0)] = pos.z;
    }

    fn write_velocity(&mut self, vel: Vector3<f64>) {
        self.x[(STATE_VEL_N, 0)] = vel.x;
        self.x[(STATE_VEL_E, 0)] = vel.y;
        self.x[(STATE_VEL_D, 0)] = vel.z;
    }

    fn write_attitude(&mut self, q: Quaternion) {
        self.x[(STATE_QUAT_W, 0)] = q.w;
        self.x[(STATE_QUAT_X, 0)] = q.x;
        self.x[(STATE_QUAT_Y, 0)] = q.y;
        self.x[(STATE_QUAT_Z, 0)] = q.z;
    }

    #[cfg(test)]
    fn covariance(&self) -> &Matrix {
        &self.p
    }
}
