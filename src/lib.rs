//! Strapdown inertial-navigation Extended Kalman Filter.
//!
//! Fuses high-rate inertial samples (three-axis angular rate and
//! specific force) with lower-rate aiding measurements — GNSS
//! position/velocity, barometric altitude, and a three-axis
//! magnetometer — into a continuous estimate of position, velocity,
//! attitude, and inertial-sensor biases in a local North-East-Down
//! tangent frame.
//!
//! The filter is a single synchronous object with no internal locking
//! or allocation on the stepping paths; drive it from one thread (or
//! behind external mutual exclusion) in sensor-callback order:
//!
//! ```
//! use nalgebra::Vector3;
//! use nav_ekf_rs::{Ekf16d, Quaternion};
//!
//! let mut ekf = Ekf16d::new();
//! ekf.set_initial_state(Vector3::zeros(), Vector3::zeros(), Quaternion::identity());
//!
//! // 100 Hz inertial stream, stationary and level.
//! ekf.predict(Vector3::zeros(), Vector3::new(0.0, 0.0, 9.80665), 0.01)?;
//!
//! // Aiding measurements arrive asynchronously.
//! ekf.update_gps(Vector3::new(1.0, 2.0, 0.0), Vector3::zeros())?;
//! ekf.update_baro(-10.0)?;
//!
//! let pos = ekf.get_position();
//! # Ok::<(), nav_ekf_rs::EkfError>(())
//! ```

pub mod error;
pub mod filters;
pub mod types;

pub use error::{EkfError, EkfResult};
pub use filters::ekf_16d::Ekf16d;
pub use filters::state::NavState;
pub use types::linalg::Matrix;
pub use types::quaternion::Quaternion;
