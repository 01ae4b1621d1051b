/// Navigation estimators
///
/// Hosts the 16-state strapdown EKF, the layout of its state vector,
/// and the one-shot magnetic-reference survey that seeds the
/// magnetometer update.
pub mod ekf_16d;
pub mod mag_reference;
pub mod state;

pub use ekf_16d::Ekf16d;
pub use state::NavState;
