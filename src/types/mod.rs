pub mod linalg;
pub mod quaternion;
pub mod vector;

pub use linalg::Matrix;
pub use quaternion::Quaternion;
