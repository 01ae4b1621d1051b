use thiserror::Error;

/// Navigation filter error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EkfError {
    #[error("Filter not initialized")]
    NotInitialized,

    #[error("Time step must be positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("Gravity must be positive, got {0}")]
    InvalidGravity(f64),

    #[error("Matrix shape mismatch: {lhs_rows}x{lhs_cols} vs {rhs_rows}x{rhs_cols}")]
    ShapeMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Matrix is singular")]
    Singular,
}

/// Result type for filter operations
pub type EkfResult<T> = Result<T, EkfError>;
