use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The terminal could not be queried or switched into game mode.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}")]
    SurfaceTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} does not fit inside the canvas")]
    LargerThanCanvas { field: &'static str },
}
