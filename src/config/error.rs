use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("end_date cannot be earlier than start_date")]
    DateOrder,

    #[error("sst_range must be increasing, got [{0}, {1}]")]
    SstRange(f64, f64),

    #[error("chlorophyll_range must be positive and increasing, got [{0}, {1}]")]
    ChlorophyllRange(f64, f64),

    #[error("sst_tick_step must be positive and give at most 100 ticks, got {0}")]
    TickStep(f64),

    #[error("figure_size must be non-zero")]
    FigureSize,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
