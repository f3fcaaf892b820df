pub mod error;
pub mod models;
pub mod predictor;
pub mod stats;

pub use error::{PredictorError, PredictorResult};
pub use models::Draw;
pub use predictor::{NumberReport, Prediction, Predictor, ScoreBreakdown, ScoredNumber};
pub use stats::MAX_NUMBER;
