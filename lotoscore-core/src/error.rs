use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictorError {
    #[error("Aucun tirage historique exploitable : prédiction impossible")]
    EmptyDataset,

    #[error("Numéro invalide 0 dans le tirage {draw_index} (position {position}) : les numéros commencent à 1")]
    InvalidNumber { draw_index: usize, position: usize },

    #[error("Numéro {number} trop grand dans le tirage {draw_index} (position {position}) : maximum {max}")]
    NumberTooLarge {
        draw_index: usize,
        position: usize,
        number: u32,
        max: u32,
    },
}

pub type PredictorResult<T> = Result<T, PredictorError>;
