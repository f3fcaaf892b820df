use serde::Serialize;

use crate::error::PredictorResult;
use crate::models::Draw;
use crate::stats::{DatasetStatistics, NumberStatistics};

pub const OVERDUE_WEIGHT: f64 = 0.35;
pub const AFFINITY_WEIGHT: f64 = 0.25;
pub const FREQUENCY_WEIGHT: f64 = 0.25;
pub const POSITIONAL_WEIGHT: f64 = 0.15;

/// Score attribué faute de données (affinité ou position).
pub const NEUTRAL_SCORE: f64 = 50.0;
/// Score de retard d'un numéro jamais sorti.
pub const NEVER_DRAWN_OVERDUE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub number: u32,
    pub overdue: f64,
    pub affinity: f64,
    pub frequency: f64,
    pub positional: f64,
}

impl ScoreBreakdown {
    pub fn combined(&self) -> f64 {
        OVERDUE_WEIGHT * self.overdue
            + AFFINITY_WEIGHT * self.affinity
            + FREQUENCY_WEIGHT * self.frequency
            + POSITIONAL_WEIGHT * self.positional
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNumber {
    pub number: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predictions: Vec<u32>,
    pub scores: Vec<ScoredNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberReport {
    pub number: u32,
    pub occurrences: u32,
    /// Pourcentage de tirages, arrondi à 2 décimales.
    pub frequency: f64,
    /// `None` : jamais sorti.
    pub draws_since_last_appearance: Option<usize>,
    pub preferred_position: Option<usize>,
    pub overdue_score: f64,
    pub frequency_score: f64,
    pub positional_score: f64,
}

/// Moteur de scoring : statistiques figées à la construction, lecture seule ensuite.
#[derive(Debug, Clone)]
pub struct Predictor {
    stats: DatasetStatistics,
}

impl Predictor {
    /// `draws[0]` = tirage le plus ancien. Refuse un historique vide.
    pub fn new(draws: &[Draw]) -> PredictorResult<Self> {
        let stats = DatasetStatistics::build(draws)?;
        Ok(Self { stats })
    }

    pub fn max_number(&self) -> u32 {
        self.stats.max_number()
    }

    pub fn total_draws(&self) -> usize {
        self.stats.total_draws()
    }

    pub fn statistics(&self) -> &DatasetStatistics {
        &self.stats
    }

    /// Les `count` meilleurs candidats, score décroissant puis numéro croissant.
    pub fn predict(&self, count: usize, last_draw: Option<&[u32]>) -> Prediction {
        let mut ranked: Vec<(u32, f64)> = self
            .stats
            .iter()
            .map(|(number, stat)| (number, self.breakdown(number, stat, last_draw).combined()))
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(count);

        Prediction {
            predictions: ranked.iter().map(|&(number, _)| number).collect(),
            scores: ranked
                .iter()
                .map(|&(number, score)| ScoredNumber {
                    number,
                    score: round2(score),
                })
                .collect(),
        }
    }

    pub fn score_breakdown(&self, number: u32, last_draw: Option<&[u32]>) -> Option<ScoreBreakdown> {
        self.stats
            .get(number)
            .map(|stat| self.breakdown(number, stat, last_draw))
    }

    pub fn number_stats(&self, number: u32) -> Option<NumberReport> {
        let stat = self.stats.get(number)?;
        let total = self.total_draws();

        Some(NumberReport {
            number,
            occurrences: stat.occurrences,
            frequency: round2(stat.occurrences as f64 / total as f64 * 100.0),
            draws_since_last_appearance: stat.draws_since_last_appearance(total),
            preferred_position: stat.preferred_position().map(|(position, _)| position),
            overdue_score: round2(self.overdue_score(stat)),
            frequency_score: round2(self.frequency_score(stat)),
            positional_score: round2(positional_score(stat)),
        })
    }

    fn breakdown(&self, number: u32, stat: &NumberStatistics, last_draw: Option<&[u32]>) -> ScoreBreakdown {
        ScoreBreakdown {
            number,
            overdue: self.overdue_score(stat),
            affinity: self.affinity_score(number, last_draw),
            frequency: self.frequency_score(stat),
            positional: positional_score(stat),
        }
    }

    // Pas de plafond : un numéro absent très longtemps dépasse 100.
    fn overdue_score(&self, stat: &NumberStatistics) -> f64 {
        match stat.draws_since_last_appearance(self.total_draws()) {
            None => NEVER_DRAWN_OVERDUE,
            Some(since) => since as f64 / self.stats.expected_gap() * 100.0,
        }
    }

    fn affinity_score(&self, number: u32, last_draw: Option<&[u32]>) -> f64 {
        let last_draw = match last_draw {
            Some(draw) if !draw.is_empty() => draw,
            _ => return NEUTRAL_SCORE,
        };

        let total = self.total_draws() as f64;
        let (sum, contributors) = last_draw
            .iter()
            .filter_map(|&prev| self.stats.after_count(prev, number))
            .fold((0.0f64, 0usize), |(sum, n), count| {
                (sum + count as f64 / total * 100.0, n + 1)
            });

        if contributors > 0 {
            sum / contributors as f64
        } else {
            NEUTRAL_SCORE
        }
    }

    // Peut devenir négatif loin de la fréquence idéale.
    fn frequency_score(&self, stat: &NumberStatistics) -> f64 {
        let frequency = stat.occurrences as f64 / self.total_draws() as f64 * 100.0;
        let ideal = 100.0 / self.max_number() as f64;
        100.0 - (frequency - ideal).abs() * 3.0
    }
}

fn positional_score(stat: &NumberStatistics) -> f64 {
    match stat.preferred_position() {
        None => NEUTRAL_SCORE,
        Some((_, count)) => count as f64 / stat.occurrences as f64 * 100.0,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
