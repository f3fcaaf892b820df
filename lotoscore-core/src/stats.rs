use std::collections::HashMap;

use crate::error::{PredictorError, PredictorResult};
use crate::models::Draw;

/// Plus grand numéro accepté : une entrée de statistiques est allouée par numéro de la plage.
pub const MAX_NUMBER: u32 = 10_000;

/// Nombre de positions suivies dans un tirage (les suivantes sont ignorées).
pub const TRACKED_POSITIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberStatistics {
    /// Une apparition par occurrence : un doublon dans un même tirage compte deux fois.
    pub occurrences: u32,
    pub last_appearance: Option<usize>,
    /// Successeur -> nombre de fois où il est sorti au tirage suivant.
    pub after_frequency: HashMap<u32, u32>,
    pub position_counts: [u32; TRACKED_POSITIONS],
}

impl NumberStatistics {
    /// Position la plus fréquente et son comptage. En cas d'égalité, la plus petite position.
    pub fn preferred_position(&self) -> Option<(usize, u32)> {
        if self.occurrences == 0 {
            return None;
        }
        let mut best = 0;
        for (idx, &count) in self.position_counts.iter().enumerate() {
            if count > self.position_counts[best] {
                best = idx;
            }
        }
        Some((best, self.position_counts[best]))
    }

    pub fn draws_since_last_appearance(&self, total_draws: usize) -> Option<usize> {
        self.last_appearance.map(|last| total_draws - last - 1)
    }
}

/// Statistiques par numéro sur `[1, max_number]`, construites une seule fois.
#[derive(Debug, Clone)]
pub struct DatasetStatistics {
    total_draws: usize,
    max_number: u32,
    numbers: Vec<NumberStatistics>,
}

impl DatasetStatistics {
    /// Un seul passage chronologique sur `draws` (du plus ancien au plus récent).
    pub fn build(draws: &[Draw]) -> PredictorResult<Self> {
        if draws.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }

        for (draw_index, draw) in draws.iter().enumerate() {
            for (position, &number) in draw.numbers().iter().enumerate() {
                if number == 0 {
                    return Err(PredictorError::InvalidNumber { draw_index, position });
                }
                if number > MAX_NUMBER {
                    return Err(PredictorError::NumberTooLarge {
                        draw_index,
                        position,
                        number,
                        max: MAX_NUMBER,
                    });
                }
            }
        }

        let max_number = draws.iter().filter_map(Draw::max_number).max().unwrap_or(0);
        if max_number == 0 {
            return Err(PredictorError::EmptyDataset);
        }

        let mut numbers = vec![NumberStatistics::default(); max_number as usize];

        for (draw_index, draw) in draws.iter().enumerate() {
            let previous = draw_index.checked_sub(1).map(|i| &draws[i]);

            for (position, &number) in draw.numbers().iter().enumerate() {
                {
                    let stat = &mut numbers[(number - 1) as usize];
                    stat.occurrences += 1;
                    stat.last_appearance = Some(draw_index);
                    if position < TRACKED_POSITIONS {
                        stat.position_counts[position] += 1;
                    }
                }

                // Transitions tirage i-1 -> tirage i, pour chaque occurrence des deux côtés
                if let Some(previous) = previous {
                    for &prev in previous.numbers() {
                        *numbers[(prev - 1) as usize]
                            .after_frequency
                            .entry(number)
                            .or_insert(0) += 1;
                    }
                }
            }
        }

        tracing::debug!(
            total_draws = draws.len(),
            max_number,
            "statistiques construites"
        );

        Ok(Self {
            total_draws: draws.len(),
            max_number,
            numbers,
        })
    }

    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    pub fn contains(&self, number: u32) -> bool {
        number >= 1 && number <= self.max_number
    }

    pub fn get(&self, number: u32) -> Option<&NumberStatistics> {
        if !self.contains(number) {
            return None;
        }
        self.numbers.get((number - 1) as usize)
    }

    /// Nombre de fois où `to` est sorti juste après un tirage contenant `from`.
    pub fn after_count(&self, from: u32, to: u32) -> Option<u32> {
        self.get(from)
            .and_then(|stat| stat.after_frequency.get(&to))
            .copied()
    }

    /// Écart attendu entre deux apparitions d'un numéro sous hypothèse uniforme.
    pub fn expected_gap(&self) -> f64 {
        self.total_draws as f64 / self.max_number as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &NumberStatistics)> {
        self.numbers
            .iter()
            .enumerate()
            .map(|(idx, stat)| (idx as u32 + 1, stat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draws_from;

    fn sample() -> DatasetStatistics {
        DatasetStatistics::build(&draws_from(&[
            &[1, 2, 3, 4, 5],
            &[2, 3, 4, 5, 6],
            &[1, 3, 5, 7, 9],
        ]))
        .unwrap()
    }

    #[test]
    fn test_build_empty_rejected() {
        assert_eq!(
            DatasetStatistics::build(&[]).unwrap_err(),
            PredictorError::EmptyDataset
        );
    }

    #[test]
    fn test_build_only_empty_draws_rejected() {
        let draws = vec![Draw::default(), Draw::default()];
        assert_eq!(
            DatasetStatistics::build(&draws).unwrap_err(),
            PredictorError::EmptyDataset
        );
    }

    #[test]
    fn test_build_zero_rejected() {
        let err = DatasetStatistics::build(&draws_from(&[&[1, 2], &[3, 0, 4]])).unwrap_err();
        assert_eq!(err, PredictorError::InvalidNumber { draw_index: 1, position: 1 });
    }

    #[test]
    fn test_build_number_above_maximum_rejected() {
        let err = DatasetStatistics::build(&draws_from(&[&[1, 2, 3], &[4, u32::MAX]])).unwrap_err();
        assert_eq!(
            err,
            PredictorError::NumberTooLarge {
                draw_index: 1,
                position: 1,
                number: u32::MAX,
                max: MAX_NUMBER,
            }
        );
    }

    #[test]
    fn test_build_accepts_maximum() {
        let stats = DatasetStatistics::build(&draws_from(&[&[1, MAX_NUMBER]])).unwrap();
        assert_eq!(stats.max_number(), MAX_NUMBER);
        assert_eq!(stats.get(MAX_NUMBER).unwrap().occurrences, 1);
    }

    #[test]
    fn test_max_number_and_entries() {
        let stats = sample();
        assert_eq!(stats.max_number(), 9);
        assert_eq!(stats.total_draws(), 3);
        assert_eq!(stats.iter().count(), 9);

        let eight = stats.get(8).unwrap();
        assert_eq!(eight.occurrences, 0);
        assert_eq!(eight.last_appearance, None);
        assert!(eight.after_frequency.is_empty());

        assert!(stats.get(0).is_none());
        assert!(stats.get(10).is_none());
    }

    #[test]
    fn test_occurrences_and_last_appearance() {
        let stats = sample();
        assert_eq!(stats.get(3).unwrap().occurrences, 3);
        assert_eq!(stats.get(3).unwrap().last_appearance, Some(2));
        assert_eq!(stats.get(6).unwrap().occurrences, 1);
        assert_eq!(stats.get(6).unwrap().last_appearance, Some(1));
    }

    #[test]
    fn test_position_counts() {
        let stats = sample();
        assert_eq!(stats.get(1).unwrap().position_counts, [2, 0, 0, 0, 0]);
        assert_eq!(stats.get(5).unwrap().position_counts, [0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_positions_beyond_fifth_not_tracked() {
        let stats = DatasetStatistics::build(&draws_from(&[&[1, 2, 3, 4, 5, 6, 7]])).unwrap();
        let seven = stats.get(7).unwrap();
        assert_eq!(seven.occurrences, 1);
        assert_eq!(seven.position_counts, [0; TRACKED_POSITIONS]);
        assert_eq!(seven.preferred_position(), Some((0, 0)));
    }

    #[test]
    fn test_after_frequency_transitions() {
        let stats = sample();
        // 2 est dans les tirages 0 et 1, 3 dans les tirages 1 et 2
        assert_eq!(stats.after_count(2, 3), Some(2));
        assert_eq!(stats.after_count(1, 6), Some(1));
        assert_eq!(stats.after_count(1, 7), None);
        // Le dernier tirage n'a pas de successeur
        assert_eq!(stats.after_count(9, 1), None);
        assert_eq!(stats.after_count(42, 1), None);
    }

    #[test]
    fn test_first_draw_has_no_predecessor() {
        let stats = DatasetStatistics::build(&draws_from(&[&[1, 2, 3]])).unwrap();
        for (_, stat) in stats.iter() {
            assert!(stat.after_frequency.is_empty());
        }
    }

    #[test]
    fn test_duplicates_counted_per_occurrence() {
        let stats = DatasetStatistics::build(&draws_from(&[&[4, 4, 1], &[2, 2]])).unwrap();
        let four = stats.get(4).unwrap();
        assert_eq!(four.occurrences, 2);
        assert_eq!(four.position_counts, [1, 1, 0, 0, 0]);
        // 2 occurrences de 4 en amont x 2 occurrences de 2 en aval
        assert_eq!(stats.after_count(4, 2), Some(4));
    }

    #[test]
    fn test_preferred_position_first_maximum() {
        let stat = NumberStatistics {
            occurrences: 4,
            position_counts: [0, 2, 0, 2, 0],
            ..Default::default()
        };
        assert_eq!(stat.preferred_position(), Some((1, 2)));
        assert_eq!(NumberStatistics::default().preferred_position(), None);
    }

    #[test]
    fn test_draws_since_last_appearance() {
        let stats = sample();
        assert_eq!(stats.get(7).unwrap().draws_since_last_appearance(3), Some(0));
        assert_eq!(stats.get(6).unwrap().draws_since_last_appearance(3), Some(1));
        assert_eq!(stats.get(8).unwrap().draws_since_last_appearance(3), None);
    }
}
