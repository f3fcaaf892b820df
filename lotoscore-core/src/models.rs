use serde::{Deserialize, Serialize};

/// Un tirage : la suite ordonnée des numéros sortis. L'ordre compte,
/// les cinq premières positions sont suivies par les statistiques.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draw(Vec<u32>);

impl Draw {
    pub fn new(numbers: Vec<u32>) -> Self {
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u32] {
        &self.0
    }

    pub fn max_number(&self) -> Option<u32> {
        self.0.iter().copied().max()
    }
}

impl std::fmt::Display for Draw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{}", joined)
    }
}

#[cfg(test)]
pub(crate) fn draws_from(rows: &[&[u32]]) -> Vec<Draw> {
    rows.iter().map(|r| Draw::new(r.to_vec())).collect()
}
