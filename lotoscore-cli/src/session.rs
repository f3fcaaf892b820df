use anyhow::{Context, Result};
use lotoscore_db::db::{fetch_all_draws, insert_draw, insert_draws, replace_draws};
use lotoscore_db::rusqlite::Connection;

use lotoscore_core::{Draw, Prediction, Predictor};

use crate::import::ImportMode;

/// État de l'application : historique chargé et prédicteur associé.
/// Toute modification est d'abord analysée, puis enregistrée seulement si l'analyse réussit.
pub struct Session {
    conn: Connection,
    draws: Vec<Draw>,
    predictor: Option<Predictor>,
}

impl Session {
    pub fn open(conn: Connection) -> Result<Self> {
        let draws = fetch_all_draws(&conn)?;
        let predictor = analyze(&draws)?;
        Ok(Self {
            conn,
            draws,
            predictor,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&Draw> {
        self.draws.last()
    }

    /// `None` tant qu'aucun tirage n'est disponible.
    pub fn predictor(&self) -> Option<&Predictor> {
        self.predictor.as_ref()
    }

    pub fn add_draw(&mut self, draw: Draw) -> Result<()> {
        let mut candidate = self.draws.clone();
        candidate.push(draw);
        let predictor = analyze(&candidate)?;

        if let Some(draw) = candidate.last() {
            insert_draw(&self.conn, draw)?;
        }
        self.commit(candidate, predictor);
        Ok(())
    }

    pub fn import(&mut self, draws: Vec<Draw>, mode: ImportMode) -> Result<usize> {
        let count = draws.len();
        match mode {
            ImportMode::Append => {
                let previous = self.draws.len();
                let mut candidate = self.draws.clone();
                candidate.extend(draws);
                let predictor = analyze(&candidate)?;
                insert_draws(&self.conn, &candidate[previous..])?;
                self.commit(candidate, predictor);
            }
            ImportMode::Replace => {
                let predictor = analyze(&draws)?;
                replace_draws(&self.conn, &draws)?;
                self.commit(draws, predictor);
            }
        }
        Ok(count)
    }

    /// Prédiction avec le dernier tirage connu comme référence d'affinité.
    pub fn predict(&self, count: usize) -> Option<Prediction> {
        let last = self.last_draw().map(|d| d.numbers());
        self.predictor.as_ref().map(|p| p.predict(count, last))
    }

    fn commit(&mut self, draws: Vec<Draw>, predictor: Option<Predictor>) {
        self.draws = draws;
        self.predictor = predictor;
    }
}

/// Ré-analyse complète ; `None` pour un historique vide.
fn analyze(draws: &[Draw]) -> Result<Option<Predictor>> {
    if draws.is_empty() {
        return Ok(None);
    }
    let predictor = Predictor::new(draws).context("Analyse de l'historique impossible")?;
    tracing::info!(
        draws = predictor.total_draws(),
        max_number = predictor.max_number(),
        "historique analysé"
    );
    Ok(Some(predictor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotoscore_core::MAX_NUMBER;
    use lotoscore_db::db::{count_draws, migrate};

    fn empty_session() -> Session {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        Session::open(conn).unwrap()
    }

    fn sample_draws() -> Vec<Draw> {
        vec![
            Draw::new(vec![1, 2, 3, 4, 5]),
            Draw::new(vec![2, 3, 4, 5, 6]),
            Draw::new(vec![1, 3, 5, 7, 9]),
        ]
    }

    #[test]
    fn test_empty_session_has_no_predictor() {
        let session = empty_session();
        assert!(session.predictor().is_none());
        assert!(session.predict(10).is_none());
        assert!(session.last_draw().is_none());
    }

    #[test]
    fn test_import_append_builds_predictor() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();

        let predictor = session.predictor().unwrap();
        assert_eq!(predictor.total_draws(), 3);
        assert_eq!(predictor.max_number(), 9);
        assert_eq!(count_draws(session.connection()).unwrap(), 3);

        session.import(vec![Draw::new(vec![10, 11, 12])], ImportMode::Append).unwrap();
        assert_eq!(session.predictor().unwrap().total_draws(), 4);
        assert_eq!(session.predictor().unwrap().max_number(), 12);
        assert_eq!(count_draws(session.connection()).unwrap(), 4);
    }

    #[test]
    fn test_import_replace() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();
        session.import(vec![Draw::new(vec![4, 5, 6])], ImportMode::Replace).unwrap();

        assert_eq!(session.draws(), &[Draw::new(vec![4, 5, 6])]);
        assert_eq!(session.predictor().unwrap().max_number(), 6);
        assert_eq!(count_draws(session.connection()).unwrap(), 1);
    }

    #[test]
    fn test_add_draw_reanalyzes() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();
        assert_eq!(session.predictor().unwrap().number_stats(8).unwrap().occurrences, 0);

        session.add_draw(Draw::new(vec![8, 2, 4])).unwrap();
        let report = session.predictor().unwrap().number_stats(8).unwrap();
        assert_eq!(report.occurrences, 1);
        assert_eq!(report.draws_since_last_appearance, Some(0));
        assert_eq!(session.last_draw().unwrap().numbers(), &[8, 2, 4]);
        assert_eq!(count_draws(session.connection()).unwrap(), 4);
    }

    #[test]
    fn test_add_draw_too_large_leaves_history_untouched() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();

        assert!(session.add_draw(Draw::new(vec![1, 2, 4_000_000_000])).is_err());
        assert_eq!(count_draws(session.connection()).unwrap(), 3);
        assert_eq!(session.draws(), sample_draws().as_slice());
        assert_eq!(session.predictor().unwrap().max_number(), 9);
    }

    #[test]
    fn test_failed_import_leaves_history_untouched() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();
        let bad = vec![Draw::new(vec![4, 5, 6]), Draw::new(vec![1, MAX_NUMBER + 1])];

        assert!(session.import(bad.clone(), ImportMode::Append).is_err());
        assert!(session.import(bad, ImportMode::Replace).is_err());

        assert_eq!(count_draws(session.connection()).unwrap(), 3);
        assert_eq!(session.draws(), sample_draws().as_slice());
    }

    #[test]
    fn test_reopen_after_rejected_draw() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();
        assert!(session.add_draw(Draw::new(vec![u32::MAX, 1, 2])).is_err());

        let Session { conn, .. } = session;
        let reopened = Session::open(conn).unwrap();
        assert_eq!(reopened.draws(), sample_draws().as_slice());
        assert_eq!(reopened.predictor().unwrap().total_draws(), 3);
    }

    #[test]
    fn test_reopen_restores_history() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        insert_draws(&conn, &sample_draws()).unwrap();

        let session = Session::open(conn).unwrap();
        assert_eq!(session.draws(), sample_draws().as_slice());
        assert_eq!(session.predictor().unwrap().total_draws(), 3);
    }

    #[test]
    fn test_predict_uses_last_draw() {
        let mut session = empty_session();
        session.import(sample_draws(), ImportMode::Append).unwrap();

        let from_session = session.predict(4).unwrap();
        let direct = session
            .predictor()
            .unwrap()
            .predict(4, Some(&[1, 3, 5, 7, 9][..]));
        assert_eq!(from_session, direct);
    }
}
