use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use lotoscore_core::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    numbers  TEXT NOT NULL
);
";

pub fn db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotoscore.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Retourne l'identifiant de la ligne insérée (ordre chronologique).
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<i64> {
    let numbers = serde_json::to_string(draw).context("Échec de la sérialisation du tirage")?;
    conn.execute("INSERT INTO draws (numbers) VALUES (?1)", [numbers])
        .context("Échec de l'insertion")?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_draws(conn: &Connection, draws: &[Draw]) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    for draw in draws {
        insert_draw(&tx, draw)?;
    }
    tx.commit().context("Échec du commit")?;
    tracing::info!(count = draws.len(), "tirages ajoutés");
    Ok(draws.len())
}

/// Remplace tout l'historique en une transaction.
pub fn replace_draws(conn: &Connection, draws: &[Draw]) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    let removed = tx.execute("DELETE FROM draws", [])
        .context("Échec de la suppression")?;
    for draw in draws {
        insert_draw(&tx, draw)?;
    }
    tx.commit().context("Échec du commit")?;
    tracing::info!(removed, inserted = draws.len(), "historique remplacé");
    Ok(draws.len())
}

/// Tout l'historique, du plus ancien au plus récent.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare("SELECT numbers FROM draws ORDER BY id ASC")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    rows.iter().map(|raw| decode_draw(raw)).collect()
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare("SELECT numbers FROM draws ORDER BY id DESC LIMIT ?1")?;
    let rows = stmt
        .query_map([limit], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    rows.iter().map(|raw| decode_draw(raw)).collect()
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

fn decode_draw(raw: &str) -> Result<Draw> {
    serde_json::from_str(raw)
        .with_context(|| format!("Tirage illisible en base : '{}'", raw))
}
