use std::io::{self, Write};

use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use lotoscore_core::{Draw, NumberReport, Prediction, Predictor, ScoreBreakdown};

pub const EMPTY_BASE_MESSAGE: &str =
    "Aucune donnée historique disponible. Chargez un fichier CSV (lotoscore import) ou ajoutez des tirages (lotoscore add).";

pub fn format_since(since: Option<usize>) -> String {
    match since {
        Some(n) => format!("{} tirage(s)", n),
        None => "Jamais apparu".to_string(),
    }
}

pub fn format_position(position: Option<usize>) -> String {
    match position {
        Some(p) => format!("{}", p + 1),
        None => "—".to_string(),
    }
}

/// `draws` : le plus récent en premier.
pub fn display_draws(out: &mut impl Write, draws: &[Draw], total: u32) -> io::Result<()> {
    if draws.is_empty() {
        return writeln!(out, "Aucun tirage à afficher.");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros"]);

    for (i, draw) in draws.iter().enumerate() {
        table.add_row(vec![
            &(total as usize).saturating_sub(i).to_string(),
            &draw.to_string(),
        ]);
    }

    writeln!(out, "{table}")
}

pub fn display_import_summary(
    out: &mut impl Write,
    result: &ImportResult,
    inserted: usize,
    replaced: bool,
) -> io::Result<()> {
    writeln!(out, "Import terminé :")?;
    writeln!(out, "  Total lignes lues : {}", result.total_records)?;
    writeln!(out, "  Tirages chargés   : {}", inserted)?;
    writeln!(out, "  Lignes ignorées   : {}", result.skipped)?;
    if result.errors > 0 {
        writeln!(out, "  Erreurs           : {}", result.errors)?;
    }
    if replaced {
        writeln!(out, "  (historique existant remplacé)")?;
    }
    Ok(())
}

pub fn display_prediction(
    out: &mut impl Write,
    prediction: &Prediction,
    predictor: &Predictor,
) -> io::Result<()> {
    writeln!(out, "\n🎯 Numéros suggérés\n")?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Score total", "Fréquence", "Non tiré depuis", "Score retard"]);

    for scored in &prediction.scores {
        let Some(report) = predictor.number_stats(scored.number) else {
            continue;
        };
        let color = if scored.score < 0.0 { Color::Red } else { Color::White };
        table.add_row(vec![
            Cell::new(format!("{:2}", scored.number)),
            Cell::new(format!("{:.2}", scored.score)).fg(color),
            Cell::new(format!("{:.2}%", report.frequency)),
            Cell::new(format_since(report.draws_since_last_appearance)),
            Cell::new(format!("{:.2}", report.overdue_score)),
        ]);
    }
    writeln!(out, "{table}")?;

    writeln!(out, "\n📊 Statistiques")?;
    writeln!(out, "  Nombre total de tirages analysés : {}", predictor.total_draws())?;
    writeln!(out, "  Plage des numéros                : 1-{}", predictor.max_number())
}

/// `breakdown` porte l'affinité calculée par rapport au dernier tirage.
pub fn display_number_report(
    out: &mut impl Write,
    report: &NumberReport,
    breakdown: &ScoreBreakdown,
) -> io::Result<()> {
    writeln!(out, "\n── Numéro {} ──", report.number)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Indicateur", "Valeur"]);

    table.add_row(vec!["Apparitions".to_string(), report.occurrences.to_string()]);
    table.add_row(vec!["Fréquence".to_string(), format!("{:.2}%", report.frequency)]);
    table.add_row(vec!["Non tiré depuis".to_string(), format_since(report.draws_since_last_appearance)]);
    table.add_row(vec!["Position préférée".to_string(), format_position(report.preferred_position)]);
    table.add_row(vec!["Score retard".to_string(), format!("{:.2}", report.overdue_score)]);
    table.add_row(vec!["Score affinité".to_string(), format!("{:.2}", breakdown.affinity)]);
    table.add_row(vec!["Score fréquence".to_string(), format!("{:.2}", report.frequency_score)]);
    table.add_row(vec!["Score position".to_string(), format!("{:.2}", report.positional_score)]);

    let combined = breakdown.combined();
    let color = if combined < 0.0 { Color::Red } else { Color::Green };
    table.add_row(vec![
        Cell::new("Score combiné"),
        Cell::new(format!("{:.2}", combined)).fg(color),
    ]);

    writeln!(out, "{table}")
}
