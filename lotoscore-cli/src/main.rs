mod display;
mod import;
mod interactive;
mod session;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lotoscore_core::NumberReport;
use lotoscore_core::predictor::round2;
use lotoscore_db::db::{count_draws, db_path, fetch_last_draws, migrate, open_db};
use crate::display::{
    EMPTY_BASE_MESSAGE, display_draws, display_import_summary, display_number_report,
    display_prediction,
};
use crate::import::{ImportMode, ImportOptions, parse_draw_input, read_csv};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "lotoscore", version, about = "Classement heuristique des numéros de loterie")]
struct Cli {
    /// Chemin de la base de données (défaut : ./data/lotoscore.db)
    #[arg(global = true, long)]
    db: Option<PathBuf>,

    /// Verbosité des journaux (-v, -vv). RUST_LOG est prioritaire.
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer des tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Remplacer l'historique existant au lieu de le compléter
        #[arg(long)]
        replace: bool,

        /// Séparateur de colonnes
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Colonnes ignorées en début de ligne (identifiant, date)
        #[arg(long, default_value = "1")]
        skip_columns: usize,
    },

    /// Ajouter un tirage manuellement (ex: "3,17,22,41,45")
    Add {
        /// Numéros séparés par des virgules ou des espaces
        numbers: String,
    },

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Classer les numéros et afficher les meilleurs
    Predict {
        /// Nombre de numéros à suggérer
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Statistiques détaillées d'un numéro
    Stats {
        number: u32,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Mode interactif (REPL)
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = cli.db.clone().unwrap_or_else(db_path);
    if let Command::DbPath = cli.command {
        println!("{}", path.display());
        return Ok(());
    }

    let conn = open_db(&path)?;
    migrate(&conn)?;
    let mut session = Session::open(conn)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Import { file, replace, delimiter, skip_columns } => {
            let options = ImportOptions { delimiter, skip_columns };
            let mode = if replace { ImportMode::Replace } else { ImportMode::Append };
            cmd_import(&mut session, &mut out, &file, &options, mode)
        }
        Command::Add { numbers } => cmd_add(&mut session, &mut out, &numbers),
        Command::List { last } => cmd_list(&session, &mut out, last),
        Command::Predict { count, json } => cmd_predict(&session, &mut out, count, json),
        Command::Stats { number, json } => cmd_stats(&session, &mut out, number, json),
        Command::DbPath => Ok(()),
        Command::Interactive => interactive::run_interactive(&mut session),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Sortie JSON de `stats` : le rapport, complété des scores liés au dernier tirage.
#[derive(Serialize)]
struct StatsOutput<'a> {
    #[serde(flatten)]
    report: &'a NumberReport,
    affinity_score: f64,
    combined_score: f64,
}

pub(crate) fn cmd_import(
    session: &mut Session,
    out: &mut impl Write,
    file: &Path,
    options: &ImportOptions,
    mode: ImportMode,
) -> Result<()> {
    let mut result = read_csv(file, options)?;
    if result.draws.is_empty() {
        bail!("Aucune donnée valide n'a été trouvée dans le fichier CSV.");
    }

    let draws = std::mem::take(&mut result.draws);
    let inserted = session.import(draws, mode)?;
    display_import_summary(out, &result, inserted, mode == ImportMode::Replace)?;
    Ok(())
}

pub(crate) fn cmd_add(session: &mut Session, out: &mut impl Write, input: &str) -> Result<()> {
    let draw = parse_draw_input(input)?;
    let label = draw.to_string();
    session.add_draw(draw)?;
    writeln!(out, "Tirage ajouté : {}", label)?;
    writeln!(out, "Historique : {} tirage(s).", session.draws().len())?;
    Ok(())
}

pub(crate) fn cmd_list(session: &Session, out: &mut impl Write, last: u32) -> Result<()> {
    let conn = session.connection();
    let n = count_draws(conn)?;
    if n == 0 {
        writeln!(out, "{}", EMPTY_BASE_MESSAGE)?;
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(out, &draws, n)?;
    Ok(())
}

pub(crate) fn cmd_predict(
    session: &Session,
    out: &mut impl Write,
    count: usize,
    json: bool,
) -> Result<()> {
    let (Some(predictor), Some(prediction)) = (session.predictor(), session.predict(count)) else {
        writeln!(out, "{}", EMPTY_BASE_MESSAGE)?;
        return Ok(());
    };

    if json {
        let text = serde_json::to_string_pretty(&prediction)
            .context("Échec de la sérialisation JSON")?;
        writeln!(out, "{text}")?;
    } else {
        display_prediction(out, &prediction, predictor)?;
    }
    Ok(())
}

pub(crate) fn cmd_stats(
    session: &Session,
    out: &mut impl Write,
    number: u32,
    json: bool,
) -> Result<()> {
    let Some(predictor) = session.predictor() else {
        writeln!(out, "{}", EMPTY_BASE_MESSAGE)?;
        return Ok(());
    };

    let last = session.last_draw().map(|d| d.numbers());
    let (Some(report), Some(breakdown)) = (
        predictor.number_stats(number),
        predictor.score_breakdown(number, last),
    ) else {
        writeln!(
            out,
            "Numéro {} hors plage (1-{}).",
            number,
            predictor.max_number()
        )?;
        return Ok(());
    };

    if json {
        let output = StatsOutput {
            report: &report,
            affinity_score: round2(breakdown.affinity),
            combined_score: round2(breakdown.combined()),
        };
        let text = serde_json::to_string_pretty(&output)
            .context("Échec de la sérialisation JSON")?;
        writeln!(out, "{text}")?;
    } else {
        display_number_report(out, &report, &breakdown)?;
    }
    Ok(())
}
