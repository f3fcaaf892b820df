use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::import::{ImportMode, ImportOptions};
use crate::session::Session;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Predict,
    Add,
    Import,
    Stats,
    History,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "predire" | "prédire" | "predict" | "pred" => Some(InteractiveCommand::Predict),
        "2" | "ajouter" | "add" => Some(InteractiveCommand::Add),
        "3" | "importer" | "import" | "csv" => Some(InteractiveCommand::Import),
        "4" | "stats" | "numero" | "numéro" => Some(InteractiveCommand::Stats),
        "5" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

/// `o`/`oui` : compléter l'historique ; `n`/`non` : le remplacer.
fn parse_import_mode(answer: &str) -> Option<ImportMode> {
    match answer.trim().to_lowercase().as_str() {
        "o" | "oui" => Some(ImportMode::Append),
        "n" | "non" => Some(ImportMode::Replace),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. predire    Numéros suggérés");
    println!("  2. ajouter    Ajouter un tirage");
    println!("  3. importer   Charger un fichier CSV");
    println!("  4. stats      Statistiques d'un numéro");
    println!("  5. historique Derniers tirages");
    println!("  6. quitter    Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        anyhow::bail!("Fin de l'entrée");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn cmd_predict_interactive(session: &Session) -> Result<()> {
    let n_str = prompt_with_default("Nombre de numéros", "10")?;
    let n: usize = n_str.parse().context("Nombre invalide")?;
    super::cmd_predict(session, &mut io::stdout(), n, false)
}

fn cmd_add_interactive(session: &mut Session) -> Result<()> {
    let input = prompt("Numéros du tirage (séparés par des virgules) : ")?;
    super::cmd_add(session, &mut io::stdout(), &input)
}

fn cmd_import_interactive(session: &mut Session) -> Result<()> {
    let file = PathBuf::from(prompt("Fichier CSV : ")?);
    let mode = loop {
        let answer = prompt_with_default("Ajouter à l'historique existant ? (o = ajouter, n = remplacer)", "o")?;
        match parse_import_mode(&answer) {
            Some(mode) => break mode,
            None => println!("Réponse non reconnue : '{}'. Répondez o (oui) ou n (non).", answer),
        }
    };
    super::cmd_import(session, &mut io::stdout(), &file, &ImportOptions::default(), mode)
}

fn cmd_stats_interactive(session: &Session) -> Result<()> {
    let n_str = prompt("Numéro : ")?;
    let n: u32 = n_str.parse().context("Numéro invalide")?;
    super::cmd_stats(session, &mut io::stdout(), n, false)
}

fn cmd_history_interactive(session: &Session) -> Result<()> {
    let n_str = prompt_with_default("Nombre de tirages", "10")?;
    let n: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_list(session, &mut io::stdout(), n)
}

pub fn run_interactive(session: &mut Session) -> Result<()> {
    println!("Bienvenue dans le mode interactif de lotoscore !");
    println!("{} tirage(s) en historique.", session.draws().len());

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let outcome = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Predict) => cmd_predict_interactive(session),
            Some(InteractiveCommand::Add) => cmd_add_interactive(session),
            Some(InteractiveCommand::Import) => cmd_import_interactive(session),
            Some(InteractiveCommand::Stats) => cmd_stats_interactive(session),
            Some(InteractiveCommand::History) => cmd_history_interactive(session),
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-6) ou un nom de commande.", input);
                continue;
            }
        };

        if let Err(e) = outcome {
            println!("Erreur: {e:#}");
        }
    }

    Ok(())
}
