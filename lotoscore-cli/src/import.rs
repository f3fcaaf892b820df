use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;

use lotoscore_core::Draw;

/// Nombre minimal de numéros pour une saisie manuelle.
pub const MIN_MANUAL_NUMBERS: usize = 3;

const HEADER_MARKERS: [&str; 3] = ["date", "numéros", "numeros"];

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub delimiter: char,
    /// Colonnes ignorées en tête de ligne (identifiant, date...).
    pub skip_columns: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            skip_columns: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Append,
    Replace,
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn read_csv(path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    parse_csv(file, options)
}

pub fn parse_csv<R: Read>(source: R, options: &ImportOptions) -> Result<ImportResult> {
    if !options.delimiter.is_ascii() {
        bail!("Séparateur non ASCII : '{}'", options.delimiter);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut result = ImportResult::default();

    for (idx, record_result) in reader.records().enumerate() {
        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Erreur lecture ligne {}: {}", idx + 1, e);
                result.errors += 1;
                continue;
            }
        };

        if idx == 0 && is_header(&record) {
            tracing::debug!("en-tête ignoré");
            continue;
        }

        result.total_records += 1;

        let numbers: Vec<u32> = record
            .iter()
            .skip(options.skip_columns)
            .filter_map(parse_number)
            .collect();

        if numbers.is_empty() {
            tracing::warn!("Ligne {} sans numéro valide, ignorée", idx + 1);
            result.skipped += 1;
        } else {
            result.draws.push(Draw::new(numbers));
        }
    }

    tracing::info!(
        draws = result.draws.len(),
        skipped = result.skipped,
        errors = result.errors,
        "lecture CSV terminée"
    );
    Ok(result)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .iter()
        .any(|field| HEADER_MARKERS.iter().any(|marker| field.contains(marker)))
}

/// Lit les chiffres de tête d'un champ (`"12 "`, `"7abc"`). Rejette 0 et les négatifs.
fn parse_number(field: &str) -> Option<u32> {
    let field = field.trim();
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    match field[..end].parse::<u32>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

/// Saisie manuelle : numéros séparés par des virgules ou des espaces.
pub fn parse_draw_input(input: &str) -> Result<Draw> {
    let numbers: Vec<u32> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(parse_number)
        .collect();

    if numbers.len() < MIN_MANUAL_NUMBERS {
        bail!(
            "Veuillez entrer au moins {} numéros valides séparés par des virgules",
            MIN_MANUAL_NUMBERS
        );
    }
    Ok(Draw::new(numbers))
}
