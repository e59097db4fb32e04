use crate::domain::book::BookDraft;
use crate::domain::repository::BookRepository;
use anyhow::{Context, Result, bail};
use csv::StringRecord;
use std::path::Path;
use tracing::{info, instrument};

// One-time seeding source, looked up in the working directory.
pub const SEED_FILE: &str = "biblioteca.csv";

// Column order of the seed file: the entity's fields minus id, no header row.
const FIELDS_PER_RECORD: usize = 9;

/// Seeds the catalog from a CSV file, but only when the table is empty.
/// Any read or insert error aborts the import; rows already inserted stay.
#[instrument(skip(repository), fields(path = %path.display()))]
pub async fn seed_if_empty<R: BookRepository>(repository: &R, path: &Path) -> Result<usize> {
    let existing = repository.count().await?;
    if existing > 0 {
        info!(rows = existing, "Catalog already populated, skipping import");
        return Ok(0);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open seed file {}", path.display()))?;

    let mut imported = 0;
    for record in reader.records() {
        let record = record.context("failed to read seed record")?;
        let draft = draft_from_record(&record)?;
        repository
            .insert(&draft)
            .await
            .with_context(|| format!("failed to insert seed record {}", imported + 1))?;
        imported += 1;
    }

    info!(rows = imported, "Catalog seeded from file");
    Ok(imported)
}

fn draft_from_record(record: &StringRecord) -> Result<BookDraft> {
    if record.len() != FIELDS_PER_RECORD {
        bail!(
            "seed record has {} fields, expected {}",
            record.len(),
            FIELDS_PER_RECORD
        );
    }

    let mut draft = BookDraft {
        titol: record[0].to_string(),
        autor: record[1].to_string(),
        prestatge: record[2].to_string(),
        posicio: record[3].to_string(),
        habitacio: record[4].to_string(),
        tipus: title_case(&record[5]),
        editorial: title_case(&record[6]),
        idioma: record[7].to_string(),
        notes: record[8].to_string(),
    };
    if !draft.idioma.is_empty() {
        draft.idioma = title_case(&draft.idioma);
    }
    Ok(draft)
}

// Uppercases the first character of each space-separated word and leaves the
// rest untouched, so "novel·la" becomes "Novel·la".
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
