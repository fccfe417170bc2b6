//! CSV dataset loader.
//!
//! Reads the bookings CSV into a [`Corpus`]. The header row decides which
//! columns are present; two derived columns are filled in when the source
//! lacks them:
//!
//! - `year_month` from `arrival_date_year` + `arrival_date_month`
//! - `text` from [`BookingRecord::summary_text`]

use std::io;
use std::path::Path;

use hotelqa_core::retrieval::Corpus;
use hotelqa_types::booking::{BookingRecord, Column, ColumnSet};
use hotelqa_types::error::DatasetError;
use hotelqa_types::period::{Month, year_month_key};

/// Load the corpus from a CSV file on disk.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_corpus(path: &Path) -> Result<Corpus, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound(path.display().to_string()),
        _ => DatasetError::Read(e.to_string()),
    })?;
    let corpus = read_corpus(file)?;
    tracing::info!(
        records = corpus.len(),
        columns = corpus.columns().len(),
        "dataset loaded"
    );
    Ok(corpus)
}

/// Read a corpus from any CSV source with a header row.
pub fn read_corpus<R: io::Read>(source: R) -> Result<Corpus, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Read(e.to_string()))?
        .clone();
    let mut columns = ColumnSet::from_headers(headers.iter());

    let mut records = Vec::new();
    for result in reader.deserialize::<BookingRecord>() {
        let record = result.map_err(|e| DatasetError::InvalidRecord {
            line: e.position().map(|p| p.line()).unwrap_or_default(),
            message: e.to_string(),
        })?;
        records.push(record);
    }

    if !columns.contains(Column::YearMonth)
        && columns.contains(Column::ArrivalDateYear)
        && columns.contains(Column::ArrivalDateMonth)
    {
        let underived = derive_year_month(&mut records);
        if underived > 0 {
            tracing::warn!(records = underived, "could not derive year_month for some records");
        }
        columns.insert(Column::YearMonth);
    }

    if !columns.contains(Column::Text) {
        for record in &mut records {
            record.text = record.summary_text();
        }
        columns.insert(Column::Text);
    }

    Ok(Corpus::new(records, columns))
}

/// Fill `year_month` from the arrival date. Returns how many records could
/// not be derived (unknown month name or out-of-range year).
fn derive_year_month(records: &mut [BookingRecord]) -> usize {
    let mut failed = 0;
    for record in records {
        let month = Month::from_name(&record.arrival_date_month);
        let year = u16::try_from(record.arrival_date_year).ok();
        match (month, year) {
            (Some(month), Some(year)) if year > 0 => {
                record.year_month = year_month_key(year, month);
            }
            _ => failed += 1,
        }
    }
    failed
}
