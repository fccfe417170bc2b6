//! The in-memory record corpus.

use hotelqa_types::booking::{BookingRecord, ColumnSet};

/// Ordered booking records plus the columns their source actually carried.
///
/// Record `i` corresponds to index position `i`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<BookingRecord>,
    columns: ColumnSet,
}

impl Corpus {
    pub fn new(records: Vec<BookingRecord>, columns: ColumnSet) -> Self {
        Self { records, columns }
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn get(&self, position: usize) -> Option<&BookingRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose `year_month` equals `key`, in corpus order.
    pub fn with_year_month<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a BookingRecord> {
        self.records.iter().filter(move |r| r.year_month == key)
    }
}
