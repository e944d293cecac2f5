//! In-memory store for the water quality dataset.
//!
//! The source CSV is read once at startup and never mutated afterwards, so
//! request handlers can share the store behind an [std::sync::Arc] without
//! locking. The source data uses a Latin-1-ish encoding with stray bytes in
//! some place names, so the file is decoded as Windows-1252 rather than
//! UTF-8.

use crate::error::HydroscopeError;
use crate::models::{Parameter, Record};

use encoding_rs::WINDOWS_1252;
use encoding_rs_io::DecodeReaderBytesBuilder;
use expanduser::expanduser;
use std::fs::File;
use std::io::Read;

/// Cell contents treated as a missing measurement in addition to blanks.
const MISSING_MARKERS: [&str; 5] = ["NA", "N.A.", "NAN", "NULL", "-"];

/// Column indices resolved from the CSV header row.
///
/// Only the state and location columns are mandatory; a parameter column
/// absent from the file simply yields `None` for every record.
struct Columns {
    station_code: Option<usize>,
    location: usize,
    state: usize,
    parameters: [Option<usize>; 8],
}

impl Columns {
    /// Resolve column indices from the header row.
    ///
    /// Header matching is case insensitive and ignores surrounding
    /// whitespace, since the raw file headers are inconsistently cased.
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, HydroscopeError> {
        let index_of = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &'static str| {
            index_of(name).ok_or(HydroscopeError::DatasetColumnMissing { name })
        };
        let mut parameters = [None; 8];
        for (slot, parameter) in parameters.iter_mut().zip(Parameter::ALL) {
            *slot = index_of(parameter.column_name());
        }
        Ok(Columns {
            station_code: index_of("STATION_CODE"),
            location: required("LOCATIONS")?,
            state: required("STATE")?,
            parameters,
        })
    }

    /// Build a [Record] from one CSV row.
    fn record(&self, row: &csv::StringRecord) -> Record {
        let numeric = |index: usize| numeric_cell(row, self.parameters[index]);
        Record {
            station_code: text_cell(row, self.station_code),
            location: text_cell(row, Some(self.location)),
            state: text_cell(row, Some(self.state)),
            temperature: numeric(0),
            dissolved_oxygen: numeric(1),
            ph: numeric(2),
            conductivity: numeric(3),
            biochemical_oxygen_demand: numeric(4),
            nitrate_nitrite: numeric(5),
            fecal_coliform: numeric(6),
            total_coliform: numeric(7),
        }
    }
}

/// Returns the trimmed cell text, or `None` for blanks and missing-data
/// markers.
fn text_cell(row: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|index| row.get(index))
        .map(str::trim)
        .filter(|cell| {
            !cell.is_empty()
                && !MISSING_MARKERS
                    .iter()
                    .any(|marker| cell.eq_ignore_ascii_case(marker))
        })
        .map(String::from)
}

/// Returns the cell parsed as a number. Blanks, markers and unparseable junk
/// all normalise to `None`.
fn numeric_cell(row: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    text_cell(row, index).and_then(|cell| cell.parse().ok())
}

/// Read-only store of monitoring observations.
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Load a dataset from a CSV file path.
    ///
    /// # Arguments
    ///
    /// * `path`: Path to the CSV file, `~` permitted
    pub fn from_path(path: &str) -> Result<Self, HydroscopeError> {
        let path = expanduser(path)?;
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a dataset from any reader yielding Windows-1252 encoded CSV.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HydroscopeError> {
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(WINDOWS_1252))
            .build(reader);
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(decoder);
        let columns = Columns::from_headers(csv_reader.headers()?)?;
        let mut records = Vec::new();
        for row in csv_reader.records() {
            records.push(columns.record(&row?));
        }
        tracing::info!("loaded {} records from dataset", records.len());
        Ok(Dataset { records })
    }

    /// All records, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct non-null state values, in first-seen order.
    pub fn unique_states(&self) -> Vec<String> {
        let mut states: Vec<String> = Vec::new();
        for record in &self.records {
            if let Some(state) = &record.state {
                if !states.iter().any(|seen| seen == state) {
                    states.push(state.clone());
                }
            }
        }
        states
    }

    /// Distinct non-null locations within a state, in first-seen order.
    pub fn locations_in(&self, state: &str) -> Vec<String> {
        let mut locations: Vec<String> = Vec::new();
        for record in &self.records {
            if record.state.as_deref() != Some(state) {
                continue;
            }
            if let Some(location) = &record.location {
                if !locations.iter().any(|seen| seen == location) {
                    locations.push(location.clone());
                }
            }
        }
        locations
    }

    /// Rows for a location with the primary parameter present, and the
    /// secondary parameter present when one is given.
    ///
    /// An unmatched location yields an empty row-set, never an error.
    pub fn rows_for_comparison(
        &self,
        location: &str,
        primary: Parameter,
        secondary: Option<Parameter>,
    ) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| record.location.as_deref() == Some(location))
            .filter(|record| record.value(primary).is_some())
            .filter(|record| secondary.map_or(true, |parameter| record.value(parameter).is_some()))
            .cloned()
            .collect()
    }
}
