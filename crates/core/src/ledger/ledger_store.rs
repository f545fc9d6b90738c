//! Durable round-trip of the ledger as a CSV table.
//!
//! The persisted layout is a headered table with exactly the columns
//! `ticker,avg_cost,quantity`, one row per position, no index column.
//! Saves replace the whole file atomically so a concurrent reader sees
//! either the fully-old or fully-new table, never a partial write.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

use super::{Ledger, Position};

/// Trait for durable ledger storage.
pub trait LedgerStore: Send + Sync {
    /// Read the persisted ledger. No prior state is a normal empty start,
    /// never an error; a corrupt table is reported, never discarded.
    fn load(&self) -> Result<Ledger, StorageError>;

    /// Overwrite the durable state with the full ledger contents.
    /// Must appear atomic to readers.
    fn save(&self, ledger: &Ledger) -> Result<(), StorageError>;
}

/// One persisted row.
///
/// `avg_cost` travels as a string so the decimal survives the round trip
/// exactly as written.
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    ticker: String,
    avg_cost: String,
    quantity: u64,
}

/// CSV-file-backed ledger store.
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp path in the same directory, so the final rename
    /// never crosses a filesystem boundary.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self) -> Result<Ledger, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No ledger file at {}, starting empty",
                    self.path.display()
                );
                return Ok(Ledger::new());
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut ledger = Ledger::new();

        for (index, record) in reader.deserialize::<LedgerRow>().enumerate() {
            let row_number = index + 1;
            let row = record.map_err(|e| {
                StorageError::Corrupt(format!(
                    "{}: row {}: {}",
                    self.path.display(),
                    row_number,
                    e
                ))
            })?;
            let position = row_to_position(row).map_err(|message| {
                StorageError::Corrupt(format!(
                    "{}: row {}: {}",
                    self.path.display(),
                    row_number,
                    message
                ))
            })?;
            if let Some(previous) = ledger.insert(position) {
                return Err(StorageError::Corrupt(format!(
                    "{}: duplicate ticker '{}'",
                    self.path.display(),
                    previous.ticker
                )));
            }
        }

        debug!(
            "Loaded {} positions from {}",
            ledger.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StorageError> {
        let temp_path = self.temp_path();

        let mut writer = csv::Writer::from_path(&temp_path)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        for position in ledger.positions() {
            writer
                .serialize(LedgerRow {
                    ticker: position.ticker.clone(),
                    avg_cost: position.avg_cost.to_string(),
                    quantity: position.quantity,
                })
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        drop(writer);

        // The rename is what makes the replacement atomic
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        debug!(
            "Persisted {} positions to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Validate a persisted row against the ledger invariants.
fn row_to_position(row: LedgerRow) -> Result<Position, String> {
    let ticker = row.ticker.trim();
    if ticker.is_empty() {
        return Err("empty ticker".to_string());
    }

    let avg_cost: Decimal = row
        .avg_cost
        .trim()
        .parse()
        .map_err(|e| format!("invalid avg_cost '{}': {}", row.avg_cost, e))?;
    if avg_cost <= Decimal::ZERO {
        return Err(format!(
            "non-positive avg_cost {} for ticker '{}'",
            avg_cost, ticker
        ));
    }

    if row.quantity == 0 {
        return Err(format!("zero quantity for ticker '{}'", ticker));
    }

    Ok(Position {
        ticker: ticker.to_string(),
        avg_cost,
        quantity: row.quantity,
    })
}
