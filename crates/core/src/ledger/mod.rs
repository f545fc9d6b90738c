pub mod ledger_model;
pub mod ledger_store;

pub use ledger_model::{Ledger, Position};
pub use ledger_store::{CsvLedgerStore, LedgerStore};
