//! drillbook-sheets: load question banks from spreadsheets and TOML files.

pub mod cache;
pub mod loader;
pub mod workbook;

pub use cache::BankCache;
pub use loader::{is_supported, load_bank, load_bank_directory, load_banks};
pub use workbook::read_workbook;
