pub mod file_ledger;
