//! Business logic services

pub mod batch_writer;
pub mod country;
pub mod importer;
pub mod linker;
pub mod normalizer;
pub mod record_store;
pub mod spreadsheet;
