//! Error types for the IFC LCA engine.
//!
//! The resolution, normalization and aggregation engines never fail: they
//! degrade to zero/excluded and report counts. Only I/O boundaries (reading
//! models, databases, configs and mappings, writing exports) return errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing IFC files.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the IFC file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The STEP format is invalid or malformed.
    #[error("invalid STEP format: {message}")]
    InvalidStep { message: String },
}

/// Errors that can occur when loading an environmental impact database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to read the database file from disk.
    #[error("failed to read database '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The database file is not valid JSON for its schema.
    #[error("invalid database JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The database file is not valid CSV.
    #[error("invalid database CSV in '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// The JSON document has neither of the shapes the schema accepts.
    #[error("unexpected database layout in '{path}': {message}")]
    Layout { path: PathBuf, message: String },
}

/// Errors that can occur when loading an analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration is not valid JSON.
    #[error("invalid config '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading or saving a material mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Failed to read the mapping file.
    #[error("failed to read mapping '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the mapping file.
    #[error("failed to write mapping '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The mapping is not a JSON object of material name to record id.
    #[error("invalid mapping JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
