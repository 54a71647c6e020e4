// ============================================================
// DOMAIN LAYER
// ============================================================
// Core types and value objects for tabular ingestion
// No I/O, no async, no external services

pub mod agent_config;
pub mod error;
pub mod semantic_model;
pub mod table;

pub use agent_config::AgentConfig;
pub use error::{AppError, Result};
pub use semantic_model::{SemanticModel, TableEntry, UPLOADED_TABLE_NAME};
pub use table::{CellValue, NormalizedColumn, NormalizedTable, RawColumn, RawTable, SemanticType};
