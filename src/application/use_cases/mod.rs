pub mod analyst;
pub mod ingestion;
pub mod normalizer;
pub mod sanitizer;
pub mod type_inference;
