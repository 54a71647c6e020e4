pub mod use_cases;

pub use use_cases::analyst::{AnalystSession, UploadSummary};
pub use use_cases::ingestion::{IngestedUpload, IngestionPipeline};
pub use use_cases::normalizer::Normalizer;
