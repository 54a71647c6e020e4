//! # Analyst Agent
//!
//! Backend for a data-analyst web form: upload a CSV or Excel file,
//! then ask natural-language questions about it. The upload is
//! normalized (per-column semantic typing, quote sanitization, null
//! sentinels) and staged as a fully-quoted CSV artifact that an
//! external analytic engine reads by path; questions are forwarded to
//! a hosted query agent together with a semantic model describing the
//! staged table.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use analyst_agent::application::AnalystSession;
//! use analyst_agent::domain::AgentConfig;
//! use analyst_agent::infrastructure::agent::OpenAiAgentClient;
//! use analyst_agent::infrastructure::staging::StagingWriter;
//!
//! # async fn demo() -> analyst_agent::domain::Result<()> {
//! let mut session = AnalystSession::new(
//!     AgentConfig::default(),
//!     StagingWriter::new(None),
//!     Arc::new(OpenAiAgentClient::new()),
//! );
//!
//! let summary = session.upload(b"id,amount\n1,10\n2,20", "orders.csv")?;
//! println!("columns: {:?}", summary.columns);
//!
//! let answer = session.ask("What is the total amount?").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::AnalystSession;
pub use domain::{AppError, Result};
pub use infrastructure::config::AppConfig;
