//! case-intake: HTTP service that turns a fraud case's attachments into an investigation summary
//!
//! For each request the service stores uploaded files under the case's blob
//! prefix, OCRs every stored attachment, asks a chat model for structured
//! entities and then for a summary, persists the result as a case record and
//! returns the summary.

pub mod config;
pub mod error;
pub mod generation;
pub mod intake;
pub mod pipeline;
pub mod processing;
pub mod providers;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AzureSettings, IntakeConfig};
pub use error::{Error, Result};
pub use intake::CaseRequest;
pub use pipeline::CasePipeline;
pub use providers::Services;
pub use server::CaseServer;
pub use types::{Attachment, CaseContext, CaseDocument};
