//! Core types for case intake

pub mod attachment;
pub mod case;
pub mod context;

pub use attachment::Attachment;
pub use case::{CaseDocument, ExtractedEntities, SummaryResult};
pub use context::{CaseContext, CustomerInfo, EmailInfo};
