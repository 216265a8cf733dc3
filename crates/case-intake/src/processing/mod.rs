//! Attachment processing

pub mod ocr_pool;

pub use ocr_pool::{join_texts, OcrPool};
