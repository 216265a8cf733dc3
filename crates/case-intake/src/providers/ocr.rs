//! OCR provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Recognized text of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrPage {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Recognized lines, in reading order
    pub lines: Vec<String>,
}

/// Result of analyzing one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrResult {
    pub pages: Vec<OcrPage>,
}

impl OcrResult {
    /// Every line of every page, newline-joined
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total number of recognized lines
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// Trait for layout/OCR analysis
///
/// Implementations:
/// - `DocumentIntelligenceClient`: Azure AI Document Intelligence
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Analyze a document and return its recognized lines
    async fn analyze(&self, data: &[u8]) -> Result<OcrResult>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
