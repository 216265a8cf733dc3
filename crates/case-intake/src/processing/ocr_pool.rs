//! Bounded parallel OCR over a case's attachments

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::providers::OcrProvider;
use crate::types::Attachment;

/// Runs OCR for a batch of attachments with bounded concurrency
pub struct OcrPool {
    provider: Arc<dyn OcrProvider>,
    max_workers: usize,
}

impl OcrPool {
    /// Create a pool that runs at most `max_workers` analyses at once
    pub fn new(provider: Arc<dyn OcrProvider>, max_workers: usize) -> Self {
        Self {
            provider,
            max_workers: max_workers.max(1),
        }
    }

    /// Workers used for a batch of `count` attachments
    pub fn workers_for(&self, count: usize) -> usize {
        count.min(self.max_workers).max(1)
    }

    /// Extract text from every attachment.
    ///
    /// The output has one entry per attachment, in input order. An attachment
    /// whose analysis fails contributes an empty string.
    pub async fn extract_all(&self, attachments: &[Attachment]) -> Vec<String> {
        let workers = self.workers_for(attachments.len());
        let semaphore = Arc::new(Semaphore::new(workers));

        tracing::info!(
            "Starting OCR processing: {} file(s), {} worker(s)",
            attachments.len(),
            workers
        );

        let futures: Vec<_> = attachments
            .iter()
            .map(|attachment| {
                let sem = semaphore.clone();
                let provider = self.provider.clone();

                async move {
                    let _permit = match sem.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => return String::new(),
                    };

                    let start = Instant::now();
                    match provider.analyze(&attachment.bytes).await {
                        Ok(result) => {
                            tracing::debug!(
                                "[{}] {} line(s) in {:.1}s",
                                attachment.file_name,
                                result.line_count(),
                                start.elapsed().as_secs_f64()
                            );
                            result.text()
                        }
                        Err(e) => {
                            tracing::error!(
                                "Error analyzing document {}: {}",
                                attachment.file_name,
                                e
                            );
                            String::new()
                        }
                    }
                }
            })
            .collect();

        join_all(futures).await
    }
}

/// Join per-file OCR output into one text blob
pub fn join_texts(texts: &[String]) -> String {
    texts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOcr;
    use std::time::Duration;

    fn attachments(names: &[&str]) -> Vec<Attachment> {
        names
            .iter()
            .map(|n| Attachment::new(*n, n.as_bytes().to_vec()))
            .collect()
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        // Earlier files take longer, so completion order is reversed.
        let ocr = ScriptedOcr::new()
            .with_delay("a.pdf", Duration::from_millis(60))
            .with_delay("b.pdf", Duration::from_millis(30))
            .with_delay("c.pdf", Duration::from_millis(1));
        let pool = OcrPool::new(Arc::new(ocr), 4);

        let texts = pool.extract_all(&attachments(&["a.pdf", "b.pdf", "c.pdf"])).await;
        assert_eq!(texts, vec!["text of a.pdf", "text of b.pdf", "text of c.pdf"]);
    }

    #[tokio::test]
    async fn test_failure_contributes_empty_string() {
        let ocr = ScriptedOcr::new().failing("b.pdf");
        let pool = OcrPool::new(Arc::new(ocr), 4);

        let texts = pool.extract_all(&attachments(&["a.pdf", "b.pdf", "c.pdf"])).await;
        assert_eq!(texts, vec!["text of a.pdf", "", "text of c.pdf"]);
        assert_eq!(join_texts(&texts), "text of a.pdf\n\ntext of c.pdf");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let ocr = Arc::new(ScriptedOcr::new().with_default_delay(Duration::from_millis(20)));
        let pool = OcrPool::new(ocr.clone(), 2);

        let names: Vec<String> = (0..7).map(|i| format!("f{}.png", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let texts = pool.extract_all(&attachments(&refs)).await;

        assert_eq!(texts.len(), 7);
        assert!(ocr.peak_concurrency() <= 2);
        assert!(ocr.peak_concurrency() >= 1);
    }

    #[test]
    fn test_workers_for() {
        let pool = OcrPool::new(Arc::new(ScriptedOcr::new()), 4);
        assert_eq!(pool.workers_for(0), 1);
        assert_eq!(pool.workers_for(2), 2);
        assert_eq!(pool.workers_for(10), 4);

        let pool = OcrPool::new(Arc::new(ScriptedOcr::new()), 0);
        assert_eq!(pool.workers_for(10), 1);
    }
}
