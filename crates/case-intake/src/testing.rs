//! In-memory provider fakes for unit tests

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::providers::{
    BlobStore, CaseStore, ChatProvider, ChatRequest, OcrPage, OcrProvider, OcrResult, Services,
};
use crate::types::CaseDocument;

/// Blob container kept in a sorted map, so listing is in name order
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, name: &str, data: &[u8]) -> Self {
        self.objects.lock().insert(name.to_string(), Bytes::copy_from_slice(data));
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> Result<()> {
        let mut objects = self.objects.lock();
        if !overwrite && objects.contains_key(path) {
            return Err(Error::storage(format!("{} already exists", path)));
        }
        objects.insert(path.to_string(), data);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn download(&self, name: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::storage(format!("{} not found", name)))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// OCR fake that answers `text of {content}` for each document, treating the
/// document bytes as its name
#[derive(Default)]
pub struct ScriptedOcr {
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    failing: HashSet<String>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Highest number of analyses that ran at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrProvider for ScriptedOcr {
    async fn analyze(&self, data: &[u8]) -> Result<OcrResult> {
        let name = String::from_utf8_lossy(data).to_string();
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);

        let delay = self.delays.get(&name).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&name) {
            return Err(Error::ocr(format!("cannot read {}", name)));
        }

        Ok(OcrResult {
            pages: vec![OcrPage {
                page_number: 1,
                lines: vec![format!("text of {}", name)],
            }],
        })
    }

    fn name(&self) -> &str {
        "scripted-ocr"
    }
}

/// Chat fake that replays queued replies and records every request
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies.lock().push_back(Ok(content.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::llm("no scripted reply left")))
    }

    fn name(&self) -> &str {
        "scripted-chat"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Case store that keeps every upserted record
#[derive(Default)]
pub struct RecordingCaseStore {
    documents: Mutex<Vec<CaseDocument>>,
}

impl RecordingCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<CaseDocument> {
        self.documents.lock().clone()
    }
}

#[async_trait]
impl CaseStore for RecordingCaseStore {
    async fn upsert(&self, document: &CaseDocument) -> Result<()> {
        self.documents.lock().push(document.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Fakes wired into a [`Services`] bundle, with handles kept for assertions
pub struct FakeServices {
    pub blob_store: Arc<MemoryBlobStore>,
    pub ocr: Arc<ScriptedOcr>,
    pub chat: Arc<ScriptedChat>,
    pub case_store: Arc<RecordingCaseStore>,
}

impl FakeServices {
    pub fn new(blob_store: MemoryBlobStore, ocr: ScriptedOcr, chat: ScriptedChat) -> Self {
        Self {
            blob_store: Arc::new(blob_store),
            ocr: Arc::new(ocr),
            chat: Arc::new(chat),
            case_store: Arc::new(RecordingCaseStore::new()),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            blob_store: self.blob_store.clone(),
            ocr: self.ocr.clone(),
            chat: self.chat.clone(),
            case_store: self.case_store.clone(),
        }
    }
}
