//! Complaint sinks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use intake_core::{async_trait, ComplaintPayload, ComplaintReceipt, ComplaintSink, ServiceError};
use rand::Rng;
use tokio::sync::Mutex;

/// Stores created complaints in memory and issues `COMP-NNNNNN` references.
#[derive(Default)]
pub struct MemoryComplaintSink {
    complaints: Mutex<HashMap<String, (ComplaintPayload, ComplaintReceipt)>>,
}

impl MemoryComplaintSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All payloads created so far, in no particular order.
    pub async fn payloads(&self) -> Vec<ComplaintPayload> {
        self.complaints
            .lock()
            .await
            .values()
            .map(|(payload, _)| payload.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.complaints.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.complaints.lock().await.is_empty()
    }
}

#[async_trait]
impl ComplaintSink for MemoryComplaintSink {
    async fn create(&self, payload: ComplaintPayload) -> Result<ComplaintReceipt, ServiceError> {
        let mut complaints = self.complaints.lock().await;

        let reference_number = loop {
            let candidate = format!("COMP-{}", rand::thread_rng().gen_range(100000..=999999));
            if !complaints.contains_key(&candidate) {
                break candidate;
            }
        };

        let receipt = ComplaintReceipt {
            id: (complaints.len() + 1).to_string(),
            reference_number: reference_number.clone(),
            status: "new".to_string(),
        };
        complaints.insert(reference_number, (payload, receipt.clone()));
        Ok(receipt)
    }

    async fn find_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<ComplaintReceipt>, ServiceError> {
        Ok(self
            .complaints
            .lock()
            .await
            .get(reference_number)
            .map(|(_, receipt)| receipt.clone()))
    }
}

/// A sink whose writes always fail.
#[derive(Default)]
pub struct FailingComplaintSink {
    attempts: AtomicUsize,
}

impl FailingComplaintSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComplaintSink for FailingComplaintSink {
    async fn create(&self, _payload: ComplaintPayload) -> Result<ComplaintReceipt, ServiceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::ProcessingFailed("database is locked".to_string()))
    }

    async fn find_by_reference(
        &self,
        _reference_number: &str,
    ) -> Result<Option<ComplaintReceipt>, ServiceError> {
        Err(ServiceError::Unavailable("database is locked".to_string()))
    }
}
