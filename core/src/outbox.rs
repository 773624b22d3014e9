//! Single pass over locally stored observations that still need uploading.
//!
//! Scheduling, retries and backoff belong to the caller; this only pushes each
//! record once, in order, and reports what failed.

use crate::api::ObserverApi;
use crate::error::ApiError;
use crate::types::{AnswerBatch, Note, PollingStationUpdate};

/// A record waiting to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingUpload {
    PollingStation(PollingStationUpdate),
    Note(Note),
    Answers(AnswerBatch),
}

impl PendingUpload {
    async fn upload<A: ObserverApi>(&self, api: &A) -> Result<(), ApiError> {
        match self {
            PendingUpload::PollingStation(update) => api.upload_polling_station(update).await,
            PendingUpload::Note(note) => api.upload_note(note).await,
            PendingUpload::Answers(answers) => api.upload_answers(answers).await,
        }
    }
}

/// Result of [`flush_pending`]. Indices refer to the input slice.
#[derive(Debug, Default, PartialEq)]
pub struct FlushReport {
    pub uploaded: Vec<usize>,
    pub failed: Vec<(usize, ApiError)>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upload `records` in order.
///
/// When the device is not `reachable` nothing is sent and every record fails
/// with `Generic`. An `Unauthorized` answer stops the pass: the remaining
/// records are reported as `Unauthorized` without being sent.
pub async fn flush_pending<A: ObserverApi>(
    api: &A,
    reachable: bool,
    records: &[PendingUpload],
) -> FlushReport {
    let mut report = FlushReport::default();
    if !reachable {
        tracing::info!(pending = records.len(), "skipping upload, network unreachable");
        report.failed = (0..records.len())
            .map(|index| (index, ApiError::generic("network unreachable")))
            .collect();
        return report;
    }

    for (index, record) in records.iter().enumerate() {
        match record.upload(api).await {
            Ok(()) => report.uploaded.push(index),
            Err(ApiError::Unauthorized) => {
                tracing::warn!(index, "upload rejected as unauthorized, stopping");
                report
                    .failed
                    .extend((index..records.len()).map(|i| (i, ApiError::Unauthorized)));
                break;
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "upload failed");
                report.failed.push((index, err));
            }
        }
    }
    report
}
