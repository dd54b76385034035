use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Job;

/// Caller-facing view of a job snapshot.
#[derive(Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub pipeline: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_refs: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        let result_refs = (!job.result_refs().is_empty()).then(|| {
            job.result_refs()
                .iter()
                .map(|(name, url)| (name.clone(), url.to_string()))
                .collect()
        });

        Self {
            job_id: job.id().to_string(),
            pipeline: job.pipeline().to_string(),
            status: job.state().as_str().to_string(),
            result_refs,
            error: job.error().map(str::to_string),
            created_at: job.created_at().to_rfc3339(),
            updated_at: job.updated_at().to_rfc3339(),
        }
    }
}
