use std::sync::Arc;

use crate::application::services::JobService;

#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<JobService>,
}

impl AppState {
    pub fn new(job_service: Arc<JobService>) -> Self {
        Self { job_service }
    }
}
