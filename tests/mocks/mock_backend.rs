//! Scripted task backend
//!
//! Replays canned replies for each backend operation and counts calls, so
//! tests can assert exactly how many requests a flow made.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ytrelay::backend::{
    BackendError, CreateTaskRequest, CreateTaskResponse, ProcessingStatus, TaskBackend, TaskResult, TaskState,
    TaskStatusResponse,
};

/// One canned reply.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Rejected(u16, String),
    Transport,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, BackendError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Rejected(status, detail) => Err(BackendError::Rejected { status, detail }),
            Reply::Transport => Err(transport_error()),
        }
    }
}

/// A real `reqwest::Error`; an unparsable URL fails while building the request.
pub fn transport_error() -> BackendError {
    match reqwest::Client::new().get("not a url").build() {
        Err(e) => BackendError::Transport(e),
        Ok(_) => unreachable!("building a request for an invalid URL must fail"),
    }
}

pub fn accepted(task_id: &str) -> Reply<CreateTaskResponse> {
    Reply::Ok(CreateTaskResponse {
        success: true,
        download_id: Some(task_id.to_string()),
        message: Some("Task created successfully".to_string()),
        error: None,
    })
}

pub fn reused(task_id: &str) -> Reply<CreateTaskResponse> {
    Reply::Ok(CreateTaskResponse {
        success: true,
        download_id: Some(task_id.to_string()),
        message: Some("Task completed by reusing existing result".to_string()),
        error: None,
    })
}

pub fn state(state: TaskState) -> Reply<TaskStatusResponse> {
    Reply::Ok(TaskStatusResponse {
        status: state,
        error_message: None,
    })
}

pub fn failed(message: &str) -> Reply<TaskStatusResponse> {
    Reply::Ok(TaskStatusResponse {
        status: TaskState::Failed,
        error_message: Some(message.to_string()),
    })
}

pub fn primary_result(file_name: &str, size: u64) -> TaskResult {
    TaskResult {
        file_name: Some(file_name.to_string()),
        file_size_bytes: Some(size),
        is_primary_result: Some(true),
    }
}

/// Backend double with per-operation scripts and call counters.
pub struct MockBackend {
    create: Mutex<Reply<CreateTaskResponse>>,
    statuses: Mutex<VecDeque<Reply<TaskStatusResponse>>>,
    results: Mutex<Reply<Vec<TaskResult>>>,
    processing: Mutex<Reply<ProcessingStatus>>,
    created: Mutex<Vec<CreateTaskRequest>>,
    create_calls: AtomicUsize,
    status_calls: AtomicUsize,
    results_calls: AtomicUsize,
    processing_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            create: Mutex::new(accepted("task-1")),
            statuses: Mutex::new(VecDeque::new()),
            results: Mutex::new(Reply::Ok(Vec::new())),
            processing: Mutex::new(Reply::Ok(ProcessingStatus::default())),
            created: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            results_calls: AtomicUsize::new(0),
            processing_calls: AtomicUsize::new(0),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create(self, reply: Reply<CreateTaskResponse>) -> Self {
        *self.create.lock().unwrap() = reply;
        self
    }

    /// Status replies in order; once used up, every query answers `PROCESSING`.
    pub fn with_statuses(self, replies: Vec<Reply<TaskStatusResponse>>) -> Self {
        *self.statuses.lock().unwrap() = replies.into();
        self
    }

    pub fn with_results(self, reply: Reply<Vec<TaskResult>>) -> Self {
        *self.results.lock().unwrap() = reply;
        self
    }

    pub fn with_processing(self, reply: Reply<ProcessingStatus>) -> Self {
        *self.processing.lock().unwrap() = reply;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn results_calls(&self) -> usize {
        self.results_calls.load(Ordering::SeqCst)
    }

    pub fn processing_calls(&self) -> usize {
        self.processing_calls.load(Ordering::SeqCst)
    }

    /// URLs submitted so far, in order.
    pub fn submitted_urls(&self) -> Vec<String> {
        self.created.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }

    pub fn last_request(&self) -> Option<CreateTaskRequest> {
        self.created.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TaskBackend for MockBackend {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreateTaskResponse, BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(request.clone());
        let reply = self.create.lock().unwrap().clone();
        reply.into_result()
    }

    async fn task_status(&self, _task_id: &str) -> Result<TaskStatusResponse, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| state(TaskState::Processing));
        reply.into_result()
    }

    async fn task_results(&self, _task_id: &str) -> Result<Vec<TaskResult>, BackendError> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.results.lock().unwrap().clone();
        reply.into_result()
    }

    async fn processing_status(&self) -> Result<ProcessingStatus, BackendError> {
        self.processing_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.processing.lock().unwrap().clone();
        reply.into_result()
    }
}
