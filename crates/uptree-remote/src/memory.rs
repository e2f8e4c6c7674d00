//! In-memory recording client for testing.
//!
//! Records every call in issue order so tests can assert both counts and the
//! cross-method ordering the planner guarantees (deletes before mkdirs
//! before puts). An optional injected failure makes the Nth call error
//! without being recorded, for executor abort tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::bail;

use uptree_core::ports::RemoteClient;

/// One recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Mkdirs(String),
    Put(String, PathBuf),
    Delete(String),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<ClientCall>,
    attempts: u64,
}

/// Recording in-memory client.
///
/// All state lives behind a mutex so the client can be shared across the
/// engine and the asserting test.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    inner: Arc<Mutex<Inner>>,
    fail_on_call: Option<u64>,
}

impl MemoryClient {
    /// Create a new client with no recorded calls
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th call (1-based) fail with an injected error
    #[must_use]
    pub fn failing_on_call(mut self, n: u64) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// All recorded calls, in issue order
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of recorded `mkdirs` calls
    #[must_use]
    pub fn mkdirs_count(&self) -> usize {
        self.count(|call| matches!(call, ClientCall::Mkdirs(_)))
    }

    /// Number of recorded `put` calls
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.count(|call| matches!(call, ClientCall::Put(_, _)))
    }

    /// Number of recorded `delete` calls
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.count(|call| matches!(call, ClientCall::Delete(_)))
    }

    fn count(&self, pred: impl Fn(&ClientCall) -> bool) -> usize {
        self.inner.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: ClientCall) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts += 1;
        if self.fail_on_call == Some(inner.attempts) {
            bail!("injected failure on call {}", inner.attempts);
        }
        inner.calls.push(call);
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteClient for MemoryClient {
    fn name(&self) -> &str {
        "memory"
    }

    fn base_path(&self) -> &str {
        "/memory"
    }

    async fn mkdirs(&self, path: &str) -> anyhow::Result<()> {
        self.record(ClientCall::Mkdirs(path.to_string()))
    }

    async fn put(&self, remote_path: &str, local_path: &Path) -> anyhow::Result<()> {
        self.record(ClientCall::Put(
            remote_path.to_string(),
            local_path.to_path_buf(),
        ))
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.record(ClientCall::Delete(path.to_string()))
    }
}
