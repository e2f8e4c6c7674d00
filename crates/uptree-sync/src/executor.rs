//! Executor
//!
//! Issues planned operations against the remote client in the exact order
//! the planner produced. Each client call is awaited to completion before
//! the next begins: the remote side has no transactional guarantee across
//! calls, so a put must not race the mkdirs that creates its parent. On the
//! first client failure the remainder of the batch is abandoned;
//! already-issued operations stand (remote mutations are not revocable) and
//! the caller must not advance persisted state, which makes the next run
//! re-detect and re-attempt the unexecuted remainder.

use tracing::{debug, instrument};

use uptree_core::domain::Operation;
use uptree_core::ports::RemoteClient;

use crate::SyncError;

/// Issue `operations` against `client`, returning the count issued.
///
/// In dry-run mode operations are counted and logged but never issued.
#[instrument(skip_all, fields(client = client.name(), operations = operations.len(), dry_run = dry_run))]
pub async fn execute(
    client: &dyn RemoteClient,
    operations: &[Operation],
    dry_run: bool,
) -> Result<u64, SyncError> {
    let mut issued: u64 = 0;

    for operation in operations {
        if dry_run {
            debug!(%operation, "dry-run");
            issued += 1;
            continue;
        }

        debug!(%operation, "issuing");
        match operation {
            Operation::Delete(path) => {
                client
                    .delete(path.as_str())
                    .await
                    .map_err(|source| SyncError::Client {
                        op: "delete",
                        path: path.to_string(),
                        source,
                    })?;
            }
            Operation::MakeDir(path) => {
                client
                    .mkdirs(path.as_str())
                    .await
                    .map_err(|source| SyncError::Client {
                        op: "mkdirs",
                        path: path.to_string(),
                        source,
                    })?;
            }
            Operation::Put {
                remote_path,
                local_path,
            } => {
                client
                    .put(remote_path.as_str(), local_path)
                    .await
                    .map_err(|source| SyncError::Client {
                        op: "put",
                        path: remote_path.to_string(),
                        source,
                    })?;
            }
        }
        issued += 1;
    }

    Ok(issued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uptree_core::domain::RelPath;
    use uptree_remote::memory::{ClientCall, MemoryClient};

    fn rel(path: &str) -> RelPath {
        RelPath::new(path).unwrap()
    }

    fn sample_operations() -> Vec<Operation> {
        vec![
            Operation::Delete(rel("old")),
            Operation::MakeDir(rel("d")),
            Operation::Put {
                remote_path: rel("d/f"),
                local_path: PathBuf::from("/src/d/f"),
            },
        ]
    }

    #[tokio::test]
    async fn test_issues_in_order_and_counts() {
        let client = MemoryClient::new();
        let count = execute(&client, &sample_operations(), false).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            client.calls(),
            vec![
                ClientCall::Delete("old".into()),
                ClientCall::Mkdirs("d".into()),
                ClientCall::Put("d/f".into(), PathBuf::from("/src/d/f")),
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_counts_without_calls() {
        let client = MemoryClient::new();
        let count = execute(&client, &sample_operations(), true).await.unwrap();

        assert_eq!(count, 3);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_aborts_on_first_failure() {
        let client = MemoryClient::new().failing_on_call(2);
        let result = execute(&client, &sample_operations(), false).await;

        let err = result.unwrap_err();
        assert!(matches!(err, SyncError::Client { op: "mkdirs", .. }));
        // The delete went through; the put after the failure was never issued.
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let client = MemoryClient::new();
        let count = execute(&client, &[], false).await.unwrap();
        assert_eq!(count, 0);
        assert!(client.calls().is_empty());
    }
}
