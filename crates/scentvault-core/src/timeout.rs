//! Deadline wrapper for store reads and model calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Run `fut` with a deadline, mapping expiry to [`Error::Timeout`].
///
/// `what` names the operation in the error message.
pub async fn with_timeout<T, F>(duration: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(format!(
            "{} after {}ms",
            what,
            duration.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), "noop", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_passes_error_through() {
        let result: Result<()> = with_timeout(Duration::from_secs(1), "noop", async {
            Err(Error::Internal("boom".to_string()))
        })
        .await;
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: Result<()> = with_timeout(Duration::from_millis(50), "catalog read", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        match result {
            Err(Error::Timeout(msg)) => assert!(msg.contains("catalog read")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
