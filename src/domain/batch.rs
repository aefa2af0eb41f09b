//! Bounded fan-out of per-domain checks

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::error::DomainHunterError;
use crate::types::{CheckMethod, CheckResult};

/// Runs one task per domain with at most `limit` of them inside their unit
/// of work at any moment.
///
/// Results come back in input order whatever order the lookups finish in,
/// and `run` only returns once every task has finished.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    limit: usize,
    method: CheckMethod,
}

impl BatchRunner {
    /// `method` labels the results of tasks that die before reporting.
    pub fn new(limit: usize, method: CheckMethod) -> Self {
        Self {
            limit: limit.max(1),
            method,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub async fn run<F, Fut>(&self, domains: &[String], work: F) -> Vec<CheckResult>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        if domains.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.limit));
        let work = Arc::new(work);

        let handles: Vec<_> = domains
            .iter()
            .map(|domain| {
                let semaphore = Arc::clone(&semaphore);
                let work = Arc::clone(&work);
                let domain = domain.clone();
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquire cannot fail.
                    let _permit = semaphore.acquire_owned().await.ok();
                    work(domain).await
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(domains)
            .map(|(joined, domain)| match joined {
                Ok(result) => result,
                Err(e) => {
                    let err = DomainHunterError::internal(format!("check aborted: {}", e));
                    tracing::warn!(domain = %domain, error = %err, "Check task did not complete");
                    CheckResult::failed(domain.clone(), self.method, err.to_string())
                }
            })
            .collect()
    }
}
