//! Retry policy for assistant calls
//!
//! The pipeline retries a failed generation up to three times, then
//! proceeds with a warning rather than aborting the run.

use crate::backend::AssistantBackend;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Result of a retried generation. `output` is `None` when every attempt
/// failed; `warning` carries the last error in that case.
#[derive(Debug)]
pub struct RetryOutcome {
    pub output: Option<String>,
    pub attempts: u32,
    pub warning: Option<String>,
}

impl RetryOutcome {
    pub fn succeeded(&self) -> bool {
        self.output.is_some()
    }
}

/// Run a generation with retries. Never returns an error; exhausted
/// attempts surface as a warning on the outcome.
pub async fn run_with_retry(
    backend: &dyn AssistantBackend,
    prompt: &str,
    policy: &RetryPolicy,
) -> RetryOutcome {
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match backend.generate(prompt).await {
            Ok(output) => {
                return RetryOutcome {
                    output: Some(output),
                    attempts: attempt,
                    warning: None,
                };
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "assistant call failed");
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    let warning = last_error
        .map(|e| format!("assistant failed after {} attempts: {}", policy.max_attempts, e));

    RetryOutcome {
        output: None,
        attempts: policy.max_attempts,
        warning,
    }
}
