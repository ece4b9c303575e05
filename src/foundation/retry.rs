use crate::foundation::error::{SynthError, SynthResult};

/// Default attempt cap for sampling and rendering retries.
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// Run `op` until it succeeds, retrying only transient failures.
///
/// Fatal errors are returned immediately. After `max_attempts` transient failures the last one is
/// wrapped in [`SynthError::RetryExhausted`]. `op` receives the 1-based attempt number.
pub fn retry<T>(
    max_attempts: usize,
    what: &str,
    mut op: impl FnMut(usize) -> SynthResult<T>,
) -> SynthResult<T> {
    let max_attempts = max_attempts.max(1);
    let mut last = None;
    for attempt in 1..=max_attempts {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() => {
                tracing::warn!(attempt, max_attempts, error = %e, "{what} failed, retrying");
                last = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(SynthError::RetryExhausted {
        attempts: max_attempts,
        last: Box::new(last.unwrap_or_else(|| SynthError::render("no attempt was made"))),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/retry.rs"]
mod tests;
