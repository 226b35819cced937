use std::fmt::Display;
use std::future::Future;

/// Run `attempt` and return its value, or `fallback` untouched if it fails.
///
/// The failure is logged at `warn` and never propagated: callers use this for
/// optional enrichment steps that must not turn a success into an error.
pub async fn best_effort<T, E, Fut>(label: &str, fallback: T, attempt: Fut) -> T
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
{
    match attempt.await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(step = label, %error, "best-effort step failed, keeping original");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_attempt_value_on_success() {
        let value = best_effort("t", "original".to_string(), async {
            Ok::<_, String>("better".to_string())
        })
        .await;
        assert_eq!(value, "better");
    }

    #[tokio::test]
    async fn returns_fallback_on_error() {
        let value = best_effort("t", "original".to_string(), async {
            Err::<String, _>("boom")
        })
        .await;
        assert_eq!(value, "original");
    }
}
