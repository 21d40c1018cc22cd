use log::warn;
use std::future::Future;

use crate::http_client::FetchError;

// bounded retry around a fetch callback; the delay between attempts comes
// from the error itself so a rate-limit wait hint wins over the fixed
// backoff, and a non-retryable error aborts the loop immediately
pub async fn retry_wrapper<Fut, T>(
  backoff_ms: u64,
  short_backoff_ms: u64,
  num_attempts: usize,
  cb: &impl Fn() -> Fut,
) -> Result<T, FetchError>
where
  Fut: Future<Output = Result<T, FetchError>>,
{
  let mut attempt = 0;
  loop {
    let result = cb().await;
    if result.is_ok() {
      return Ok(result.unwrap());
    }
    let error = result.err().unwrap();
    if error.is_retryable() == false {
      return Err(error);
    }
    attempt += 1;
    if attempt >= num_attempts {
      return Err(error);
    }
    let delay_ms = error.retry_delay_ms(backoff_ms, short_backoff_ms);
    warn!("attempt {} / {} failed, retrying in {} ms: {}", attempt, num_attempts, delay_ms, error);
    tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
  }
}
