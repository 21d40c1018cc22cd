use std::str::FromStr;

use crate::retry;
use reqwest::{
  header::{HeaderMap, HeaderName, HeaderValue},
  Client, Method,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
  // transport-level failure, nothing reached us
  Network(String),
  // non-2xx response; retry_after is the server wait hint in seconds, only
  // ever populated from a rate-limit response
  Status { status: u16, retry_after: Option<u64> },
  // 2xx response whose body could not be parsed or lacked required data;
  // a broken upstream contract, not a transient condition
  Parse(String),
}

impl FetchError {
  pub fn is_retryable(&self) -> bool {
    match self {
      FetchError::Network(_) => true,
      FetchError::Status { .. } => true,
      FetchError::Parse(_) => false,
    }
  }

  pub fn retry_delay_ms(&self, backoff_ms: u64, short_backoff_ms: u64) -> u64 {
    match self {
      FetchError::Network(_) => backoff_ms,
      FetchError::Status { status: 429, retry_after: Some(seconds) } => seconds * 1000,
      FetchError::Status { status: 429, retry_after: None } => backoff_ms,
      FetchError::Status { status, .. } if *status >= 500 => backoff_ms,
      FetchError::Status { .. } => short_backoff_ms,
      FetchError::Parse(_) => 0,
    }
  }
}

impl std::fmt::Display for FetchError {
  fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FetchError::Network(message) => {
        return write!(formatter, "network error: {}", message);
      }
      FetchError::Status { status, retry_after: Some(seconds) } => {
        return write!(formatter, "invalid response status: {} (retry after {}s)", status, seconds);
      }
      FetchError::Status { status, retry_after: None } => {
        return write!(formatter, "invalid response status: {}", status);
      }
      FetchError::Parse(message) => {
        return write!(formatter, "unexpected response body: {}", message);
      }
    }
  }
}

impl std::error::Error for FetchError {}

fn parse_retry_after(response_headers: &HeaderMap) -> Option<u64> {
  let header_value = response_headers.get("retry-after")?;
  let stringified_value = header_value.to_str().ok()?;
  return stringified_value.trim().parse::<u64>().ok();
}

pub async fn http_request_text(
  http_client: &Client,
  method_str: &str,
  url: &str,
  request_headers: &Vec<(String, String)>,
  payload: &Option<String>,
) -> Result<String, FetchError> {
  log::info!("http_request_text: method = {} url = {}", method_str, url);
  let mut request_headers_map = HeaderMap::new();
  for (key, value) in request_headers {
    request_headers_map.insert(HeaderName::from_str(key).unwrap(), HeaderValue::from_str(value).unwrap());
  }
  let method = Method::from_bytes(method_str.as_bytes()).unwrap();
  let request = if payload.is_some() {
    let payload = payload.as_ref().unwrap();
    http_client.request(method, url).headers(request_headers_map).body(payload.to_owned())
  } else {
    http_client.request(method, url).headers(request_headers_map)
  };
  let response = request.send().await;
  if response.is_err() {
    return Err(FetchError::Network(format!("{}", response.err().unwrap())));
  }
  let response = response.unwrap();
  let response_status = response.status().as_u16();
  let is_2xx = response_status >= 200 && response_status <= 299;
  if is_2xx == false {
    let retry_after = parse_retry_after(response.headers());
    return Err(FetchError::Status { status: response_status, retry_after });
  }
  let response_body = response.text().await;
  if response_body.is_err() {
    return Err(FetchError::Network(format!("{}", response_body.err().unwrap())));
  }
  let stringified_response_body = response_body.unwrap();
  log::debug!("stringified_response_body = {}", stringified_response_body);
  return Ok(stringified_response_body);
}

pub async fn http_request_json<T>(
  http_client: &Client,
  method_str: &str,
  url: &str,
  headers: &Vec<(String, String)>,
  payload: &Option<String>,
) -> Result<T, FetchError>
where
  T: for<'de> serde::Deserialize<'de>,
{
  log::info!("http_request_json: method = {} url = {}", method_str, url);
  let result = http_request_text(http_client, method_str, url, headers, payload).await;
  if result.is_err() {
    return Err(result.err().unwrap());
  }
  let stringified_response_body = result.unwrap();
  let parsed_response_body = serde_json::from_str::<T>(&stringified_response_body);
  if parsed_response_body.is_err() {
    return Err(FetchError::Parse(format!("{}", parsed_response_body.err().unwrap())));
  }
  return Ok(parsed_response_body.unwrap());
}

pub async fn http_request_json_with_retries<T>(
  http_client: &Client,
  method_str: &str,
  url: &str,
  headers: &Vec<(String, String)>,
  payload: &Option<String>,
  backoff_ms: u64,
  short_backoff_ms: u64,
  num_attempts: usize,
) -> Result<T, FetchError>
where
  T: for<'de> serde::Deserialize<'de>,
{
  let cb = || {
    return http_request_json::<T>(http_client, method_str, url, &headers, &payload);
  };
  return retry::retry_wrapper(backoff_ms, short_backoff_ms, num_attempts, &cb).await;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rate_limit_hint_overrides_backoff() {
    let error = FetchError::Status { status: 429, retry_after: Some(7) };
    assert_eq!(error.retry_delay_ms(5000, 1000), 7000);
  }

  #[test]
  fn rate_limit_without_hint_uses_backoff() {
    let error = FetchError::Status { status: 429, retry_after: None };
    assert_eq!(error.retry_delay_ms(5000, 1000), 5000);
  }

  #[test]
  fn server_errors_and_network_errors_use_backoff() {
    let server_error = FetchError::Status { status: 503, retry_after: None };
    assert_eq!(server_error.retry_delay_ms(5000, 1000), 5000);
    let network_error = FetchError::Network(String::from("connection reset"));
    assert_eq!(network_error.retry_delay_ms(5000, 1000), 5000);
  }

  #[test]
  fn other_statuses_use_the_shorter_backoff() {
    let error = FetchError::Status { status: 404, retry_after: None };
    assert_eq!(error.retry_delay_ms(5000, 1000), 1000);
  }

  #[test]
  fn parse_errors_are_not_retryable() {
    let error = FetchError::Parse(String::from("expected value at line 1"));
    assert_eq!(error.is_retryable(), false);
    let status_error = FetchError::Status { status: 401, retry_after: None };
    assert_eq!(status_error.is_retryable(), true);
  }
}
