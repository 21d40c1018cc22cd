pub mod structs;

use common::http_client;
use common::http_client::FetchError;
use common::structs::EntityStats;
use structs::*;

const NUM_FETCH_ATTEMPTS: usize = 3;
const RETRY_BACKOFF_MS: u64 = 5000;
const HTTP_ERROR_BACKOFF_MS: u64 = 1000;

pub struct YouTube {
  http_client: reqwest::Client,
  api_key: String,
}

impl YouTube {
  pub fn new(api_key: &str) -> YouTube {
    return YouTube {
      http_client: reqwest::Client::new(),
      api_key: api_key.to_string(),
    };
  }

  // one keyed GET for the whole id list; the API answers only the ids it
  // knows, so the result can be shorter than the request
  pub async fn get_video_stats(&self, video_ids: &[String]) -> Result<Vec<EntityStats>, FetchError> {
    log::info!("get_video_stats: num_video_ids = {}", video_ids.len());
    let mut request_url = url::Url::parse("https://www.googleapis.com/youtube/v3/videos").unwrap();
    request_url.query_pairs_mut().append_pair("part", "statistics,snippet");
    request_url.query_pairs_mut().append_pair("id", &video_ids.join(","));
    request_url.query_pairs_mut().append_pair("key", &self.api_key);
    let request_url = request_url.as_str().to_string();
    let request_headers = vec![];
    let response_body = http_client::http_request_json_with_retries::<VideoListResponse>(
      &self.http_client,
      "GET",
      &request_url,
      &request_headers,
      &None,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    return map_video_items(&response_body.items);
  }
}

fn map_video_items(items: &[VideoItem]) -> Result<Vec<EntityStats>, FetchError> {
  let mut results = vec![];
  for item in items {
    let parsed_view_count = item.statistics.view_count.parse::<u64>();
    if parsed_view_count.is_err() {
      return Err(FetchError::Parse(format!(
        "unparseable view count for video {}: {}",
        item.id, item.statistics.view_count
      )));
    }
    results.push(EntityStats {
      id: item.id.clone(),
      title: item.snippet.title.clone(),
      total: parsed_view_count.unwrap(),
    });
  }
  return Ok(results);
}

#[cfg(test)]
mod tests {
  use super::*;

  const LIST_RESPONSE: &str = r#"{
    "kind": "youtube#videoListResponse",
    "items": [
      {
        "id": "qGjAWJ2zWWI",
        "snippet": { "title": "Daechwita", "channelTitle": "HYBE LABELS" },
        "statistics": { "viewCount": "412000123", "likeCount": "1000" }
      },
      {
        "id": "iy9qZR_OGa0",
        "snippet": { "title": "Haegeum" },
        "statistics": { "viewCount": "98000456" }
      }
    ]
  }"#;

  #[test]
  fn maps_response_items_in_order() {
    let response: VideoListResponse = serde_json::from_str(LIST_RESPONSE).unwrap();
    let results = map_video_items(&response.items).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "qGjAWJ2zWWI");
    assert_eq!(results[0].title, "Daechwita");
    assert_eq!(results[0].total, 412000123);
    assert_eq!(results[1].id, "iy9qZR_OGa0");
    assert_eq!(results[1].total, 98000456);
  }

  #[test]
  fn a_response_without_items_maps_to_an_empty_list() {
    let response: VideoListResponse = serde_json::from_str(r#"{"kind": "youtube#videoListResponse"}"#).unwrap();
    let results = map_video_items(&response.items).unwrap();
    assert_eq!(results.len(), 0);
  }

  #[test]
  fn a_non_numeric_view_count_is_a_parse_error() {
    let response: VideoListResponse = serde_json::from_str(
      r#"{"items": [{"id": "x", "snippet": {"title": "t"}, "statistics": {"viewCount": "n/a"}}]}"#,
    )
    .unwrap();
    let result = map_video_items(&response.items);
    assert!(matches!(result, Err(FetchError::Parse(_))));
  }
}
