use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VideoListResponse {
  #[serde(default)]
  pub items: Vec<VideoItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VideoItem {
  pub id: String,
  pub snippet: VideoSnippet,
  pub statistics: VideoStatistics,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VideoSnippet {
  pub title: String,
}

// the API reports counters as decimal strings
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VideoStatistics {
  #[serde(rename = "viewCount")]
  pub view_count: String,
}
