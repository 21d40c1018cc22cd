pub mod structs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::http_client;
use common::http_client::FetchError;
use std::collections::{HashMap, HashSet};
use structs::*;

const NUM_FETCH_ATTEMPTS: usize = 3;
const RETRY_BACKOFF_MS: u64 = 5000;
const HTTP_ERROR_BACKOFF_MS: u64 = 1000;
const ALBUM_PAGE_SIZE: usize = 50;
const TRACK_DETAILS_BATCH_SIZE: usize = 50;

pub struct Spotify {
  http_client: reqwest::Client,
  client_id: String,
  client_secret: String,
}

impl Spotify {
  pub fn new(client_id: &str, client_secret: &str) -> Spotify {
    return Spotify {
      http_client: reqwest::Client::new(),
      client_id: client_id.to_string(),
      client_secret: client_secret.to_string(),
    };
  }

  fn build_headers(&self, token: &str) -> Vec<(String, String)> {
    return vec![(String::from("authorization"), format!("Bearer {}", token))];
  }

  pub async fn get_access_token(&self) -> Result<String, FetchError> {
    log::info!("get_access_token");
    let encoded_credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
    let request_headers = vec![
      (String::from("authorization"), format!("Basic {}", encoded_credentials)),
      (String::from("content-type"), String::from("application/x-www-form-urlencoded")),
    ];
    let payload = Some(String::from("grant_type=client_credentials"));
    let response = http_client::http_request_json_with_retries::<TokenResponse>(
      &self.http_client,
      "POST",
      "https://accounts.spotify.com/api/token",
      &request_headers,
      &payload,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    return Ok(response.access_token);
  }

  pub async fn search_artist_id(&self, token: &str, artist_name: &str) -> Result<String, FetchError> {
    log::info!("search_artist_id: artist_name = {}", artist_name);
    let mut request_url = url::Url::parse("https://api.spotify.com/v1/search").unwrap();
    request_url.query_pairs_mut().append_pair("q", artist_name);
    request_url.query_pairs_mut().append_pair("type", "artist");
    request_url.query_pairs_mut().append_pair("limit", "1");
    let request_url = request_url.as_str().to_string();
    let response = http_client::http_request_json_with_retries::<ArtistSearchResponse>(
      &self.http_client,
      "GET",
      &request_url,
      &self.build_headers(token),
      &None,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    if response.artists.items.is_empty() {
      return Err(FetchError::Parse(format!("no artist found for {}", artist_name)));
    }
    let artist = &response.artists.items[0];
    log::info!("search_artist_id: artist_name = {} id = {} matched_name = {}", artist_name, artist.id, artist.name);
    return Ok(artist.id.clone());
  }

  #[async_recursion::async_recursion]
  pub async fn get_artist_albums(&self, token: &str, artist_id: &str, offset: Option<String>) -> Result<Vec<Album>, FetchError> {
    log::info!("get_artist_albums: artist_id = {} offset = {:?}", artist_id, offset);
    let mut request_url = url::Url::parse(&format!("https://api.spotify.com/v1/artists/{}/albums", artist_id)).unwrap();
    request_url.query_pairs_mut().append_pair("include_groups", "album,single");
    request_url.query_pairs_mut().append_pair("limit", &ALBUM_PAGE_SIZE.to_string());
    if offset.is_some() {
      request_url.query_pairs_mut().append_pair("offset", &offset.unwrap());
    }
    let request_url = request_url.as_str().to_string();
    let mut response = http_client::http_request_json_with_retries::<AlbumPage>(
      &self.http_client,
      "GET",
      &request_url,
      &self.build_headers(token),
      &None,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    let mut results = vec![];
    results.append(&mut response.items);
    if response.next.is_some() {
      let next_url = response.next.unwrap();
      let next_offset = extract_offset_cursor(&next_url);
      if next_offset.is_none() {
        return Err(FetchError::Parse(format!("no offset cursor on next page url: {}", next_url)));
      }
      let mut next_page = self.get_artist_albums(token, artist_id, next_offset).await?;
      results.append(&mut next_page);
    }
    return Ok(results);
  }

  pub async fn get_album_tracks(&self, token: &str, album_id: &str) -> Result<Vec<AlbumTrack>, FetchError> {
    log::info!("get_album_tracks: album_id = {}", album_id);
    let mut request_url = url::Url::parse(&format!("https://api.spotify.com/v1/albums/{}/tracks", album_id)).unwrap();
    request_url.query_pairs_mut().append_pair("limit", "50");
    let request_url = request_url.as_str().to_string();
    let response = http_client::http_request_json_with_retries::<AlbumTracksPage>(
      &self.http_client,
      "GET",
      &request_url,
      &self.build_headers(token),
      &None,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    return Ok(response.items);
  }

  pub async fn get_artist_catalog(&self, token: &str, artist_names: &[String]) -> Result<Vec<CatalogTrack>, FetchError> {
    log::info!("get_artist_catalog: num_artist_names = {}", artist_names.len());
    let mut seen_album_ids = HashSet::new();
    let mut seen_track_ids = HashSet::new();
    let mut results = vec![];
    for artist_name in artist_names {
      let artist_id = self.search_artist_id(token, artist_name).await?;
      let albums = self.get_artist_albums(token, &artist_id, None).await?;
      for album in albums {
        // the same release shows up under more than one artist alias; walk it once
        if seen_album_ids.contains(&album.id) {
          continue;
        }
        seen_album_ids.insert(album.id.clone());
        let album_tracks = self.get_album_tracks(token, &album.id).await?;
        for album_track in album_tracks {
          if seen_track_ids.contains(&album_track.id) {
            continue;
          }
          seen_track_ids.insert(album_track.id.clone());
          results.push(CatalogTrack {
            artist: artist_name.clone(),
            album: album.name.clone(),
            title: album_track.name,
            id: album_track.id,
          });
        }
      }
    }
    return Ok(results);
  }

  pub async fn get_tracks_popularity_chunk(&self, token: &str, track_ids_chunk: &[String]) -> Result<HashMap<String, u64>, FetchError> {
    log::info!("get_tracks_popularity_chunk: num_track_ids = {}", track_ids_chunk.len());
    let joined_track_ids = track_ids_chunk.join(",");
    let mut request_url = url::Url::parse("https://api.spotify.com/v1/tracks").unwrap();
    request_url.query_pairs_mut().append_pair("ids", &joined_track_ids);
    let request_url = request_url.as_str().to_string();
    let response = http_client::http_request_json_with_retries::<TrackDetailsResponse>(
      &self.http_client,
      "GET",
      &request_url,
      &self.build_headers(token),
      &None,
      RETRY_BACKOFF_MS,
      HTTP_ERROR_BACKOFF_MS,
      NUM_FETCH_ATTEMPTS,
    )
    .await?;
    return Ok(collect_popularity_by_id(response.tracks, track_ids_chunk));
  }

  pub async fn get_tracks_popularity(&self, token: &str, track_ids: &[String]) -> Result<HashMap<String, u64>, FetchError> {
    log::info!("get_tracks_popularity: num_track_ids = {}", track_ids.len());
    let track_ids_chunks: Vec<Vec<String>> = track_ids.chunks(TRACK_DETAILS_BATCH_SIZE).map(|chunk| chunk.to_vec()).collect();
    let mut results = HashMap::new();
    for track_ids_chunk in &track_ids_chunks {
      let chunk_results = self.get_tracks_popularity_chunk(token, track_ids_chunk).await?;
      results.extend(chunk_results);
    }
    return Ok(results);
  }
}

// a next page comes back as a fully-formed url; the follow-up request only needs its offset parameter
fn extract_offset_cursor(next_url: &str) -> Option<String> {
  let parsed_next_url = url::Url::parse(next_url).ok()?;
  let query_parameters: HashMap<_, _> = parsed_next_url.query_pairs().into_owned().collect();
  return query_parameters.get("offset").map(|offset| offset.to_string());
}

// the response slots null for ids the catalog no longer serves and does not
// promise request order; match records back by id, then report every
// requested id that never came back
fn collect_popularity_by_id(tracks: Vec<Option<TrackDetails>>, requested_track_ids: &[String]) -> HashMap<String, u64> {
  let mut results = HashMap::new();
  for track in tracks {
    if track.is_none() {
      continue;
    }
    let track = track.unwrap();
    results.insert(track.id, track.popularity);
  }
  for requested_track_id in requested_track_ids {
    if results.contains_key(requested_track_id) == false {
      log::error!("no popularity returned for track {}", requested_track_id);
    }
  }
  return results;
}
