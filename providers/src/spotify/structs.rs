use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TokenResponse {
  pub access_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ArtistSearchResponse {
  pub artists: ArtistPage,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ArtistPage {
  pub items: Vec<Artist>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Artist {
  pub id: String,
  pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AlbumPage {
  pub items: Vec<Album>,
  pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Album {
  pub id: String,
  pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AlbumTracksPage {
  pub items: Vec<AlbumTrack>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AlbumTrack {
  pub id: String,
  pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackDetailsResponse {
  pub tracks: Vec<Option<TrackDetails>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackDetails {
  pub id: String,
  pub popularity: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogTrack {
  pub artist: String,
  pub album: String,
  pub title: String,
  pub id: String,
}
