use chrono_tz::Asia::Tokyo;
use common::history::HistoryFile;
use common::structs::EntityStats;
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
struct CatalogEntry {
  artist: String,
  album: String,
  title: String,
  id: String,
  popularity: u64,
}

fn build_artist_name_list() -> Vec<String> {
  // comma-separated override, otherwise both names the discography is published under
  let artist_names_override = std::env::var("ARTIST_NAMES");
  if artist_names_override.is_ok() {
    return artist_names_override
      .unwrap()
      .split(',')
      .map(|artist_name| artist_name.trim().to_string())
      .filter(|artist_name| artist_name.is_empty() == false)
      .collect();
  }
  return vec![String::from("SUGA"), String::from("Agust D")];
}

fn main() {
  // load env vars
  dotenv::dotenv().ok();
  // logger
  simple_logger::SimpleLogger::new().env().init().unwrap();
  // runtime
  let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
  // run
  rt.block_on(async {
    // config
    let spotify_client_id = std::env::var("SPOTIFY_CLIENT_ID");
    if spotify_client_id.is_err() {
      panic!("SPOTIFY_CLIENT_ID is not set");
    }
    let spotify_client_id = spotify_client_id.unwrap();
    let spotify_client_secret = std::env::var("SPOTIFY_CLIENT_SECRET");
    if spotify_client_secret.is_err() {
      panic!("SPOTIFY_CLIENT_SECRET is not set");
    }
    let spotify_client_secret = spotify_client_secret.unwrap();
    let artist_names = build_artist_name_list();
    let history_path = "./data/track_popularity.json";
    let catalog_path = "./data/track_catalog.json";
    let timezone = Tokyo;
    // load history before spending quota on the api
    let history_file = HistoryFile::new(history_path);
    let result = history_file.load().await;
    if result.is_err() {
      panic!("failed to load history: {:?}", result);
    }
    let history = result.unwrap();
    // get client credentials token from spotify
    let spotify = providers::spotify::Spotify::new(&spotify_client_id, &spotify_client_secret);
    let result = spotify.get_access_token().await;
    if result.is_err() {
      panic!("failed to get access token: {:?}", result);
    }
    let access_token = result.unwrap();
    // walk the discography under every artist name
    let result = spotify.get_artist_catalog(&access_token, &artist_names).await;
    if result.is_err() {
      panic!("failed to get artist catalog: {:?}", result);
    }
    let catalog = result.unwrap();
    if catalog.len() == 0 {
      panic!("no tracks in catalog");
    }
    log::info!("catalog has {} tracks", catalog.len());
    // get popularity for every track in the catalog
    let track_ids: Vec<String> = catalog.iter().map(|catalog_track| catalog_track.id.clone()).collect();
    let result = spotify.get_tracks_popularity(&access_token, &track_ids).await;
    if result.is_err() {
      panic!("failed to get tracks popularity: {:?}", result);
    }
    let popularity_by_id = result.unwrap();
    // assemble in catalog order, skipping tracks the api returned nothing for
    let mut fetched = vec![];
    let mut catalog_entries = vec![];
    for catalog_track in &catalog {
      let popularity = popularity_by_id.get(&catalog_track.id);
      if popularity.is_none() {
        continue;
      }
      let popularity = *popularity.unwrap();
      fetched.push(EntityStats {
        id: catalog_track.id.clone(),
        title: catalog_track.title.clone(),
        total: popularity,
      });
      catalog_entries.push(CatalogEntry {
        artist: catalog_track.artist.clone(),
        album: catalog_track.album.clone(),
        title: catalog_track.title.clone(),
        id: catalog_track.id.clone(),
        popularity,
      });
    }
    if fetched.len() == 0 {
      panic!("no popularity returned for any track");
    }
    // reconcile against yesterday
    let today_date = common::dates::today_string(&timezone);
    let daily_record = common::reconcile::build_daily_record(&today_date, &fetched, &history);
    for entry in &daily_record.entries {
      log::info!("{}: popularity = {} delta = {}", entry.title, entry.total, entry.delta);
    }
    // save
    let result = history_file.save(daily_record, history).await;
    if result.is_err() {
      panic!("failed to save history: {:?}", result);
    }
    let history = result.unwrap();
    log::info!("wrote {} day(s) of history to {}", history.len(), history_path);
    // full rewrite of the catalog dump, it is not a rolling window
    let result = common::file::write_json_to_file(catalog_path, &catalog_entries).await;
    if result.is_err() {
      panic!("failed to write catalog: {:?}", result);
    }
    log::info!("wrote {} catalog entries to {}", catalog_entries.len(), catalog_path);
  });
}
