pub mod dates;
pub mod file;
pub mod history;
pub mod http_client;
pub mod reconcile;
pub mod retry;
pub mod structs;
