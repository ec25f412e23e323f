pub mod client;
pub mod store;

pub use client::{Downloader, Fetch, HttpFetcher};
pub use store::{ContentStore, StoreArea, StoredFile};
