//! Bakery Map Common Library
//!
//! CLI와 Web(WASM)에서 공유하는 타입, 필터, 지도 마커 컨트롤러

pub mod types;
pub mod error;
pub mod config;
pub mod filter;
pub mod wishlist;
pub mod visits;
pub mod api;
pub mod loader;
pub mod map;

pub use types::{Bakery, BakeryRecord, BreadTag, LatLng, UserProfile, VisitRecord, WishlistItem};
pub use error::{Error, Result};
pub use config::MapConfig;
pub use filter::{BakeryFilter, find_by_id, tag_counts};
pub use wishlist::WishlistSet;
pub use api::{
    BakeryApi, BakeryQuery, NewVisitRecord, SearchQuery, VisitRecordUpdate, WishlistUpdate, parse_error_detail,
};
pub use loader::{LoadedData, load_all};
pub use map::{
    BootstrapError, BuildOutcome, MapController, MapRuntime, Scheduler, SelectionEvent,
};
