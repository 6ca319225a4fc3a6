//! bakery-map CLI 라이브러리
//!
//! 실제 REST API(reqwest)와 메모리 내 지도로 공통 컨트롤러를 구동한다.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod markers;
pub mod profile;
pub mod scheduler;
pub mod visits;
pub mod wishlist;
