// laundryview-api: Async Rust client for the LaundryView room status API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::RoomClient;
pub use error::Error;
pub use models::{APPLIANCE_LIST_KEY, DEFAULT_BASE_URL, ROOM_WRAPPER_KEY, RoomQuery};
pub use transport::TransportConfig;
