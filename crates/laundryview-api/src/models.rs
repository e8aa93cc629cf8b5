// Wire-level constants and request parameters for the room endpoint.

/// Production upstream host.
pub const DEFAULT_BASE_URL: &str = "https://www.laundryview.com";

/// Path of the room status endpoint, relative to the base URL.
pub const ROOM_STATUS_PATH: &str = "api/c_room";

/// Outer key of the room status envelope.
pub const ROOM_WRAPPER_KEY: &str = "lRoom";

/// Key of the appliance list inside the room wrapper.
pub const APPLIANCE_LIST_KEY: &str = "app_data";

/// Identifies one laundry room upstream.
///
/// Serialized into the `loc`, `room` and `rdm` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomQuery {
    pub location: String,
    pub room: String,
    /// Room-disambiguation token (`rdm`).
    pub rdm: String,
}

impl RoomQuery {
    pub fn new(
        location: impl Into<String>,
        room: impl Into<String>,
        rdm: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            room: room.into(),
            rdm: rdm.into(),
        }
    }

    pub(crate) fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("loc", self.location.as_str()),
            ("room", self.room.as_str()),
            ("rdm", self.rdm.as_str()),
        ]
    }
}
