// Room status HTTP client
//
// Wraps `reqwest::Client` with the room endpoint's URL template and
// `{ lRoom: { app_data: [...] } }` envelope unwrapping. Records inside
// the list are returned as raw JSON; mapping them is the caller's job.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{APPLIANCE_LIST_KEY, ROOM_STATUS_PATH, ROOM_WRAPPER_KEY, RoomQuery};
use crate::transport::TransportConfig;

/// Raw HTTP client for the LaundryView room status endpoint.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so a
/// single connection pool is shared by every clone.
#[derive(Debug, Clone)]
pub struct RoomClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RoomClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the upstream root, e.g. `https://www.laundryview.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built, host-owned `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The upstream base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/c_room?loc={location}&room={room}&rdm={rdm}`.
    pub fn room_url(&self, query: &RoomQuery) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            ROOM_STATUS_PATH
        );
        let mut url = Url::parse(&full)?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Fetch a room's appliance list.
    ///
    /// `GET /api/c_room`, then unwrap `lRoom.app_data`. The records are
    /// returned untouched and in upstream order.
    pub async fn fetch_room(&self, query: &RoomQuery) -> Result<Vec<Value>, Error> {
        let url = self.room_url(query)?;
        let body = self.get_json(url).await?;
        let records = unwrap_envelope(body)?;
        debug!(count = records.len(), "room status received");
        Ok(records)
    }

    /// Send a GET request and decode the body as JSON.
    async fn get_json(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Pull the appliance list out of `{ lRoom: { app_data: [...] } }`.
fn unwrap_envelope(body: Value) -> Result<Vec<Value>, Error> {
    let Value::Object(mut root) = body else {
        return Err(Error::UnexpectedShape {
            segment: ROOM_WRAPPER_KEY,
            detail: "response body is not a JSON object",
        });
    };

    let Some(wrapper) = root.remove(ROOM_WRAPPER_KEY) else {
        return Err(Error::UnexpectedShape {
            segment: ROOM_WRAPPER_KEY,
            detail: "missing",
        });
    };

    let Value::Object(mut wrapper) = wrapper else {
        return Err(Error::UnexpectedShape {
            segment: ROOM_WRAPPER_KEY,
            detail: "not a JSON object",
        });
    };

    match wrapper.remove(APPLIANCE_LIST_KEY) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(Error::UnexpectedShape {
            segment: APPLIANCE_LIST_KEY,
            detail: "not a JSON array",
        }),
        None => Err(Error::UnexpectedShape {
            segment: APPLIANCE_LIST_KEY,
            detail: "missing",
        }),
    }
}
