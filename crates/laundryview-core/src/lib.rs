// laundryview-core: Refresh coordination and sensor entities between laundryview-api and consumers.

pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod integration;
pub mod model;
pub mod scheduler;
pub mod sensor;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_SCAN_INTERVAL, DEFAULT_TIMEOUT, IntegrationConfig, RoomConfig};
pub use convert::map_record;
pub use coordinator::{RefreshCoordinator, RefreshSource};
pub use error::{CoreError, MalformedRecord, UnavailableCause};
pub use integration::{LaundryRoom, SetupState};
pub use scheduler::{UpdateScheduler, UpdateState};
pub use sensor::{ApplianceSensor, SensorAttributes, SensorState};
pub use store::{EntityRegistry, EntitySet, RegistryChange};
pub use stream::SensorStream;

pub use model::{ApplianceKind, ApplianceRecord, Snapshot};

// Upstream root, shared with configuration defaults.
pub use laundryview_api::DEFAULT_BASE_URL;
