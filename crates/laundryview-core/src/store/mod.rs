// ── Reactive entity store ──
//
// Keyed sensor storage with push-based change notification.

mod registry;

pub use registry::{EntityRegistry, EntitySet, RegistryChange};
