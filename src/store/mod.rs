//! State container, module registry and dispatcher.

pub mod chart_store;
pub mod computed;
pub mod context;
pub mod module;
pub mod registry;
mod runtime;
pub mod slice;
pub mod snapshot;
pub mod state;

pub use chart_store::{MAX_NOTIFICATIONS_PER_FLUSH, Store, SubscriberFn, SubscriptionId};
pub use computed::Computed;
pub use context::ActionContext;
pub use module::{ActionPayload, Observer, StoreModule};
pub use registry::ModuleRegistry;
pub use slice::{Slice, SliceSet};
pub use snapshot::{STORE_SNAPSHOT_JSON_SCHEMA_V1, StoreSnapshot, StoreSnapshotJsonContractV1};
pub use state::{ChartState, InitStoreState, RawCategories, SliceValue, ZoomRange};
