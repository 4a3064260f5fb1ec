//! chart-store: reactive state store for charts.
//!
//! Categories, data ranges, scales, axes and legend state are derived from
//! chart data and options by a set of modules. Each module owns slices of the
//! state tree and recomputes them when the slices it observes change.

pub mod core;
pub mod error;
pub mod modules;
pub mod store;
pub mod telemetry;

pub use error::{ChartError, ChartResult};
pub use store::{
    ActionPayload, ChartState, InitStoreState, Slice, Store, StoreSnapshot, SubscriptionId,
};
