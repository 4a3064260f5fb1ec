//! Store modules: each owns a set of slices and the actions that write them.
//!
//! Registration order matters. Module initialization, reset actions and
//! observers all run in this order, so every module comes after the modules
//! whose slices it reads.

pub mod axes;
pub mod category;
pub mod data_range;
pub mod layout;
pub mod legend;
pub mod options;
pub mod scale;
pub mod series_data;

use std::sync::Arc;

use crate::error::ChartResult;
use crate::store::{ModuleRegistry, StoreModule};

pub use axes::{AxesModule, AxesState, AxisData, AxisRole, CenterYAxisData, RadialAxisData, XAxisData};
pub use category::CategoryModule;
pub use data_range::{DataRange, DataRangeModule};
pub use layout::{Layout, LayoutModule};
pub use legend::{CircleLegendState, LegendDatum, LegendModule, LegendState};
pub use options::OptionsModule;
pub use scale::{ScaleModule, ScaleState};
pub use series_data::{NestedPieSeries, SeriesDataModule, SeriesGroup, SeriesState};

/// Built-in modules in dependency order.
#[must_use]
pub fn default_modules() -> Vec<Arc<dyn StoreModule>> {
    vec![
        Arc::new(OptionsModule),
        Arc::new(LayoutModule),
        Arc::new(SeriesDataModule),
        Arc::new(CategoryModule),
        Arc::new(DataRangeModule),
        Arc::new(ScaleModule),
        Arc::new(AxesModule),
        Arc::new(LegendModule),
    ]
}

pub fn default_registry() -> ChartResult<ModuleRegistry> {
    ModuleRegistry::new(default_modules())
}
