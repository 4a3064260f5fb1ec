use serde::{Deserialize, Serialize};

use crate::core::{Categories, ViewRange};
use crate::error::{ChartError, ChartResult};
use crate::modules::axes::AxesState;
use crate::modules::data_range::DataRange;
use crate::modules::layout::Layout;
use crate::modules::legend::{CircleLegendState, LegendState};
use crate::modules::scale::ScaleState;

use super::state::ChartState;

pub const STORE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Read-only copy of the derived slices handed to rendering collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub layout: Layout,
    pub raw_categories: Categories,
    pub categories: Categories,
    pub zoom_range: Option<ViewRange>,
    pub data_range: DataRange,
    pub scale: ScaleState,
    pub axes: AxesState,
    pub legend: LegendState,
    pub circle_legend: CircleLegendState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: StoreSnapshot,
}

impl StoreSnapshot {
    #[must_use]
    pub fn from_state(state: &ChartState) -> Self {
        Self {
            layout: state.layout.clone(),
            raw_categories: state.raw_categories.0.clone(),
            categories: state.categories.clone(),
            zoom_range: state.zoom_range.0,
            data_range: state.data_range.clone(),
            scale: state.scale.clone(),
            axes: state.axes.clone(),
            legend: state.legend.clone(),
            circle_legend: state.circle_legend.clone(),
        }
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = StoreSnapshotJsonContractV1 {
            schema_version: STORE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<StoreSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: StoreSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != STORE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
