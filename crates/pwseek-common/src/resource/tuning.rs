use serde::{Deserialize, Serialize};

/// Per-device tuning outcome, produced once per (device, KDF parameters)
/// pair and threaded explicitly through buffer sizing and kernel builds so
/// multiple devices can be tuned without cross-talk.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TuningDecision {
    /// Acceleration factor: simultaneous KDF evaluations per device.
    pub concurrency: u32,
    /// Time-memory trade-off exponent; memory is divided by `2^tmto`.
    pub tmto: u32,
    /// CPU-side dispatch width, independent of the memory search.
    pub threads: u32,
}

/// User- or tuning-table-forced values; a `Some` wins over the search.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TuneOverrides {
    pub concurrency: Option<u32>,
    pub tmto: Option<u32>,
    pub threads: Option<u32>,
}
