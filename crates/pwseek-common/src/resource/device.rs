use serde::{Deserialize, Serialize};

/// Read-only description of one accelerator device, as reported by the
/// backend at enumeration time. Format plugins never mutate it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub name: String,
    /// Memory the backend reports as usable, in bytes.
    pub available_memory: u64,
    /// Largest single buffer the backend will hand out, in bytes.
    pub max_single_allocation: u64,
    pub compute_units: u32,
    pub is_gpu: bool,
    pub vendor: DeviceVendor,
    /// Runtime is Metal rather than OpenCL (only meaningful on Apple).
    #[serde(default)]
    pub is_metal: bool,
    /// Device exposes a byte-permute instruction (AMD vperm class).
    #[serde(default = "default_true")]
    pub has_byte_permute: bool,
}

fn default_true() -> bool {
    true
}

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceVendor {
    Amd,
    Apple,
    Intel,
    Nvidia,
    Other,
}

impl DeviceDescriptor {
    /// Device name with spaces flattened, as used in tuning-table records.
    pub fn underscored_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}
