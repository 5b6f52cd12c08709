pub mod device;
pub mod tuning;

pub use device::{DeviceDescriptor, DeviceVendor};
pub use tuning::{TuneOverrides, TuningDecision};
