use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// scrypt cost parameters for one run. BestCrypt v4 records do not encode
/// them; every record in a batch inherits the per-run values, and a batch
/// that disagrees is a fatal configuration error.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScryptParams {
    /// Cost factor, a power-of-two iteration count.
    pub n: u64,
    /// Block size.
    pub r: u64,
    /// Parallelism.
    pub p: u64,
}

impl ScryptParams {
    pub const DEFAULT_N: u64 = 32768;
    pub const DEFAULT_P: u64 = 1;
    pub const DEFAULT_R: u64 = 16;

    /// Fill zero-valued fields from the format defaults, field by field.
    pub fn or_default(self) -> Self {
        Self {
            n: if self.n != 0 { self.n } else { Self::DEFAULT_N },
            r: if self.r != 0 { self.r } else { Self::DEFAULT_R },
            p: if self.p != 0 { self.p } else { Self::DEFAULT_P },
        }
    }

    /// Memory footprint of one KDF evaluation at concurrency 1, tmto 0:
    /// the scrypt V array, `128 * r * N` bytes.
    pub fn per_candidate_memory(&self) -> u64 {
        128 * self.r * self.n
    }

    /// Per-candidate scratch bytes needed beyond the V array.
    pub fn tmp_bytes(&self) -> u64 {
        128 * self.r * self.p
    }

    /// Scratch size in 16-byte elements, as the kernel addresses it.
    pub fn tmp_elements(&self) -> u64 {
        self.tmp_bytes() / 16
    }

    /// Outer iteration count exposed to the engine; scrypt's cost lives in
    /// `n`, not in an outer loop.
    pub fn iterations(&self) -> u32 {
        1
    }

    /// Extra passes the engine schedules per candidate. Zero for `p <= 1`,
    /// including parameters not yet run through `or_default`.
    pub fn repeats(&self) -> u64 {
        self.p.saturating_sub(1)
    }

    /// Enforce that every batch entry carries the same parameters as the
    /// first. Returns the (defaulted) effective parameters of the batch.
    pub fn check_batch(batch: &[ScryptParams]) -> Result<ScryptParams, FormatError> {
        let first = batch.first().copied().unwrap_or_default().or_default();

        for entry in batch.iter().skip(1) {
            if *entry != first {
                return Err(FormatError::InconsistentParams {
                    expected: first,
                    found: *entry,
                });
            }
        }

        Ok(first)
    }
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: Self::DEFAULT_N,
            r: Self::DEFAULT_R,
            p: Self::DEFAULT_P,
        }
    }
}
