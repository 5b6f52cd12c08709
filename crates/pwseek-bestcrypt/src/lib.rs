//! BestCrypt v4 Volume Encryption (scrypt) format plugin.
//!
//! Supplies the format knowledge a generic password-recovery engine needs:
//! the `$bcve$` record codec, the scrypt cost model, and the per-device
//! resource tuning that decides how many candidates run concurrently. The
//! KDF itself executes in the engine's kernels, never here.

pub mod error;
pub mod kernel;
pub mod params;
pub mod record;
pub mod tuning;

use pwseek_common::{
    format::{DigestLayout, HashCategory, HashFormat, SaltType},
    resource::{DeviceDescriptor, DeviceVendor, TuneOverrides, TuningDecision},
};

use crate::{error::FormatError, params::ScryptParams, record::HashRecord};

/// Known-answer pair for validating the codec wiring before real work.
pub const SELF_TEST_PASSWORD: &str = "hashcat";
pub const SELF_TEST_RECORD: &str = "$bcve$4$08$323631353538333233323034363039393534383233393530$9f7892b8324b1d8cd36b5f2f8705b407131261620a89370db8369046646f5f82b96780453948db53b04928ae0cc47066f13454b34e31b58ea44ce943bcba14fcbd87f17205a31a896df182629ceea164d87e9e29127e8d865ca0bee52f832723";

/// The format plugin. Carries the per-run effective scrypt parameters;
/// records do not encode them.
#[derive(Debug, Clone, Copy)]
pub struct BestCryptVe4 {
    params: ScryptParams,
}

impl BestCryptVe4 {
    /// The KDF's cost is absorbed by `n`; there is no outer loop.
    pub const KERNEL_LOOPS_MAX: u32 = 1;
    pub const KERNEL_LOOPS_MIN: u32 = 1;

    pub fn new(params: ScryptParams) -> Self {
        Self {
            params: params.or_default(),
        }
    }

    pub fn params(&self) -> &ScryptParams {
        &self.params
    }

    /// Tuning-table record for this format on the given device.
    pub fn tuningdb_line(&self, device: &DeviceDescriptor, decision: &TuningDecision) -> String {
        tuning::tuningdb_line(device, Self::FORMAT_ID, decision)
    }

    /// Validate the codec against the fixed vector: decode must succeed and
    /// encode must reproduce the record byte-for-byte.
    pub fn self_test(&self) -> bool {
        record::decode(SELF_TEST_RECORD)
            .map(|record| record::encode(&record) == SELF_TEST_RECORD)
            .unwrap_or(false)
    }
}

impl Default for BestCryptVe4 {
    fn default() -> Self {
        Self::new(ScryptParams::default())
    }
}

impl HashFormat for BestCryptVe4 {
    type Error = FormatError;
    type Record = HashRecord;

    const FORMAT_ID: u32 = 24000;
    const NAME: &'static str = "BestCrypt v4 Volume Encryption";

    fn hash_category(&self) -> HashCategory {
        HashCategory::FullDiskEncryption
    }

    fn salt_type(&self) -> SaltType {
        SaltType::Embedded
    }

    fn digest_layout(&self) -> DigestLayout {
        DigestLayout {
            positions: [
                record::DIGEST_WORD_OFFSET,
                record::DIGEST_WORD_OFFSET + 1,
                record::DIGEST_WORD_OFFSET + 2,
                record::DIGEST_WORD_OFFSET + 3,
            ],
            bytes: 16,
        }
    }

    fn max_password_len(&self) -> usize {
        256
    }

    fn self_test_password(&self) -> &'static str {
        SELF_TEST_PASSWORD
    }

    fn self_test_record(&self) -> &'static str {
        SELF_TEST_RECORD
    }

    fn decode(&self, line: &str) -> Result<HashRecord, FormatError> {
        record::decode(line)
    }

    fn encode(&self, record: &HashRecord) -> String {
        record::encode(record)
    }

    fn tune(&self, device: &DeviceDescriptor, overrides: &TuneOverrides) -> TuningDecision {
        tuning::tune(&self.params, device, overrides)
    }

    fn warmup_disable(&self) -> bool {
        true
    }

    fn unstable_warning(&self, device: &DeviceDescriptor) -> bool {
        // Apple OpenCL GPUs reject the extra buffer size; Metal is fine
        if device.vendor == DeviceVendor::Apple && device.is_gpu && !device.is_metal {
            return true;
        }

        // segfaults observed on AMD drivers without the byte-permute
        // instruction
        if device.vendor == DeviceVendor::Amd && !device.has_byte_permute {
            return true;
        }

        false
    }
}
