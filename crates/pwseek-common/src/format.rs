use crate::resource::{DeviceDescriptor, TuneOverrides, TuningDecision};

/// Application class of the protected data, as shown to operators when
/// listing formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum HashCategory {
    Archive,
    Database,
    FullDiskEncryption,
    NetworkProtocol,
    OperatingSystem,
    Password,
    Raw,
}

/// Where a format's salt comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SaltType {
    /// Salt is carried inside the encoded record itself.
    Embedded,
    /// Salt arrives as a separate field next to the record.
    Generic,
    /// Format derives its salt; none is carried.
    None,
}

/// Placement of the digest pre-filter inside a format's decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestLayout {
    /// Record word offsets of digest words 0..=3.
    pub positions: [usize; 4],
    /// Total digest size in bytes.
    pub bytes: usize,
}

/// A hash format plugin: fixed-shape metadata plus the three hard-core
/// operations the engine drives (decode, encode, tune). Exactly one format
/// is implemented per plugin, so plain interface polymorphism suffices.
pub trait HashFormat {
    type Record;
    type Error: std::error::Error;

    const NAME: &'static str;
    /// Numeric format id, as used in tuning-table records.
    const FORMAT_ID: u32;

    fn hash_category(&self) -> HashCategory;
    fn salt_type(&self) -> SaltType;
    fn digest_layout(&self) -> DigestLayout;
    fn max_password_len(&self) -> usize;

    /// Known-answer pair used to validate the codec wiring before real work.
    fn self_test_password(&self) -> &'static str;
    fn self_test_record(&self) -> &'static str;

    fn decode(&self, line: &str) -> Result<Self::Record, Self::Error>;
    fn encode(&self, record: &Self::Record) -> String;
    fn tune(&self, device: &DeviceDescriptor, overrides: &TuneOverrides) -> TuningDecision;

    fn warmup_disable(&self) -> bool {
        false
    }

    /// Whether this format is known to misbehave on the given device.
    fn unstable_warning(&self, _device: &DeviceDescriptor) -> bool {
        false
    }
}
