//! Buffer sizing and kernel build parameters, derived from a tuning
//! decision.
//!
//! The trade-off exponent embedded into the compiled kernel is *re-derived*
//! from the buffer size the host actually committed, not taken from the
//! tuning estimate: the kernel must reconcile its addressing with the real
//! allocation, which the host may have rounded or clamped.

use pwseek_common::resource::TuningDecision;

use crate::{error::FormatError, params::ScryptParams};

/// Bytes of the memory-hard buffer backing all in-flight scrypt state for
/// one device, consistent with the tuning decision.
pub fn extra_buffer_size(params: &ScryptParams, decision: &TuningDecision) -> u64 {
    let per_accel = params.per_candidate_memory() * u64::from(decision.threads);

    (per_accel * u64::from(decision.concurrency)) >> decision.tmto
}

/// Per-candidate engine scratch; this format keeps all of it in the extra
/// buffers.
pub fn tmp_size() -> u64 {
    0
}

/// Per-candidate scratch bytes beyond the memory-hard buffer, gated by the
/// batch parameter consistency check.
pub fn extra_tmp_size(batch: &[ScryptParams]) -> Result<u64, FormatError> {
    let params = ScryptParams::check_batch(batch)?;

    Ok(params.tmp_bytes())
}

/// Full parallel width the kernel addresses: every dispatch thread of every
/// acceleration unit runs its own candidate lane.
pub fn kernel_power_max(decision: &TuningDecision) -> u64 {
    u64::from(decision.threads) * u64::from(decision.concurrency)
}

/// Build options for the compiled kernel. `extra_buffer_size` is the
/// allocation the host committed; the trade-off divisor is re-derived from
/// it so estimate and allocation cannot drift apart.
///
/// A zero-sized committed buffer means the tuning search found no room for
/// even one acceleration unit; that device is rejected here, not the whole
/// run.
pub fn jit_build_options(
    params: &ScryptParams,
    decision: &TuningDecision,
    extra_buffer_size: u64,
) -> Result<String, FormatError> {
    if extra_buffer_size == 0 {
        return Err(FormatError::InsufficientMemory {
            concurrency: decision.concurrency,
        });
    }

    let tmto_final =
        (kernel_power_max(decision) * params.per_candidate_memory()) / extra_buffer_size;

    Ok(format!(
        "-D SCRYPT_N={} -D SCRYPT_R={} -D SCRYPT_P={} -D SCRYPT_TMTO={} -D SCRYPT_TMP_ELEM={}",
        params.n,
        params.r,
        params.p,
        tmto_final,
        params.tmp_elements()
    ))
}
