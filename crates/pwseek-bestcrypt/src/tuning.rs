//! Memory-aware tuning for the scrypt KDF on one device.
//!
//! Picks a concurrency (acceleration) factor and a time-memory trade-off
//! exponent so that the in-flight scrypt state fits the device's memory.
//! Tuning never fails: an infeasible fit is returned as-is and rejected
//! later by the host's allocation step, which knows the real limits.

use pwseek_common::resource::{DeviceDescriptor, TuneOverrides, TuningDecision};
use tracing::{debug, warn};

use crate::params::ScryptParams;

/// CPU-side dispatch width per acceleration unit. Empirically a bit low for
/// big GPUs, but raising it multiplies the tuned memory footprint.
pub const SCRYPT_THREADS: u32 = 16;

/// Cap on `compute_units` oversubscription when memory is plentiful.
const ACCEL_OVERSUBSCRIBE_MAX: u32 = 8;

/// Power-of-two multiplier range searched when shrinking below the
/// compute-unit count.
const ACCEL_SHRINK_SHIFT_MAX: u32 = 2;

/// Snap to the compute-unit count when overshooting it by at most this
/// fraction (1/10): an under-subscribed device is not worth the saving.
const ACCEL_SNAP_DIVISOR: u32 = 10;

/// TMTO exponents searched, least memory reduction first; recomputation
/// cost grows with the exponent.
const TMTO_START: u32 = 1;
const TMTO_STOP: u32 = 5;

/// Usable memory is also capped by a multiple of the largest single
/// allocation the backend permits.
const MAX_ALLOC_FACTOR: u64 = 4;

/// Memory footprint of one acceleration unit (`threads` candidate lanes) at
/// the given trade-off exponent.
fn per_accel_memory(params: &ScryptParams, threads: u32, tmto: u32) -> u64 {
    (params.per_candidate_memory() * u64::from(threads)) >> tmto
}

/// Choose concurrency, trade-off exponent, and dispatch width for `device`.
///
/// Pure function of its inputs; safe to call for several devices in
/// parallel. Forced override values are taken verbatim.
pub fn tune(
    params: &ScryptParams,
    device: &DeviceDescriptor,
    overrides: &TuneOverrides,
) -> TuningDecision {
    let threads = overrides.threads.unwrap_or(SCRYPT_THREADS);
    let forced_tmto = overrides.tmto.unwrap_or(0);

    let per_accel = per_accel_memory(params, threads, forced_tmto);

    let available = device
        .available_memory
        .min(device.max_single_allocation * MAX_ALLOC_FACTOR);

    let compute_units = device.compute_units;
    let mut concurrency = compute_units;

    if let Some(forced) = overrides.concurrency {
        // command line or tuning table has priority
        concurrency = forced;
    } else if device.is_gpu && per_accel * u64::from(compute_units) > available {
        // not enough memory for one unit per compute unit: search
        // power-of-two multiples of the exact fit, then leave headroom
        // for the per-candidate scratch buffers
        let multi = available as f64 / per_accel as f64;

        let mut shift = ACCEL_SHRINK_SHIFT_MAX + 1;
        for candidate in 1..=ACCEL_SHRINK_SHIFT_MAX {
            concurrency = (multi * f64::from(1u32 << candidate)) as u32;
            if concurrency >= compute_units {
                shift = candidate;
                break;
            }
        }

        concurrency = concurrency.saturating_sub(1 << shift);

        if concurrency > compute_units
            && concurrency - compute_units <= compute_units / ACCEL_SNAP_DIVISOR
        {
            concurrency = compute_units;
        }
    } else {
        // room to spare (or a non-GPU device): oversubscribe the compute
        // units as far as memory allows
        for i in 1..=ACCEL_OVERSUBSCRIBE_MAX {
            if per_accel * u64::from(compute_units) * u64::from(i) < available {
                concurrency = compute_units * i;
            }
        }
    }

    let mut tmto = forced_tmto;

    if tmto == 0 {
        for candidate in TMTO_START..=TMTO_STOP {
            if available > u64::from(concurrency) * (per_accel >> candidate) {
                tmto = candidate;
                break;
            }
        }

        if tmto == 0 {
            warn!(
                device = %device.name,
                concurrency,
                "no feasible time-memory trade-off; buffer allocation may fail"
            );
        }
    }

    debug!(device = %device.name, concurrency, tmto, threads, "tuned scrypt format");

    TuningDecision {
        concurrency,
        tmto,
        threads,
    }
}

/// One tuning-table record for persistence:
/// `<device_name_underscored> * <format_id> 1 <concurrency> A\n`.
pub fn tuningdb_line(device: &DeviceDescriptor, format_id: u32, decision: &TuningDecision) -> String {
    format!(
        "{} * {} 1 {} A\n",
        device.underscored_name(),
        format_id,
        decision.concurrency
    )
}

#[cfg(test)]
mod tests {
    use pwseek_common::resource::DeviceVendor;

    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn gpu(available_memory: u64, compute_units: u32) -> DeviceDescriptor {
        DeviceDescriptor {
            name: "Test GPU".to_string(),
            available_memory,
            max_single_allocation: available_memory,
            compute_units,
            is_gpu: true,
            vendor: DeviceVendor::Nvidia,
            is_metal: false,
            has_byte_permute: true,
        }
    }

    fn fit_bytes(params: &ScryptParams, decision: &TuningDecision) -> u64 {
        u64::from(decision.concurrency) * (params.per_candidate_memory() >> decision.tmto)
    }

    #[test]
    fn forced_concurrency_wins_verbatim() {
        let params = ScryptParams::default();
        let overrides = TuneOverrides {
            concurrency: Some(3),
            ..TuneOverrides::default()
        };

        let decision = tune(&params, &gpu(12 * GIB, 28), &overrides);
        assert_eq!(decision.concurrency, 3);
        assert_eq!(decision.threads, SCRYPT_THREADS);
    }

    #[test]
    fn forced_tmto_skips_search() {
        let params = ScryptParams::default();
        let overrides = TuneOverrides {
            tmto: Some(4),
            ..TuneOverrides::default()
        };

        let decision = tune(&params, &gpu(12 * GIB, 28), &overrides);
        assert_eq!(decision.tmto, 4);
    }

    #[test]
    fn shrinks_when_memory_is_short() {
        // per-accel footprint is 1 GiB (64 MiB candidate * 16 threads), so
        // 28 compute units cannot fit into 12 GiB
        let params = ScryptParams::default();
        let device = gpu(12 * GIB, 28);

        let decision = tune(&params, &device, &TuneOverrides::default());

        assert_eq!(decision.concurrency, 44);
        assert_eq!(decision.tmto, 2);
        assert!(
            u64::from(decision.concurrency)
                * per_accel_memory(&params, decision.threads, decision.tmto)
                <= device.available_memory
        );
    }

    #[test]
    fn snaps_to_compute_units_when_close() {
        // the shrink search lands at 30, one unit above the count
        let params = ScryptParams::default();
        let device = gpu(16 * GIB, 29);

        let decision = tune(&params, &device, &TuneOverrides::default());
        assert_eq!(decision.concurrency, 29);
    }

    #[test]
    fn grows_up_to_the_oversubscription_cap() {
        let params = ScryptParams::default();
        let device = gpu(64 * GIB, 8);

        let decision = tune(&params, &device, &TuneOverrides::default());
        assert_eq!(decision.concurrency, 56);
        assert_eq!(decision.tmto, 1);
    }

    #[test]
    fn non_gpu_uses_the_growth_path() {
        let params = ScryptParams::default();
        let mut device = gpu(64 * GIB, 8);
        device.is_gpu = false;

        let decision = tune(&params, &device, &TuneOverrides::default());
        assert_eq!(decision.concurrency, 56);
    }

    #[test]
    fn available_memory_is_capped_by_max_allocation() {
        let params = ScryptParams::default();
        let mut device = gpu(64 * GIB, 8);
        device.max_single_allocation = 2 * GIB;

        // effective ceiling is 8 GiB, not 64
        let decision = tune(&params, &device, &TuneOverrides::default());
        assert!(decision.concurrency < 56);
    }

    #[test]
    fn fit_invariant_holds_when_feasible() {
        let params = ScryptParams::default();
        for (mem, cu) in [(6 * GIB, 16), (12 * GIB, 28), (24 * GIB, 64), (80 * GIB, 108)] {
            let device = gpu(mem, cu);
            let decision = tune(&params, &device, &TuneOverrides::default());
            if decision.tmto > 0 {
                assert!(
                    fit_bytes(&params, &decision) <= device.available_memory,
                    "fit violated at mem={mem} cu={cu}: {decision:?}"
                );
            }
        }
    }

    #[test]
    fn doubling_memory_never_shrinks_the_fit() {
        let params = ScryptParams::default();
        let mut previous = 0u64;

        for mem in [6 * GIB, 12 * GIB, 24 * GIB] {
            let device = gpu(mem, 28);
            let decision = tune(&params, &device, &TuneOverrides::default());
            let used = fit_bytes(&params, &decision);

            assert!(used >= previous, "fit shrank going to mem={mem}");
            assert!(used <= mem);
            previous = used;
        }
    }

    #[test]
    fn tuningdb_line_format() {
        let device = gpu(12 * GIB, 28);
        let decision = tune(&ScryptParams::default(), &device, &TuneOverrides::default());

        assert_eq!(
            tuningdb_line(&device, 24000, &decision),
            format!("Test_GPU * 24000 1 {} A\n", decision.concurrency)
        );
    }
}
