//! Address pattern generation.
//!
//! Every generator materializes the whole sequence eagerly. The caller
//! consumes all of it for serialization, so there is nothing to gain from
//! lazy iteration.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::address::AddressRecord;
use crate::error::{Result, TraceError};
use crate::log_debug;
use crate::random::{gen_random_int_with, seeded_rng, small_thread_rng};

pub const DEFAULT_SEQUENTIAL_START: u64 = 0x1000;
pub const DEFAULT_SEQUENTIAL_COUNT: usize = 10_000;
pub const DEFAULT_SEQUENTIAL_STEP: u64 = 4;

pub const DEFAULT_LOOP_SET: [u64; 4] = [0x1000, 0x2000, 0x3000, 0x4000];
pub const DEFAULT_LOOPING_COUNT: usize = 10_000;

pub const DEFAULT_RANDOM_COUNT: usize = 100_000;
pub const DEFAULT_ADDRESS_RANGE: u64 = 0xFFFF;

pub const DEFAULT_WORKING_SET: usize = 20;
pub const DEFAULT_REPEATED_COUNT: usize = 100;

/// How to produce a sequence of addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternSpec {
    /// `start, start + step, ..., start + (count - 1) * step`.
    Sequential {
        start: AddressRecord,
        count: usize,
        step: u64,
    },
    /// `addresses` replayed cyclically until `count` records exist.
    Looping {
        addresses: Vec<AddressRecord>,
        count: usize,
    },
    /// Independent uniform draws from `[0, range]`.
    Random {
        count: usize,
        range: AddressRecord,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// `working_set` random addresses from `[0, range]`, replayed as a loop set.
    Repeated {
        working_set: usize,
        count: usize,
        range: AddressRecord,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

impl PatternSpec {
    pub fn sequential() -> Self {
        PatternSpec::Sequential {
            start: AddressRecord::new(DEFAULT_SEQUENTIAL_START),
            count: DEFAULT_SEQUENTIAL_COUNT,
            step: DEFAULT_SEQUENTIAL_STEP,
        }
    }

    pub fn looping() -> Self {
        PatternSpec::Looping {
            addresses: DEFAULT_LOOP_SET.map(AddressRecord::new).to_vec(),
            count: DEFAULT_LOOPING_COUNT,
        }
    }

    pub fn random() -> Self {
        PatternSpec::Random {
            count: DEFAULT_RANDOM_COUNT,
            range: AddressRecord::new(DEFAULT_ADDRESS_RANGE),
            seed: None,
        }
    }

    pub fn repeated() -> Self {
        PatternSpec::Repeated {
            working_set: DEFAULT_WORKING_SET,
            count: DEFAULT_REPEATED_COUNT,
            range: AddressRecord::new(DEFAULT_ADDRESS_RANGE),
            seed: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PatternSpec::Sequential { .. } => "sequential",
            PatternSpec::Looping { .. } => "looping",
            PatternSpec::Random { .. } => "random",
            PatternSpec::Repeated { .. } => "repeated",
        }
    }

    /// Number of records the pattern produces.
    pub fn count(&self) -> usize {
        match self {
            PatternSpec::Sequential { count, .. }
            | PatternSpec::Looping { count, .. }
            | PatternSpec::Random { count, .. }
            | PatternSpec::Repeated { count, .. } => *count,
        }
    }

    pub fn generate(&self) -> Result<Vec<AddressRecord>> {
        log_debug!("Generating {} pattern: {:?}", self.name(), self);
        match self {
            PatternSpec::Sequential { start, count, step } => {
                generate_sequential(start.value(), *count, *step)
            }
            PatternSpec::Looping { addresses, count } => generate_looping(addresses, *count),
            PatternSpec::Random { count, range, seed } => {
                generate_random_seeded(*count, range.value(), *seed)
            }
            PatternSpec::Repeated {
                working_set,
                count,
                range,
                seed,
            } => generate_repeated(*working_set, *count, range.value(), *seed),
        }
    }
}

fn require_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(TraceError::invalid("count must be positive"));
    }
    Ok(())
}

/// Addresses `start + i * step` for `i` in `0..count`.
///
/// Rejects a zero `count` or `step`, and any sequence whose last address
/// does not fit in a `u64`.
pub fn generate_sequential(start: u64, count: usize, step: u64) -> Result<Vec<AddressRecord>> {
    require_count(count)?;
    if step == 0 {
        return Err(TraceError::invalid("step must be positive"));
    }
    let last = step
        .checked_mul((count - 1) as u64)
        .and_then(|span| start.checked_add(span));
    if last.is_none() {
        return Err(TraceError::invalid(format!(
            "{} addresses from {} with step {} overflow a 64-bit address",
            count,
            AddressRecord::new(start),
            step
        )));
    }

    Ok((0..count as u64)
        .map(|i| AddressRecord::new(start + i * step))
        .collect())
}

/// Replays `loop_addresses` in order, wrapping around, until `count`
/// records exist: record `i` is `loop_addresses[i % loop_addresses.len()]`.
pub fn generate_looping(
    loop_addresses: &[AddressRecord],
    count: usize,
) -> Result<Vec<AddressRecord>> {
    require_count(count)?;
    if loop_addresses.is_empty() {
        return Err(TraceError::invalid("loop address set must not be empty"));
    }
    Ok(loop_addresses.iter().copied().cycle().take(count).collect())
}

/// `count` addresses drawn independently and uniformly from `[0, range]`.
pub fn generate_random<R>(count: usize, range: u64, rng: &mut R) -> Result<Vec<AddressRecord>>
where
    R: Rng,
{
    require_count(count)?;
    Ok((0..count)
        .map(|_| AddressRecord::new(gen_random_int_with(rng, 0, range)))
        .collect())
}

/// [`generate_random`] on a generator seeded from `seed`, or on the
/// OS-seeded thread-local generator when no seed is given.
pub fn generate_random_seeded(
    count: usize,
    range: u64,
    seed: Option<u64>,
) -> Result<Vec<AddressRecord>> {
    match seed {
        Some(seed) => generate_random(count, range, &mut seeded_rng(seed)),
        None => generate_random(count, range, &mut small_thread_rng()),
    }
}

/// Draws a working set of `working_set` random addresses from `[0, range]`
/// and replays it cyclically until `count` records exist.
pub fn generate_repeated(
    working_set: usize,
    count: usize,
    range: u64,
    seed: Option<u64>,
) -> Result<Vec<AddressRecord>> {
    if working_set == 0 {
        return Err(TraceError::invalid("working set must not be empty"));
    }
    require_count(count)?;
    let loop_set = generate_random_seeded(working_set, range, seed)?;
    generate_looping(&loop_set, count)
}
