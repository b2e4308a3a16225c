use std::cell::RefCell;

use rand::distr::uniform::SampleUniform;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::{RngCore, SeedableRng};

// Thread-local `SmallRng` state.
thread_local! {
    static THREAD_RNG_KEY: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// A handle to the thread-local `SmallRng`, similar to `rand::ThreadRng`.
/// Seeded from the OS, so every run produces a different stream.
#[derive(Debug, Clone)]
pub struct SmallThreadRng;

impl RngCore for SmallThreadRng {
    fn next_u32(&mut self) -> u32 {
        THREAD_RNG_KEY.with(|rng_cell| rng_cell.borrow_mut().next_u32())
    }

    fn next_u64(&mut self) -> u64 {
        THREAD_RNG_KEY.with(|rng_cell| rng_cell.borrow_mut().next_u64())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        THREAD_RNG_KEY.with(|rng_cell| rng_cell.borrow_mut().fill_bytes(dest))
    }
}

pub fn small_thread_rng() -> SmallThreadRng {
    SmallThreadRng
}

/// Deterministic generator for reproducible traces.
///
/// `SmallRng` is Xoshiro256++ on 64-bit targets. The stream for a given seed
/// is stable for a fixed `rand` version and pointer width, which is enough
/// for test fixtures but not for archival formats.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Draws a value uniformly from `[min, max]` (both inclusive).
///
/// # Panics
/// Panics if `min > max`.
pub fn gen_random_int_with<T, R>(rng: &mut R, min: T, max: T) -> T
where
    T: SampleUniform + PartialOrd,
    R: Rng,
{
    rng.random_range(min..=max)
}
