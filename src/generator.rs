//! ObjectId generator and related types.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::{ObjectId, Seed};

/// A trait that defines the minimum system clock interface for [`Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in seconds.
    fn unix_ts_secs(&self) -> i64;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_secs(&self) -> i64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_secs() as i64
    }
}

/// Represents an ObjectId generator that owns a [`Seed`] and the counter advanced on each call.
///
/// The counter is an atomic integer, so a single generator can be shared by reference across
/// threads; concurrent calls never observe the same counter value until it wraps around after
/// 2^24 identifiers.
///
/// # Examples
///
/// ```rust
/// use objectid::{Generator, Seed};
/// use std::thread;
///
/// let g = Generator::with_seed(Seed::new(0x102030, 0x4050, 0));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct Generator<T = StdSystemTime> {
    seed: Seed,
    counter: AtomicI32,

    /// The system clock used by the generator.
    time_source: T,
}

impl Generator {
    /// Creates a generator that reads the system clock.
    pub const fn with_seed(seed: Seed) -> Self {
        Self::with_seed_and_time_source(seed, StdSystemTime)
    }
}

impl<T: TimeSource> Generator<T> {
    /// Creates a generator with a custom time source.
    pub const fn with_seed_and_time_source(seed: Seed, time_source: T) -> Self {
        Self {
            seed,
            counter: AtomicI32::new(seed.counter()),
            time_source,
        }
    }

    /// Returns the seed the generator was created with.
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Generates a new ObjectId from the current timestamp and the next counter value.
    pub fn generate(&self) -> ObjectId {
        self.generate_core(self.time_source.unix_ts_secs())
    }

    /// Generates a new ObjectId from the `unix_ts_secs` passed and the next counter value.
    pub fn generate_core(&self, unix_ts_secs: i64) -> ObjectId {
        // fetch_add wraps on overflow
        let increment = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1) & 0xff_ffff;
        ObjectId::from_fields(
            unix_ts_secs,
            self.seed.machine(),
            self.seed.pid(),
            increment,
        )
    }
}

/// Supports operations as an infinite iterator that produces a new ObjectId for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use objectid::{Generator, Seed};
///
/// Generator::with_seed(Seed::new(0x102030, 0x4050, 0))
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<T: TimeSource> Iterator for Generator<T> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T: TimeSource> std::iter::FusedIterator for Generator<T> {}
