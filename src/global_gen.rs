//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::{process, sync};

use crate::{Generator, ObjectId, Seed};

/// Runs `f` with the process-wide global generator, seeding one from the host if none exists or
/// if the process ID has changed since it was seeded (i.e., upon Unix forks).
///
/// # Panics
///
/// Panics if the host exposes no machine identity, as no identifier produced without one could
/// be trusted to be unique.
fn with_global_gen<R>(f: impl FnOnce(&Generator) -> R) -> R {
    static G: sync::RwLock<Option<GlobalGenInner>> = sync::RwLock::new(None);

    {
        let guard = G
            .read()
            .expect("objectid: could not lock global generator");
        if let Some(inner) = guard.as_ref().filter(|e| e.is_current()) {
            return f(&inner.generator);
        }
    }

    let mut guard = G
        .write()
        .expect("objectid: could not lock global generator");
    let inner = match guard.take() {
        Some(e) if e.is_current() => e,
        stale => {
            if let Some(e) = stale {
                log::debug!("objectid: process id changed from {}; reseeding", e.pid);
            }
            GlobalGenInner::from_host()
        }
    };
    f(&guard.insert(inner).generator)
}

/// A thin wrapper that remembers which process the generator was seeded for.
#[derive(Debug)]
struct GlobalGenInner {
    pid: u32,
    generator: Generator,
}

impl GlobalGenInner {
    fn from_host() -> Self {
        let seed = Seed::from_host().expect("objectid: could not initialize global generator");
        Self {
            pid: process::id(),
            generator: Generator::with_seed(seed),
        }
    }

    fn is_current(&self) -> bool {
        self.pid == process::id()
    }
}

/// Generates an ObjectId.
///
/// This function employs a global generator whose machine identifier, process identifier, and
/// counter are shared by every caller in the process. The generator is seeded again when the
/// process ID changes (i.e., upon Unix forks), so a forked child never repeats its parent's
/// identifiers.
///
/// # Examples
///
/// ```rust
/// let id = objectid::object_id();
/// println!("{}", id); // e.g., "65a1f0c2e3b7a91f4c000001"
/// println!("{:?}", id.to_bytes()); // as 12-byte big-endian array
///
/// let id_string: String = objectid::object_id().to_string();
/// ```
pub fn object_id() -> ObjectId {
    with_global_gen(|g| g.generate())
}

/// Returns the seed of the global generator.
pub fn global_seed() -> Seed {
    with_global_gen(|g| *g.seed())
}

impl ObjectId {
    /// Generates a new ObjectId using the global generator.
    ///
    /// See [`object_id()`] for details.
    pub fn new() -> Self {
        object_id()
    }
}
