//! Process-wide seed state shared by every identifier a process creates.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A trait that reports the host identity facts the machine identifier is derived from.
pub trait HostSource {
    /// Returns the string forms of the host's network hardware addresses in platform order.
    fn hardware_addrs(&self) -> Vec<String>;

    /// Returns the configured host name, if one can be determined.
    fn hostname(&self) -> Option<String>;
}

/// The values fixed for the lifetime of a generator: machine identifier, process identifier, and
/// the starting point of the counter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Seed {
    machine: i32,
    pid: i32,
    counter: i32,
}

impl Seed {
    /// Creates a seed from explicit values.
    pub const fn new(machine: i32, pid: i32, counter: i32) -> Self {
        Self {
            machine,
            pid,
            counter,
        }
    }

    /// Computes a seed from the running host and process.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::NoMachineIdentity`] if the host exposes neither a hardware address
    /// nor a host name.
    #[cfg(feature = "global_gen")]
    #[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
    pub fn from_host() -> Result<Self, StartupError> {
        Self::from_host_source(&StdHost)
    }

    /// Computes a seed from the identity facts reported by `host` and the current process.
    pub fn from_host_source(host: &impl HostSource) -> Result<Self, StartupError> {
        use std::{process, time};

        let machine = machine_identifier(host)?;
        // only 16 bits fit the layout; narrowing here keeps parsed and generated values equal
        let pid = (process::id() & 0xffff) as i32;
        let nanos = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as i64);
        let seed = Self::new(machine, pid, initial_counter(nanos, process::id() as i32));
        log::debug!(
            "objectid: seeded machine {:06x}, pid {}, counter {:06x}",
            seed.machine,
            seed.pid,
            seed.counter & 0xff_ffff
        );
        Ok(seed)
    }

    /// Returns the 24-bit machine identifier.
    pub const fn machine(&self) -> i32 {
        self.machine
    }

    /// Returns the process identifier.
    pub const fn pid(&self) -> i32 {
        self.pid
    }

    /// Returns the value the counter starts from.
    pub const fn counter(&self) -> i32 {
        self.counter
    }
}

/// Derives the machine identifier from hardware addresses, falling back to the host name.
fn machine_identifier(host: &impl HostSource) -> Result<i32, StartupError> {
    let addrs = host.hardware_addrs();
    if !addrs.is_empty() {
        log::debug!(
            "objectid: machine identifier from {} hardware address(es)",
            addrs.len()
        );
        return Ok(machine_hash(&addrs));
    }

    match host.hostname() {
        Some(name) if !name.is_empty() => {
            log::warn!("objectid: no hardware address found; using host name");
            Ok(machine_hash(&[name]))
        }
        _ => Err(StartupError::NoMachineIdentity),
    }
}

/// Returns the first three bytes, big-endian, of the MD5 digest of the concatenated `infos`.
pub fn machine_hash<S: AsRef<str>>(infos: &[S]) -> i32 {
    let mut context = md5::Context::new();
    for e in infos {
        context.consume(e.as_ref().as_bytes());
    }
    let digest = context.compute();
    i32::from_be_bytes([0, digest[0], digest[1], digest[2]])
}

/// Draws a non-negative 31-bit starting counter from a generator seeded by `nanos * pid`.
pub fn initial_counter(nanos: i64, pid: i32) -> i32 {
    let mut rng = ChaCha12Rng::seed_from_u64(nanos.wrapping_mul(pid as i64) as u64);
    (rng.next_u32() >> 1) as i32
}

/// The [`HostSource`] that queries the operating system.
#[cfg(feature = "global_gen")]
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdHost;

#[cfg(feature = "global_gen")]
impl HostSource for StdHost {
    fn hardware_addrs(&self) -> Vec<String> {
        let Ok(iter) = mac_address::MacAddressIterator::new() else {
            return Vec::new();
        };
        iter.map(|e| e.bytes())
            .filter(|bytes| bytes.iter().any(|&b| b != 0))
            .map(|bytes| {
                bytes
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(":")
            })
            .collect()
    }

    fn hostname(&self) -> Option<String> {
        let name = gethostname::gethostname();
        let name = name.to_string_lossy();
        (!name.is_empty()).then(|| name.into_owned())
    }
}

/// Error raised when the process cannot establish a machine identity.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum StartupError {
    /// Neither a hardware address nor a host name is available.
    #[error("could not determine machine identity: no hardware address and no host name")]
    NoMachineIdentity,
}
