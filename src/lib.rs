//! Generator and codec for 12-byte ObjectIds
//!
//! ```rust
//! use objectid::ObjectId;
//!
//! let id = ObjectId::new();
//! println!("{}", id); // e.g. "65a1f0c2e3b7a91f4c000001"
//! println!("{:?}", id.to_bytes()); // as 12-byte big-endian array
//!
//! let parsed = ObjectId::parse(&id.to_string())?;
//! assert_eq!(parsed, id);
//! # Ok::<(), objectid::ParseError>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    machine                    |      pid      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      pid      |                   increment                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 32-bit `timestamp` field holds the Unix timestamp in seconds.
//! - The 24-bit `machine` field holds the first three bytes of the MD5 digest of the host's
//!   network hardware addresses, or of the host name if the host has none.
//! - The 16-bit `pid` field holds the low bits of the creating process's identifier.
//! - The 24-bit `increment` field holds a counter that starts at a pseudo-random value and is
//!   incremented by one for each new identifier, wrapping around modulo 2^24.
//!
//! All identifiers created by one process share `machine` and `pid`. The counter is advanced
//! atomically, so concurrent callers never receive the same `increment` until 2^24 identifiers
//! have been generated.
//!
//! The canonical string form is 24 lowercase hexadecimal digits.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide generator seeded from the host, accessible through
//!   [`object_id()`] and [`ObjectId::new()`].
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization of [`ObjectId`] via serde.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ObjectId, ParseError};

pub mod generator;
#[doc(no_inline)]
pub use generator::Generator;

pub mod seed;
#[doc(no_inline)]
pub use seed::{Seed, StartupError};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{global_seed, object_id};
