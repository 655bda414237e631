//! Streaming digests and composition helpers
//!
//! Algorithms implement [`HashAlgorithm`]; [`DigestState`] drives any of
//! them incrementally and refuses use after finalization. The composition
//! helpers cover the shapes higher layers need without building
//! intermediate buffers:
//!
//! - [`digest()`]: `H(data)`
//! - [`root`]: `H(left || right)` for two child digests (Merkle inner node)
//! - [`multi`]: `H(a || b || c)` with an optional third field
//! - [`fingerprint`]: `RIPEMD160(SHA256(data))`, a 20-byte identifier

pub mod algorithm;
pub mod compose;
pub mod state;

pub use algorithm::{Hash160, HashAlgorithm, Sha256, Sha512};
pub use compose::{FINGERPRINT_SIZE, digest, fingerprint, multi, root};
pub use state::{DigestPhase, DigestState};
