//! Fuzz target for streaming digests and node composition
//!
//! # Strategy
//!
//! - Arbitrary input split into arbitrary chunks
//! - Random interleaving of reset and finalize
//! - Node inputs of arbitrary length for `root`
//!
//! # Invariants
//!
//! - Chunked hashing equals one-shot hashing for every algorithm
//! - `update` after `finalize` is rejected, `reset` restores a fresh state
//! - `root` accepts exactly two digest-sized nodes and equals hashing
//!   their concatenation
//! - `multi` with no third input equals `multi` with an empty one

#![no_main]

use arbitrary::Arbitrary;
use keyforge_crypto::{
    DigestState, Hash160, HashAlgorithm, Sha256, Sha512, digest, multi, root,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    data: Vec<u8>,
    splits: Vec<u8>,
    left: Vec<u8>,
    right: Vec<u8>,
    third: Option<Vec<u8>>,
}

fn check<H: HashAlgorithm>(scenario: &Scenario) {
    let expected = digest::<H>(&scenario.data);

    // INVARIANT: chunking is invisible
    let mut state = DigestState::<H>::new();
    let mut rest = scenario.data.as_slice();
    for &size in &scenario.splits {
        let size = usize::from(size).min(rest.len());
        let (head, tail) = rest.split_at(size);
        state.update(head).unwrap();
        rest = tail;
    }
    state.update(rest).unwrap();
    assert_eq!(state.finalize().unwrap(), expected);

    // INVARIANT: finalized state rejects input until reset
    assert!(state.update(b"x").unwrap_err().is_misuse());
    assert!(state.finalize().unwrap_err().is_misuse());
    state.reset().update(&scenario.data).unwrap();
    assert_eq!(state.finalize().unwrap(), expected);

    // INVARIANT: root requires two digest-sized nodes
    let node = root::<H>(&scenario.left, &scenario.right);
    if scenario.left.len() == H::OUTPUT_SIZE && scenario.right.len() == H::OUTPUT_SIZE {
        let mut joined = scenario.left.clone();
        joined.extend_from_slice(&scenario.right);
        assert_eq!(node.unwrap(), digest::<H>(&joined));
    } else {
        assert!(node.is_err());
    }

    // INVARIANT: absent third input equals empty third input
    let absent = multi::<H>(&scenario.left, &scenario.right, None);
    assert_eq!(absent, multi::<H>(&scenario.left, &scenario.right, Some(b"".as_slice())));
    if let Some(third) = &scenario.third {
        let mut joined = scenario.left.clone();
        joined.extend_from_slice(&scenario.right);
        joined.extend_from_slice(third);
        let with_third = multi::<H>(&scenario.left, &scenario.right, Some(third.as_slice()));
        assert_eq!(with_third, digest::<H>(&joined));
    }
}

fuzz_target!(|scenario: Scenario| {
    check::<Sha512>(&scenario);
    check::<Sha256>(&scenario);
    check::<Hash160>(&scenario);
});
