//! Incremental digest state

use std::{fmt, mem};

use super::algorithm::HashAlgorithm;
use crate::error::CryptoError;

/// Digest lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestPhase {
    /// Accepting input
    Absorbing,
    /// Digest emitted; only [`DigestState::reset`] is legal
    Finalized,
}

impl DigestPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Absorbing => "absorbing",
            Self::Finalized => "finalized",
        }
    }
}

/// Incremental hash context for one algorithm.
///
/// Single owner, single thread: nothing here is shared. After
/// [`finalize`](Self::finalize) the state rejects further input until
/// [`reset`](Self::reset) is called.
pub struct DigestState<H: HashAlgorithm> {
    ctx: H::Context,
    phase: DigestPhase,
}

impl<H: HashAlgorithm> DigestState<H> {
    /// Create a state at the algorithm's initial value.
    pub fn new() -> Self {
        Self { ctx: H::Context::default(), phase: DigestPhase::Absorbing }
    }

    /// Current phase.
    pub fn phase(&self) -> DigestPhase {
        self.phase
    }

    /// Return to the algorithm's initial state, discarding any input.
    ///
    /// Legal in every phase.
    pub fn reset(&mut self) -> &mut Self {
        self.ctx = H::Context::default();
        self.phase = DigestPhase::Absorbing;
        self
    }

    /// Absorb `data`. Empty input is a no-op.
    ///
    /// # Errors
    ///
    /// - `Misuse` if the state has been finalized and not reset
    pub fn update(&mut self, data: &[u8]) -> Result<&mut Self, CryptoError> {
        self.ensure_absorbing("update")?;
        H::update(&mut self.ctx, data);
        Ok(self)
    }

    /// Emit the digest of everything absorbed since the last reset.
    ///
    /// # Errors
    ///
    /// - `Misuse` if called twice without an intervening reset
    pub fn finalize(&mut self) -> Result<H::Output, CryptoError> {
        self.ensure_absorbing("finalize")?;
        let ctx = mem::take(&mut self.ctx);
        self.phase = DigestPhase::Finalized;
        Ok(H::finalize(ctx))
    }

    fn ensure_absorbing(&self, operation: &'static str) -> Result<(), CryptoError> {
        match self.phase {
            DigestPhase::Absorbing => Ok(()),
            DigestPhase::Finalized => {
                Err(CryptoError::Misuse { operation, state: self.phase.as_str() })
            },
        }
    }
}

impl<H: HashAlgorithm> Default for DigestState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashAlgorithm> Clone for DigestState<H> {
    fn clone(&self) -> Self {
        Self { ctx: self.ctx.clone(), phase: self.phase }
    }
}

impl<H: HashAlgorithm> fmt::Debug for DigestState<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestState")
            .field("algorithm", &H::NAME)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{Hash160, Sha512, digest};

    #[test]
    fn incremental_matches_one_shot() {
        let mut state = DigestState::<Sha512>::new();
        state.update(b"a").unwrap().update(b"").unwrap().update(b"bc").unwrap();
        assert_eq!(state.finalize().unwrap(), digest::<Sha512>(b"abc"));
    }

    #[test]
    fn finalize_twice_is_misuse() {
        let mut state = DigestState::<Sha512>::new();
        state.finalize().unwrap();

        let result = state.finalize();
        assert!(matches!(
            result,
            Err(CryptoError::Misuse { operation: "finalize", state: "finalized" })
        ));
    }

    #[test]
    fn update_after_finalize_is_misuse() {
        let mut state = DigestState::<Hash160>::new();
        state.update(b"data").unwrap();
        state.finalize().unwrap();

        let err = state.update(b"more").unwrap_err();
        assert!(err.is_misuse());
        assert_eq!(state.phase(), DigestPhase::Finalized);
    }

    #[test]
    fn reset_allows_reuse() {
        let mut state = DigestState::<Sha512>::new();
        state.update(b"discarded").unwrap();
        state.finalize().unwrap();

        state.reset().update(b"abc").unwrap();
        assert_eq!(state.phase(), DigestPhase::Absorbing);
        assert_eq!(state.finalize().unwrap(), digest::<Sha512>(b"abc"));
    }

    #[test]
    fn reset_mid_stream_discards_input() {
        let mut state = DigestState::<Sha512>::new();
        state.update(b"garbage").unwrap();
        state.reset();
        assert_eq!(state.finalize().unwrap(), digest::<Sha512>(b""));
    }

    #[test]
    fn clone_forks_the_stream() {
        let mut state = DigestState::<Hash160>::new();
        state.update(b"prefix-").unwrap();

        let mut fork = state.clone();
        state.update(b"left").unwrap();
        fork.update(b"right").unwrap();

        assert_eq!(state.finalize().unwrap(), digest::<Hash160>(b"prefix-left"));
        assert_eq!(fork.finalize().unwrap(), digest::<Hash160>(b"prefix-right"));
    }

    #[test]
    fn debug_does_not_expose_context() {
        let state = DigestState::<Sha512>::new();
        let rendered = format!("{state:?}");
        assert!(rendered.contains("sha512"));
        assert!(rendered.contains("Absorbing"));
    }
}
