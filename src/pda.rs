//! Deterministic address derivation for program-owned accounts.
//!
//! An address is derived by hashing the seed bytes, a bump byte, the
//! program id, and a fixed marker, then requiring the digest to miss the
//! ed25519 curve (on-curve digests are retried with a lower bump). Pure
//! value computation, no I/O.

use crate::domain::Pubkey;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

const DEAL_SEED: &[u8] = b"deal-info";
const REPAYMENT_SCHEDULE_SEED: &[u8] = b"repayment-schedule";
const TRANCHES_SEED: &[u8] = b"tranches";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdaError {
    #[error("too many seeds: {0} (max 16)")]
    TooManySeeds(usize),
    #[error("seed length {0} exceeds 32 bytes")]
    SeedTooLong(usize),
    #[error("no viable bump seed for derivation")]
    NoViableBump,
}

/// Derive the program address for a seed sequence, searching bumps from
/// 255 downward for the first off-curve digest.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    if seeds.len() > MAX_SEEDS {
        return Err(PdaError::TooManySeeds(seeds.len()));
    }
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(PdaError::SeedTooLong(seed.len()));
        }
    }
    for bump in (0..=u8::MAX).rev() {
        let digest = hash_seeds(seeds, bump, program_id);
        if !is_on_curve(&digest) {
            return Ok((Pubkey::new(digest), bump));
        }
    }
    Err(PdaError::NoViableBump)
}

fn hash_seeds(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// The market's state address, from its seed string.
pub fn find_market_address(seed: &str, program_id: &Pubkey) -> Result<(Pubkey, u8), PdaError> {
    find_program_address(&[seed.as_bytes()], program_id)
}

/// The authority controlling a market's pooled funds.
pub fn find_signing_authority_address(
    market: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    find_program_address(&[market.as_ref()], program_id)
}

/// A deal's address, from market, borrower, and per-borrower sequence
/// number (two little-endian bytes).
pub fn find_deal_address(
    market: &Pubkey,
    borrower: &Pubkey,
    deal_number: u16,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    let deal_number = deal_number.to_le_bytes();
    find_program_address(
        &[market.as_ref(), borrower.as_ref(), &deal_number, DEAL_SEED],
        program_id,
    )
}

/// The repayment-schedule address belonging to a deal.
pub fn find_repayment_schedule_address(
    market: &Pubkey,
    deal: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    find_program_address(
        &[market.as_ref(), deal.as_ref(), REPAYMENT_SCHEDULE_SEED],
        program_id,
    )
}

/// The tranche-set address belonging to a deal.
pub fn find_tranches_address(
    market: &Pubkey,
    deal: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    find_program_address(&[market.as_ref(), deal.as_ref(), TRANCHES_SEED], program_id)
}
