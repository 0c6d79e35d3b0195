//! Record decoder for the fixed account layouts used by the marketplace.
//!
//! Accounts are stored with an 8-byte discriminator (the first 8 bytes of
//! `sha256("account:<Name>")`) followed by the record fields in declared
//! order: fixed-width little-endian integers, 4-byte-length-prefixed
//! strings and vectors, a 1-byte presence flag before optional values, and
//! 1-byte enum tags in declaration order.

use crate::domain::Pubkey;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

mod accounts;

/// The account kinds this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Deal,
    DealTranches,
    RepaymentSchedule,
    GlobalMarketState,
}

impl AccountKind {
    /// The on-ledger record name, as hashed into the discriminator.
    pub fn name(self) -> &'static str {
        match self {
            AccountKind::Deal => "Deal",
            AccountKind::DealTranches => "DealTranches",
            AccountKind::RepaymentSchedule => "RepaymentSchedule",
            AccountKind::GlobalMarketState => "GlobalMarketState",
        }
    }

    /// The 8-byte tag prefixing every account of this kind.
    pub fn discriminator(self) -> [u8; 8] {
        let digest = Sha256::digest(format!("account:{}", self.name()).as_bytes());
        let mut tag = [0u8; 8];
        tag.copy_from_slice(&digest[..8]);
        tag
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Failure to decode a single record. Fatal for that record only; the
/// pipeline degrades an undecodable account to a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode {kind}: {reason}")]
pub struct DecodeError {
    pub kind: AccountKind,
    pub reason: String,
}

/// A record that can be decoded from a raw account buffer.
pub trait AccountDecode: Sized {
    const KIND: AccountKind;

    fn decode(data: &[u8]) -> Result<Self, DecodeError>;
}

/// Decode an account buffer, degrading failure to absence.
///
/// A malformed record must not abort a whole market's computation, so the
/// caller sees `None` and the defect is logged.
pub fn decode_or_missing<T: AccountDecode>(address: &Pubkey, data: &[u8]) -> Option<T> {
    match T::decode(data) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(account = %address, error = %e, "undecodable account treated as missing");
            None
        }
    }
}

/// Sequential reader over a raw account buffer.
///
/// Every read checks the remaining length; trailing bytes after the
/// declared layout are tolerated (accounts may be over-allocated).
#[derive(Debug)]
struct Cursor<'a> {
    kind: AccountKind,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Open a cursor after verifying the discriminator prefix.
    fn checked(kind: AccountKind, buf: &'a [u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor { kind, buf, pos: 0 };
        let tag = cursor.take(8)?;
        let expected = kind.discriminator();
        if tag != &expected[..] {
            return Err(cursor.error(format!(
                "discriminator {} does not match expected {}",
                hex::encode(tag),
                hex::encode(expected)
            )));
        }
        Ok(cursor)
    }

    fn error(&self, reason: String) -> DecodeError {
        DecodeError {
            kind: self.kind,
            reason,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.buf.len() - self.pos;
        if n > remaining {
            return Err(self.error(format!(
                "need {} bytes at offset {}, {} remain",
                n, self.pos, remaining
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn bool(&mut self) -> Result<bool, DecodeError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.error(format!("invalid bool byte {}", other))),
        }
    }

    fn pubkey(&mut self) -> Result<Pubkey, DecodeError> {
        let bytes: [u8; 32] = self.take(32)?.try_into().unwrap();
        Ok(Pubkey::new(bytes))
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| self.error("string field is not valid utf-8".to_string()))
    }

    /// Optional value: 1-byte presence flag, then the value when present.
    fn option<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, DecodeError> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(read(self)?)),
            other => Err(self.error(format!("invalid option flag {}", other))),
        }
    }

    /// Length-prefixed vector. Elements are read one at a time so a corrupt
    /// length fails on the buffer bound, not on allocation.
    fn vec<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let len = self.u32()? as usize;
        let mut items = Vec::new();
        for _ in 0..len {
            items.push(read(self)?);
        }
        Ok(items)
    }
}
