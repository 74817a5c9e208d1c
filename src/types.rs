// src/types.rs
use crate::utils::error::PowError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 256-bit value used for digests, seeds and merkle roots.
///
/// Stored in internal (little-endian) byte order. Hex display follows
/// the conventional reversed order used by block explorers, so the
/// string form of a hash reads most-significant byte first.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uint256([u8; 32]);

impl Uint256 {
    /// The all-zero value. Used as the bootstrap seed on an empty chain.
    pub const ZERO: Uint256 = Uint256([0u8; 32]);

    /// The maximum value. Returned as the always-invalid digest for
    /// headers that encode no recognized algorithm.
    pub const MAX: Uint256 = Uint256([0xff; 32]);

    /// Wraps raw bytes in internal order.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Uint256(bytes)
    }

    /// Returns the raw bytes in internal order.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the bytes in reversed (display) order.
    pub fn to_display_bytes(&self) -> [u8; 32] {
        let mut out = self.0;
        out.reverse();
        out
    }

    /// Parses a 64-character hex string given in display order.
    pub fn from_hex(s: &str) -> Result<Self, PowError> {
        let raw = hex::decode(s)?;
        let mut bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| PowError::Input(format!("expected 32 hex bytes, got \"{}\"", s)))?;
        bytes.reverse();
        Ok(Uint256(bytes))
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_display_bytes()))
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Uint256 {
    type Err = PowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uint256::from_hex(s)
    }
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Uint256::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Mask of the algorithm sub-field inside the block version word.
///
/// Bits 9..12 carry a 3-bit algorithm code; code 0 is deliberately
/// unmapped so an all-zero version word never selects an algorithm.
pub const VERSION_ALGO_MASK: u32 = 0x7 << 9;

const VERSION_SCRYPT: u32 = 1 << 9;
const VERSION_SHA256D: u32 = 2 << 9;
const VERSION_GROESTL: u32 = 3 << 9;
const VERSION_SKEIN: u32 = 4 << 9;
const VERSION_QUBIT: u32 = 5 << 9;
const VERSION_ODO: u32 = 6 << 9;
const VERSION_RANDOMX: u32 = 7 << 9;

/// Proof-of-work algorithms a block header can select via its version bits.
///
/// `Unknown` is a valid terminal value: the dispatcher maps it to an
/// always-invalid digest so malformed headers fail validation without
/// any extra branching in callers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Double SHA-256 over the native header encoding.
    Sha256d,
    /// scrypt (N=1024, r=1, p=1) over the native header encoding.
    Scrypt,
    /// Groestl over the native header encoding.
    Groestl,
    /// Skein over the native header encoding.
    Skein,
    /// Qubit chained digest over the native header encoding.
    Qubit,
    /// Odo with a timestamp-derived shape key.
    Odo,
    /// The memory-hard algorithm (RandomX) over the foreign wire blob.
    RandomX,
    /// No recognized algorithm code in the version bits.
    Unknown,
}

impl Algorithm {
    /// Decodes the algorithm from a header version word.
    ///
    /// Total function: every input maps to a variant, with unmapped
    /// codes (including 0) producing `Unknown`.
    pub fn from_version(version: u32) -> Self {
        match version & VERSION_ALGO_MASK {
            VERSION_SCRYPT => Algorithm::Scrypt,
            VERSION_SHA256D => Algorithm::Sha256d,
            VERSION_GROESTL => Algorithm::Groestl,
            VERSION_SKEIN => Algorithm::Skein,
            VERSION_QUBIT => Algorithm::Qubit,
            VERSION_ODO => Algorithm::Odo,
            VERSION_RANDOMX => Algorithm::RandomX,
            _ => Algorithm::Unknown,
        }
    }

    /// Returns the version bits selecting this algorithm, or 0 for `Unknown`.
    pub fn version_bits(&self) -> u32 {
        match self {
            Algorithm::Scrypt => VERSION_SCRYPT,
            Algorithm::Sha256d => VERSION_SHA256D,
            Algorithm::Groestl => VERSION_GROESTL,
            Algorithm::Skein => VERSION_SKEIN,
            Algorithm::Qubit => VERSION_QUBIT,
            Algorithm::Odo => VERSION_ODO,
            Algorithm::RandomX => VERSION_RANDOMX,
            Algorithm::Unknown => 0,
        }
    }

    /// Case-insensitive name lookup supporting historical aliases.
    ///
    /// Unrecognized names return the caller-supplied `fallback` instead
    /// of failing; mining CLIs use this to default the `-algo` flag.
    pub fn from_name(name: &str, fallback: Algorithm) -> Algorithm {
        match name.to_lowercase().as_str() {
            "sha" | "sha256" | "sha256d" => Algorithm::Sha256d,
            "scrypt" => Algorithm::Scrypt,
            "groestl" | "groestlsha2" => Algorithm::Groestl,
            "skein" | "skeinsha2" => Algorithm::Skein,
            "q2c" | "qubit" => Algorithm::Qubit,
            "odo" | "odosha3" => Algorithm::Odo,
            "randomx" | "rx/0" => Algorithm::RandomX,
            _ => fallback,
        }
    }

    /// Canonical display name of the algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sha256d => "sha256d",
            Algorithm::Scrypt => "scrypt",
            Algorithm::Groestl => "groestl",
            Algorithm::Skein => "skein",
            Algorithm::Qubit => "qubit",
            Algorithm::Odo => "odo",
            Algorithm::RandomX => "randomx",
            Algorithm::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Algorithm::from_name(s, Algorithm::Unknown) {
            Algorithm::Unknown => Err(format!("Unknown algorithm: {}", s)),
            algo => Ok(algo),
        }
    }
}
