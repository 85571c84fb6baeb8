//! Opaque user identifier codec.
//!
//! The document store assigns every record a 12-byte object identifier. The
//! rest of the system only ever sees its canonical text form: 24 lowercase
//! hexadecimal characters, safe to embed in URLs and JSON bodies.
//!
//! ```
//! use user_service::domain::UserId;
//!
//! let id = UserId::decode("65a1f0c2e4b0a1b2c3d4e5f6").expect("valid id");
//! assert_eq!(id.encode(), "65a1f0c2e4b0a1b2c3d4e5f6");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Number of raw bytes in a document-store object identifier.
pub const USER_ID_BYTES: usize = 12;

/// Length of the canonical text form.
pub const USER_ID_ENCODED_LEN: usize = USER_ID_BYTES * 2;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);
static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::random()));

/// Reasons a string cannot be decoded into a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The input was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The input had the wrong number of characters.
    #[error("user id must be 24 hexadecimal characters, got {len}")]
    InvalidLength { len: usize },
    /// The input contained a non-hexadecimal character.
    #[error("user id must contain only hexadecimal characters")]
    InvalidHex,
}

/// Storage-assigned user identifier.
///
/// ## Invariants
/// - `decode(encode(id)) == id` for every identifier.
/// - The text form is always lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId([u8; USER_ID_BYTES]);

impl UserId {
    /// Parse the text form of an identifier.
    ///
    /// Accepts upper- or lowercase hexadecimal input.
    pub fn decode(text: &str) -> Result<Self, UserIdError> {
        if text.is_empty() {
            return Err(UserIdError::Empty);
        }
        if text.len() != USER_ID_ENCODED_LEN {
            return Err(UserIdError::InvalidLength { len: text.len() });
        }

        let mut bytes = [0_u8; USER_ID_BYTES];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| UserIdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Canonical text form.
    #[must_use]
    pub fn encode(&self) -> String {
        hex::encode(self.0)
    }

    /// Wrap raw identifier bytes produced by a storage engine.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; USER_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes for handing back to a storage engine.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; USER_ID_BYTES] {
        self.0
    }

    /// Mint a fresh identifier with the document store's layout: seconds
    /// since the epoch, a per-process random value, then a wrapping counter.
    ///
    /// Adapters backed by an engine that assigns its own ids never call this.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        let seconds = u32::try_from(seconds).unwrap_or(u32::MAX);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0_u8; USER_ID_BYTES];
        let (timestamp, rest) = bytes.split_at_mut(4);
        let (process, tail) = rest.split_at_mut(5);
        timestamp.copy_from_slice(&seconds.to_be_bytes());
        process.copy_from_slice(PROCESS_UNIQUE.as_slice());
        let [_, high, mid, low] = counter.to_be_bytes();
        tail.copy_from_slice(&[high, mid, low]);
        Self(bytes)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.encode()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}
