//! MAC address type, generation and syntax validation

use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::{
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

/// Length of the canonical `xx:xx:xx:xx:xx:xx` rendering
pub const MAC_STRING_LEN: usize = 17;

const MULTICAST_BIT: u8 = 0b0000_0001;
const LOCALLY_ADMINISTERED_BIT: u8 = 0b0000_0010;

/// A 48-bit hardware address
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MacAddress([u8; 6]);

/// Error returned when a string is not a colon-separated MAC address
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid MAC address '{0}': expected xx:xx:xx:xx:xx:xx")]
pub struct MacParseError(String);

impl MacAddress {
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Draw a locally administered unicast address from `rng`
    pub fn random_with<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);
        bytes[0] = (bytes[0] & !MULTICAST_BIT) | LOCALLY_ADMINISTERED_BIT;
        Self(bytes)
    }

    #[must_use]
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & MULTICAST_BIT != 0
    }

    #[must_use]
    pub const fn is_locally_administered(&self) -> bool {
        self.0[0] & LOCALLY_ADMINISTERED_BIT != 0
    }
}

/// Generate a random locally administered unicast address.
///
/// The generator is seeded from the wall clock and the process id. The result
/// only has to differ from the burned-in address, not resist prediction.
#[must_use]
pub fn generate_random_mac() -> MacAddress {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seed = nanos ^ u64::from(std::process::id());
    MacAddress::random_with(&mut StdRng::seed_from_u64(seed))
}

/// Check the fixed `xx:xx:xx:xx:xx:xx` shape: 17 characters, colons at
/// positions 2, 5, 8, 11 and 14, hex digits (any case) everywhere else.
#[must_use]
pub fn is_valid_mac_syntax(s: &str) -> bool {
    s.len() == MAC_STRING_LEN
        && s.bytes().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                b == b':'
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_mac_syntax(s) {
            return Err(MacParseError(s.to_string()));
        }
        let mut bytes = [0u8; 6];
        for (byte, part) in bytes.iter_mut().zip(s.split(':')) {
            *byte = u8::from_str_radix(part, 16).map_err(|_| MacParseError(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}
