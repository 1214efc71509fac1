use serde::{Deserialize, Serialize};
use tris_cv_core::{CellValue, Player};

/// Code of an empty cell. Fixed so it never changes a product.
pub const EMPTY_CODE: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("player code {code} must be greater than 1")]
    TooSmall { code: u32 },
    #[error("player codes must differ (both are {code})")]
    Identical { code: u32 },
    #[error("player codes {a} and {b} share the factor {gcd}")]
    NotCoprime { a: u32, b: u32, gcd: u32 },
    #[error("player code {code} is too large: its cube does not fit in 64 bits")]
    TooLarge { code: u32 },
}

/// Numeric cell codes used for line products.
///
/// Empty is always `1`; the two player codes are greater than one and
/// coprime, so a line product factors uniquely into its cell contents. The
/// cube of the larger code must fit in a `u64`, which bounds every product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEncoding", into = "RawEncoding")]
pub struct PlayerEncoding {
    a: u32,
    b: u32,
}

#[derive(Serialize, Deserialize)]
struct RawEncoding {
    player_a: u32,
    player_b: u32,
}

impl TryFrom<RawEncoding> for PlayerEncoding {
    type Error = EncodingError;

    fn try_from(raw: RawEncoding) -> Result<Self, Self::Error> {
        Self::new(raw.player_a, raw.player_b)
    }
}

impl From<PlayerEncoding> for RawEncoding {
    fn from(e: PlayerEncoding) -> Self {
        Self {
            player_a: e.a,
            player_b: e.b,
        }
    }
}

impl Default for PlayerEncoding {
    fn default() -> Self {
        Self { a: 2, b: 3 }
    }
}

impl PlayerEncoding {
    pub fn new(a: u32, b: u32) -> Result<Self, EncodingError> {
        for code in [a, b] {
            if code <= EMPTY_CODE {
                return Err(EncodingError::TooSmall { code });
            }
        }
        if a == b {
            return Err(EncodingError::Identical { code: a });
        }
        let g = gcd(a, b);
        if g != 1 {
            return Err(EncodingError::NotCoprime { a, b, gcd: g });
        }
        let largest = a.max(b);
        if u64::from(largest).checked_pow(3).is_none() {
            return Err(EncodingError::TooLarge { code: largest });
        }
        Ok(Self { a, b })
    }

    pub fn player_code(&self, player: Player) -> u32 {
        match player {
            Player::A => self.a,
            Player::B => self.b,
        }
    }

    pub fn code(&self, value: CellValue) -> u32 {
        match value {
            CellValue::Empty => EMPTY_CODE,
            CellValue::PlayerA => self.a,
            CellValue::PlayerB => self.b,
        }
    }

    /// Product of a line holding three of `player`'s marks.
    pub fn completed(&self, player: Player) -> u64 {
        u64::from(self.player_code(player)).pow(3)
    }

    /// Product of a line holding two of `player`'s marks and one empty cell.
    pub fn open_two(&self, player: Player) -> u64 {
        u64::from(self.player_code(player)).pow(2)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
