//! Misc utils

use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};
use serde::{de, Deserialize, Deserializer};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Number as returned by bundlers: `0x` hex string, decimal string or plain JSON number
#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleU256 {
    Str(String),
    Num(u64),
}

impl FlexibleU256 {
    fn into_u256<E: de::Error>(self) -> Result<U256, E> {
        match self {
            FlexibleU256::Num(n) => Ok(U256::from(n)),
            FlexibleU256::Str(s) => {
                let s = s.trim();
                let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| format!("{e:?}")),
                    None => U256::from_dec_str(s).map_err(|e| format!("{e:?}")),
                };
                parsed.map_err(|e| E::custom(format!("invalid number {s:?}: {e}")))
            }
        }
    }
}

/// Deserializes U256 from hex string, decimal string or number
pub fn deserialize_u256_flexible<'de, D>(d: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    FlexibleU256::deserialize(d)?.into_u256()
}

/// Deserializes optional U256 from hex string, decimal string, number or null
pub fn deserialize_u256_flexible_opt<'de, D>(d: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FlexibleU256>::deserialize(d)?.map(FlexibleU256::into_u256).transpose()
}
