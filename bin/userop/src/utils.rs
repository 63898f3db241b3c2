use ethers::types::{Address, Bytes, U256};
use pin_utils::pin_mut;
use serde_json::Value;
use std::{future::Future, str::FromStr};
use tracing::info;
use userop_primitives::UserOperationHash;

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from decimal or `0x`-prefixed hexadecimal string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    }
    .map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses hex-encoded bytes from string
pub fn parse_bytes(s: &str) -> Result<Bytes, String> {
    Bytes::from_str(s).map_err(|_| format!("String {s} is not valid hex bytes"))
}

/// Parses user operation hash from string
pub fn parse_user_operation_hash(s: &str) -> Result<UserOperationHash, String> {
    UserOperationHash::from_str(s)
        .map_err(|_| format!("String {s} is not a valid user operation hash"))
}

/// Parses JSON value from string
pub fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("String {s} is not valid JSON: {e}"))
}

pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.strip_prefix("0x").unwrap_or(hex_string);

    if key.len() != 64 {
        return Err(format!("{hex_string} is not a valid private key"));
    }
    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{hex_string} is not a valid hexadecimal string"));
    }

    Ok(String::from(key))
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_decimal_and_hex() {
        assert_eq!(parse_u256("1000").unwrap(), U256::from(1000));
        assert_eq!(parse_u256("0x3e8").unwrap(), U256::from(1000));
        assert!(parse_u256("0xzz").is_err());
        assert!(parse_u256("-1").is_err());
    }

    #[test]
    fn address_and_bytes() {
        assert_eq!(
            parse_address("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789").unwrap(),
            "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse::<Address>().unwrap()
        );
        assert!(parse_address("0x1234").is_err());
        assert_eq!(parse_bytes("0xdeadbeef").unwrap().to_vec(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(parse_bytes("0xabc").is_err());
    }

    #[test]
    fn private_key() {
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        assert_eq!(validate_private_key(key).unwrap(), key);
        assert_eq!(validate_private_key(&format!("0x{key}")).unwrap(), key);
        assert!(validate_private_key(&key[1..]).is_err());
        assert!(validate_private_key(&key.replace('a', "g")).is_err());
    }

    #[test]
    fn json() {
        assert_eq!(parse_json(r#"{"type":"payg"}"#).unwrap()["type"], "payg");
        assert!(parse_json("{").is_err());
    }
}
