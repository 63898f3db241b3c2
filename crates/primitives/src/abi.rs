//! Thin helpers over the ethers ABI codec, driven by Solidity type strings

use ethers::{
    abi::{self, param_type::Reader, ParamType, Token},
    types::Bytes,
};
use thiserror::Error;

/// ABI encoding/decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Type string could not be parsed
    #[error("unknown abi type {ty}: {inner}")]
    UnknownType { ty: String, inner: String },

    /// Number of values does not match the number of types
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Value does not fit the type at the same position
    #[error("value at index {index} is not of type {expected}")]
    TypeMismatch { index: usize, expected: String },

    /// Data could not be decoded
    #[error("decode error: {inner}")]
    Decode { inner: String },

    #[error("invalid abi: {inner}")]
    InvalidAbi { inner: String },

    #[error("no abi known for contract {name}")]
    UnknownContract { name: String },

    /// Function is not part of the contract ABI
    #[error("unknown function {name}")]
    UnknownFunction { name: String },
}

/// Parses Solidity type strings (e.g. `address`, `uint256`, `bytes32[]`)
///
/// The ethers reader reads any identifier it does not know as `uint8` and takes any width, so the
/// parsed type is written back out, compared with the input and its widths are checked.
pub fn parse_types(types: &[&str]) -> Result<Vec<ParamType>, AbiError> {
    types.iter().map(|ty| parse_type(ty)).collect()
}

fn parse_type(ty: &str) -> Result<ParamType, AbiError> {
    let canonical = canonical_type(ty);
    let param_type = Reader::read(&canonical)
        .map_err(|e| AbiError::UnknownType { ty: ty.to_string(), inner: e.to_string() })?;
    if param_type.to_string() != canonical || !valid_widths(&param_type) {
        return Err(AbiError::UnknownType {
            ty: ty.to_string(),
            inner: format!("not a solidity type (read as {param_type})"),
        });
    }
    Ok(param_type)
}

fn valid_widths(param_type: &ParamType) -> bool {
    match param_type {
        ParamType::Uint(bits) | ParamType::Int(bits) => (8..=256).contains(bits) && bits % 8 == 0,
        ParamType::FixedBytes(len) => (1..=32).contains(len),
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => valid_widths(inner),
        ParamType::Tuple(inner) => inner.iter().all(valid_widths),
        ParamType::Address | ParamType::Bytes | ParamType::Bool | ParamType::String => true,
    }
}

/// Strips whitespace and expands the `uint`/`int` aliases
fn canonical_type(ty: &str) -> String {
    fn push_word(out: &mut String, word: &str) {
        out.push_str(match word {
            "uint" => "uint256",
            "int" => "int256",
            w => w,
        });
    }

    let mut out = String::with_capacity(ty.len());
    let mut word = String::new();
    for c in ty.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_alphanumeric() {
            word.push(c);
        } else {
            push_word(&mut out, &word);
            word.clear();
            out.push(c);
        }
    }
    push_word(&mut out, &word);
    out
}

/// Encodes values as the ABI tuple described by `types`
pub fn encode_abi(types: &[&str], values: &[Token]) -> Result<Bytes, AbiError> {
    let param_types = parse_types(types)?;
    if param_types.len() != values.len() {
        return Err(AbiError::ArityMismatch { expected: param_types.len(), actual: values.len() });
    }
    for (index, (value, ty)) in values.iter().zip(param_types.iter()).enumerate() {
        if !value.type_check(ty) {
            return Err(AbiError::TypeMismatch { index, expected: ty.to_string() });
        }
    }
    Ok(abi::encode(values).into())
}

/// Decodes the ABI tuple described by `types`
pub fn decode_abi(types: &[&str], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let param_types = parse_types(types)?;
    abi::decode(&param_types, data).map_err(|e| AbiError::Decode { inner: e.to_string() })
}
