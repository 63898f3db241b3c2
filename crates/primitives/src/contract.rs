//! Contract ABIs and function call encoding

use crate::abi::AbiError;
use ethers::{
    abi::{parse_abi, Abi, Token},
    types::Bytes,
};

/// Contracts whose ABI is known by name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownContract {
    EntryPoint,
    Erc20,
}

impl KnownContract {
    /// Looks the contract up by name, case-insensitively
    pub fn from_name(name: &str) -> Result<Self, AbiError> {
        match name.to_ascii_lowercase().as_str() {
            "entrypoint" => Ok(Self::EntryPoint),
            "erc20" => Ok(Self::Erc20),
            _ => Err(AbiError::UnknownContract { name: name.into() }),
        }
    }

    fn signatures(&self) -> &'static [&'static str] {
        match self {
            Self::EntryPoint => &[
                "function getNonce(address sender, uint192 key) view returns (uint256 nonce)",
                "function balanceOf(address account) view returns (uint256)",
            ],
            Self::Erc20 => &[
                "function name() view returns (string)",
                "function symbol() view returns (string)",
                "function decimals() view returns (uint8)",
                "function totalSupply() view returns (uint256)",
                "function balanceOf(address owner) view returns (uint256 balance)",
                "function allowance(address owner, address spender) view returns (uint256)",
                "function approve(address spender, uint256 value) returns (bool)",
                "function transfer(address to, uint256 value) returns (bool)",
                "function transferFrom(address from, address to, uint256 value) returns (bool)",
                "event Transfer(address indexed from, address indexed to, uint256 value)",
                "event Approval(address indexed owner, address indexed spender, uint256 value)",
            ],
        }
    }

    /// Parsed ABI of the contract
    pub fn abi(&self) -> Result<Abi, AbiError> {
        parse_abi(self.signatures()).map_err(|e| AbiError::InvalidAbi { inner: e.to_string() })
    }
}

/// Parses a JSON ABI (as emitted by solc)
pub fn parse_abi_json(json: &str) -> Result<Abi, AbiError> {
    Abi::load(json.as_bytes()).map_err(|e| AbiError::InvalidAbi { inner: e.to_string() })
}

/// Call data of `function` with `args`, the 4-byte selector followed by the encoded arguments
pub fn encode_function_call(abi: &Abi, function: &str, args: &[Token]) -> Result<Bytes, AbiError> {
    let f = abi
        .function(function)
        .map_err(|_| AbiError::UnknownFunction { name: function.into() })?;
    if f.inputs.len() != args.len() {
        return Err(AbiError::ArityMismatch { expected: f.inputs.len(), actual: args.len() });
    }
    if let Some((index, param)) =
        f.inputs.iter().zip(args).enumerate().find_map(|(i, (param, arg))| {
            (!arg.type_check(&param.kind)).then_some((i, param))
        })
    {
        return Err(AbiError::TypeMismatch { index, expected: param.kind.to_string() });
    }

    f.encode_input(args)
        .map(Into::into)
        .map_err(|e| AbiError::InvalidAbi { inner: e.to_string() })
}

/// Decodes the data returned by a call of `function`
pub fn decode_function_output(
    abi: &Abi,
    function: &str,
    data: &[u8],
) -> Result<Vec<Token>, AbiError> {
    abi.function(function)
        .map_err(|_| AbiError::UnknownFunction { name: function.into() })?
        .decode_output(data)
        .map_err(|e| AbiError::Decode { inner: e.to_string() })
}
