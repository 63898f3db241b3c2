use ethers::{
    abi::{encode, Token},
    providers::Provider,
    signers::{LocalWallet, Signer},
    types::{Address, Block, Bytes, Signature, H256, U256},
};
use serde_json::{json, Value};
use std::sync::Arc;
use userop_builder::{
    presets::{GasEstimateMiddleware, GasPriceMiddleware, NonceMiddleware, SignatureMiddleware},
    UserOperationBuilder,
};

#[tokio::test]
async fn build_with_preset_stack() -> eyre::Result<()> {
    let wallet: LocalWallet =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318".parse()?;
    let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse()?;
    let chain_id = U256::from(80_001);

    let (provider, mock) = Provider::mocked();
    let provider = Arc::new(provider);

    // requests in order: eth_call (nonce), eth_getBlockByNumber, eth_maxPriorityFeePerGas,
    // eth_estimateUserOperationGas; responses are popped from the back
    mock.push::<Value, _>(json!({
        "preVerificationGas": "0xb000",
        "verificationGasLimit": "0x186a0",
        "callGasLimit": "0x7530"
    }))?;
    mock.push::<U256, _>(U256::from(1_000_000_000))?;
    mock.push::<Block<H256>, _>(Block {
        base_fee_per_gas: Some(U256::from(2_000_000_000)),
        ..Default::default()
    })?;
    mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(3.into())])))?;

    let mut builder = UserOperationBuilder::new();
    builder
        .set_sender(wallet.address())
        .set_call_data("0xb61d27f6".parse()?)
        .use_middleware(NonceMiddleware::new(provider.clone()))
        .use_middleware(GasPriceMiddleware::new(provider.clone()))
        .use_middleware(GasEstimateMiddleware::new(provider.clone()))
        .use_middleware(SignatureMiddleware::new(wallet.clone()));

    let uo = builder.build(entry_point, chain_id).await?;

    assert_eq!(uo.sender, wallet.address());
    assert_eq!(uo.nonce, U256::from(3));
    assert_eq!(uo.max_fee_per_gas, U256::from(5_000_000_000_u64));
    assert_eq!(uo.max_priority_fee_per_gas, U256::from(1_000_000_000));
    assert_eq!(uo.pre_verification_gas, U256::from(45_056));
    assert_eq!(uo.verification_gas_limit, U256::from(100_000));
    assert_eq!(uo.call_gas_limit, U256::from(30_000));

    let hash = uo.hash(&entry_point, &chain_id);
    let sig = Signature::try_from(uo.signature.as_ref())?;
    assert_eq!(sig.recover(&hash.as_fixed_bytes()[..])?, wallet.address());

    Ok(())
}

#[tokio::test]
async fn preset_stack_keeps_explicit_fields() -> eyre::Result<()> {
    let wallet: LocalWallet =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318".parse()?;
    let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse()?;

    let (provider, mock) = Provider::mocked();
    let provider = Arc::new(provider);

    // no eth_call, the nonce is explicit
    mock.push::<Value, _>(json!({
        "preVerificationGas": "0xb000",
        "verificationGasLimit": "0x186a0",
        "callGasLimit": "0x7530"
    }))?;
    mock.push::<U256, _>(U256::from(1))?;
    mock.push::<Block<H256>, _>(Block {
        base_fee_per_gas: Some(10.into()),
        ..Default::default()
    })?;

    let signature: Bytes = vec![0xab_u8; 65].into();
    let mut builder = UserOperationBuilder::new();
    builder
        .set_sender(wallet.address())
        .set_nonce(5.into())
        .set_max_fee_per_gas(999.into())
        .set_call_gas_limit(1_000_000.into())
        .set_signature(signature.clone())
        .use_middleware(NonceMiddleware::new(provider.clone()))
        .use_middleware(GasPriceMiddleware::new(provider.clone()))
        .use_middleware(GasEstimateMiddleware::new(provider.clone()))
        .use_middleware(SignatureMiddleware::new(wallet));

    let uo = builder.build(entry_point, 80_001.into()).await?;

    assert_eq!(uo.nonce, U256::from(5));
    assert_eq!(uo.max_fee_per_gas, U256::from(999));
    assert_eq!(uo.max_priority_fee_per_gas, U256::from(1));
    assert_eq!(uo.call_gas_limit, U256::from(1_000_000));
    assert_eq!(uo.pre_verification_gas, U256::from(45_056));
    assert_eq!(uo.verification_gas_limit, U256::from(100_000));
    assert_eq!(uo.signature, signature);

    Ok(())
}
