mod common;

use common::{start_bundler_server, start_eth_server};
use ethers::{
    providers::{Middleware, Provider},
    types::{Address, U64},
};
use userop_primitives::{constants::entry_point::ADDRESS, UserOperation};
use userop_provider::{BundlerApi, BundlerProvider};

#[tokio::test]
async fn bundler_methods_reach_bundler_endpoint() -> eyre::Result<()> {
    let chain_id = U64::from(0x7a69);
    let entry_point: Address = ADDRESS.parse()?;

    let eth_addr = start_eth_server(chain_id).await?;
    let bundler_addr = start_bundler_server(chain_id, vec![entry_point]).await?;

    let mut bundler_provider = BundlerProvider::try_from_url(&format!("http://{eth_addr}"))?;
    bundler_provider.set_bundler_rpc(&format!("http://{bundler_addr}"))?;
    let provider = Provider::new(bundler_provider);

    assert_eq!(provider.get_chainid().await?, chain_id.as_u64().into());
    assert_eq!(provider.supported_entry_points().await?, vec![entry_point]);

    let uo = UserOperation::random();
    let hash = provider.send_user_operation(&uo, &entry_point).await?;
    assert_eq!(hash, uo.hash(&entry_point, &chain_id.as_u64().into()));

    Ok(())
}

#[tokio::test]
async fn bundler_methods_without_bundler_endpoint() -> eyre::Result<()> {
    let chain_id = U64::from(0x7a69);
    let eth_addr = start_eth_server(chain_id).await?;

    let mut bundler_provider = BundlerProvider::try_from_url(&format!("http://{eth_addr}"))?;
    bundler_provider.set_bundler_rpc("")?;
    let provider = Provider::new(bundler_provider);

    assert_eq!(provider.get_chainid().await?, chain_id.as_u64().into());
    // the execution client does not serve the bundler methods
    assert!(provider.supported_entry_points().await.is_err());

    Ok(())
}
