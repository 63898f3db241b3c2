use async_trait::async_trait;
use ethers::types::{Address, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc, server::ServerBuilder};
use std::net::SocketAddr;
use userop_primitives::{UserOperation, UserOperationHash};

#[rpc(server, namespace = "eth")]
pub trait DummyEthApi {
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;
}

pub struct DummyEthApiServerImpl {
    pub chain_id: U64,
}

#[async_trait]
impl DummyEthApiServer for DummyEthApiServerImpl {
    async fn chain_id(&self) -> RpcResult<U64> {
        Ok(self.chain_id)
    }
}

#[rpc(server, namespace = "eth")]
pub trait DummyBundlerApi {
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        uo: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;
}

pub struct DummyBundlerApiServerImpl {
    pub chain_id: U64,
    pub entry_points: Vec<Address>,
}

#[async_trait]
impl DummyBundlerApiServer for DummyBundlerApiServerImpl {
    async fn send_user_operation(
        &self,
        uo: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        Ok(uo.hash(&entry_point, &self.chain_id.as_u64().into()))
    }

    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>> {
        Ok(self.entry_points.clone())
    }
}

/// Starts the dummy execution client on a random local port
pub async fn start_eth_server(chain_id: U64) -> eyre::Result<SocketAddr> {
    let server = ServerBuilder::new().build("127.0.0.1:0").await?;
    let addr = server.local_addr()?;
    let handle = server.start(DummyEthApiServerImpl { chain_id }.into_rpc());
    tokio::spawn(handle.stopped());
    Ok(addr)
}

/// Starts the dummy bundler on a random local port
pub async fn start_bundler_server(
    chain_id: U64,
    entry_points: Vec<Address>,
) -> eyre::Result<SocketAddr> {
    let server = ServerBuilder::new().build("127.0.0.1:0").await?;
    let addr = server.local_addr()?;
    let handle = server.start(DummyBundlerApiServerImpl { chain_id, entry_points }.into_rpc());
    tokio::spawn(handle.stopped());
    Ok(addr)
}
