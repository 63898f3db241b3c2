use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, ProviderError};
use lazy_static::lazy_static;
use metrics::counter;
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashSet, fmt::Debug};
use tracing::trace;
use userop_primitives::constants::bundler::METHODS;

lazy_static! {
    /// Methods served by the bundler endpoint
    pub static ref BUNDLER_METHODS: HashSet<&'static str> = METHODS.into_iter().collect();
}

/// Transport a JSON-RPC request is sent to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Default,
    Bundler,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Default => "default",
            Route::Bundler => "bundler",
        }
    }
}

/// Decides where a request goes
///
/// Bundler methods go to the bundler transport if there is one, everything else (and bundler
/// methods without a bundler transport) goes to the default transport.
pub fn route(method: &str, has_bundler: bool) -> Route {
    if has_bundler && BUNDLER_METHODS.contains(method) {
        Route::Bundler
    } else {
        Route::Default
    }
}

/// JSON-RPC client with two transports: the execution client and (optionally) a bundler
#[derive(Clone, Debug)]
pub struct BundlerProvider<P = Http> {
    default: P,
    bundler: Option<P>,
}

impl<P> BundlerProvider<P>
where
    P: JsonRpcClient,
{
    pub fn new(default: P) -> Self {
        Self { default, bundler: None }
    }

    pub fn with_bundler(default: P, bundler: P) -> Self {
        Self { default, bundler: Some(bundler) }
    }

    pub fn has_bundler(&self) -> bool {
        self.bundler.is_some()
    }
}

impl BundlerProvider<Http> {
    /// Creates provider with a single HTTP transport
    pub fn try_from_url(url: &str) -> Result<Self, ProviderError> {
        Ok(Self::new(parse_http(url)?))
    }

    /// Sends the bundler methods to a separate HTTP endpoint
    ///
    /// An empty URL leaves the provider untouched.
    pub fn set_bundler_rpc(&mut self, url: &str) -> Result<(), ProviderError> {
        if url.is_empty() {
            return Ok(());
        }
        self.bundler = Some(parse_http(url)?);
        Ok(())
    }
}

fn parse_http(url: &str) -> Result<Http, ProviderError> {
    url.parse::<Http>()
        .map_err(|e| ProviderError::CustomError(format!("invalid rpc url {url}: {e}")))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P> JsonRpcClient for BundlerProvider<P>
where
    P: JsonRpcClient,
{
    type Error = P::Error;

    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, Self::Error>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let route = route(method, self.has_bundler());
        trace!(method, route = route.as_str(), "Sending JSON-RPC request");
        counter!("userop_provider_requests_total", "route" => route.as_str()).increment(1);

        match (route, &self.bundler) {
            (Route::Bundler, Some(bundler)) => bundler.request(method, params).await,
            _ => self.default.request(method, params).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{providers::MockProvider, types::U64};
    use serde_json::Value;

    #[test]
    fn route_methods() {
        for method in METHODS {
            assert_eq!(route(method, true), Route::Bundler);
            assert_eq!(route(method, false), Route::Default);
        }
        for method in ["eth_chainId", "eth_getLogs", "eth_call", "pm_sponsorUserOperation", ""] {
            assert_eq!(route(method, true), Route::Default);
        }
    }

    #[tokio::test]
    async fn bundler_methods_go_to_bundler() {
        let default = MockProvider::new();
        let bundler = MockProvider::new();
        let provider = BundlerProvider::with_bundler(default.clone(), bundler.clone());

        for method in METHODS {
            bundler.push::<Value, _>(Value::Null).unwrap();
            let res: Value = provider.request(method, ()).await.unwrap();
            assert_eq!(res, Value::Null);
            bundler.assert_request(method, ()).unwrap();
        }

        default.push::<U64, _>(U64::from(1)).unwrap();
        let chain_id: U64 = provider.request("eth_chainId", ()).await.unwrap();
        assert_eq!(chain_id, U64::from(1));
        default.assert_request("eth_chainId", ()).unwrap();

        // nothing else reached either transport
        assert!(default.assert_request("eth_chainId", ()).is_err());
        assert!(bundler.assert_request("eth_chainId", ()).is_err());
    }

    #[tokio::test]
    async fn single_transport() {
        let default = MockProvider::new();
        let provider = BundlerProvider::new(default.clone());
        assert!(!provider.has_bundler());

        default.push::<Value, _>(Value::Array(vec![])).unwrap();
        let _: Value = provider.request("eth_supportedEntryPoints", ()).await.unwrap();
        default.assert_request("eth_supportedEntryPoints", ()).unwrap();
    }

    #[test]
    fn set_bundler_rpc() {
        let mut provider = BundlerProvider::try_from_url("http://localhost:8545").unwrap();
        provider.set_bundler_rpc("").unwrap();
        assert!(!provider.has_bundler());

        assert!(provider.set_bundler_rpc("not a url").is_err());
        assert!(!provider.has_bundler());

        provider.set_bundler_rpc("http://localhost:3000").unwrap();
        assert!(provider.has_bundler());

        assert!(BundlerProvider::try_from_url("").is_err());
    }
}
