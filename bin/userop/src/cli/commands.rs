use crate::{
    cli::args::{ClientArgs, MiddlewareArgs, UserOperationArgs, WaitArgs},
    utils::parse_user_operation_hash,
};
use clap::Parser;
use ethers::{
    providers::{Http, Provider},
    signers::LocalWallet,
};
use std::sync::Arc;
use tracing::{debug, info};
use userop_builder::{
    presets::{
        GasEstimateMiddleware, GasPriceMiddleware, NonceMiddleware, SignatureMiddleware,
        VerifyingPaymasterMiddleware,
    },
    UserOperationBuilder,
};
use userop_client::{Client, SendUserOperationOptions};
use userop_primitives::UserOperationHash;

async fn connect(client: &ClientArgs, wait: &WaitArgs) -> eyre::Result<Client> {
    info!("Connecting to {}", client.rpc_url);
    Ok(Client::connect(&client.rpc_url, client.client_options(wait.wait_options())).await?)
}

/// Assembles the builder: explicit fields first, then the middleware filling in the rest
///
/// The middleware leave the explicit fields alone, except for the gas limits a paymaster signs
/// over, which is why those cannot be combined with `--paymaster-rpc`.
fn builder(
    client: &Client,
    uo: &UserOperationArgs,
    args: &MiddlewareArgs,
) -> eyre::Result<UserOperationBuilder> {
    let mut builder = UserOperationBuilder::new();
    builder.set_partial(uo.to_partial());

    let provider = client.provider().clone();
    builder.use_middleware(NonceMiddleware::with_key(provider.clone(), args.nonce_key));
    builder.use_middleware(GasPriceMiddleware::new(provider.clone()));
    match args.paymaster_rpc.as_deref() {
        Some(url) => {
            let flags = uo.gas_limit_flags();
            if !flags.is_empty() {
                eyre::bail!("{} cannot be used with --paymaster-rpc", flags.join(", "));
            }
            let paymaster = Arc::new(Provider::<Http>::try_from(url)?);
            builder.use_middleware(VerifyingPaymasterMiddleware::new(
                paymaster,
                args.paymaster_context.clone(),
            ));
        }
        None if !args.skip_gas_estimation => {
            builder.use_middleware(GasEstimateMiddleware::new(provider));
        }
        None => {}
    }
    if let Some(key) = args.private_key.as_deref() {
        let wallet: LocalWallet = key.parse()?;
        builder.use_middleware(SignatureMiddleware::new(wallet));
    }

    debug!("Build pipeline: {:?}", builder.middleware_names());
    Ok(builder)
}

/// Build the user operation without sending it
#[derive(Debug, Parser)]
pub struct BuildCommand {
    #[clap(flatten)]
    pub client: ClientArgs,

    #[clap(flatten)]
    pub uo: UserOperationArgs,

    #[clap(flatten)]
    pub middleware: MiddlewareArgs,
}

impl BuildCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let client = connect(&self.client, &WaitArgs::default()).await?;
        let mut builder = builder(&client, &self.uo, &self.middleware)?;

        let uo = client.build_user_operation(&mut builder).await?;
        println!("{}", serde_json::to_string_pretty(&uo)?);
        println!("User operation hash: {}", uo.hash(&client.entry_point(), &client.chain_id()));

        Ok(())
    }
}

/// Build the user operation and send it to the bundler
#[derive(Debug, Parser)]
pub struct SendCommand {
    #[clap(flatten)]
    pub client: ClientArgs,

    #[clap(flatten)]
    pub uo: UserOperationArgs,

    #[clap(flatten)]
    pub middleware: MiddlewareArgs,

    #[clap(flatten)]
    pub wait: WaitArgs,

    /// Build the user operation without submitting it
    #[clap(long)]
    pub dry_run: bool,

    /// Wait for the receipt of the submitted user operation
    #[clap(long, conflicts_with = "dry_run")]
    pub wait_receipt: bool,
}

impl SendCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let client = connect(&self.client, &self.wait).await?;
        let mut builder = builder(&client, &self.uo, &self.middleware)?;

        let opts = SendUserOperationOptions::default()
            .dry_run(self.dry_run)
            .on_build(|uo| debug!("Built user operation: {uo:?}"));
        let res = client.send_user_operation(&mut builder, opts).await?;
        println!("User operation hash: {}", res.user_operation_hash);

        if self.wait_receipt {
            info!("Waiting for the receipt of user operation {}", res.user_operation_hash);
            let receipt = res.wait().await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }

        Ok(())
    }
}

/// Look up a user operation by its hash
#[derive(Debug, Parser)]
pub struct ReceiptCommand {
    #[clap(flatten)]
    pub client: ClientArgs,

    /// User operation hash
    #[clap(value_parser = parse_user_operation_hash)]
    pub hash: UserOperationHash,

    /// Also look up the user operation event in the entry point logs
    #[clap(long)]
    pub event: bool,
}

impl ReceiptCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let client = connect(&self.client, &WaitArgs::default()).await?;

        match client.get_user_operation_receipt(&self.hash).await? {
            Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
            None => match client.get_user_operation_by_hash(&self.hash).await? {
                Some(uo) => println!("Pending: {}", serde_json::to_string_pretty(&uo)?),
                None => println!("User operation {} not found", self.hash),
            },
        }

        if self.event {
            match client.get_user_operation_event(&self.hash).await? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("No event for user operation {}", self.hash),
            }
        }

        Ok(())
    }
}

/// List the entry points supported by the bundler
#[derive(Debug, Parser)]
pub struct EntryPointsCommand {
    #[clap(flatten)]
    pub client: ClientArgs,
}

impl EntryPointsCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let client = connect(&self.client, &WaitArgs::default()).await?;
        for entry_point in client.supported_entry_points().await? {
            println!("{entry_point:?}");
        }

        Ok(())
    }
}
