use clap::Parser;
use scripts::{cli::Cli, client::RpcClient, deployments::Deployments, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let mut client = RpcClient::connect(&cli.rpc_url, &cli.priv_keys()).await?;
    for account in &cli.impersonate {
        client.impersonate(*account).await?;
    }
    let deployments = Deployments::load(&cli.deployments_path)?;

    cli.command.run(client, deployments).await
}
