mod args;
use crate::args::{Args, Commands, CustomArgs, ModelCommand, SkillCommand, Verb};

use clap::Parser;
use reqwest::Method;
use serde_json::Value;
use smapi::{
    api::{Client, ClientError, OperationResult, PollOutcome, RefreshRequest},
    ApiVersion, ClientConfig,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] smapi::config::ConfigError),

    #[error("[E130] Build did not finish: {0}")]
    BuildFailed(Value),

    #[error("[E131] Build still pending after the configured attempts")]
    StillPending,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(run(args))?;
    if !output.is_null() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn config(args: &Args) -> Result<ClientConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    if args.api_version.is_some() {
        config.version = args.api_version.clone();
    }
    if args.region.is_some() {
        config.region = args.region.clone();
    }
    if let Some(url) = &args.url {
        config.base_url = Some(url.to_string());
    }
    if args.auth.token.is_some() {
        config.access_token = args.auth.token.clone();
    }
    Ok(config)
}

async fn run(args: Args) -> Result<Value, CliError> {
    let mut client = Client::new(config(&args)?)?;

    if let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
        &args.auth.refresh_token,
        &args.auth.client_id,
        &args.auth.client_secret,
    ) {
        client
            .tokens()
            .refresh(&RefreshRequest {
                refresh_token: refresh_token.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            })
            .await?;
    }

    let result = match args.command {
        Commands::Vendors => client.vendors().list().await?,
        Commands::Skill(SkillCommand::Status { skill_id, wait }) => {
            if wait {
                return settled(client.wait_for_skill(&skill_id).await?);
            }
            client.skills().status([skill_id]).await?
        }
        Commands::Skill(SkillCommand::Get { skill_id, stage }) => {
            let args = match client.version() {
                ApiVersion::Legacy => vec![skill_id],
                ApiVersion::Current => vec![skill_id, stage],
            };
            client.skills().get(args).await?
        }
        Commands::Skill(SkillCommand::Delete { skill_id }) => {
            client.skills().delete(&skill_id).await?
        }
        Commands::Model(ModelCommand::Status {
            skill_id,
            locale,
            wait,
        }) => {
            if wait {
                return settled(client.wait_for_model(&skill_id, &locale).await?);
            }
            match client.version() {
                ApiVersion::Legacy => client.interaction_model().status([skill_id, locale]).await?,
                ApiVersion::Current => client.interaction_model().status([skill_id]).await?,
            }
        }
        Commands::Custom(CustomArgs { verb, path, params }) => {
            let method = match verb {
                Verb::Head => Method::HEAD,
                Verb::Get => Method::GET,
                Verb::Post => Method::POST,
                Verb::Put => Method::PUT,
                Verb::Delete => Method::DELETE,
            };
            client.custom().send(method, &path, params).await?
        }
    };

    Ok(output(&result))
}

fn output(result: &OperationResult) -> Value {
    if result.is_empty() {
        Value::Null
    } else {
        result.to_value()
    }
}

fn settled(outcome: PollOutcome) -> Result<Value, CliError> {
    match outcome {
        PollOutcome::Ready(status) => Ok(status),
        PollOutcome::Failed(status) => Err(CliError::BuildFailed(status)),
        PollOutcome::Exhausted(_) => Err(CliError::StillPending),
    }
}
