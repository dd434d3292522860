use std::path::PathBuf;
use url::Url;

#[derive(clap::Parser)]
#[command(name = "smapi")]
#[command(version)]
#[command(about = "Manage voice-assistant skills through the Skill Management API")]
#[command(long_about = "
A command-line client for the Skill Management API.

Talks to either API version (v0 legacy, v1 current) in any of the three
regions, and can wait for skill and interaction model builds to finish.

Examples:
  # List vendors of the current token
  smapi --token $TOKEN vendors

  # Wait for a skill build using the legacy API in Europe
  smapi --api-version v0 --region EU skill status --skill-id amzn1.ask.skill.x --wait

  # Anything the catalog does not cover
  smapi custom get /v1/skills/amzn1.ask.skill.x/stages/development/manifest
")]
pub struct Args {
    /// API version to speak (v0, v1); unknown values mean the newest
    #[arg(long = "api-version", global = true, env = "SMAPI_API_VERSION")]
    pub api_version: Option<String>,

    /// Region code (NA, EU, FE); unknown values mean NA
    #[arg(long, global = true, env = "SMAPI_REGION")]
    pub region: Option<String>,

    /// Override the region's base URL
    #[arg(long, global = true, value_hint = clap::ValueHint::Url, value_parser = Url::parse)]
    pub url: Option<Url>,

    /// TOML profile; command-line values take precedence
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args)]
pub struct AuthArgs {
    /// Access token sent with every request
    #[arg(long, global = true, env = "SMAPI_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Refresh token; exchanged for an access token before the command runs
    #[arg(
        long,
        global = true,
        env = "SMAPI_REFRESH_TOKEN",
        hide_env_values = true,
        requires_all = ["client_id", "client_secret"]
    )]
    pub refresh_token: Option<String>,

    #[arg(long, global = true, env = "SMAPI_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, global = true, env = "SMAPI_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// List vendors the token has access to
    Vendors,

    /// Skill operations
    #[command(subcommand)]
    Skill(SkillCommand),

    /// Interaction model operations
    #[command(subcommand)]
    Model(ModelCommand),

    /// Send a raw request to a relative path
    Custom(CustomArgs),
}

#[derive(clap::Subcommand)]
pub enum SkillCommand {
    /// Show build status, optionally waiting until it is terminal
    Status {
        #[arg(long)]
        skill_id: String,

        /// Poll until the build succeeds or fails
        #[arg(long, default_value_t = false)]
        wait: bool,
    },

    /// Show the skill manifest
    Get {
        #[arg(long)]
        skill_id: String,

        /// Stage (ignored by v0)
        #[arg(long, default_value = "development")]
        stage: String,
    },

    /// Delete the skill
    Delete {
        #[arg(long)]
        skill_id: String,
    },
}

#[derive(clap::Subcommand)]
pub enum ModelCommand {
    /// Show interaction model build status
    Status {
        #[arg(long)]
        skill_id: String,

        #[arg(long, default_value = "en-US")]
        locale: String,

        /// Poll until the build succeeds or fails
        #[arg(long, default_value_t = false)]
        wait: bool,
    },
}

#[derive(clap::Args)]
pub struct CustomArgs {
    #[arg(value_enum)]
    pub verb: Verb,

    /// Path relative to the base URL, e.g. /v1/vendors
    pub path: String,

    /// JSON object: query for HEAD/GET/DELETE, body for POST/PUT
    #[arg(long, value_parser = parse_json)]
    pub params: Option<serde_json::Value>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Verb {
    Head,
    Get,
    Post,
    Put,
    Delete,
}

fn parse_json(raw: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {e}"))
}
