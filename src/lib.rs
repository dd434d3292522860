//! # smapi
//!
//! A Rust client for the versioned Skill Management API, used to manage the
//! lifecycle of voice-assistant skills.
//!
//! ## Features
//!
//! - **Two API versions**: one logical operation set, routed to the legacy
//!   (`v0`) or current (`v1`) REST shapes from a single route table
//! - **Uniform results**: headers-only, body-only and merged responses
//!   normalized into [`api::OperationResult`]; every non-2xx response becomes
//!   an [`errors::OperationError`]
//! - **Completion polling**: wait for skill and model builds or
//!   certifications, back off on rate limits, and sit out slow withdrawals,
//!   each under its own [`config::RetryPolicy`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use smapi::api::{create_client, PollOutcome};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = create_client(Some("v1"), None)?;
//! client.set_access_token("Atza|...")?;
//!
//! let created = client
//!     .skills()
//!     .create("M1ABCDEF", json!({ "publishingInformation": {} }))
//!     .await?;
//! let skill_id = created.get("skillId").unwrap();
//!
//! if let PollOutcome::Ready(status) = client.wait_for_skill(skill_id.as_str().unwrap()).await? {
//!     println!("Built: {status}");
//! }
//! # Ok(())
//! # }
//! ```

/// Client, operation catalog, dispatcher and pollers
pub mod api;

/// Client configuration and retry policies
pub mod config;

/// Error value shared by every remote operation
pub mod errors;

/// API version and region tables
pub mod version;

pub use api::{create_client, Client, ClientError};
pub use config::{ClientConfig, RetryPolicy, RetrySettings};
pub use errors::OperationError;
pub use version::{ApiVersion, Region};
