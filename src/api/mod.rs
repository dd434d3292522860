// Re-export the API module components
pub use self::{
    catalog::{
        certification_id, AccountLinking, Custom, IntentRequests, InteractionModel,
        SkillCertification, SkillEnablement, SkillTesting, Skills, Tokens, Vendors,
    },
    client::{create_client, Client},
    errors::ClientError,
    models::{RefreshRequest, TokenResponse, WithdrawReason},
    polling::{poll_until_terminal, retry_on_rate_limit, wait_for_success},
    response::{OperationResult, RawResponse, ResourceHeaders},
    routes::{Args, BoundRequest, Operation, Payload, Route, Slot},
    transport::{ApiRequest, Credential, RequestBody, Transport},
    types::{PollOutcome, PollState, PollTarget},
};

// Module declarations
mod catalog;
mod client;
mod errors;
mod models;
mod polling;
mod response;
mod routes;
mod transport;
mod types;
