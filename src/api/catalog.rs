//! Namespaced operation groups.
//!
//! Each group is a cheap handle borrowing the [`Client`]; methods take the
//! handle by value so the returned futures only borrow the client itself.
//! Path arguments are positional, as bound by [`Route::bind`]: under `v1`
//! most skill-scoped operations expect `[skillId, stage, ...]`, under `v0`
//! the same call without the stage.
//!
//! [`Route::bind`]: super::routes::Route::bind

use reqwest::Method;
use serde_json::{json, Map, Value};

use super::{
    client::Client,
    errors::ClientError,
    models::{RefreshRequest, TokenResponse, WithdrawReason},
    polling::wait_for_success,
    response::OperationResult,
    routes::{Args, Operation},
    transport::{ApiRequest, Credential},
};

macro_rules! group {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name<'a> {
            client: &'a Client,
        }

        impl<'a> $name<'a> {
            pub(crate) const fn new(client: &'a Client) -> Self {
                Self { client }
            }
        }
    };
}

/// Access token management.
pub struct Tokens<'a> {
    client: &'a mut Client,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Exchanges a refresh token for an access token and installs it as
    /// this client's credential. Returns the raw token payload.
    ///
    /// # Errors
    ///
    /// `Operation` when the token endpoint rejects the request, `Decode`
    /// when the payload carries no usable access token.
    pub async fn refresh(self, request: &RefreshRequest) -> Result<Value, ClientError> {
        let http = ApiRequest::new(Method::POST, self.client.token_url().as_str())
            .form(request.form());
        let result = self.client.execute_anonymous(&http).await?;

        let payload = result.body().cloned().unwrap_or(Value::Null);
        let token: TokenResponse = serde_json::from_value(payload.clone())?;
        *self.client.credential_mut() = Some(Credential::new(token.access_token)?);

        log::info!("Access token refreshed");
        Ok(payload)
    }

    /// # Errors
    ///
    /// `InvalidToken` when `token` cannot be used.
    pub fn set(self, token: impl Into<String>) -> Result<(), ClientError> {
        self.client.set_access_token(token)
    }
}

group!(Vendors);

impl<'a> Vendors<'a> {
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn list(self) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::VendorsList, Args::new(), None).await
    }
}

group!(Skills);

impl<'a> Skills<'a> {
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn list(
        self,
        vendor_id: &str,
        max_results: Option<u32>,
        next_token: Option<&str>,
    ) -> Result<OperationResult, ClientError> {
        let args = Args::new()
            .push(vendor_id)
            .push(max_results.map(|m| m.to_string()).unwrap_or_default())
            .push(next_token.unwrap_or_default());
        self.client.call(Operation::SkillsList, args, None).await
    }

    /// Result carries `skillId` and `location`.
    ///
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn create(self, vendor_id: &str, manifest: Value) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::SkillsCreate, Args::from([vendor_id]), Some(manifest))
            .await
    }

    /// `[skillId, stage]` (`[skillId]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn get(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::SkillsGet, args.into(), None).await
    }

    /// `[skillId, stage]` (`[skillId]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn update(
        self,
        args: impl Into<Args>,
        manifest: Value,
    ) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::SkillsUpdate, args.into(), Some(manifest))
            .await
    }

    /// `[skillId]`, plus an optional `resource` filter under `v1`.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn status(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::SkillsStatus, args.into(), None).await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn delete(self, skill_id: &str) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::SkillsDelete, Args::from([skill_id]), None)
            .await
    }
}

group!(InteractionModel);

impl<'a> InteractionModel<'a> {
    /// `[skillId, stage, locale]` (`[skillId, locale]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn get(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::InteractionModelGet, args.into(), None).await
    }

    /// Same arguments as [`InteractionModel::get`]; returns only the etag.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn head(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::InteractionModelHead, args.into(), None).await
    }

    /// `[skillId, stage, locale]` (`[skillId, locale]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn update(
        self,
        args: impl Into<Args>,
        interaction_model: Value,
    ) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::InteractionModelUpdate, args.into(), Some(interaction_model))
            .await
    }

    /// `[skillId]` under `v1`, `[skillId, locale]` under `v0`.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn status(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::InteractionModelStatus, args.into(), None).await
    }
}

group!(AccountLinking);

impl<'a> AccountLinking<'a> {
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn get(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::AccountLinkingGet, args.into(), None).await
    }

    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn update(
        self,
        args: impl Into<Args>,
        account_linking_info: Value,
    ) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::AccountLinkingUpdate, args.into(), Some(account_linking_info))
            .await
    }

    /// Current version only.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn delete(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::AccountLinkingDelete, args.into(), None).await
    }
}

group!(
    /// Current version only.
    SkillEnablement
);

impl<'a> SkillEnablement<'a> {
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn enable(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::EnablementEnable, args.into(), None).await
    }

    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn status(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::EnablementStatus, args.into(), None).await
    }

    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn disable(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::EnablementDisable, args.into(), None).await
    }
}

group!(SkillCertification);

impl<'a> SkillCertification<'a> {
    /// Under `v1` the result's location points at the new certification,
    /// see [`certification_id`]. The legacy location is not usable.
    ///
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn submit(self, skill_id: &str) -> Result<OperationResult, ClientError> {
        self.client
            .call(Operation::CertificationSubmit, Args::from([skill_id]), None)
            .await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn withdraw(
        self,
        skill_id: &str,
        reason: WithdrawReason,
        message: &str,
    ) -> Result<OperationResult, ClientError> {
        self.client
            .call(
                Operation::CertificationWithdraw,
                Args::from([skill_id, reason.as_str(), message]),
                None,
            )
            .await
    }

    /// Withdraws, retrying under the long-wait policy until the service
    /// accepts. A skill is only withdrawable some time after submission.
    ///
    /// # Errors
    ///
    /// The last failure once the long-wait budget is spent.
    pub async fn withdraw_and_wait(
        self,
        skill_id: &str,
        reason: WithdrawReason,
        message: &str,
    ) -> Result<OperationResult, ClientError> {
        wait_for_success(&self.client.retry_settings().long_wait, || {
            self.withdraw(skill_id, reason, message)
        })
        .await
    }

    /// Current version only.
    ///
    /// # Errors
    ///
    /// `Unsupported` under `v0`, otherwise transport or HTTP failure.
    pub async fn status(
        self,
        skill_id: &str,
        certification_id: &str,
    ) -> Result<OperationResult, ClientError> {
        self.client
            .call(
                Operation::CertificationStatus,
                Args::from([skill_id, certification_id]),
                None,
            )
            .await
    }
}

/// Last path segment of a submission's location header.
pub fn certification_id(result: &OperationResult) -> Option<&str> {
    result
        .location()?
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

group!(SkillTesting);

impl<'a> SkillTesting<'a> {
    /// `[skillId, stage]` (`[skillId]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn invoke(
        self,
        args: impl Into<Args>,
        endpoint_region: &str,
        skill_request: Value,
    ) -> Result<OperationResult, ClientError> {
        let body = json!({ "endpointRegion": endpoint_region, "skillRequest": skill_request });
        self.client.call(Operation::TestingInvoke, args.into(), Some(body)).await
    }

    /// `[skillId, stage]` (`[skillId]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn simulate(
        self,
        args: impl Into<Args>,
        content: &str,
        locale: &str,
    ) -> Result<OperationResult, ClientError> {
        let body = json!({ "input": { "content": content }, "device": { "locale": locale } });
        self.client.call(Operation::TestingSimulate, args.into(), Some(body)).await
    }

    /// `[skillId, stage, simulationId]` (`[skillId, simulationId]` under `v0`).
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn simulation(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::TestingSimulation, args.into(), None).await
    }

    /// `[skillId, stage]`; current version only.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn validate(
        self,
        args: impl Into<Args>,
        locales: &[&str],
    ) -> Result<OperationResult, ClientError> {
        let body = json!({ "locales": locales });
        self.client.call(Operation::TestingValidate, args.into(), Some(body)).await
    }

    /// `[skillId, stage, validationId]`; current version only.
    ///
    /// # Errors
    ///
    /// Dispatch, transport or HTTP failure.
    pub async fn validation(self, args: impl Into<Args>) -> Result<OperationResult, ClientError> {
        self.client.call(Operation::TestingValidation, args.into(), None).await
    }
}

group!(
    /// Current version only.
    IntentRequests
);

impl<'a> IntentRequests<'a> {
    /// `params` must hold `skillId`; it is taken out for the path and
    /// every other field is forwarded as a query parameter.
    ///
    /// # Errors
    ///
    /// `MissingArgument` without `skillId`, otherwise dispatch, transport
    /// or HTTP failure.
    pub async fn list(self, params: Value) -> Result<OperationResult, ClientError> {
        let operation = Operation::IntentRequestsList;
        let mut params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let skill_id = params
            .remove("skillId")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(ClientError::MissingArgument {
                operation: operation.name(),
                slot: "skillId",
            })?;

        let bound = operation.resolve(self.client.version(), &Args::from([skill_id]), None)?;
        let request = ApiRequest::new(bound.method, bound.path).query(query_pairs(&params));
        self.client.execute(&request).await
    }
}

group!(
    /// Raw access to paths the catalog does not cover.
    Custom
);

impl<'a> Custom<'a> {
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn head(self, path: &str, params: Option<Value>) -> Result<OperationResult, ClientError> {
        self.send(Method::HEAD, path, params).await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn get(self, path: &str, params: Option<Value>) -> Result<OperationResult, ClientError> {
        self.send(Method::GET, path, params).await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn post(self, path: &str, params: Option<Value>) -> Result<OperationResult, ClientError> {
        self.send(Method::POST, path, params).await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn put(self, path: &str, params: Option<Value>) -> Result<OperationResult, ClientError> {
        self.send(Method::PUT, path, params).await
    }

    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn delete(self, path: &str, params: Option<Value>) -> Result<OperationResult, ClientError> {
        self.send(Method::DELETE, path, params).await
    }

    /// Bodyless verbs carry `params` as query, the others as JSON body.
    ///
    /// # Errors
    ///
    /// Any transport or HTTP failure.
    pub async fn send(
        self,
        method: Method,
        path: &str,
        params: Option<Value>,
    ) -> Result<OperationResult, ClientError> {
        let request = ApiRequest::new(method.clone(), path);
        let request = match method {
            Method::POST | Method::PUT => request.json(params),
            _ => match params {
                Some(Value::Object(map)) => request.query(query_pairs(&map)),
                _ => request,
            },
        };
        self.client.execute(&request).await
    }
}

fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}
