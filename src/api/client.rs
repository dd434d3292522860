use serde_json::Value;
use url::Url;

use super::{
    catalog::{
        AccountLinking, Custom, IntentRequests, InteractionModel, SkillCertification,
        SkillEnablement, SkillTesting, Skills, Tokens, Vendors,
    },
    errors::ClientError,
    polling::{poll_until_terminal, retry_on_rate_limit},
    response::OperationResult,
    routes::{Args, Operation},
    transport::{ApiRequest, Credential, Transport},
    types::{PollOutcome, PollTarget},
};
use crate::{
    config::{ClientConfig, RetrySettings},
    version::{ApiVersion, Region},
};

/// Client for one API version and one region.
///
/// The version is fixed at construction. The credential is owned by the
/// instance and only replaced by [`Client::set_access_token`] or a token
/// refresh; two clients never see each other's tokens.
#[derive(Clone, Debug)]
pub struct Client {
    version: ApiVersion,
    region: Region,
    transport: Transport,
    token_url: Url,
    credential: Option<Credential>,
    retry: RetrySettings,
}

/// Client for `version` in `region`, with every other setting defaulted.
///
/// # Errors
///
/// Only if the built-in region table held an invalid URL.
pub fn create_client(version: Option<&str>, region: Option<&str>) -> Result<Client, ClientError> {
    Client::new(ClientConfig::new(version, region))
}

impl Client {
    /// # Errors
    ///
    /// Fails on an unusable base URL, token endpoint or access token.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let version = config.api_version();
        let region = config.api_region();
        let transport = Transport::new(Url::parse(config.resolved_base_url())?)?;
        let token_url = Url::parse(&config.token_url)?;
        let credential = config.access_token.map(Credential::new).transpose()?;

        log::debug!(
            "Client for API {version} at {} (region {region})",
            transport.base()
        );

        Ok(Self {
            version,
            region,
            transport,
            token_url,
            credential,
            retry: config.retry,
        })
    }

    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    pub const fn region(&self) -> Region {
        self.region
    }

    pub const fn base_url(&self) -> &Url {
        self.transport.base()
    }

    pub const fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub const fn retry_settings(&self) -> &RetrySettings {
        &self.retry
    }

    pub fn set_retry_settings(&mut self, retry: RetrySettings) {
        self.retry = retry;
    }

    pub const fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// # Errors
    ///
    /// `InvalidToken` for a blank token or one that cannot be sent as a
    /// header; the previous credential is kept in that case.
    pub fn set_access_token(&mut self, token: impl Into<String>) -> Result<(), ClientError> {
        self.credential = Some(Credential::new(token)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if `base` does not parse or cannot be a base.
    pub fn set_base_url(&mut self, base: &str) -> Result<(), ClientError> {
        self.transport = Transport::new(Url::parse(base)?)?;
        Ok(())
    }

    pub fn tokens(&mut self) -> Tokens<'_> {
        Tokens::new(self)
    }

    pub const fn vendors(&self) -> Vendors<'_> {
        Vendors::new(self)
    }

    pub const fn skills(&self) -> Skills<'_> {
        Skills::new(self)
    }

    pub const fn interaction_model(&self) -> InteractionModel<'_> {
        InteractionModel::new(self)
    }

    pub const fn account_linking(&self) -> AccountLinking<'_> {
        AccountLinking::new(self)
    }

    pub const fn skill_enablement(&self) -> SkillEnablement<'_> {
        SkillEnablement::new(self)
    }

    pub const fn skill_certification(&self) -> SkillCertification<'_> {
        SkillCertification::new(self)
    }

    pub const fn skill_testing(&self) -> SkillTesting<'_> {
        SkillTesting::new(self)
    }

    pub const fn intent_requests(&self) -> IntentRequests<'_> {
        IntentRequests::new(self)
    }

    pub const fn custom(&self) -> Custom<'_> {
        Custom::new(self)
    }

    /// Resolves `operation` for this client's version and executes it.
    ///
    /// # Errors
    ///
    /// Dispatch errors before any request is sent, otherwise whatever
    /// [`Client::execute`] returns.
    pub async fn call(
        &self,
        operation: Operation,
        args: Args,
        payload: Option<Value>,
    ) -> Result<OperationResult, ClientError> {
        let bound = operation.resolve(self.version, &args, payload)?;
        log::debug!("{operation} -> {} {}", bound.method, bound.path);

        let request = ApiRequest::new(bound.method, bound.path)
            .query(bound.query)
            .json(bound.body);
        self.execute(&request).await
    }

    /// Sends `request` with the current credential and normalizes the
    /// response. A 429 is retried under the rate-limit policy.
    ///
    /// # Errors
    ///
    /// `Operation` for non-2xx responses, `Reqwest` on network failure.
    pub async fn execute(&self, request: &ApiRequest) -> Result<OperationResult, ClientError> {
        let raw = retry_on_rate_limit(&self.retry.rate_limit, || {
            self.transport.send(request, self.credential.as_ref())
        })
        .await?;
        Ok(OperationResult::normalize(&request.method, raw))
    }

    /// Like [`Client::execute`], without the credential.
    pub(crate) async fn execute_anonymous(
        &self,
        request: &ApiRequest,
    ) -> Result<OperationResult, ClientError> {
        let raw = retry_on_rate_limit(&self.retry.rate_limit, || {
            self.transport.send(request, None)
        })
        .await?;
        Ok(OperationResult::normalize(&request.method, raw))
    }

    /// Polls skill status until the build is terminal.
    ///
    /// # Errors
    ///
    /// Errors from the status check; exhaustion is an outcome.
    pub async fn wait_for_skill(&self, skill_id: &str) -> Result<PollOutcome, ClientError> {
        poll_until_terminal(
            &self.retry.build,
            self.version,
            &PollTarget::SkillBuild,
            || self.skills().status([skill_id]),
        )
        .await
    }

    /// Polls the interaction model build of `locale`.
    ///
    /// # Errors
    ///
    /// Errors from the status check; exhaustion is an outcome.
    pub async fn wait_for_model(
        &self,
        skill_id: &str,
        locale: &str,
    ) -> Result<PollOutcome, ClientError> {
        let args = match self.version {
            ApiVersion::Legacy => Args::from([skill_id, locale]),
            ApiVersion::Current => Args::from([skill_id]),
        };

        poll_until_terminal(
            &self.retry.build,
            self.version,
            &PollTarget::model(locale),
            || self.interaction_model().status(args.clone()),
        )
        .await
    }

    /// Polls a certification submitted with
    /// [`SkillCertification::submit`]. Current version only.
    ///
    /// # Errors
    ///
    /// `Unsupported` under the legacy version, otherwise errors from the
    /// status check.
    pub async fn wait_for_certification(
        &self,
        skill_id: &str,
        certification_id: &str,
    ) -> Result<PollOutcome, ClientError> {
        poll_until_terminal(
            &self.retry.build,
            self.version,
            &PollTarget::Certification,
            || self.skill_certification().status(skill_id, certification_id),
        )
        .await
    }

    pub(crate) fn credential_mut(&mut self) -> &mut Option<Credential> {
        &mut self.credential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_defaults() {
        let client = create_client(None, None).unwrap();
        assert_eq!(client.version(), ApiVersion::Current);
        assert_eq!(client.region(), Region::NorthAmerica);
        assert_eq!(client.base_url().as_str(), "https://api.amazonalexa.com/");
        assert!(!client.has_credential());
    }

    #[test]
    fn test_create_client_unknown_selectors() {
        let client = create_client(Some("v9"), Some("XX")).unwrap();
        assert_eq!(client.version(), ApiVersion::Current);
        assert_eq!(client.base_url().host_str(), Some("api.amazonalexa.com"));

        let client = create_client(Some("v0"), Some("EU")).unwrap();
        assert_eq!(client.version(), ApiVersion::Legacy);
        assert_eq!(client.base_url().host_str(), Some("api.eu.amazonalexa.com"));
    }

    #[test]
    fn test_configuration_errors_are_synchronous() {
        let mut client = create_client(None, None).unwrap();

        assert!(matches!(client.set_access_token(""), Err(ClientError::InvalidToken)));
        assert!(!client.has_credential());

        client.set_access_token("Atza|first").unwrap();
        assert!(matches!(client.set_access_token("\n"), Err(ClientError::InvalidToken)));
        assert!(client.has_credential());

        assert!(matches!(client.set_base_url("not a url"), Err(ClientError::UrlParse(_))));
        assert!(matches!(
            client.set_base_url("data:text/plain,hello"),
            Err(ClientError::CannotBeBase(_))
        ));
        assert_eq!(client.base_url().as_str(), "https://api.amazonalexa.com/");
    }

    #[test]
    fn test_config_access_token_is_validated() {
        let config = ClientConfig {
            access_token: Some("  ".into()),
            ..ClientConfig::default()
        };
        assert!(matches!(Client::new(config), Err(ClientError::InvalidToken)));
    }

    #[test]
    fn test_clients_do_not_share_credentials() {
        let mut first = create_client(None, None).unwrap();
        let second = create_client(None, None).unwrap();
        first.set_access_token("Atza|mine").unwrap();
        assert!(first.has_credential());
        assert!(!second.has_credential());
    }
}
