//! Route table.
//!
//! Every logical operation has at most one [`Route`] per [`ApiVersion`].
//! Caller arguments are positional and bound to the route's slot list in
//! order. Legacy routes simply omit `stage` from their slot lists, so a value
//! a caller passes where `stage` would sit in the current API is bound to the
//! next slot (`locale`, the payload owner, ...). That binding happens in
//! [`Route::bind`] and nowhere else.

use reqwest::Method;
use serde_json::{Map, Value};
use std::fmt;

use super::errors::ClientError;
use crate::version::ApiVersion;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    VendorsList,
    SkillsList,
    SkillsCreate,
    SkillsGet,
    SkillsUpdate,
    SkillsStatus,
    SkillsDelete,
    InteractionModelGet,
    InteractionModelHead,
    InteractionModelUpdate,
    InteractionModelStatus,
    AccountLinkingGet,
    AccountLinkingUpdate,
    AccountLinkingDelete,
    EnablementEnable,
    EnablementStatus,
    EnablementDisable,
    CertificationSubmit,
    CertificationWithdraw,
    CertificationStatus,
    TestingInvoke,
    TestingSimulate,
    TestingSimulation,
    TestingValidate,
    TestingValidation,
    IntentRequestsList,
}

/// Where a bound argument goes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    /// `{name}` in the path template; required.
    Path(&'static str),
    /// Query parameter; omitted when the argument is absent or empty.
    Query(&'static str),
    /// Top-level body field; required.
    Body(&'static str),
}

impl Slot {
    const fn name(self) -> &'static str {
        match self {
            Self::Path(n) | Self::Query(n) | Self::Body(n) => n,
        }
    }
}

/// How the caller's payload is placed in the request body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Payload {
    None,
    /// Sent as the body itself (object keys merged with body slots).
    Raw,
    /// Sent under the given top-level key.
    Wrapped(&'static str),
}

#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub template: &'static str,
    pub slots: &'static [Slot],
    pub fixed_query: &'static [(&'static str, &'static str)],
    pub payload: Payload,
}

/// Request shape produced by binding arguments to a route.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Positional path/query/body arguments of one call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Args(Vec<String>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(mut self, arg: impl Into<String>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Args {
    fn from(args: [S; N]) -> Self {
        Self(args.iter().map(|a| a.as_ref().to_owned()).collect())
    }
}

impl From<&[&str]> for Args {
    fn from(args: &[&str]) -> Self {
        Self(args.iter().map(|a| (*a).to_owned()).collect())
    }
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

macro_rules! route {
    ($method:ident $template:literal [$($slot:expr),* $(,)?] $(query [$(($k:literal, $v:literal)),*])? $(payload $payload:expr)?) => {
        Route {
            method: Method::$method,
            template: $template,
            slots: &[$($slot),*],
            fixed_query: &[$($(($k, $v)),*)?],
            payload: route!(@payload $($payload)?),
        }
    };
    (@payload) => { Payload::None };
    (@payload $payload:expr) => { $payload };
}

use Slot::{Body, Path, Query};

const SKILL: Slot = Path("skillId");
const STAGE: Slot = Path("stage");
const LOCALE: Slot = Path("locale");

impl Operation {
    pub const ALL: [Self; 26] = [
        Self::VendorsList,
        Self::SkillsList,
        Self::SkillsCreate,
        Self::SkillsGet,
        Self::SkillsUpdate,
        Self::SkillsStatus,
        Self::SkillsDelete,
        Self::InteractionModelGet,
        Self::InteractionModelHead,
        Self::InteractionModelUpdate,
        Self::InteractionModelStatus,
        Self::AccountLinkingGet,
        Self::AccountLinkingUpdate,
        Self::AccountLinkingDelete,
        Self::EnablementEnable,
        Self::EnablementStatus,
        Self::EnablementDisable,
        Self::CertificationSubmit,
        Self::CertificationWithdraw,
        Self::CertificationStatus,
        Self::TestingInvoke,
        Self::TestingSimulate,
        Self::TestingSimulation,
        Self::TestingValidate,
        Self::TestingValidation,
        Self::IntentRequestsList,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::VendorsList => "vendors.list",
            Self::SkillsList => "skills.list",
            Self::SkillsCreate => "skills.create",
            Self::SkillsGet => "skills.get",
            Self::SkillsUpdate => "skills.update",
            Self::SkillsStatus => "skills.status",
            Self::SkillsDelete => "skills.delete",
            Self::InteractionModelGet => "interactionModel.get",
            Self::InteractionModelHead => "interactionModel.head",
            Self::InteractionModelUpdate => "interactionModel.update",
            Self::InteractionModelStatus => "interactionModel.status",
            Self::AccountLinkingGet => "accountLinking.get",
            Self::AccountLinkingUpdate => "accountLinking.update",
            Self::AccountLinkingDelete => "accountLinking.delete",
            Self::EnablementEnable => "skillEnablement.enable",
            Self::EnablementStatus => "skillEnablement.status",
            Self::EnablementDisable => "skillEnablement.disable",
            Self::CertificationSubmit => "skillCertification.submit",
            Self::CertificationWithdraw => "skillCertification.withdraw",
            Self::CertificationStatus => "skillCertification.status",
            Self::TestingInvoke => "skillTesting.invoke",
            Self::TestingSimulate => "skillTesting.simulate",
            Self::TestingSimulation => "skillTesting.simulation",
            Self::TestingValidate => "skillTesting.validate",
            Self::TestingValidation => "skillTesting.validation",
            Self::IntentRequestsList => "intentRequests.list",
        }
    }

    /// `None` when the operation does not exist in `version`.
    pub fn route(self, version: ApiVersion) -> Option<&'static Route> {
        match version {
            ApiVersion::Legacy => legacy_route(self),
            ApiVersion::Current => current_route(self),
        }
    }

    /// # Errors
    ///
    /// `Unsupported` when there is no route for `version`, `MissingArgument`
    /// when a required slot is not covered by `args`.
    pub fn resolve(
        self,
        version: ApiVersion,
        args: &Args,
        payload: Option<Value>,
    ) -> Result<BoundRequest, ClientError> {
        let route = self.route(version).ok_or(ClientError::Unsupported {
            operation: self.name(),
            version,
        })?;
        route.bind(self, args, payload)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[rustfmt::skip]
fn legacy_route(op: Operation) -> Option<&'static Route> {
    use Operation as Op;
    static VENDORS_LIST: Route = route!(GET "/v0/vendors" []);
    static SKILLS_LIST: Route = route!(GET "/v0/skills" [Query("vendorId"), Query("maxResults"), Query("nextToken")]);
    static SKILLS_CREATE: Route = route!(POST "/v0/skills" [Body("vendorId")] payload Payload::Wrapped("skillManifest"));
    static SKILLS_GET: Route = route!(GET "/v0/skills/{skillId}" [SKILL]);
    static SKILLS_UPDATE: Route = route!(PUT "/v0/skills/{skillId}" [SKILL] payload Payload::Wrapped("skillManifest"));
    static SKILLS_STATUS: Route = route!(GET "/v0/skills/{skillId}/status" [SKILL]);
    static SKILLS_DELETE: Route = route!(DELETE "/v0/skills/{skillId}" [SKILL]);
    static MODEL_GET: Route = route!(GET "/v0/skills/{skillId}/interactionModel/locales/{locale}" [SKILL, LOCALE]);
    static MODEL_HEAD: Route = route!(HEAD "/v0/skills/{skillId}/interactionModel/locales/{locale}" [SKILL, LOCALE]);
    static MODEL_UPDATE: Route = route!(POST "/v0/skills/{skillId}/interactionModel/locales/{locale}" [SKILL, LOCALE] payload Payload::Wrapped("interactionModel"));
    static MODEL_STATUS: Route = route!(GET "/v0/skills/{skillId}/interactionModel/locales/{locale}/status" [SKILL, LOCALE]);
    static LINKING_GET: Route = route!(GET "/v0/skills/{skillId}/accountLinkingClient" [SKILL]);
    static LINKING_UPDATE: Route = route!(PUT "/v0/skills/{skillId}/accountLinkingClient" [SKILL] payload Payload::Wrapped("accountLinkingInfo"));
    static CERT_SUBMIT: Route = route!(POST "/v0/skills/{skillId}/submit" [SKILL]);
    static CERT_WITHDRAW: Route = route!(POST "/v0/skills/{skillId}/withdraw" [SKILL, Body("reason"), Body("message")]);
    static INVOKE: Route = route!(POST "/v0/skills/{skillId}/invocations" [SKILL] payload Payload::Raw);
    static SIMULATE: Route = route!(POST "/v0/skills/{skillId}/simulations" [SKILL] payload Payload::Raw);
    static SIMULATION: Route = route!(GET "/v0/skills/{skillId}/simulations/{simulationId}" [SKILL, Path("simulationId")]);

    Some(match op {
        Op::VendorsList => &VENDORS_LIST,
        Op::SkillsList => &SKILLS_LIST,
        Op::SkillsCreate => &SKILLS_CREATE,
        Op::SkillsGet => &SKILLS_GET,
        Op::SkillsUpdate => &SKILLS_UPDATE,
        Op::SkillsStatus => &SKILLS_STATUS,
        Op::SkillsDelete => &SKILLS_DELETE,
        Op::InteractionModelGet => &MODEL_GET,
        Op::InteractionModelHead => &MODEL_HEAD,
        Op::InteractionModelUpdate => &MODEL_UPDATE,
        Op::InteractionModelStatus => &MODEL_STATUS,
        Op::AccountLinkingGet => &LINKING_GET,
        Op::AccountLinkingUpdate => &LINKING_UPDATE,
        Op::CertificationSubmit => &CERT_SUBMIT,
        Op::CertificationWithdraw => &CERT_WITHDRAW,
        Op::TestingInvoke => &INVOKE,
        Op::TestingSimulate => &SIMULATE,
        Op::TestingSimulation => &SIMULATION,
        Op::AccountLinkingDelete
        | Op::EnablementEnable
        | Op::EnablementStatus
        | Op::EnablementDisable
        | Op::CertificationStatus
        | Op::TestingValidate
        | Op::TestingValidation
        | Op::IntentRequestsList => return None,
    })
}

#[rustfmt::skip]
fn current_route(op: Operation) -> Option<&'static Route> {
    use Operation as Op;
    static VENDORS_LIST: Route = route!(GET "/v1/vendors" []);
    static SKILLS_LIST: Route = route!(GET "/v1/skills" [Query("vendorId"), Query("maxResults"), Query("nextToken")]);
    static SKILLS_CREATE: Route = route!(POST "/v1/skills" [Body("vendorId")] payload Payload::Wrapped("manifest"));
    static SKILLS_GET: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/manifest" [SKILL, STAGE]);
    static SKILLS_UPDATE: Route = route!(PUT "/v1/skills/{skillId}/stages/{stage}/manifest" [SKILL, STAGE] payload Payload::Wrapped("manifest"));
    static SKILLS_STATUS: Route = route!(GET "/v1/skills/{skillId}/status" [SKILL, Query("resource")]);
    static SKILLS_DELETE: Route = route!(DELETE "/v1/skills/{skillId}" [SKILL]);
    static MODEL_GET: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/interactionModel/locales/{locale}" [SKILL, STAGE, LOCALE]);
    static MODEL_HEAD: Route = route!(HEAD "/v1/skills/{skillId}/stages/{stage}/interactionModel/locales/{locale}" [SKILL, STAGE, LOCALE]);
    static MODEL_UPDATE: Route = route!(PUT "/v1/skills/{skillId}/stages/{stage}/interactionModel/locales/{locale}" [SKILL, STAGE, LOCALE] payload Payload::Wrapped("interactionModel"));
    static MODEL_STATUS: Route = route!(GET "/v1/skills/{skillId}/status" [SKILL] query [("resource", "interactionModel")]);
    static LINKING_GET: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/accountLinkingClient" [SKILL, STAGE]);
    static LINKING_UPDATE: Route = route!(PUT "/v1/skills/{skillId}/stages/{stage}/accountLinkingClient" [SKILL, STAGE] payload Payload::Wrapped("accountLinkingInfo"));
    static LINKING_DELETE: Route = route!(DELETE "/v1/skills/{skillId}/stages/{stage}/accountLinkingClient" [SKILL, STAGE]);
    static ENABLE: Route = route!(PUT "/v1/skills/{skillId}/stages/{stage}/enablement" [SKILL, STAGE]);
    static ENABLEMENT: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/enablement" [SKILL, STAGE]);
    static DISABLE: Route = route!(DELETE "/v1/skills/{skillId}/stages/{stage}/enablement" [SKILL, STAGE]);
    static CERT_SUBMIT: Route = route!(POST "/v1/skills/{skillId}/submit" [SKILL]);
    static CERT_WITHDRAW: Route = route!(POST "/v1/skills/{skillId}/withdraw" [SKILL, Body("reason"), Body("message")]);
    static CERT_STATUS: Route = route!(GET "/v1/skills/{skillId}/certifications/{certificationId}" [SKILL, Path("certificationId")]);
    static INVOKE: Route = route!(POST "/v1/skills/{skillId}/stages/{stage}/invocations" [SKILL, STAGE] payload Payload::Raw);
    static SIMULATE: Route = route!(POST "/v1/skills/{skillId}/stages/{stage}/simulations" [SKILL, STAGE] payload Payload::Raw);
    static SIMULATION: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/simulations/{simulationId}" [SKILL, STAGE, Path("simulationId")]);
    static VALIDATE: Route = route!(POST "/v1/skills/{skillId}/stages/{stage}/validations" [SKILL, STAGE] payload Payload::Raw);
    static VALIDATION: Route = route!(GET "/v1/skills/{skillId}/stages/{stage}/validations/{validationId}" [SKILL, STAGE, Path("validationId")]);
    static INTENT_REQUESTS: Route = route!(GET "/v1/skills/{skillId}/history/intentRequests" [SKILL]);

    Some(match op {
        Op::VendorsList => &VENDORS_LIST,
        Op::SkillsList => &SKILLS_LIST,
        Op::SkillsCreate => &SKILLS_CREATE,
        Op::SkillsGet => &SKILLS_GET,
        Op::SkillsUpdate => &SKILLS_UPDATE,
        Op::SkillsStatus => &SKILLS_STATUS,
        Op::SkillsDelete => &SKILLS_DELETE,
        Op::InteractionModelGet => &MODEL_GET,
        Op::InteractionModelHead => &MODEL_HEAD,
        Op::InteractionModelUpdate => &MODEL_UPDATE,
        Op::InteractionModelStatus => &MODEL_STATUS,
        Op::AccountLinkingGet => &LINKING_GET,
        Op::AccountLinkingUpdate => &LINKING_UPDATE,
        Op::AccountLinkingDelete => &LINKING_DELETE,
        Op::EnablementEnable => &ENABLE,
        Op::EnablementStatus => &ENABLEMENT,
        Op::EnablementDisable => &DISABLE,
        Op::CertificationSubmit => &CERT_SUBMIT,
        Op::CertificationWithdraw => &CERT_WITHDRAW,
        Op::CertificationStatus => &CERT_STATUS,
        Op::TestingInvoke => &INVOKE,
        Op::TestingSimulate => &SIMULATE,
        Op::TestingSimulation => &SIMULATION,
        Op::TestingValidate => &VALIDATE,
        Op::TestingValidation => &VALIDATION,
        Op::IntentRequestsList => &INTENT_REQUESTS,
    })
}

impl Route {
    /// Binds positional `args` to this route's slots, in order.
    ///
    /// # Errors
    ///
    /// `MissingArgument` when a path or body slot has no argument.
    pub fn bind(
        &self,
        operation: Operation,
        args: &Args,
        payload: Option<Value>,
    ) -> Result<BoundRequest, ClientError> {
        if args.len() > self.slots.len() {
            log::warn!(
                "{operation}: {} arguments given, {} used",
                args.len(),
                self.slots.len()
            );
        }

        let mut path = self.template.to_owned();
        let mut query = Vec::new();
        let mut fields = Map::new();

        for (index, slot) in self.slots.iter().enumerate() {
            let value = match (args.get(index), slot) {
                (None | Some(""), Slot::Query(_)) => continue,
                (Some(value), _) if !value.is_empty() => value,
                _ => {
                    return Err(ClientError::MissingArgument {
                        operation: operation.name(),
                        slot: slot.name(),
                    })
                }
            };

            match slot {
                Slot::Path(name) => path = path.replace(&format!("{{{name}}}"), value),
                Slot::Query(name) => query.push(((*name).to_owned(), value.to_owned())),
                Slot::Body(name) => {
                    fields.insert((*name).to_owned(), Value::String(value.to_owned()));
                }
            }
        }

        query.extend(
            self.fixed_query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
        );

        let body = match (self.payload, payload) {
            (Payload::Wrapped(key), Some(payload)) => {
                fields.insert(key.to_owned(), payload);
                Some(Value::Object(fields))
            }
            (Payload::Raw, Some(Value::Object(object))) => {
                let mut merged = object;
                merged.extend(fields);
                Some(Value::Object(merged))
            }
            (Payload::Raw, Some(other)) if fields.is_empty() => Some(other),
            _ if !fields.is_empty() => Some(Value::Object(fields)),
            _ => None,
        };

        Ok(BoundRequest {
            method: self.method.clone(),
            path,
            query,
            body,
        })
    }
}
