use serde_json::Value;
use std::fmt::{self, Display};

use super::errors::ClientError;
use crate::version::ApiVersion;

/// What a completion poll is waiting on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollTarget {
    SkillBuild,
    ModelBuild { locale: String },
    Certification,
}

impl PollTarget {
    pub fn model(locale: impl Into<String>) -> Self {
        Self::ModelBuild {
            locale: locale.into(),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::SkillBuild => "skill build",
            Self::ModelBuild { .. } => "interaction model build",
            Self::Certification => "certification",
        }
    }

    /// JSON pointer of the status field under `version`.
    ///
    /// # Errors
    ///
    /// `Unsupported` for certification under the legacy version.
    pub fn status_pointer(&self, version: ApiVersion) -> Result<String, ClientError> {
        let profile = version.profile();
        match self {
            Self::SkillBuild => Ok(profile.skill_status_pointer.to_owned()),
            Self::ModelBuild { locale } => Ok(profile
                .model_status_pointer
                .replace("{locale}", &escape_pointer(locale))),
            Self::Certification => profile
                .certification_status_pointer
                .map(str::to_owned)
                .ok_or(ClientError::Unsupported {
                    operation: "skillCertification.status",
                    version,
                }),
        }
    }

    pub const fn success(&self, version: ApiVersion) -> &'static str {
        let profile = version.profile();
        match self {
            Self::SkillBuild => profile.skill_success,
            Self::ModelBuild { .. } => profile.model_success,
            Self::Certification => profile.certification_success,
        }
    }

    /// # Errors
    ///
    /// Same as [`PollTarget::status_pointer`].
    pub fn classify(&self, version: ApiVersion, payload: &Value) -> Result<PollState, ClientError> {
        let pointer = self.status_pointer(version)?;
        let status = payload.pointer(&pointer).and_then(Value::as_str);

        Ok(match status {
            Some(s) if s == self.success(version) => PollState::Ready,
            Some(s) if s == version.profile().failure => PollState::Failed,
            other => PollState::Pending(other.map(str::to_owned)),
        })
    }
}

impl Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelBuild { locale } => write!(f, "{} ({locale})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollState {
    /// Not terminal yet; carries the observed status if there was one.
    Pending(Option<String>),
    Ready,
    Failed,
}

impl Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(Some(status)) => write!(f, "Pending ({status})"),
            Self::Pending(None) => write!(f, "Pending"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// How a completion poll ended.
///
/// Running out of attempts is an outcome, not an error: the caller decides
/// what a stalled build means.
#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    Ready(Value),
    Failed(Value),
    /// Last non-terminal payload seen, if any check completed.
    Exhausted(Option<Value>),
}

impl PollOutcome {
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::Ready(v) | Self::Failed(v) | Self::Exhausted(Some(v)) => Some(v),
            Self::Exhausted(None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skill_status_paths_per_version() {
        let legacy = json!({ "manifest": { "lastModified": { "status": "SUCCESSFUL" } } });
        let current = json!({ "manifest": { "lastUpdateRequest": { "status": "SUCCEEDED" } } });

        let target = PollTarget::SkillBuild;
        assert_eq!(target.classify(ApiVersion::Legacy, &legacy).unwrap(), PollState::Ready);
        assert_eq!(target.classify(ApiVersion::Current, &current).unwrap(), PollState::Ready);
        // The other version's vocabulary is not terminal.
        assert_eq!(
            target.classify(ApiVersion::Current, &legacy).unwrap(),
            PollState::Pending(None)
        );
    }

    #[test]
    fn test_model_status_path_is_keyed_by_locale() {
        let payload = json!({
            "interactionModel": {
                "en-US": { "lastUpdateRequest": { "status": "IN_PROGRESS" } }
            }
        });
        let target = PollTarget::model("en-US");
        assert_eq!(
            target.classify(ApiVersion::Current, &payload).unwrap(),
            PollState::Pending(Some("IN_PROGRESS".into()))
        );
        assert_eq!(
            PollTarget::model("de-DE")
                .classify(ApiVersion::Current, &payload)
                .unwrap(),
            PollState::Pending(None)
        );
    }

    #[test]
    fn test_legacy_model_status() {
        let target = PollTarget::model("en-US");
        assert_eq!(
            target
                .classify(ApiVersion::Legacy, &json!({ "status": "SUCCESS" }))
                .unwrap(),
            PollState::Ready
        );
        assert_eq!(
            target
                .classify(ApiVersion::Legacy, &json!({ "status": "FAILED" }))
                .unwrap(),
            PollState::Failed
        );
    }

    #[test]
    fn test_certification_is_current_only() {
        let err = PollTarget::Certification
            .status_pointer(ApiVersion::Legacy)
            .unwrap_err();
        assert!(matches!(err, ClientError::Unsupported { .. }));
        assert_eq!(
            PollTarget::Certification
                .classify(ApiVersion::Current, &json!({ "status": "SUCCEEDED" }))
                .unwrap(),
            PollState::Ready
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PollTarget::model("en-GB").to_string(), "interaction model build (en-GB)");
        assert_eq!(PollState::Pending(Some("IN_PROGRESS".into())).to_string(), "Pending (IN_PROGRESS)");
    }
}
