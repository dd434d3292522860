use serde::{Deserialize, Serialize};

/// Client credentials used to exchange a refresh token.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl RefreshRequest {
    pub fn form(&self) -> Vec<(String, String)> {
        vec![
            ("grant_type".into(), "refresh_token".into()),
            ("refresh_token".into(), self.refresh_token.clone()),
            ("client_id".into(), self.client_id.clone()),
            ("client_secret".into(), self.client_secret.clone()),
        ]
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Certification withdrawal reasons accepted by the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WithdrawReason {
    TestSkill,
    MoreFeatures,
    DiscoveredIssue,
    NotReceivedCertificationFeedback,
    NotIntendToPublish,
    Other,
}

impl WithdrawReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestSkill => "TEST_SKILL",
            Self::MoreFeatures => "MORE_FEATURES",
            Self::DiscoveredIssue => "DISCOVERED_ISSUE",
            Self::NotReceivedCertificationFeedback => "NOT_RECEIVED_CERTIFICATION_FEEDBACK",
            Self::NotIntendToPublish => "NOT_INTEND_TO_PUBLISH",
            Self::Other => "OTHER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_form_fields() {
        let request = RefreshRequest {
            refresh_token: "Atzr|refresh".into(),
            client_id: "amzn1.application-oa2-client.x".into(),
            client_secret: "secret".into(),
        };
        let form = request.form();
        assert_eq!(form[0], ("grant_type".into(), "refresh_token".into()));
        assert!(form.contains(&("client_secret".into(), "secret".into())));
    }

    #[test]
    fn test_token_response_optional_fields() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"Atza|abc","expires_in":3600}"#).unwrap();
        assert_eq!(parsed.access_token, "Atza|abc");
        assert_eq!(parsed.expires_in, Some(3600));
        assert!(parsed.refresh_token.is_none());
    }
}
