//! API version and region selectors.
//!
//! Both selectors are resolved once per client. Anything unrecognised falls
//! back to the newest version and the primary region respectively.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ApiVersion {
    /// `v0`, single-stage skill model.
    Legacy,
    /// `v1`, staged skill model.
    #[default]
    Current,
}

/// Status vocabulary of one API version.
///
/// Pointers are RFC 6901 JSON pointers into the status payload; `{locale}`
/// is substituted before lookup.
#[derive(Debug, Eq, PartialEq)]
pub struct VersionProfile {
    pub selector: &'static str,
    pub skill_status_pointer: &'static str,
    pub skill_success: &'static str,
    pub model_status_pointer: &'static str,
    pub model_success: &'static str,
    pub certification_status_pointer: Option<&'static str>,
    pub certification_success: &'static str,
    pub failure: &'static str,
}

const LEGACY: VersionProfile = VersionProfile {
    selector: "v0",
    skill_status_pointer: "/manifest/lastModified/status",
    skill_success: "SUCCESSFUL",
    model_status_pointer: "/status",
    model_success: "SUCCESS",
    // The location returned by a legacy submission is not usable for lookups.
    certification_status_pointer: None,
    certification_success: "SUCCEEDED",
    failure: "FAILED",
};

const CURRENT: VersionProfile = VersionProfile {
    selector: "v1",
    skill_status_pointer: "/manifest/lastUpdateRequest/status",
    skill_success: "SUCCEEDED",
    model_status_pointer: "/interactionModel/{locale}/lastUpdateRequest/status",
    model_success: "SUCCEEDED",
    certification_status_pointer: Some("/status"),
    certification_success: "SUCCEEDED",
    failure: "FAILED",
};

impl ApiVersion {
    pub const ALL: [Self; 2] = [Self::Legacy, Self::Current];

    /// Resolves a selector such as `"v0"` or `"V1"`.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case(LEGACY.selector) => Self::Legacy,
            Some(s) if s.eq_ignore_ascii_case(CURRENT.selector) => Self::Current,
            Some(other) => {
                log::warn!("Unknown API version {other:?}, using {}", CURRENT.selector);
                Self::Current
            }
            None => Self::Current,
        }
    }

    pub const fn profile(self) -> &'static VersionProfile {
        match self {
            Self::Legacy => &LEGACY,
            Self::Current => &CURRENT,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.profile().selector
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Region {
    #[default]
    NorthAmerica,
    Europe,
    FarEast,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::NorthAmerica, Self::Europe, Self::FarEast];

    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_uppercase()).as_deref() {
            Some("NA") | None => Self::NorthAmerica,
            Some("EU") => Self::Europe,
            Some("FE") => Self::FarEast,
            Some(other) => {
                log::warn!("Unknown region {other:?}, using NA");
                Self::NorthAmerica
            }
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA",
            Self::Europe => "EU",
            Self::FarEast => "FE",
        }
    }

    pub const fn base_url(self) -> &'static str {
        match self {
            Self::NorthAmerica => "https://api.amazonalexa.com",
            Self::Europe => "https://api.eu.amazonalexa.com",
            Self::FarEast => "https://api.fe.amazonalexa.com",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_selectors() {
        assert_eq!(ApiVersion::from_selector(Some("v0")), ApiVersion::Legacy);
        assert_eq!(ApiVersion::from_selector(Some("V1")), ApiVersion::Current);
        assert_eq!(ApiVersion::from_selector(Some(" v0 ")), ApiVersion::Legacy);
    }

    #[test]
    fn test_version_falls_back_to_newest() {
        assert_eq!(ApiVersion::from_selector(None), ApiVersion::Current);
        assert_eq!(ApiVersion::from_selector(Some("v7")), ApiVersion::Current);
        assert_eq!(ApiVersion::default(), ApiVersion::Current);
    }

    #[test]
    fn test_success_vocabulary_differs_by_version() {
        assert_eq!(ApiVersion::Legacy.profile().skill_success, "SUCCESSFUL");
        assert_eq!(ApiVersion::Current.profile().skill_success, "SUCCEEDED");
        assert_ne!(
            ApiVersion::Legacy.profile().model_status_pointer,
            ApiVersion::Current.profile().model_status_pointer
        );
    }

    #[test]
    fn test_region_fallback() {
        assert_eq!(Region::from_code(None), Region::NorthAmerica);
        assert_eq!(Region::from_code(Some("eu")), Region::Europe);
        assert_eq!(Region::from_code(Some("FE")), Region::FarEast);
        assert_eq!(Region::from_code(Some("MARS")), Region::NorthAmerica);
        assert_eq!(
            Region::from_code(Some("MARS")).base_url(),
            "https://api.amazonalexa.com"
        );
    }
}
