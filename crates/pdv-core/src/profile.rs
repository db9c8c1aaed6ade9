//! Organizational constants stamped into every metadata record.

use serde::{Deserialize, Serialize};

/// Default producer organization name.
pub const DEFAULT_PRODUCER_NAME: &str = "Schema31 S.p.A.";
/// Default producer tax code.
pub const DEFAULT_PRODUCER_TAX_CODE: &str = "05334830485";
/// Default recipient first name.
pub const DEFAULT_RECIPIENT_NAME: &str = "Andrea";
/// Default recipient surname.
pub const DEFAULT_RECIPIENT_SURNAME: &str = "Brancatelli";
/// Default recipient tax code.
pub const DEFAULT_RECIPIENT_TAX_CODE: &str = "BRNNDR79D12L424O";
/// Document class tag for generic documents.
pub const DEFAULT_DOCUMENT_CLASS: &str = "DocumentoGenerico";
/// Retention period written to `store-time`.
pub const DEFAULT_RETENTION_PERIOD: &str = "12 years";

/// An identity block (producer or recipient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Party {
    /// First name, or organization name.
    pub name: String,
    /// Surname; organizations repeat their name here.
    pub surname: String,
    /// Fiscal code or VAT number.
    pub tax_code: String,
}

/// Fixed identities and tags applied to every document of a build.
///
/// The defaults are the values the archive expects. A profile is set once per
/// [`PackageBuilder`](crate::PackageBuilder), never per document.
///
/// JSON form (camelCase like manifests; every field optional, unknown keys
/// rejected):
///
/// ```json
/// {
///   "producer": {"name": "Acme", "surname": "Acme", "taxCode": "01234567890"},
///   "retentionPeriod": "10 years"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PreservationProfile {
    /// Producing organization.
    pub producer: Party,
    /// Recipient of the documents.
    pub recipient: Party,
    /// Value of `document-class`.
    pub document_class: String,
    /// Value of `store-time`.
    pub retention_period: String,
}

impl Default for PreservationProfile {
    fn default() -> Self {
        Self {
            producer: Party {
                name: DEFAULT_PRODUCER_NAME.to_string(),
                surname: DEFAULT_PRODUCER_NAME.to_string(),
                tax_code: DEFAULT_PRODUCER_TAX_CODE.to_string(),
            },
            recipient: Party {
                name: DEFAULT_RECIPIENT_NAME.to_string(),
                surname: DEFAULT_RECIPIENT_SURNAME.to_string(),
                tax_code: DEFAULT_RECIPIENT_TAX_CODE.to_string(),
            },
            document_class: DEFAULT_DOCUMENT_CLASS.to_string(),
            retention_period: DEFAULT_RETENTION_PERIOD.to_string(),
        }
    }
}

impl PreservationProfile {
    /// Parses a profile from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
