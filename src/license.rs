//! License credential validation.
//!
//! A device is provisioned with a [`LicensePolicy`]: the credential it
//! accepts and the calendar date its provisioning expires. A presented
//! [`LicenseKey`] is valid when it matches the accepted credential exactly
//! and the current date is before the expiry. The key itself is opaque to
//! this crate; there is no license-server protocol here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, TrackerError};

/// Date format used in license provisioning and scenario files.
const EXPIRY_FORMAT: &str = "%Y/%m/%d";

/// Opaque credential string presented by the caller at session construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LicenseKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// What a device was provisioned with: the credential it accepts and when
/// that provisioning lapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicensePolicy {
    accepted: LicenseKey,
    expires: NaiveDate,
}

impl LicensePolicy {
    pub fn new(accepted: LicenseKey, expires: NaiveDate) -> Self {
        Self { accepted, expires }
    }

    /// Build a policy from an expiry date in `YYYY/MM/DD` form.
    /// A malformed date is a setup failure, surfaced at device open.
    pub fn with_expiry_str(accepted: LicenseKey, expires: &str) -> Result<Self> {
        let expires = NaiveDate::parse_from_str(expires, EXPIRY_FORMAT).map_err(|e| {
            TrackerError::initialization_failed_with_source(
                format!("unparseable license expiry date {expires:?}"),
                Box::new(e),
            )
        })?;
        Ok(Self { accepted, expires })
    }

    /// A policy that never rejects on date, for synthetic devices in tests.
    pub fn perpetual(accepted: LicenseKey) -> Self {
        Self { accepted, expires: NaiveDate::MAX }
    }

    /// Whether `presented` unlocks this device on the given date.
    /// Valid iff the credential matches exactly and `on` is before expiry.
    pub fn validate_on(&self, presented: &LicenseKey, on: NaiveDate) -> bool {
        let valid = presented == &self.accepted && on < self.expires;
        debug!(valid, expires = %self.expires, "evaluated license credential");
        valid
    }

    /// Whether `presented` unlocks this device today (system clock).
    pub fn validate(&self, presented: &LicenseKey) -> bool {
        self.validate_on(presented, chrono::Utc::now().date_naive())
    }

    pub fn expires(&self) -> NaiveDate {
        self.expires
    }
}
