//! API-level ranges and behavioural thresholds.
//!
//! The engine reasons about the full window of OS versions an application
//! can run on, not a single version. Every platform-default change the
//! rules care about is pinned here as a named constant so the trigger value
//! for a behaviour lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type ApiLevel = u32;

/// Highest API level the engine knows about.
pub const ANDROID_MAX_SDK: ApiLevel = 36;

/// Auto Backup to Google Drive exists from Android 6.0.
pub const API_AUTO_BACKUP: ApiLevel = 23;

/// A network security config overrides `usesCleartextTraffic` from
/// Android 7.0 onward.
pub const API_NSC_OVERRIDES_CLEARTEXT: ApiLevel = 24;

/// `usesCleartextTraffic` defaults to `false` when targeting Android 9+.
pub const API_CLEARTEXT_DEFAULT_OFF: ApiLevel = 28;

/// Auto Backup data is end-to-end encrypted from Android 9.
pub const API_BACKUP_E2E_ENCRYPTION: ApiLevel = 28;

/// `dataExtractionRules` replaces `fullBackupContent` from Android 12.
pub const API_DATA_EXTRACTION_RULES: ApiLevel = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdkRangeError {
    #[error("minimum SDK version {min} is higher than maximum {max}")]
    Inverted { min: ApiLevel, max: ApiLevel },

    #[error("SDK version {0} is outside the supported window [1, {ANDROID_MAX_SDK}]")]
    OutOfBounds(ApiLevel),
}

/// The caller-declared `[min, max]` window of API levels the application
/// supports. Always validated at construction; rules assume the invariant
/// `1 <= min <= max <= ANDROID_MAX_SDK` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SdkRange {
    min: ApiLevel,
    max: ApiLevel,
}

impl SdkRange {
    pub fn new(min: ApiLevel, max: ApiLevel) -> Result<Self, SdkRangeError> {
        if min < 1 || min > ANDROID_MAX_SDK {
            return Err(SdkRangeError::OutOfBounds(min));
        }
        if max < 1 || max > ANDROID_MAX_SDK {
            return Err(SdkRangeError::OutOfBounds(max));
        }
        if min > max {
            return Err(SdkRangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> ApiLevel {
        self.min
    }

    pub fn max(&self) -> ApiLevel {
        self.max
    }

    /// True when the window includes at least one level below `threshold`
    /// and at least one at or above it.
    pub fn straddles(&self, threshold: ApiLevel) -> bool {
        self.min < threshold && self.max >= threshold
    }
}

impl fmt::Display for SdkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// API levels the manifest itself declares in its `uses-sdk` element.
/// Only used to detect disagreement with the caller-declared range; a
/// disagreement is a finding, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredSdk {
    #[serde(default)]
    pub min: Option<ApiLevel>,
    #[serde(default)]
    pub max: Option<ApiLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let range = SdkRange::new(21, 34).unwrap();
        assert_eq!(range.min(), 21);
        assert_eq!(range.max(), 34);
    }

    #[test]
    fn test_single_level_range() {
        assert!(SdkRange::new(28, 28).is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            SdkRange::new(30, 21),
            Err(SdkRangeError::Inverted { min: 30, max: 21 })
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert_eq!(SdkRange::new(0, 21), Err(SdkRangeError::OutOfBounds(0)));
        assert!(SdkRange::new(1, ANDROID_MAX_SDK + 1).is_err());
    }

    #[test]
    fn test_straddles() {
        let range = SdkRange::new(21, 34).unwrap();
        assert!(range.straddles(23));
        assert!(range.straddles(31));
        assert!(!range.straddles(21));
        assert!(!range.straddles(35));
    }
}
