//! URL record entity representing a short code to long URL mapping.

use chrono::{DateTime, Utc};

/// A stored short URL with its access counter.
///
/// `short_code`, `long_url` and `created_at` never change after creation.
/// `click_count` is only advanced by the resolution path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub short_code: String,
    pub long_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        short_code: String,
        long_url: String,
        click_count: i64,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            short_code,
            long_url,
            click_count,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the record has an expiry time that lies in the past.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`Self::is_expired`] against an explicit clock reading.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub short_code: String,
    pub long_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewUrlRecord {
    pub fn new(short_code: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            long_url: long_url.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>) -> UrlRecord {
        UrlRecord::new(
            "abc1234".to_string(),
            "https://example.com".to_string(),
            0,
            Utc::now(),
            expires_at,
        )
    }

    #[test]
    fn test_record_without_expiry_never_expires() {
        let r = record(None);
        assert!(!r.is_expired());
        assert!(!r.is_expired_at(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn test_record_expired_in_past() {
        let r = record(Some(Utc::now() - Duration::seconds(1)));
        assert!(r.is_expired());
    }

    #[test]
    fn test_record_not_expired_in_future() {
        let r = record(Some(Utc::now() + Duration::hours(1)));
        assert!(!r.is_expired());
    }

    #[test]
    fn test_record_expiry_boundary_is_not_expired() {
        let at = Utc::now();
        let r = record(Some(at));
        assert!(!r.is_expired_at(at));
        assert!(r.is_expired_at(at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_new_record_builder() {
        let expiry = Utc::now() + Duration::days(1);
        let new_record = NewUrlRecord::new("custom", "https://rust-lang.org").with_expiry(Some(expiry));

        assert_eq!(new_record.short_code, "custom");
        assert_eq!(new_record.long_url, "https://rust-lang.org");
        assert_eq!(new_record.expires_at, Some(expiry));
    }
}
