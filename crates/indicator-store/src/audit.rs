//! Audit context: who is acting, and when.

use chrono::{DateTime, Utc};
use indicator_types::AuditStamp;

/// Supplies the acting user and the current time for audit fields.
pub trait AuditContext: Send + Sync {
    /// Name of the acting user
    fn current_user(&self) -> String;

    /// Current time
    fn now(&self) -> DateTime<Utc>;

    fn stamp(&self) -> AuditStamp {
        AuditStamp::new(self.current_user(), self.now())
    }
}

/// Wall-clock audit context for a fixed user
#[derive(Debug, Clone)]
pub struct SystemAuditContext {
    user: String,
}

impl SystemAuditContext {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

impl AuditContext for SystemAuditContext {
    fn current_user(&self) -> String {
        self.user.clone()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Audit context frozen at one instant
#[derive(Debug, Clone)]
pub struct FixedAuditContext {
    user: String,
    at: DateTime<Utc>,
}

impl FixedAuditContext {
    pub fn new(user: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            user: user.into(),
            at,
        }
    }
}

impl AuditContext for FixedAuditContext {
    fn current_user(&self) -> String {
        self.user.clone()
    }

    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
