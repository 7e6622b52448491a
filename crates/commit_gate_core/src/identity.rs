//! Identity capability: who is pushing, and which accounts are automation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GateResult;

/// The name and email the host has verified for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub name: String,
    pub email: String,
}

impl VerifiedIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Verified identity of the authenticated pusher.
    async fn verified_identity(&self, pusher: &str) -> GateResult<VerifiedIdentity>;

    /// Whether `name` belongs to a service account.
    async fn is_service_user(&self, name: &str) -> bool;
}
