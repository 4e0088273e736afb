//! Salesforce access for leadbot.
//!
//! Authentication uses the OAuth 2.0 JWT bearer flow: an RS256 assertion
//! signed with the connected app's private key is exchanged for a short
//! lived access token. With that token the client can look up a referring
//! contact, create a Lead and describe the Lead object's picklists.
//!
//! The submission pipeline talks to Salesforce only through [`CrmGateway`],
//! so it can be exercised against an in-memory fake.

use async_trait::async_trait;
use leadbot_core::{ContactMatch, LeadRecord};

pub mod client;
pub mod contacts;
pub mod describe;
pub mod error;
pub mod leads;
pub mod token;

pub use client::SalesforceClient;
pub use describe::{Picklist, PicklistValue};
pub use error::CrmError;
pub use leads::{user_message_for, ApiError, LeadCreated};
pub use token::{load_signing_key, AccessToken, AssertionSigner};

#[async_trait]
pub trait CrmGateway: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken, CrmError>;

    /// First contact whose email or Slack member id matches, if any.
    async fn find_contact(
        &self,
        token: &AccessToken,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<Option<ContactMatch>, CrmError>;

    async fn create_lead(
        &self,
        token: &AccessToken,
        lead: &LeadRecord,
    ) -> Result<LeadCreated, CrmError>;
}
