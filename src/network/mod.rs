//! Network identity module
//!
//! This module describes the permissioned network the gateway fronts:
//! organization names, MSP identifiers, CA issuers, channel and chaincode
//! identity, and the endorsement-policy templates consumed by the backend.

pub mod policy;

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::common::{GatewayError, Result};

pub use policy::{
    EndorsementPolicy, PolicyIdentity, all_three_org_members, accept_all,
    one_of_three_org_member, transaction_endorsement_policy,
};

/// Logical network identifier
pub const NETWORK_ID: &str = "bike-sharing-network";

/// Channel the workflow chaincode is deployed on
pub const CHANNEL_NAME: &str = "bsnchannel";

/// Chaincode identifier
pub const CHAINCODE_ID: &str = "bsncc";

/// Chaincode source path inside the chaincode repository
pub const CHAINCODE_PATH: &str = "github.com/bike_share_workflow";

/// Deployed chaincode version; requests carrying any other version are rejected
pub const CHAINCODE_VERSION: &str = "v0";

/// Organization name used by user-facing identities
pub const USER_ORG: &str = "userorg";

/// Organization name used by repairer identities
pub const REPAIRER_ORG: &str = "repairerorg";

/// Organization name used by provider identities
pub const PROVIDER_ORG: &str = "providerorg";

/// MSP identifier of the ordering service
pub const ORDERER_MSP: &str = "OrdererMSP";

/// Member organization of the permissioned network
///
/// Each organization maps to an MSP identifier and a CA issuer common name;
/// the workflow gates every operation on the caller's organization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Org {
    /// Riders; registered with an opening balance
    User,
    /// Repair shops accepting repair requests
    Repairer,
    /// The bike fleet operator
    Provider,
}

impl Org {
    /// Parse an organization from its network name
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            USER_ORG => Ok(Org::User),
            REPAIRER_ORG => Ok(Org::Repairer),
            PROVIDER_ORG => Ok(Org::Provider),
            _ => Err(GatewayError::Config(format!(
                "Invalid organization: {}. Valid values are: {}, {}, {}",
                s, USER_ORG, REPAIRER_ORG, PROVIDER_ORG
            ))),
        }
    }

    /// Network name of the organization
    pub fn name(&self) -> &'static str {
        match self {
            Org::User => USER_ORG,
            Org::Repairer => REPAIRER_ORG,
            Org::Provider => PROVIDER_ORG,
        }
    }

    /// MSP identifier of the organization
    pub fn msp_id(&self) -> &'static str {
        match self {
            Org::User => "UserOrgMSP",
            Org::Repairer => "RepairerOrgMSP",
            Org::Provider => "ProviderOrgMSP",
        }
    }

    /// Common name of the organization's certificate authority
    pub fn ca_issuer(&self) -> &'static str {
        match self {
            Org::User => "ca.userorg.bikeshare.com",
            Org::Repairer => "ca.repairerorg.bikeshare.com",
            Org::Provider => "ca.providerorg.bikeshare.com",
        }
    }

    /// Display name used in access-denial messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Org::User => "User",
            Org::Repairer => "Repairer",
            Org::Provider => "Provider",
        }
    }
}

impl fmt::Display for Org {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
