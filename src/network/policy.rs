//! Endorsement policy templates
//!
//! Transaction endorsement policies in the JSON shape the ledger SDK
//! consumes: a list of signer identities plus an N-of-M rule over them.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{Org, ORDERER_MSP};

/// Role a signer identity holds within its organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Member,
    Admin,
}

/// MSP-scoped role of a signer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MspRole {
    /// Role name within the organization
    pub name: RoleName,

    /// MSP identifier of the organization
    #[serde(rename = "mspId")]
    pub msp_id: String,
}

/// Signer identity entry of an endorsement policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyIdentity {
    pub role: MspRole,
}

impl PolicyIdentity {
    fn member(msp_id: &str) -> Self {
        Self {
            role: MspRole {
                name: RoleName::Member,
                msp_id: msp_id.to_string(),
            },
        }
    }

    fn admin(msp_id: &str) -> Self {
        Self {
            role: MspRole {
                name: RoleName::Admin,
                msp_id: msp_id.to_string(),
            },
        }
    }
}

/// N-of-M signature rule over the identity list
///
/// Serializes as `{"N-of": [{"signed-by": 0}, ...]}` where the indices refer
/// to positions in the surrounding policy's identity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRule {
    /// Number of signatures required
    pub required: usize,

    /// Identity indices eligible to sign
    pub signed_by: Vec<usize>,
}

impl Serialize for SignatureRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(serde::Serialize)]
        struct SignedBy {
            #[serde(rename = "signed-by")]
            signed_by: usize,
        }

        let entries: Vec<SignedBy> = self
            .signed_by
            .iter()
            .map(|&i| SignedBy { signed_by: i })
            .collect();

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&format!("{}-of", self.required), &entries)?;
        map.end()
    }
}

/// Transaction endorsement policy template
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EndorsementPolicy {
    /// Signer identities referenced by the rule
    pub identities: Vec<PolicyIdentity>,

    /// Signature rule over the identities
    pub policy: SignatureRule,
}

/// Members of all three organizations plus the orderer admin
fn three_org_members_and_admin() -> Vec<PolicyIdentity> {
    vec![
        PolicyIdentity::member(Org::Provider.msp_id()),
        PolicyIdentity::member(Org::User.msp_id()),
        PolicyIdentity::member(Org::Repairer.msp_id()),
        PolicyIdentity::admin(ORDERER_MSP),
    ]
}

/// Any single org member may endorse
pub fn one_of_three_org_member() -> EndorsementPolicy {
    EndorsementPolicy {
        identities: three_org_members_and_admin(),
        policy: SignatureRule {
            required: 1,
            signed_by: vec![0, 1, 2],
        },
    }
}

/// All three org members must endorse
pub fn all_three_org_members() -> EndorsementPolicy {
    EndorsementPolicy {
        identities: three_org_members_and_admin(),
        policy: SignatureRule {
            required: 3,
            signed_by: vec![0, 1, 2],
        },
    }
}

/// No endorsement required
pub fn accept_all() -> EndorsementPolicy {
    EndorsementPolicy {
        identities: Vec::new(),
        policy: SignatureRule {
            required: 0,
            signed_by: Vec::new(),
        },
    }
}

/// Policy applied to workflow transactions
pub fn transaction_endorsement_policy() -> EndorsementPolicy {
    all_three_org_members()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_three_org_members_shape() {
        let policy = all_three_org_members();
        let value = serde_json::to_value(&policy).unwrap();

        assert_eq!(
            value,
            json!({
                "identities": [
                    {"role": {"name": "member", "mspId": "ProviderOrgMSP"}},
                    {"role": {"name": "member", "mspId": "UserOrgMSP"}},
                    {"role": {"name": "member", "mspId": "RepairerOrgMSP"}},
                    {"role": {"name": "admin", "mspId": "OrdererMSP"}},
                ],
                "policy": {
                    "3-of": [
                        {"signed-by": 0},
                        {"signed-by": 1},
                        {"signed-by": 2},
                    ]
                }
            })
        );
    }

    #[test]
    fn test_one_of_three_requires_single_signature() {
        let policy = one_of_three_org_member();
        let value = serde_json::to_value(&policy).unwrap();
        assert!(value["policy"]["1-of"].is_array());
        assert_eq!(value["policy"]["1-of"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_accept_all_is_empty() {
        let value = serde_json::to_value(accept_all()).unwrap();
        assert_eq!(value, json!({"identities": [], "policy": {"0-of": []}}));
    }

    #[test]
    fn test_transaction_policy_is_all_three() {
        assert_eq!(transaction_endorsement_policy(), all_three_org_members());
    }
}
