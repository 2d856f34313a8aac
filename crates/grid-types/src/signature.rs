//! Signature requirement attached to every deployment

use crate::ids::TwinId;
use serde::{Deserialize, Serialize};

/// One twin whose signature counts toward the requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub twin_id: TwinId,
    #[serde(default)]
    pub required: bool,
    pub weight: u32,
}

/// A collected signature over the deployment challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub twin_id: TwinId,
    /// Hex-encoded signature bytes
    pub signature: String,
    #[serde(default = "default_signature_type")]
    pub signature_type: String,
}

/// Who must sign a deployment and how much weight is needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequirement {
    #[serde(default)]
    pub requests: Vec<SignatureRequest>,
    #[serde(default)]
    pub weight_required: u32,
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(default)]
    pub signature_style: String,
}

impl SignatureRequirement {
    /// Requirement satisfied by a single twin signing alone
    pub fn single(twin_id: TwinId) -> Self {
        Self {
            requests: vec![SignatureRequest {
                twin_id,
                required: false,
                weight: 1,
            }],
            weight_required: 1,
            ..Default::default()
        }
    }

    /// Total weight available from all requests
    pub fn total_weight(&self) -> u32 {
        self.requests.iter().map(|r| r.weight).sum()
    }

    /// Weight collected so far from recorded signatures
    pub fn signed_weight(&self) -> u32 {
        self.requests
            .iter()
            .filter(|r| self.signatures.iter().any(|s| s.twin_id == r.twin_id))
            .map(|r| r.weight)
            .sum()
    }
}

fn default_signature_type() -> String {
    "ed25519".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_requirement() {
        let req = SignatureRequirement::single(11);
        assert_eq!(req.weight_required, 1);
        assert_eq!(req.total_weight(), 1);
        assert_eq!(req.signed_weight(), 0);
    }

    #[test]
    fn test_signed_weight_counts_matching_twins() {
        let mut req = SignatureRequirement::single(11);
        req.signatures.push(Signature {
            twin_id: 12,
            signature: "00".into(),
            signature_type: default_signature_type(),
        });
        assert_eq!(req.signed_weight(), 0);

        req.signatures.push(Signature {
            twin_id: 11,
            signature: "00".into(),
            signature_type: default_signature_type(),
        });
        assert_eq!(req.signed_weight(), 1);
    }
}
