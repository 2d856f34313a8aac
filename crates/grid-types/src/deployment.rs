//! Deployment - the signed, versioned bundle of workloads for one node

use crate::error::{Result, TypesError};
use crate::identity::Identity;
use crate::ids::{ContractId, TwinId};
use crate::signature::{Signature, SignatureRequirement};
use crate::workload::{Workload, WorkloadData, WorkloadType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Deployment as pushed to and fetched from a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub version: u32,
    pub twin_id: TwinId,
    /// `0` until the contract exists on the ledger
    #[serde(default)]
    pub contract_id: ContractId,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expiration: i64,
    #[serde(default)]
    pub signature_requirement: SignatureRequirement,
    #[serde(default)]
    pub workloads: Vec<Workload>,
}

impl Deployment {
    /// Unsigned, uncontracted deployment owned by `twin_id`
    pub fn new(twin_id: TwinId, workloads: Vec<Workload>) -> Self {
        Self {
            twin_id,
            signature_requirement: SignatureRequirement::single(twin_id),
            workloads,
            ..Default::default()
        }
    }

    /// Reference to an existing contract with no content, used for cancellation
    pub fn from_contract(contract_id: ContractId) -> Self {
        Self {
            contract_id,
            ..Default::default()
        }
    }

    pub fn is_created(&self) -> bool {
        self.contract_id != 0
    }

    pub fn get(&self, name: &str) -> Option<&Workload> {
        self.workloads.iter().find(|w| w.name == name)
    }

    /// Structural checks run before anything is sent to the ledger
    pub fn validate(&self) -> Result<()> {
        if self.workloads.is_empty() {
            return Err(TypesError::InvalidDeployment(
                "deployment has no workloads".into(),
            ));
        }

        let mut names = HashSet::new();
        for wl in &self.workloads {
            if wl.name.is_empty() {
                return Err(TypesError::InvalidDeployment(
                    "workload name cannot be empty".into(),
                ));
            }
            if !names.insert(wl.name.as_str()) {
                return Err(TypesError::InvalidDeployment(format!(
                    "duplicate workload name: {}",
                    wl.name
                )));
            }
        }

        let req = &self.signature_requirement;
        if req.weight_required == 0 {
            return Err(TypesError::InvalidDeployment(
                "signature requirement weight cannot be zero".into(),
            ));
        }
        if req.weight_required > req.total_weight() {
            return Err(TypesError::InvalidDeployment(format!(
                "signature requirement needs weight {} but requests only sum to {}",
                req.weight_required,
                req.total_weight()
            )));
        }

        Ok(())
    }

    /// Number of public IPv4 addresses the contract must reserve
    pub fn count_public_ips(&self) -> u32 {
        self.workloads
            .iter()
            .filter(|w| w.workload_type == WorkloadType::PublicIp)
            .filter(|w| matches!(w.typed_data(), Ok(WorkloadData::PublicIp(ip)) if ip.v4))
            .count() as u32
    }

    /// Digest over every field the ledger and node must agree on.
    ///
    /// Contract id, results and collected signatures are excluded.
    pub fn challenge_hash(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_string());
        hasher.update(self.twin_id.to_string());
        hasher.update(&self.metadata);
        hasher.update(&self.description);
        hasher.update(self.expiration.to_string());

        for wl in &self.workloads {
            hasher.update(wl.version.to_string());
            hasher.update(wl.workload_type.as_str());
            hasher.update(&wl.name);
            hasher.update(&wl.metadata);
            hasher.update(&wl.description);
            hasher.update(serde_json::to_vec(&wl.data)?);
        }

        let req = &self.signature_requirement;
        hasher.update(req.weight_required.to_string());
        for r in &req.requests {
            hasher.update(r.twin_id.to_string());
            hasher.update(r.required.to_string());
            hasher.update(r.weight.to_string());
        }
        hasher.update(&req.signature_style);

        Ok(hasher.finalize().into())
    }

    /// Hex form of [`challenge_hash`](Self::challenge_hash), as sent to the ledger
    pub fn challenge_hex(&self) -> Result<String> {
        Ok(hex::encode(self.challenge_hash()?))
    }

    /// Sign the challenge as `twin_id`, replacing any earlier signature by that twin
    pub fn sign(&mut self, twin_id: TwinId, identity: &Identity) -> Result<()> {
        let hash = self.challenge_hash()?;
        let signature = Signature {
            twin_id,
            signature: hex::encode(identity.sign(&hash)),
            signature_type: "ed25519".to_string(),
        };

        let signatures = &mut self.signature_requirement.signatures;
        signatures.retain(|s| s.twin_id != twin_id);
        signatures.push(signature);
        Ok(())
    }
}
