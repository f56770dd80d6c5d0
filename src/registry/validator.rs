//! # Cross-Registry Validation
//!
//! A registry never reads another registry's storage. To check a foreign key it calls
//! the owning contract's `Read` entry point through the ledger runtime, as a nested
//! invocation inside the same transaction, and treats any non-success reply as a
//! dangling reference.

use crate::ledger::TransactionContext;
use crate::registry::RegistryError;
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Confirms that a referenced record exists.
#[async_trait]
pub trait ReferenceValidator: Send + Sync {
    async fn validate(&self, tx: &dyn TransactionContext, id: &str) -> Result<(), RegistryError>;
}

/// Validates references by invoking `Read` on a separately deployed contract.
#[derive(Debug, Clone)]
pub struct ContractReferenceValidator {
    target: String,
    kind: String,
}

impl ContractReferenceValidator {
    /// `target` is the contract that owns the referenced records; `kind` names them in
    /// error messages (e.g. `"Resource type"`).
    pub fn new(target: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: kind.into(),
        }
    }
}

#[async_trait]
impl ReferenceValidator for ContractReferenceValidator {
    #[instrument(skip(self, tx), fields(target = %self.target))]
    async fn validate(&self, tx: &dyn TransactionContext, id: &str) -> Result<(), RegistryError> {
        let args = vec!["Read".to_string(), id.to_string()];
        let response = tx.invoke_contract(&self.target, args).await?;

        if response.is_success() {
            debug!("Reference found");
            Ok(())
        } else {
            warn!(status = response.status, message = %response.message, "Reference rejected");
            Err(RegistryError::InvalidReference {
                kind: self.kind.clone(),
                id: id.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InvokeResponse, LedgerError};
    use crate::mock::MockStub;

    #[tokio::test]
    async fn test_success_reply_accepts_reference() {
        let mut stub = MockStub::new();
        stub.expect_invoke("resource_types")
            .return_ok(InvokeResponse::success(br#"{"id":"rt1"}"#.to_vec()));

        let validator = ContractReferenceValidator::new("resource_types", "Resource type");
        validator.validate(&stub, "rt1").await.unwrap();

        stub.verify();
        assert_eq!(
            stub.invocations(),
            vec![("resource_types".to_string(), vec!["Read".to_string(), "rt1".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_any_failure_status_is_invalid_reference() {
        let mut stub = MockStub::new();
        stub.expect_invoke("resource_types")
            .return_ok(InvokeResponse::error("Unable to find item in world state"));

        let validator = ContractReferenceValidator::new("resource_types", "Resource type");
        let err = validator.validate(&stub, "rt-missing").await.unwrap_err();

        assert_eq!(
            err,
            RegistryError::InvalidReference {
                kind: "Resource type".into(),
                id: "rt-missing".into()
            }
        );
        assert_eq!(err.to_string(), "Resource type 'rt-missing' does not exist");
    }

    #[tokio::test]
    async fn test_runtime_failure_is_store_unavailable() {
        let mut stub = MockStub::new();
        stub.expect_invoke("resource_types")
            .return_err(LedgerError::Unavailable("peer gone".into()));

        let validator = ContractReferenceValidator::new("resource_types", "Resource type");
        let err = validator.validate(&stub, "rt1").await.unwrap_err();
        assert!(matches!(err, RegistryError::StoreUnavailable(_)));
    }
}
