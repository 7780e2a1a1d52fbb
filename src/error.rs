use thiserror::Error;

use crate::pipeline::Stage;

/// Failures of the collaborator stores (client store and activity log).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by [`StageTransitionPolicy::apply`](crate::pipeline::StageTransitionPolicy::apply).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No-op move; rejected before classification.
    #[error("Client is already in stage {0}")]
    SameStage(Stage),

    /// Override transition submitted without a justification.
    #[error("reason required for this transition ({from} → {to})")]
    ReasonRequired { from: Stage, to: Stage },

    /// The stage write failed; nothing was recorded.
    #[error("Failed to update client stage: {0}")]
    ClientStore(#[source] StoreError),

    /// The stage write succeeded but the audit entry was not appended.
    #[error("Stage of {client_id} changed to {applied} but the activity entry was not recorded: {source}")]
    ActivityLog {
        client_id: String,
        applied: Stage,
        #[source]
        source: StoreError,
    },
}

impl PipelineError {
    /// Validation failures are recovered by re-prompting the operator.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineError::SameStage(_) | PipelineError::ReasonRequired { .. }
        )
    }

    /// The stage changed even though an error is reported.
    pub fn is_partial_success(&self) -> bool {
        matches!(self, PipelineError::ActivityLog { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_required_display() {
        let err = PipelineError::ReasonRequired {
            from: Stage::Lead,
            to: Stage::Won,
        };
        assert_eq!(
            err.to_string(),
            "reason required for this transition (lead → won)"
        );
        assert!(err.is_validation());
        assert!(!err.is_partial_success());
    }

    #[test]
    fn activity_log_failure_is_partial_success() {
        let err = PipelineError::ActivityLog {
            client_id: "c1".into(),
            applied: Stage::Lost,
            source: StoreError::Io(std::io::Error::other("disk full")),
        };
        assert!(err.is_partial_success());
        assert!(!err.is_validation());
        assert!(err.to_string().contains("changed to lost"));
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::ClientNotFound("c9".into());
        assert_eq!(err.to_string(), "Client not found: c9");
    }
}
