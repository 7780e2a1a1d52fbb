use serde::{Deserialize, Serialize};

use super::client::{ActivityEntry, StageChangeRequest};
use super::stage::Stage;
use crate::error::PipelineError;
use crate::store::{ActivityLog, ClientStore};

/// How a requested stage change must be handled before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionClass {
    /// Not allowed at all. Every stage pair is currently reachable, so
    /// [`StageTransitionPolicy::classify`] never returns this.
    #[allow(dead_code)]
    Blocked,
    /// Allowed only with a non-empty justification.
    RequiresReason,
    /// One step forward; allowed unconditionally.
    Sequential,
}

/// Gatekeeper for pipeline stage changes.
///
/// Transitions into `lost`/`on_hold`, backward moves and multi-step skips in
/// the canonical order are override transitions and need a reason. Every
/// accepted transition writes the new stage and then appends exactly one
/// [`ActivityEntry`].
pub struct StageTransitionPolicy;

impl StageTransitionPolicy {
    /// Classify a `from → to` move. Callers reject `from == to` first.
    ///
    /// Leaving `lost`/`on_hold` for a canonical stage has no index to compare
    /// against and is treated as `Sequential`.
    pub fn classify(from: Stage, to: Stage) -> TransitionClass {
        if to.is_off_track() {
            return TransitionClass::RequiresReason;
        }
        match (from.canonical_index(), to.canonical_index()) {
            (Some(f), Some(t)) if t == f + 1 => TransitionClass::Sequential,
            (Some(_), Some(_)) => TransitionClass::RequiresReason,
            _ => TransitionClass::Sequential,
        }
    }

    /// Apply a stage change and record it.
    ///
    /// The stage write happens first; the activity entry is appended only
    /// after it succeeds, with `from_stage` taken from the request rather
    /// than re-read from the store. Not idempotent: every call is a separate
    /// audited event.
    pub async fn apply<S, L>(
        clients: &S,
        activity: &L,
        request: StageChangeRequest,
        acting_user_id: &str,
    ) -> Result<ActivityEntry, PipelineError>
    where
        S: ClientStore,
        L: ActivityLog,
    {
        let request = Self::validate(request)?;

        clients
            .update_stage(&request.client_id, request.to_stage)
            .await
            .map_err(PipelineError::ClientStore)?;

        let entry = ActivityEntry::stage_changed(&request, acting_user_id);
        if let Err(source) = activity.append(&entry).await {
            tracing::error!(
                client_id = %request.client_id,
                from = %request.from_stage,
                to = %request.to_stage,
                error = %source,
                "stage changed but activity entry was not recorded; manual reconciliation required"
            );
            return Err(PipelineError::ActivityLog {
                client_id: request.client_id,
                applied: request.to_stage,
                source,
            });
        }

        tracing::info!(
            client_id = %entry.client_id,
            from = %entry.from_stage,
            to = %entry.to_stage,
            user = %entry.acting_user_id,
            overridden = entry.reason.is_some(),
            "stage changed"
        );
        Ok(entry)
    }

    /// Reject no-ops and missing reasons; normalize the reason to a trimmed
    /// non-empty string or `None`.
    fn validate(mut request: StageChangeRequest) -> Result<StageChangeRequest, PipelineError> {
        if request.from_stage == request.to_stage {
            return Err(PipelineError::SameStage(request.to_stage));
        }

        request.reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        match Self::classify(request.from_stage, request.to_stage) {
            TransitionClass::RequiresReason if request.reason.is_none() => {
                Err(PipelineError::ReasonRequired {
                    from: request.from_stage,
                    to: request.to_stage,
                })
            }
            _ => Ok(request),
        }
    }
}
