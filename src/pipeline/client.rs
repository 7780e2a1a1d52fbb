use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::Stage;

/// A business in the pipeline. Its stage changes only through
/// [`StageTransitionPolicy::apply`](super::StageTransitionPolicy::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            stage: Stage::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A proposed stage change, as produced by a drop target or stage picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChangeRequest {
    pub client_id: String,
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub reason: Option<String>,
}

/// Kind of event recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    StageChanged,
}

/// Immutable audit record of an accepted stage change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub client_id: String,
    pub acting_user_id: String,
    pub action: ActivityAction,
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn stage_changed(request: &StageChangeRequest, acting_user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: request.client_id.clone(),
            acting_user_id: acting_user_id.to_string(),
            action: ActivityAction::StageChanged,
            from_stage: request.from_stage,
            to_stage: request.to_stage,
            reason: request.reason.clone(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_starts_as_lead() {
        let client = Client::new("UAB Žalias Kodas".into());
        assert_eq!(client.stage, Stage::Lead);
        assert_eq!(client.created_at, client.updated_at);
        assert!(!client.id.is_empty());
    }

    #[test]
    fn entry_copies_request_fields() {
        let request = StageChangeRequest {
            client_id: "c1".into(),
            from_stage: Stage::Negotiation,
            to_stage: Stage::Lost,
            reason: Some("Budget cut".into()),
        };
        let entry = ActivityEntry::stage_changed(&request, "u1");
        assert_eq!(entry.client_id, "c1");
        assert_eq!(entry.acting_user_id, "u1");
        assert_eq!(entry.action, ActivityAction::StageChanged);
        assert_eq!(entry.from_stage, Stage::Negotiation);
        assert_eq!(entry.to_stage, Stage::Lost);
        assert_eq!(entry.reason.as_deref(), Some("Budget cut"));
    }

    #[test]
    fn entry_serializes_with_wire_names() {
        let request = StageChangeRequest {
            client_id: "c1".into(),
            from_stage: Stage::Lead,
            to_stage: Stage::AuditScheduled,
            reason: None,
        };
        let entry = ActivityEntry::stage_changed(&request, "u1");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "stage_changed");
        assert_eq!(json["from_stage"], "lead");
        assert_eq!(json["to_stage"], "audit_scheduled");
        assert!(json["reason"].is_null());
    }
}
