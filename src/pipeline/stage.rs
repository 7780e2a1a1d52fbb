use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a client in the sales/delivery funnel.
///
/// The first nine variants form the canonical order:
/// LEAD → AUDIT_SCHEDULED → … → NEGOTIATION → WON.
/// `Lost` and `OnHold` sit outside it and are reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Lead,
    AuditScheduled,
    AuditDone,
    PrototypeBuilding,
    PrototypeDelivered,
    ProposalDraft,
    ProposalSent,
    Negotiation,
    Won,
    Lost,
    OnHold,
}

/// Canonical forward order used for sequencing decisions.
pub const CANONICAL_ORDER: [Stage; 9] = [
    Stage::Lead,
    Stage::AuditScheduled,
    Stage::AuditDone,
    Stage::PrototypeBuilding,
    Stage::PrototypeDelivered,
    Stage::ProposalDraft,
    Stage::ProposalSent,
    Stage::Negotiation,
    Stage::Won,
];

impl Stage {
    pub const ALL: [Stage; 11] = [
        Stage::Lead,
        Stage::AuditScheduled,
        Stage::AuditDone,
        Stage::PrototypeBuilding,
        Stage::PrototypeDelivered,
        Stage::ProposalDraft,
        Stage::ProposalSent,
        Stage::Negotiation,
        Stage::Won,
        Stage::Lost,
        Stage::OnHold,
    ];

    /// Position in [`CANONICAL_ORDER`], or `None` for `Lost`/`OnHold`.
    pub fn canonical_index(self) -> Option<usize> {
        CANONICAL_ORDER.iter().position(|s| *s == self)
    }

    /// True for the stages that live outside the canonical order.
    pub fn is_off_track(self) -> bool {
        matches!(self, Stage::Lost | Stage::OnHold)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lead => "lead",
            Stage::AuditScheduled => "audit_scheduled",
            Stage::AuditDone => "audit_done",
            Stage::PrototypeBuilding => "prototype_building",
            Stage::PrototypeDelivered => "prototype_delivered",
            Stage::ProposalDraft => "proposal_draft",
            Stage::ProposalSent => "proposal_sent",
            Stage::Negotiation => "negotiation",
            Stage::Won => "won",
            Stage::Lost => "lost",
            Stage::OnHold => "on_hold",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}
