//! The donation status transition table.

use foodshare_core::error::AppError;
use foodshare_core::result::AppResult;
use foodshare_core::types::Role;
use foodshare_entity::donation::{Donation, DonationStatus};

use crate::context::RequestContext;

/// Who may perform a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedActor {
    /// Any NGO; the first to act wins.
    AnyNgo,
    /// Admins only.
    Admin,
    /// The donation's collector, or an admin.
    CollectorOrAdmin,
}

/// One legal edge of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// Status before.
    pub from: DonationStatus,
    /// Status after.
    pub to: DonationStatus,
    /// Who may take this edge.
    pub allowed: AllowedActor,
}

/// Every legal status change. Anything else is an invalid transition.
pub const TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: DonationStatus::Pending,
        to: DonationStatus::Accepted,
        allowed: AllowedActor::AnyNgo,
    },
    TransitionRule {
        from: DonationStatus::Pending,
        to: DonationStatus::Rejected,
        allowed: AllowedActor::Admin,
    },
    TransitionRule {
        from: DonationStatus::Accepted,
        to: DonationStatus::Collected,
        allowed: AllowedActor::CollectorOrAdmin,
    },
    TransitionRule {
        from: DonationStatus::Collected,
        to: DonationStatus::Delivered,
        allowed: AllowedActor::CollectorOrAdmin,
    },
    TransitionRule {
        from: DonationStatus::Accepted,
        to: DonationStatus::Rejected,
        allowed: AllowedActor::CollectorOrAdmin,
    },
];

impl TransitionRule {
    /// The rule for an edge, if the edge is legal.
    pub fn find(from: DonationStatus, to: DonationStatus) -> Option<&'static TransitionRule> {
        TRANSITIONS.iter().find(|rule| rule.from == from && rule.to == to)
    }

    /// Check that the edge from the donation's current status to `to` exists,
    /// then that the caller may take it.
    ///
    /// An unknown edge is `InvalidTransition` whoever asks; a known edge
    /// taken by the wrong actor is `Forbidden`.
    pub fn authorize(
        donation: &Donation,
        to: DonationStatus,
        ctx: &RequestContext,
    ) -> AppResult<&'static TransitionRule> {
        let from = donation.status;
        let rule = Self::find(from, to).ok_or_else(|| {
            AppError::invalid_transition(format!(
                "Donation {} cannot move from {from} to {to}",
                donation.id
            ))
        })?;

        if !rule.permits(donation, ctx) {
            return Err(AppError::forbidden(format!(
                "{} {} may not move donation {} from {from} to {to}",
                ctx.role, ctx.user_id, donation.id
            )));
        }
        Ok(rule)
    }

    /// The edge a repeated request for the donation's current status
    /// retries, if it may be retried.
    ///
    /// Only a status with a single incoming edge owned by the collector can
    /// be asked for again. `None` means the request is not a repeat.
    pub fn authorize_repeat(
        donation: &Donation,
        to: DonationStatus,
        ctx: &RequestContext,
    ) -> AppResult<Option<&'static TransitionRule>> {
        if donation.status != to {
            return Ok(None);
        }
        let mut into = TRANSITIONS.iter().filter(|rule| rule.to == to);
        let rule = match (into.next(), into.next()) {
            (Some(rule), None) if rule.allowed == AllowedActor::CollectorOrAdmin => rule,
            _ => return Ok(None),
        };
        if !rule.permits(donation, ctx) {
            return Err(AppError::forbidden(format!(
                "{} {} may not move donation {} to {to}",
                ctx.role, ctx.user_id, donation.id
            )));
        }
        Ok(Some(rule))
    }

    /// Check if the caller is an allowed actor for this edge.
    pub fn permits(&self, donation: &Donation, ctx: &RequestContext) -> bool {
        match self.allowed {
            AllowedActor::AnyNgo => ctx.role == Role::Ngo,
            AllowedActor::Admin => ctx.is_admin(),
            AllowedActor::CollectorOrAdmin => {
                ctx.is_admin() || (ctx.role == Role::Ngo && donation.is_collector(&ctx.user_id))
            }
        }
    }
}
