//! Donation lifecycle engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use validator::Validate;

use foodshare_core::config::NotificationConfig;
use foodshare_core::error::{AppError, ErrorKind};
use foodshare_core::events::{DomainEvent, DonationEvent};
use foodshare_core::result::AppResult;
use foodshare_core::traits::record_store::UpdateOutcome;
use foodshare_core::types::{Document, DonationId, FilterField, Role, UserId, from_document};
use foodshare_entity::donation::{Donation, DonationStatus, TransferableFields};
use foodshare_entity::notification::NotificationEventType;
use foodshare_entity::schedule::ScheduleDetails;

use super::request::CreateDonationRequest;
use super::transition::TransitionRule;
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::records::Records;
use crate::schedule::ScheduleService;
use crate::stats::StatsService;
use crate::visibility::order_newest_first;

/// Capacity of the domain event channel.
const EVENT_BUFFER: usize = 256;

/// Owns the donation state machine and its side effects.
///
/// Every status write is a conditional update on the status that was read,
/// so competing transitions on one donation linearize at the store.
#[derive(Debug, Clone)]
pub struct DonationService {
    /// Record store handle.
    records: Records,
    /// Fulfillment schedules.
    schedules: Arc<ScheduleService>,
    /// Notification fan-out.
    notifications: Arc<NotificationService>,
    /// Donor stats.
    stats: Arc<StatsService>,
    /// Audit log.
    audit: Arc<AuditService>,
    /// Roles told about new donations.
    creation_audience: Vec<Role>,
    /// Domain event channel.
    events: broadcast::Sender<DomainEvent>,
}

impl DonationService {
    /// Creates a new donation service.
    pub fn new(
        records: Records,
        schedules: Arc<ScheduleService>,
        notifications: Arc<NotificationService>,
        stats: Arc<StatsService>,
        audit: Arc<AuditService>,
        config: &NotificationConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            records,
            schedules,
            notifications,
            stats,
            audit,
            creation_audience: config.new_donation_audience.clone(),
            events,
        }
    }

    /// Receives every domain event published after this call.
    pub fn subscribe_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    /// Creates a pending donation together with its fulfillment schedule.
    ///
    /// The schedule is written first and the donation last; if the donation
    /// write fails the schedule is removed again. Repeating a request whose
    /// donation already exists only re-sends the creation notifications.
    pub async fn create_donation(
        &self,
        ctx: &RequestContext,
        request: CreateDonationRequest,
    ) -> AppResult<DonationId> {
        ctx.require_role(Role::Donor)?;
        if ctx.user_id != request.donor_id {
            return Err(AppError::forbidden(
                "Donors can only create donations for themselves",
            ));
        }
        request.validate()?;
        let quantity = u32::try_from(request.quantity)
            .map_err(|_| AppError::validation("Quantity must be a positive integer"))?;
        let details = request.schedule.into_details(request.method)?;

        if let Some(existing) = self
            .records
            .get::<Donation>(Donation::COLLECTION, &request.donation_id.key())
            .await?
        {
            if existing.donor_id != request.donor_id {
                return Err(AppError::conflict(format!(
                    "Donation {} already exists",
                    existing.id
                )));
            }
            debug!(
                donation_id = %existing.id,
                actor_id = %ctx.user_id,
                "Donation already created, finishing follow-up writes"
            );
            self.stats.record_created(existing.donor_id, existing.id).await?;
            self.announce_creation(&existing).await?;
            return Ok(existing.id);
        }

        let donation = Donation {
            id: request.donation_id,
            donor_id: request.donor_id,
            collector_id: None,
            item_name: request.item_name.trim().to_string(),
            quantity,
            unit: request.unit.trim().to_string(),
            category: request.category,
            impact_type: request.impact_type,
            image_url: request.image_url,
            method: request.method,
            status: DonationStatus::Pending,
            manufacturing_date: request.manufacturing_date,
            expiry_date: request.expiry_date,
            donor_name: request.donor_name,
            donor_city: request.donor_city,
            schedule_id: None,
            rejected_by: BTreeSet::new(),
            is_redonation: false,
            original_donation_id: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let donation = self.persist_new(ctx, donation, details).await?;
        self.stats.record_created(donation.donor_id, donation.id).await?;
        self.announce_creation(&donation).await?;

        info!(
            donation_id = %donation.id,
            actor_id = %ctx.user_id,
            method = %donation.method,
            quantity = donation.quantity,
            "Donation created"
        );
        self.publish(DomainEvent::new(
            Some(ctx.user_id),
            DonationEvent::Created {
                donation_id: donation.id,
            },
        ));
        Ok(donation.id)
    }

    /// Copies a terminal donation into a new pending donation.
    ///
    /// Fails with `MissingFields` if the source record lacks anything the
    /// copy needs; nothing is written in that case.
    pub async fn redonate(
        &self,
        ctx: &RequestContext,
        source_id: DonationId,
    ) -> AppResult<DonationId> {
        let doc = self
            .records
            .get_raw(Donation::COLLECTION, &source_id.key())
            .await?
            .ok_or_else(|| not_found(source_id))?;

        let status = doc
            .get(Donation::STATUS)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<DonationStatus>().ok())
            .ok_or_else(|| {
                AppError::missing_fields(format!(
                    "Donation {source_id} cannot be donated again, missing: status"
                ))
            })?;
        if !status.is_terminal() {
            return Err(AppError::invalid_transition(format!(
                "Only delivered or rejected donations can be donated again, {source_id} is {status}"
            )));
        }

        let fields = TransferableFields::from_document(&doc).map_err(|missing| {
            AppError::missing_fields(format!(
                "Donation {source_id} cannot be donated again, missing: {}",
                missing.join(", ")
            ))
        })?;
        if !ctx.is_admin() && ctx.user_id != fields.donor_id {
            return Err(AppError::forbidden(
                "Only the donor or an admin can donate this again",
            ));
        }

        let source_schedule = self
            .schedules
            .schedule_for(source_id)
            .await?
            .ok_or_else(|| {
                AppError::missing_fields(format!(
                    "Donation {source_id} cannot be donated again, missing: fulfillment schedule"
                ))
            })?;
        if source_schedule.method() != fields.method {
            return Err(AppError::missing_fields(format!(
                "Donation {source_id} cannot be donated again, its schedule is for {} not {}",
                source_schedule.method(),
                fields.method
            )));
        }

        let donation = Donation {
            id: DonationId::new(),
            donor_id: fields.donor_id,
            collector_id: None,
            item_name: fields.item_name,
            quantity: fields.quantity,
            unit: fields.unit,
            category: fields.category,
            impact_type: fields.impact_type,
            image_url: fields.image_url,
            method: fields.method,
            status: DonationStatus::Pending,
            manufacturing_date: fields.manufacturing_date,
            expiry_date: fields.expiry_date,
            donor_name: fields.donor_name,
            donor_city: fields.donor_city,
            schedule_id: None,
            rejected_by: BTreeSet::new(),
            is_redonation: true,
            original_donation_id: Some(source_id),
            created_at: Utc::now(),
            updated_at: None,
        };

        let donation = self
            .persist_new(ctx, donation, source_schedule.details)
            .await?;
        self.stats.record_created(donation.donor_id, donation.id).await?;
        self.announce_creation(&donation).await?;

        info!(
            donation_id = %donation.id,
            source_id = %source_id,
            actor_id = %ctx.user_id,
            "Donation re-listed"
        );
        self.publish(DomainEvent::new(
            Some(ctx.user_id),
            DonationEvent::Redonated {
                donation_id: donation.id,
                source_id,
            },
        ));
        Ok(donation.id)
    }

    /// Writes the schedule, then the donation, removing the schedule again if
    /// the donation write is known to have failed.
    async fn persist_new(
        &self,
        ctx: &RequestContext,
        mut donation: Donation,
        details: ScheduleDetails,
    ) -> AppResult<Donation> {
        let schedule = self.schedules.schedule_details(donation.id, details).await?;
        donation.schedule_id = Some(schedule.id);
        let key = donation.id.key();

        match self
            .records
            .insert(Donation::COLLECTION, &key, &donation)
            .await
        {
            Ok(true) => Ok(donation),
            Ok(false) => {
                let err = AppError::conflict(format!("Donation {} already exists", donation.id));
                self.roll_back_creation(ctx, donation.id, &err).await;
                Err(err)
            }
            Err(e) if e.kind == ErrorKind::StoreUnavailable => {
                // The insert may have landed before the timeout.
                match self.records.get::<Donation>(Donation::COLLECTION, &key).await {
                    Ok(Some(stored)) if stored.schedule_id == donation.schedule_id => {
                        debug!(donation_id = %donation.id, "Donation write landed despite timeout");
                        Ok(stored)
                    }
                    Ok(_) => {
                        self.roll_back_creation(ctx, donation.id, &e).await;
                        Err(e)
                    }
                    Err(_) => {
                        warn!(
                            donation_id = %donation.id,
                            "Donation write outcome unknown, keeping its schedule"
                        );
                        Err(e)
                    }
                }
            }
            Err(e) => {
                self.roll_back_creation(ctx, donation.id, &e).await;
                Err(e)
            }
        }
    }

    async fn roll_back_creation(
        &self,
        ctx: &RequestContext,
        donation_id: DonationId,
        cause: &AppError,
    ) {
        warn!(
            donation_id = %donation_id,
            actor_id = %ctx.user_id,
            error = %cause,
            "Donation write failed, removing its schedule"
        );
        if let Err(e) = self.schedules.remove(donation_id).await {
            warn!(donation_id = %donation_id, error = %e, "Schedule removal failed");
        }

        let event = DomainEvent::new(
            Some(ctx.user_id),
            DonationEvent::CreationRolledBack {
                donation_id,
                reason: cause.to_string(),
            },
        );
        if let Err(e) = self.audit.record(&event).await {
            warn!(donation_id = %donation_id, error = %e, "Audit of rollback failed");
        }
        self.publish(event);
    }

    /// Tells the donor about the new donation, and the creation audience
    /// while the donation is still open to them.
    async fn announce_creation(&self, donation: &Donation) -> AppResult<()> {
        self.notifications
            .notify_user(
                NotificationEventType::DonationCreated,
                Some(donation.id),
                donation.donor_id,
            )
            .await?;
        if donation.status != DonationStatus::Pending {
            return Ok(());
        }
        self.notifications
            .notify_audience(
                NotificationEventType::NewDonationAvailable,
                Some(donation.id),
                &self.creation_audience,
            )
            .await?;
        Ok(())
    }

    /// Claims a pending donation for the calling NGO.
    ///
    /// Exactly one of several competing NGOs succeeds; the others get
    /// `AlreadyClaimed`. Accepting a donation the caller already holds
    /// succeeds again. A timed-out write is settled by re-reading the
    /// donation.
    pub async fn accept_donation(
        &self,
        ctx: &RequestContext,
        donation_id: DonationId,
    ) -> AppResult<Donation> {
        ctx.require_role(Role::Ngo)?;

        let mut patch = status_patch(DonationStatus::Accepted)?;
        patch.insert(
            Donation::COLLECTOR_ID.to_string(),
            Value::String(ctx.user_id.key()),
        );
        let pending = [FilterField::eq(
            Donation::STATUS,
            DonationStatus::Pending.as_str(),
        )];

        let key = donation_id.key();
        let outcome = match self
            .records
            .conditional_update(Donation::COLLECTION, &key, patch, &pending)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) if e.kind == ErrorKind::StoreUnavailable => {
                warn!(
                    donation_id = %donation_id,
                    actor_id = %ctx.user_id,
                    "Accept timed out, re-reading donation"
                );
                match self.records.get_raw(Donation::COLLECTION, &key).await {
                    Ok(Some(doc)) => UpdateOutcome::PreconditionFailed(doc),
                    Ok(None) => UpdateOutcome::Missing,
                    Err(_) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        match outcome {
            UpdateOutcome::Applied(doc) => {
                let donation: Donation = from_document(doc)?;
                self.notify_donor_of_acceptance(&donation).await?;
                info!(
                    donation_id = %donation_id,
                    actor_id = %ctx.user_id,
                    "Donation accepted"
                );
                self.publish(DomainEvent::new(
                    Some(ctx.user_id),
                    DonationEvent::Accepted {
                        donation_id,
                        collector_id: ctx.user_id,
                    },
                ));
                Ok(donation)
            }
            UpdateOutcome::PreconditionFailed(doc) => {
                let donation: Donation = from_document(doc)?;
                match (donation.status, donation.collector_id) {
                    (DonationStatus::Accepted, Some(collector)) if collector == ctx.user_id => {
                        debug!(
                            donation_id = %donation_id,
                            actor_id = %ctx.user_id,
                            "Donation already accepted by caller"
                        );
                        self.notify_donor_of_acceptance(&donation).await?;
                        Ok(donation)
                    }
                    (DonationStatus::Accepted, Some(collector)) => {
                        warn!(
                            donation_id = %donation_id,
                            actor_id = %ctx.user_id,
                            collector_id = %collector,
                            "Accept lost to another NGO"
                        );
                        Err(AppError::already_claimed(format!(
                            "Donation {donation_id} was already accepted by another organisation"
                        )))
                    }
                    (DonationStatus::Pending, None) => Err(AppError::store_unavailable(format!(
                        "Accepting donation {donation_id} did not complete"
                    ))),
                    _ => Err(AppError::invalid_transition(format!(
                        "Donation {donation_id} is {}, not pending",
                        donation.status
                    ))),
                }
            }
            UpdateOutcome::Missing => Err(not_found(donation_id)),
        }
    }

    /// Hides a pending donation from the calling NGO's list.
    ///
    /// Rejecting twice is a no-op. The donation stays pending for everyone
    /// else.
    pub async fn reject_by_ngo(
        &self,
        ctx: &RequestContext,
        donation_id: DonationId,
    ) -> AppResult<()> {
        ctx.require_role(Role::Ngo)?;

        let pending = [FilterField::eq(
            Donation::STATUS,
            DonationStatus::Pending.as_str(),
        )];
        let outcome = self
            .records
            .append_to_set(
                Donation::COLLECTION,
                &donation_id.key(),
                Donation::REJECTED_BY,
                Value::String(ctx.user_id.key()),
                &pending,
            )
            .await?;

        match outcome {
            UpdateOutcome::Applied(_) => {
                info!(
                    donation_id = %donation_id,
                    actor_id = %ctx.user_id,
                    "Donation rejected by NGO"
                );
                self.publish(DomainEvent::new(
                    Some(ctx.user_id),
                    DonationEvent::RejectedByNgo {
                        donation_id,
                        ngo_id: ctx.user_id,
                    },
                ));
                Ok(())
            }
            UpdateOutcome::PreconditionFailed(doc) => {
                let status = doc
                    .get(Donation::STATUS)
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                Err(AppError::invalid_transition(format!(
                    "Donation {donation_id} is {status}, not pending"
                )))
            }
            UpdateOutcome::Missing => Err(not_found(donation_id)),
        }
    }

    /// Moves a donation along one edge of the transition table.
    ///
    /// Fails with `InvalidTransition` for edges outside the table, `Forbidden`
    /// for the wrong actor, and `InvalidTransition` if the status changed
    /// between the read and the write. Asking the collector's edge into
    /// `collected` or `delivered` again after it was taken succeeds and
    /// repeats only the keyed follow-up writes.
    pub async fn advance_status(
        &self,
        ctx: &RequestContext,
        donation_id: DonationId,
        target: DonationStatus,
    ) -> AppResult<Donation> {
        let donation = self.get_donation(donation_id).await?;
        if let Some(rule) = TransitionRule::authorize_repeat(&donation, target, ctx)? {
            debug!(
                donation_id = %donation_id,
                actor_id = %ctx.user_id,
                status = %target,
                "Status already reached, finishing follow-up writes"
            );
            self.after_transition(rule, &donation).await?;
            return Ok(donation);
        }
        let rule = TransitionRule::authorize(&donation, target, ctx)?;

        if rule.to == DonationStatus::Accepted {
            return self.accept_donation(ctx, donation_id).await;
        }

        let expected = [FilterField::eq(Donation::STATUS, rule.from.as_str())];
        let outcome = self
            .records
            .conditional_update(
                Donation::COLLECTION,
                &donation_id.key(),
                status_patch(target)?,
                &expected,
            )
            .await?;

        match outcome {
            UpdateOutcome::Applied(doc) => {
                let updated: Donation = from_document(doc)?;
                self.after_transition(rule, &updated).await?;
                info!(
                    donation_id = %donation_id,
                    actor_id = %ctx.user_id,
                    from = %rule.from,
                    to = %target,
                    "Donation status changed"
                );
                self.publish(DomainEvent::new(
                    Some(ctx.user_id),
                    DonationEvent::StatusChanged {
                        donation_id,
                        from: rule.from.to_string(),
                        to: target.to_string(),
                    },
                ));
                Ok(updated)
            }
            UpdateOutcome::PreconditionFailed(doc) => {
                let current: Donation = from_document(doc)?;
                warn!(
                    donation_id = %donation_id,
                    actor_id = %ctx.user_id,
                    expected = %rule.from,
                    found = %current.status,
                    "Status changed concurrently"
                );
                Err(AppError::invalid_transition(format!(
                    "Donation {donation_id} is now {}, not {}",
                    current.status, rule.from
                )))
            }
            UpdateOutcome::Missing => Err(not_found(donation_id)),
        }
    }

    /// Keyed writes that follow a status change. Safe to repeat.
    async fn after_transition(&self, rule: &TransitionRule, donation: &Donation) -> AppResult<()> {
        match rule.to {
            DonationStatus::Collected => {
                self.notifications
                    .notify_user(
                        NotificationEventType::DonationCollected,
                        Some(donation.id),
                        donation.donor_id,
                    )
                    .await?;
            }
            DonationStatus::Delivered => self.stats.record_delivered(donation).await?,
            _ => {}
        }
        Ok(())
    }

    /// Sets any status outside the transition table. Admin only.
    ///
    /// The collector invariant still holds: a donation with a collector
    /// cannot return to `pending`, and one without a collector cannot be
    /// `accepted`, `collected`, or `delivered`. Every forced change is
    /// audit-logged. Stats and notifications are not touched.
    pub async fn admin_force_status(
        &self,
        ctx: &RequestContext,
        donation_id: DonationId,
        target: DonationStatus,
        reason: Option<String>,
    ) -> AppResult<Donation> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Only admins can force a donation status"));
        }

        let donation = self.get_donation(donation_id).await?;
        let from = donation.status;
        if from == target {
            return Err(AppError::invalid_transition(format!(
                "Donation {donation_id} is already {target}"
            )));
        }
        if target == DonationStatus::Pending && donation.collector_id.is_some() {
            return Err(AppError::invalid_transition(format!(
                "Donation {donation_id} has a collector and cannot return to pending"
            )));
        }
        if target.requires_collector() && donation.collector_id.is_none() {
            return Err(AppError::invalid_transition(format!(
                "Donation {donation_id} has no collector and cannot be {target}"
            )));
        }

        let expected = [FilterField::eq(Donation::STATUS, from.as_str())];
        let outcome = self
            .records
            .conditional_update(
                Donation::COLLECTION,
                &donation_id.key(),
                status_patch(target)?,
                &expected,
            )
            .await?;

        let updated: Donation = match outcome {
            UpdateOutcome::Applied(doc) => from_document(doc)?,
            UpdateOutcome::PreconditionFailed(doc) => {
                let current: Donation = from_document(doc)?;
                return Err(AppError::invalid_transition(format!(
                    "Donation {donation_id} is now {}, not {from}",
                    current.status
                )));
            }
            UpdateOutcome::Missing => return Err(not_found(donation_id)),
        };

        let event = DomainEvent::new(
            Some(ctx.user_id),
            DonationEvent::ForcedStatus {
                donation_id,
                from: from.to_string(),
                to: target.to_string(),
                reason,
            },
        );
        self.audit.record(&event).await?;
        warn!(
            donation_id = %donation_id,
            actor_id = %ctx.user_id,
            from = %from,
            to = %target,
            "Donation status forced by admin"
        );
        self.publish(event);
        Ok(updated)
    }

    async fn notify_donor_of_acceptance(&self, donation: &Donation) -> AppResult<()> {
        self.notifications
            .notify_user(
                NotificationEventType::NgoAssignedDonation,
                Some(donation.id),
                donation.donor_id,
            )
            .await?;
        Ok(())
    }

    /// Fetches one donation.
    pub async fn get_donation(&self, donation_id: DonationId) -> AppResult<Donation> {
        self.records
            .get(Donation::COLLECTION, &donation_id.key())
            .await?
            .ok_or_else(|| not_found(donation_id))
    }

    /// Every donation of a donor, newest first.
    pub async fn donations_by_donor(&self, donor_id: UserId) -> AppResult<Vec<Donation>> {
        self.donations_where(FilterField::eq(Donation::DONOR_ID, donor_id.key()))
            .await
    }

    /// Every donation a collector accepted, newest first.
    pub async fn donations_by_collector(&self, collector_id: UserId) -> AppResult<Vec<Donation>> {
        self.donations_where(FilterField::eq(Donation::COLLECTOR_ID, collector_id.key()))
            .await
    }

    async fn donations_where(&self, filter: FilterField) -> AppResult<Vec<Donation>> {
        let mut donations: Vec<Donation> = self
            .records
            .query(Donation::COLLECTION, &[filter])
            .await?;
        order_newest_first(&mut donations);
        Ok(donations)
    }

    fn publish(&self, event: DomainEvent) {
        debug!(event_id = %event.id, action = event.action(), "Domain event");
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn status_patch(status: DonationStatus) -> AppResult<Document> {
    let mut patch = Document::new();
    patch.insert(
        Donation::STATUS.to_string(),
        Value::String(status.as_str().to_string()),
    );
    patch.insert(
        Donation::UPDATED_AT.to_string(),
        serde_json::to_value(Utc::now())?,
    );
    Ok(patch)
}

fn not_found(donation_id: DonationId) -> AppError {
    AppError::not_found(format!("Donation {donation_id} not found"))
}
