//! Per-viewer inbox: direct notifications merged with role broadcasts.

use std::collections::HashMap;

use futures::StreamExt;
use futures::future;
use futures::stream::{self, BoxStream};

use foodshare_core::result::AppResult;
use foodshare_core::types::FilterField;
use foodshare_entity::notification::{NotificationKey, NotificationRecord};

use crate::context::RequestContext;
use crate::records::Records;

/// Reads a viewer's notifications.
#[derive(Debug, Clone)]
pub struct InboxService {
    /// Record store handle.
    records: Records,
}

/// Which half of the inbox a snapshot came from.
enum Half {
    Audience(Vec<NotificationRecord>),
    Direct(Vec<NotificationRecord>),
}

impl InboxService {
    /// Creates a new inbox service.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    fn audience_filter(ctx: &RequestContext) -> Vec<FilterField> {
        vec![FilterField::contains(
            NotificationRecord::AUDIENCE,
            ctx.role.as_str(),
        )]
    }

    fn direct_filter(ctx: &RequestContext) -> Vec<FilterField> {
        vec![FilterField::eq(
            NotificationRecord::TARGET_USER_ID,
            ctx.user_id.key(),
        )]
    }

    /// The caller's current inbox, newest first.
    pub async fn inbox(&self, ctx: &RequestContext) -> AppResult<Vec<NotificationRecord>> {
        let audience = self
            .records
            .query(NotificationRecord::COLLECTION, &Self::audience_filter(ctx))
            .await?;
        let direct = self
            .records
            .query(NotificationRecord::COLLECTION, &Self::direct_filter(ctx))
            .await?;
        Ok(merge_inbox(audience, direct))
    }

    /// The caller's inbox as a live sequence, newest first.
    ///
    /// The first item arrives once both halves have reported; later items
    /// follow changes to either half.
    pub async fn watch_inbox(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<BoxStream<'static, AppResult<Vec<NotificationRecord>>>> {
        let audience = self
            .records
            .subscribe::<NotificationRecord>(
                NotificationRecord::COLLECTION,
                Self::audience_filter(ctx),
            )
            .await?
            .map(|snapshot| snapshot.map(Half::Audience));
        let direct = self
            .records
            .subscribe::<NotificationRecord>(
                NotificationRecord::COLLECTION,
                Self::direct_filter(ctx),
            )
            .await?
            .map(|snapshot| snapshot.map(Half::Direct));

        let merged = stream::select(audience, direct)
            .scan(
                (None, None),
                |latest: &mut (Option<Vec<_>>, Option<Vec<_>>), half| {
                    let item = match half {
                        Err(e) => Some(Err(e)),
                        Ok(half) => {
                            match half {
                                Half::Audience(records) => latest.0 = Some(records),
                                Half::Direct(records) => latest.1 = Some(records),
                            }
                            match latest {
                                (Some(audience), Some(direct)) => {
                                    Some(Ok(merge_inbox(audience.clone(), direct.clone())))
                                }
                                _ => None,
                            }
                        }
                    };
                    future::ready(Some(item))
                },
            )
            .filter_map(future::ready);

        Ok(merged.boxed())
    }
}

/// Merges the two halves of an inbox.
///
/// A record present in both keeps the copy with the later `created_at`. The
/// result is sorted newest first, ties broken by key.
pub fn merge_inbox(
    audience: Vec<NotificationRecord>,
    direct: Vec<NotificationRecord>,
) -> Vec<NotificationRecord> {
    let mut by_key: HashMap<NotificationKey, NotificationRecord> = HashMap::new();
    for record in audience.into_iter().chain(direct) {
        match by_key.get(&record.id) {
            Some(existing) if existing.created_at > record.created_at => {}
            _ => {
                by_key.insert(record.id.clone(), record);
            }
        }
    }

    let mut merged: Vec<NotificationRecord> = by_key.into_values().collect();
    merged.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    merged
}
