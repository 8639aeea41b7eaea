//! End-to-end status scenarios over the in-memory source.

use async_trait::async_trait;
use chrono::Duration;
use proptest::prelude::*;

use atelier_core::{
    Bid, BidId, BidWithEvents, CollectionId, CostInput, CostInputId, DesignId, DesignWithMeta,
    DomainEvent, EventId, EventType, QuoteId, Timestamp, UserId,
};
use atelier_status::{
    determine_submission_status, ensure_assignable, has_active_bids, pricing_reminders,
    summarize_collections, BidSource, DesignSource, EngineConfig, MemorySource, PricingReminder,
    SourceError, SourceResult, StatusError,
};

fn now() -> Timestamp {
    Timestamp::parse("2026-03-01T12:00:00Z").unwrap()
}

struct Timeline {
    next: Timestamp,
}

impl Timeline {
    fn starting(at: Timestamp) -> Self {
        Self { next: at }
    }

    fn tick(&mut self) -> Timestamp {
        let at = self.next;
        self.next = at.shifted(Duration::minutes(1));
        at
    }
}

// ── Active bids ─────────────────────────────────────────────────────

struct BidFixture {
    source: MemorySource,
    quote_id: QuoteId,
    admin: UserId,
    partner: UserId,
    timeline: Timeline,
}

impl BidFixture {
    fn new() -> Self {
        Self {
            source: MemorySource::new(),
            quote_id: QuoteId::new(),
            admin: UserId::new(),
            partner: UserId::new(),
            timeline: Timeline::starting(now().shifted(Duration::hours(-3))),
        }
    }

    fn bid(&mut self) -> BidId {
        let bid = Bid {
            id: BidId::new(),
            created_at: self.timeline.tick(),
            quote_id: self.quote_id,
            bid_price_cents: 125_000,
            project_due_in_ms: Some(14 * 24 * 60 * 60 * 1000),
            description: Some("Cut and sew".to_string()),
        };
        let id = bid.id;
        self.source.insert_bid(bid);
        id
    }

    fn record(&mut self, bid_id: BidId, event_type: EventType) {
        let (actor_id, target_id) = match event_type {
            EventType::BidDesign | EventType::RemovePartner => (self.admin, Some(self.partner)),
            _ => (self.partner, None),
        };
        self.source.append_event(DomainEvent {
            id: EventId::new(),
            created_at: self.timeline.tick(),
            actor_id,
            target_id,
            event_type,
            design_id: DesignId::new(),
            bid_id: Some(bid_id),
            quote_id: Some(self.quote_id),
        });
    }
}

#[tokio::test]
async fn accepted_bid_blocks_reassignment() {
    let mut fx = BidFixture::new();
    let accepted = fx.bid();
    fx.record(accepted, EventType::BidDesign);
    fx.record(accepted, EventType::AcceptServiceBid);
    let untouched = fx.bid();
    fx.record(untouched, EventType::RequestServiceBid);

    let config = EngineConfig::default();
    let active = has_active_bids(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap();
    assert!(active);

    let err = ensure_assignable(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StatusError::DuplicateAssignment { quote_id, user_id }
            if quote_id == fx.quote_id && user_id == fx.partner
    ));
}

#[tokio::test]
async fn rejected_bid_allows_reassignment() {
    let mut fx = BidFixture::new();
    let rejected = fx.bid();
    fx.record(rejected, EventType::BidDesign);
    fx.record(rejected, EventType::RejectServiceBid);

    let config = EngineConfig::default();
    let active = has_active_bids(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap();
    assert!(!active);
    ensure_assignable(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap();
}

#[tokio::test]
async fn unanswered_bid_lapses_with_ttl() {
    let mut fx = BidFixture::new();
    let open = fx.bid();
    fx.record(open, EventType::BidDesign);

    let config = EngineConfig::default();
    assert!(has_active_bids(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap());

    let tomorrow = now().shifted(Duration::hours(24));
    assert!(!has_active_bids(&fx.source, fx.quote_id, fx.partner, tomorrow, &config)
        .await
        .unwrap());
}

#[tokio::test]
async fn another_partners_bid_is_not_counted() {
    let mut fx = BidFixture::new();
    let open = fx.bid();
    fx.record(open, EventType::BidDesign);

    let stranger = UserId::new();
    let config = EngineConfig::default();
    let active = has_active_bids(&fx.source, fx.quote_id, stranger, now(), &config)
        .await
        .unwrap();
    assert!(!active);
}

#[tokio::test]
async fn removed_after_accept_is_inactive() {
    let mut fx = BidFixture::new();
    let bid = fx.bid();
    fx.record(bid, EventType::BidDesign);
    fx.record(bid, EventType::AcceptServiceBid);
    fx.record(bid, EventType::RemovePartner);

    let config = EngineConfig::default();
    let active = has_active_bids(&fx.source, fx.quote_id, fx.partner, now(), &config)
        .await
        .unwrap();
    assert!(!active);
}

// ── Submission status ───────────────────────────────────────────────

fn design(
    collection_id: CollectionId,
    events: &[EventType],
    expirations: &[Option<Timestamp>],
) -> DesignWithMeta {
    let id = DesignId::new();
    let owner = UserId::new();
    let mut timeline = Timeline::starting(now().shifted(Duration::days(-3)));
    DesignWithMeta {
        id,
        collection_id,
        cost_inputs: expirations
            .iter()
            .map(|expires_at| CostInput {
                id: CostInputId::new(),
                design_id: id,
                expires_at: *expires_at,
            })
            .collect(),
        events: events
            .iter()
            .map(|event_type| DomainEvent {
                id: EventId::new(),
                created_at: timeline.tick(),
                actor_id: owner,
                target_id: None,
                event_type: *event_type,
                design_id: id,
                bid_id: None,
                quote_id: None,
            })
            .collect(),
    }
}

const SUBMITTED: &[EventType] = &[EventType::SubmitDesign];
const COSTED: &[EventType] = &[EventType::SubmitDesign, EventType::CommitCostInputs];
const CHECKED_OUT: &[EventType] = &[
    EventType::SubmitDesign,
    EventType::CommitCostInputs,
    EventType::CommitQuote,
];
const PAIRED: &[EventType] = &[
    EventType::SubmitDesign,
    EventType::CommitCostInputs,
    EventType::CommitQuote,
    EventType::CommitPartnerPairing,
];

#[tokio::test]
async fn mixed_collection_is_only_submitted() {
    let source = MemorySource::new();
    let collection = CollectionId::new();
    let in_week = now().shifted(Duration::days(7));
    source.insert_design_with_meta(design(collection, CHECKED_OUT, &[Some(in_week)]));
    source.insert_design_with_meta(design(collection, SUBMITTED, &[]));

    let statuses = determine_submission_status(&source, &[collection], now())
        .await
        .unwrap();
    let status = &statuses[&collection];
    assert!(status.is_submitted);
    assert!(!status.is_costed);
    assert!(!status.is_quoted);
    assert!(!status.is_paired);
    assert_eq!(status.pricing_expires_at, Some(in_week));
}

#[tokio::test]
async fn every_requested_collection_is_reported() {
    let source = MemorySource::new();
    let paired = CollectionId::new();
    let empty = CollectionId::new();
    let unrequested = CollectionId::new();
    source.insert_design_with_meta(design(paired, PAIRED, &[None]));
    source.insert_design_with_meta(design(paired, PAIRED, &[None]));
    source.insert_design_with_meta(design(unrequested, SUBMITTED, &[]));

    let statuses = determine_submission_status(&source, &[paired, empty], now())
        .await
        .unwrap();

    assert_eq!(statuses.len(), 2);
    let full = &statuses[&paired];
    assert!(full.is_submitted && full.is_costed && full.is_quoted && full.is_paired);
    assert_eq!(full.pricing_expires_at, None);

    let nothing = &statuses[&empty];
    assert!(!nothing.is_submitted);
    assert_eq!(nothing.pricing_expires_at, None);
}

#[tokio::test]
async fn earliest_future_expiration_wins() {
    let source = MemorySource::new();
    let collection = CollectionId::new();
    let in_two_days = now().shifted(Duration::days(2));
    source.insert_design_with_meta(design(
        collection,
        COSTED,
        &[
            Some(now().shifted(Duration::days(-1))),
            None,
            Some(now().shifted(Duration::days(5))),
        ],
    ));
    source.insert_design_with_meta(design(collection, COSTED, &[Some(in_two_days)]));

    let statuses = determine_submission_status(&source, &[collection], now())
        .await
        .unwrap();
    assert!(statuses[&collection].is_costed);
    assert_eq!(statuses[&collection].pricing_expires_at, Some(in_two_days));
}

#[tokio::test]
async fn lapsed_pricing_drops_costed() {
    let source = MemorySource::new();
    let collection = CollectionId::new();
    let yesterday = now().shifted(Duration::days(-1));
    source.insert_design_with_meta(design(collection, COSTED, &[Some(yesterday)]));

    let statuses = determine_submission_status(&source, &[collection], now())
        .await
        .unwrap();
    let status = &statuses[&collection];
    assert!(!status.is_submitted);
    assert!(!status.is_costed);
    assert_eq!(status.pricing_expires_at, None);
}

// ── Pricing reminders ───────────────────────────────────────────────

#[tokio::test]
async fn reminders_follow_pricing_windows() {
    let source = MemorySource::new();
    let week_out = CollectionId::new();
    let two_days_out = CollectionId::new();
    let lapsed = CollectionId::new();
    let quoted = CollectionId::new();
    let fresh = CollectionId::new();

    source.insert_design_with_meta(design(
        week_out,
        COSTED,
        &[Some(now().shifted(Duration::days(5)))],
    ));
    source.insert_design_with_meta(design(
        two_days_out,
        COSTED,
        &[Some(now().shifted(Duration::hours(36)))],
    ));
    source.insert_design_with_meta(design(
        lapsed,
        COSTED,
        &[Some(now().shifted(Duration::hours(-6)))],
    ));
    source.insert_design_with_meta(design(
        quoted,
        CHECKED_OUT,
        &[Some(now().shifted(Duration::days(1)))],
    ));
    source.insert_design_with_meta(design(
        fresh,
        COSTED,
        &[Some(now().shifted(Duration::days(30)))],
    ));

    let ids = [week_out, two_days_out, lapsed, quoted, fresh];
    let reminders = pricing_reminders(&source, &ids, now(), &EngineConfig::default())
        .await
        .unwrap();

    assert_eq!(reminders.len(), 3);
    assert_eq!(reminders[&week_out], PricingReminder::OneWeek);
    assert_eq!(reminders[&two_days_out], PricingReminder::TwoDays);
    assert_eq!(reminders[&lapsed], PricingReminder::JustExpired);
    assert!(!reminders.contains_key(&quoted));
    assert!(!reminders.contains_key(&fresh));
}

// ── Source failures ─────────────────────────────────────────────────

struct DownSource;

#[async_trait]
impl BidSource for DownSource {
    async fn find_events_for_bid(&self, _bid_id: BidId) -> SourceResult<Vec<DomainEvent>> {
        Err(SourceError::Unavailable("replica offline".to_string()))
    }

    async fn find_bids_with_events_for_quote_and_user(
        &self,
        _quote_id: QuoteId,
        _user_id: UserId,
    ) -> SourceResult<Vec<BidWithEvents>> {
        Err(SourceError::Unavailable("replica offline".to_string()))
    }
}

#[async_trait]
impl DesignSource for DownSource {
    async fn find_events_for_design(&self, _design_id: DesignId) -> SourceResult<Vec<DomainEvent>> {
        Err(SourceError::Unavailable("replica offline".to_string()))
    }

    async fn find_designs_with_costs_and_events_by_collection_ids(
        &self,
        _collection_ids: &[CollectionId],
    ) -> SourceResult<Vec<DesignWithMeta>> {
        Err(SourceError::Unavailable("replica offline".to_string()))
    }
}

#[tokio::test]
async fn source_failures_propagate() {
    let config = EngineConfig::default();

    let err = has_active_bids(&DownSource, QuoteId::new(), UserId::new(), now(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, StatusError::Source(SourceError::Unavailable(_))));

    let err = determine_submission_status(&DownSource, &[CollectionId::new()], now())
        .await
        .unwrap_err();
    assert!(matches!(err, StatusError::Source(SourceError::Unavailable(_))));

    let err = pricing_reminders(&DownSource, &[CollectionId::new()], now(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, StatusError::Source(SourceError::Unavailable(_))));
}

#[tokio::test]
async fn services_accept_trait_objects() {
    let source: Box<dyn DesignSource> = Box::new(MemorySource::new());
    let collection = CollectionId::new();
    let statuses = determine_submission_status(source.as_ref(), &[collection], now())
        .await
        .unwrap();
    assert!(!statuses[&collection].is_submitted);
}

// ── Milestone chain ─────────────────────────────────────────────────

fn arb_design(collection_id: CollectionId) -> impl Strategy<Value = DesignWithMeta> {
    let events = prop::collection::vec(prop::sample::select(EventType::all().to_vec()), 0..8);
    let expirations = prop::collection::vec(prop::option::of(-72i64..72), 0..3);
    (events, expirations).prop_map(move |(events, offsets)| {
        let expirations: Vec<Option<Timestamp>> = offsets
            .into_iter()
            .map(|hours| hours.map(|h| now().shifted(Duration::hours(h))))
            .collect();
        design(collection_id, &events, &expirations)
    })
}

proptest! {
    #[test]
    fn milestones_form_a_chain(
        designs in prop::collection::vec(arb_design(CollectionId::default()), 0..5)
    ) {
        let collection = designs
            .first()
            .map(|d| d.collection_id)
            .unwrap_or_default();
        let statuses = summarize_collections(&[collection], &designs, now());
        let status = &statuses[&collection];

        prop_assert!(!status.is_paired || status.is_quoted);
        prop_assert!(!status.is_quoted || status.is_costed);
        prop_assert!(!status.is_costed || status.is_submitted);
        if designs.is_empty() {
            prop_assert!(!status.is_submitted);
        }
        if let Some(expires_at) = status.pricing_expires_at {
            prop_assert!(expires_at > now());
        }
    }
}
