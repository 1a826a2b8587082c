use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use parterre_booking::{AdminSelection, BookingError, ReservationService};
use parterre_catalog::pricing::{FlatPricer, PricingConfig};
use parterre_catalog::venue::grand_theatre_sections;
use parterre_catalog::{Catalog, Show};
use parterre_core::payment::{
    CheckoutUrls, LineItem, PaymentError, PaymentGateway, ProviderCheckout,
};
use parterre_core::repository::ReservationStore;
use parterre_core::reservation::{
    CustomerDetails, SeatLock, SeatStatus, SettlementOutcome, UnavailabilityReason,
};
use parterre_store::{BusinessRules, DbClient, SqliteReservationStore};

const SHOW: &str = "S1";
const SEAT_A: &str = "ORCHESTRA|L|12";
const SEAT_B: &str = "ORCHESTRA|L|13";
const SEAT_C: &str = "ORCHESTRA|L|15";
const SECURITY_SEAT: &str = "THIRD_GALLERY|A|40";

struct FakeGateway {
    calls: Mutex<Vec<(Vec<LineItem>, DateTime<Utc>)>>,
    next_id: Mutex<u32>,
    fail: bool,
}

impl FakeGateway {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<(Vec<LineItem>, DateTime<Utc>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        items: &[LineItem],
        _currency: &str,
        expires_at: DateTime<Utc>,
        _urls: &CheckoutUrls,
    ) -> Result<ProviderCheckout, PaymentError> {
        if self.fail {
            return Err(PaymentError::Rejected("card testing disabled".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push((items.to_vec(), expires_at));
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(ProviderCheckout {
            id: format!("cs_test_{}", *next_id),
            redirect_url: "https://pay.example.test/session".to_string(),
        })
    }
}

struct Harness {
    service: ReservationService,
    store: Arc<SqliteReservationStore>,
    gateway: Arc<FakeGateway>,
}

async fn harness() -> Harness {
    harness_with(BusinessRules::default(), FakeGateway::new()).await
}

async fn harness_with(rules: BusinessRules, gateway: FakeGateway) -> Harness {
    let db = DbClient::in_memory().await.expect("in-memory database");
    db.migrate().await.expect("migrations");

    let store = Arc::new(SqliteReservationStore::new(db.pool.clone()));
    let gateway = Arc::new(gateway);

    let shows = vec![Show {
        id: SHOW.to_string(),
        title: "La Nuit des Etoiles".to_string(),
        date: Utc.with_ymd_and_hms(2026, 9, 18, 20, 30, 0).unwrap(),
    }];
    let catalog = Arc::new(Catalog::new(shows, &grand_theatre_sections()));
    let pricer = Arc::new(FlatPricer::new(PricingConfig::default()));

    let service = ReservationService::new(
        store.clone(),
        catalog,
        pricer,
        gateway.clone(),
        rules,
    );

    Harness {
        service,
        store,
        gateway,
    }
}

fn urls() -> CheckoutUrls {
    CheckoutUrls {
        success_url: "http://localhost/?success=true".to_string(),
        cancel_url: "http://localhost/basket?canceled=true".to_string(),
    }
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Jeanne Martin".to_string(),
        email: "jeanne@example.test".to_string(),
    }
}

#[tokio::test]
async fn test_second_session_conflicts_on_locked_seat() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    // Session B races on the same seat plus a free one: the whole batch is
    // refused and names the contested seat.
    let err = h
        .service
        .submit_selection(SHOW, "session-b", &[SEAT_A.to_string(), SEAT_B.to_string()])
        .await
        .unwrap_err();
    match err {
        BookingError::SeatsConflict { seat_ids } => {
            assert_eq!(seat_ids, vec![SEAT_A.to_string()])
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    // All or nothing: session B holds nothing at all.
    assert!(h
        .service
        .basket("session-b")
        .await
        .unwrap()
        .is_empty());

    // A different seat goes through.
    h.service
        .submit_selection(SHOW, "session-b", &[SEAT_B.to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_successful_selection_locks_exclusively() {
    let h = harness().await;
    let before = Utc::now();

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string(), SEAT_B.to_string()])
        .await
        .unwrap();

    let basket = h.service.basket("session-a").await.unwrap();
    assert_eq!(basket.len(), 2);
    for line in &basket {
        assert_eq!(line.lock.session_id, "session-a");
        // Stored at millisecond precision, so compare with a little slack.
        assert!(line.lock.locked_until > before + Duration::minutes(14));
        assert_eq!(line.unit_amount_cents, 1050);
    }

    let unavailable = h.service.unavailable_seats(SHOW).await.unwrap();
    let ids: Vec<&str> = unavailable.iter().map(|u| u.seat_id.as_str()).collect();
    assert!(ids.contains(&SEAT_A) && ids.contains(&SEAT_B));
    for seat in &unavailable {
        assert!(matches!(
            seat.reason,
            UnavailabilityReason::Locked { ref session_id, .. } if session_id == "session-a"
        ));
    }
}

#[tokio::test]
async fn test_resubmitting_replaces_own_locks() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string(), SEAT_B.to_string()])
        .await
        .unwrap();

    // Same session narrows its selection; its own stale locks never count
    // as conflicts.
    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    let locks = h
        .store
        .locks_for_seats(SHOW, &[SEAT_A.to_string(), SEAT_B.to_string()])
        .await
        .unwrap();
    // Exactly one row for the re-selected seat; the dropped seat's lock was
    // only replaced where it was re-selected, so SEAT_B's row is untouched.
    assert_eq!(
        locks
            .iter()
            .filter(|lock| lock.seat_id == SEAT_A)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_expiry_is_observational_not_destructive() {
    let h = harness().await;

    // Simulate an expired lock: the row exists, the claim does not.
    h.store
        .insert_locks(&[SeatLock {
            show_id: SHOW.to_string(),
            seat_id: SEAT_A.to_string(),
            session_id: "session-a".to_string(),
            locked_until: Utc::now() - Duration::seconds(1),
            checkout_ref: None,
            has_child_on_lap: false,
        }])
        .await
        .unwrap();

    let unavailable = h.service.unavailable_seats(SHOW).await.unwrap();
    assert!(unavailable.iter().all(|u| u.seat_id != SEAT_A));

    // Session B claims the seat; the stale row does not stand in the way.
    h.service
        .submit_selection(SHOW, "session-b", &[SEAT_A.to_string()])
        .await
        .unwrap();

    let basket = h.service.basket("session-b").await.unwrap();
    assert_eq!(basket.len(), 1);
    assert_eq!(basket[0].seat.id, SEAT_A);
}

#[tokio::test]
async fn test_security_seats_are_never_sellable() {
    let h = harness().await;
    let err = h
        .service
        .submit_selection(SHOW, "session-a", &[SECURITY_SEAT.to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SeatNotSellable(_)));
}

#[tokio::test]
async fn test_unknown_show_and_seat_are_not_found() {
    let h = harness().await;
    assert!(matches!(
        h.service
            .submit_selection("NOPE", "session-a", &[SEAT_A.to_string()])
            .await
            .unwrap_err(),
        BookingError::ShowNotFound(_)
    ));
    assert!(matches!(
        h.service
            .submit_selection(SHOW, "session-a", &["ORCHESTRA|Z|1".to_string()])
            .await
            .unwrap_err(),
        BookingError::SeatNotFound(_)
    ));
}

#[tokio::test]
async fn test_remove_seat_only_touches_own_lock() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();
    h.service
        .submit_selection(SHOW, "session-b", &[SEAT_B.to_string()])
        .await
        .unwrap();

    // Removing a seat someone else holds is a no-op by construction.
    h.service
        .remove_seat("session-a", SHOW, SEAT_B)
        .await
        .unwrap();
    assert_eq!(h.service.basket("session-b").await.unwrap().len(), 1);

    h.service
        .remove_seat("session-a", SHOW, SEAT_A)
        .await
        .unwrap();
    assert!(h.service.basket("session-a").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_child_on_lap_is_a_billing_modifier() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    h.service
        .set_child_on_lap("session-a", SHOW, SEAT_A, true)
        .await
        .unwrap();
    let basket = h.service.basket("session-a").await.unwrap();
    assert_eq!(basket[0].unit_amount_cents, 1550);

    h.service
        .set_child_on_lap("session-a", SHOW, SEAT_A, false)
        .await
        .unwrap();
    let basket = h.service.basket("session-a").await.unwrap();
    assert_eq!(basket[0].unit_amount_cents, 1050);

    // Not in the basket, nothing to modify.
    assert!(matches!(
        h.service
            .set_child_on_lap("session-a", SHOW, SEAT_B, true)
            .await
            .unwrap_err(),
        BookingError::SeatNotInBasket(_)
    ));
}

#[tokio::test]
async fn test_checkout_extends_never_shortens() {
    let h = harness().await;
    let before = Utc::now();

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    let checkout = h.service.begin_checkout("session-a", &urls()).await.unwrap();
    assert_eq!(checkout.redirect_url, "https://pay.example.test/session");

    let locks = h
        .store
        .locks_for_checkout_ref(&checkout.id)
        .await
        .unwrap();
    assert_eq!(locks.len(), 1);
    // 15 minutes remained; now roughly 45 do, never less than before.
    assert!(locks[0].locked_until > before + Duration::minutes(44));

    // The payment session expires when the lock does.
    let calls = h.gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.timestamp(), locks[0].locked_until.timestamp());
    assert_eq!(calls[0].0.len(), 1);
    assert_eq!(calls[0].0[0].unit_amount_cents, 1050);
    assert_eq!(calls[0].0[0].quantity, 1);
    assert!(calls[0].0[0].description.contains("Orchestre"));
}

#[tokio::test]
async fn test_checkout_requires_a_basket_and_an_open_house() {
    let h = harness().await;
    assert!(matches!(
        h.service.begin_checkout("session-a", &urls()).await.unwrap_err(),
        BookingError::EmptyBasket
    ));

    let closed = harness_with(
        BusinessRules {
            booking_open: false,
            ..BusinessRules::default()
        },
        FakeGateway::new(),
    )
    .await;
    closed
        .service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();
    assert!(matches!(
        closed
            .service
            .begin_checkout("session-a", &urls())
            .await
            .unwrap_err(),
        BookingError::BookingClosed
    ));
}

#[tokio::test]
async fn test_provider_failure_leaves_locks_untouched() {
    let h = harness_with(BusinessRules::default(), FakeGateway::failing()).await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();
    let before = h.service.basket("session-a").await.unwrap()[0]
        .lock
        .clone();

    assert!(matches!(
        h.service.begin_checkout("session-a", &urls()).await.unwrap_err(),
        BookingError::Payment(_)
    ));

    let after = h.service.basket("session-a").await.unwrap()[0].lock.clone();
    assert_eq!(after.locked_until, before.locked_until);
    assert_eq!(after.checkout_ref, None);
}

#[tokio::test]
async fn test_settlement_is_atomic_and_idempotent() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string(), SEAT_B.to_string()])
        .await
        .unwrap();
    let checkout = h.service.begin_checkout("session-a", &urls()).await.unwrap();

    let outcome = h
        .service
        .confirm_settlement(&checkout.id, &customer())
        .await
        .unwrap();
    match outcome {
        SettlementOutcome::Settled { seats } => assert_eq!(seats.len(), 2),
        other => panic!("expected settled, got {other:?}"),
    }

    // Locks converted, not duplicated: the pair now lives in purchased
    // seats only.
    assert!(h
        .store
        .locks_for_checkout_ref(&checkout.id)
        .await
        .unwrap()
        .is_empty());
    let purchased = h.store.purchased_seats_for_show(SHOW).await.unwrap();
    assert_eq!(purchased.len(), 2);
    assert!(purchased.iter().all(|seat| seat.purchase_id == checkout.id));

    let purchase = h.store.purchase(&checkout.id).await.unwrap().unwrap();
    assert_eq!(purchase.name, "Jeanne Martin");

    // A second identical delivery changes nothing further.
    let outcome = h
        .service
        .confirm_settlement(&checkout.id, &customer())
        .await
        .unwrap();
    assert_eq!(outcome, SettlementOutcome::AlreadySettled);
    assert_eq!(
        h.store.purchased_seats_for_show(SHOW).await.unwrap().len(),
        2
    );

    // And the seats stay unavailable, now as purchases.
    let unavailable = h.service.unavailable_seats(SHOW).await.unwrap();
    assert!(unavailable
        .iter()
        .all(|u| matches!(u.reason, UnavailabilityReason::Purchased { .. })));
    assert_eq!(unavailable.len(), 2);
}

#[tokio::test]
async fn test_settlement_for_unknown_reference_is_an_integrity_error() {
    let h = harness().await;
    assert!(matches!(
        h.service
            .confirm_settlement("cs_test_unknown", &customer())
            .await
            .unwrap_err(),
        BookingError::NoSeatsForRef(_)
    ));
}

#[tokio::test]
async fn test_purchased_seats_reject_new_selections() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();
    let checkout = h.service.begin_checkout("session-a", &urls()).await.unwrap();
    h.service
        .confirm_settlement(&checkout.id, &customer())
        .await
        .unwrap();

    let err = h
        .service
        .submit_selection(SHOW, "session-b", &[SEAT_A.to_string()])
        .await
        .unwrap_err();
    match err {
        BookingError::SeatsConflict { seat_ids } => {
            assert_eq!(seat_ids, vec![SEAT_A.to_string()])
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_admin_conflicts_on_a_stale_screen() {
    let h = harness().await;

    // A customer locks the seat while the admin's screen still shows it
    // available.
    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    let err = h
        .service
        .set_seat_statuses(
            SHOW,
            &[AdminSelection {
                seat_id: SEAT_A.to_string(),
                expected: SeatStatus::Available,
            }],
        )
        .await
        .unwrap_err();
    match err {
        BookingError::StaleAdminView { seat_ids } => {
            assert_eq!(seat_ids, vec![SEAT_A.to_string()])
        }
        other => panic!("expected stale view, got {other:?}"),
    }

    // Nothing was applied: the seat is still just locked, not purchased.
    let unavailable = h.service.unavailable_seats(SHOW).await.unwrap();
    assert_eq!(unavailable.len(), 1);
    assert!(matches!(
        unavailable[0].reason,
        UnavailabilityReason::Locked { .. }
    ));
}

#[tokio::test]
async fn test_admin_batch_is_all_or_nothing() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();

    // One stale entry poisons the whole batch; the free seat stays free.
    let err = h
        .service
        .set_seat_statuses(
            SHOW,
            &[
                AdminSelection {
                    seat_id: SEAT_B.to_string(),
                    expected: SeatStatus::Available,
                },
                AdminSelection {
                    seat_id: SEAT_A.to_string(),
                    expected: SeatStatus::Available,
                },
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::StaleAdminView { .. }));

    assert!(h
        .store
        .purchased_seats_for_show(SHOW)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_admin_allocates_and_releases_seats() {
    let h = harness().await;

    // Box-office sale of two seats in one batch.
    h.service
        .set_seat_statuses(
            SHOW,
            &[
                AdminSelection {
                    seat_id: SEAT_A.to_string(),
                    expected: SeatStatus::Available,
                },
                AdminSelection {
                    seat_id: SEAT_B.to_string(),
                    expected: SeatStatus::Available,
                },
            ],
        )
        .await
        .unwrap();

    let purchased = h.store.purchased_seats_for_show(SHOW).await.unwrap();
    assert_eq!(purchased.len(), 2);
    let purchase_id = purchased[0].purchase_id.clone();
    assert!(purchase_id.starts_with("admin-"));
    assert!(purchased.iter().all(|s| s.purchase_id == purchase_id));

    // Releasing one seat keeps the purchase record alive.
    h.service
        .set_seat_statuses(
            SHOW,
            &[AdminSelection {
                seat_id: SEAT_A.to_string(),
                expected: SeatStatus::Purchased,
            }],
        )
        .await
        .unwrap();
    assert!(h.store.purchase(&purchase_id).await.unwrap().is_some());

    // Releasing the last seat garbage-collects it.
    h.service
        .set_seat_statuses(
            SHOW,
            &[AdminSelection {
                seat_id: SEAT_B.to_string(),
                expected: SeatStatus::Purchased,
            }],
        )
        .await
        .unwrap();
    assert!(h.store.purchase(&purchase_id).await.unwrap().is_none());
    assert!(h
        .store
        .purchased_seats_for_show(SHOW)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_admin_releases_any_sessions_lock() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_C.to_string()])
        .await
        .unwrap();

    h.service
        .set_seat_statuses(
            SHOW,
            &[AdminSelection {
                seat_id: SEAT_C.to_string(),
                expected: SeatStatus::Locked,
            }],
        )
        .await
        .unwrap();

    assert!(h.service.unavailable_seats(SHOW).await.unwrap().is_empty());
    assert!(h.service.basket("session-a").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mutual_exclusion_across_claims() {
    let h = harness().await;

    h.service
        .submit_selection(SHOW, "session-a", &[SEAT_A.to_string()])
        .await
        .unwrap();
    let checkout = h.service.begin_checkout("session-a", &urls()).await.unwrap();
    h.service
        .confirm_settlement(&checkout.id, &customer())
        .await
        .unwrap();

    // At any instant a seat is claimed by at most one of lock or purchase.
    let locks = h
        .store
        .locks_for_seats(SHOW, &[SEAT_A.to_string()])
        .await
        .unwrap();
    let purchased = h.store.purchased_seats_for_show(SHOW).await.unwrap();
    let now = Utc::now();
    let active_locks = locks.iter().filter(|l| l.is_active(now)).count();
    assert_eq!(active_locks + purchased.len(), 1);
}
