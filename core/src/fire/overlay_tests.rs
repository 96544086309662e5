//! Tests for the fire overlay state machine.
//!
//! All tests run on a paused clock; timers auto-advance whenever the
//! runtime goes idle, so the 100ms expiry polling is deterministic.

use std::time::Duration;

use sparrow_types::FireAction;

use crate::device::fake::FakeHub;
use crate::device::StrengthPatch;
use crate::fire::FireOverlay;

fn fire(strength: i32, time: f32) -> FireAction {
    FireAction { strength, time }
}

async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Activation and reconciliation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_fire_applies_measured_delta() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;

    assert!(overlay.is_active().await);
    assert_eq!(overlay.applied_delta().await, 5);
    assert_eq!(hub.strength(), 15);
    assert_eq!(hub.patches(), vec![StrengthPatch::strength_add(5)]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_writer_folded_into_delta() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    // Another client adds 4 between our apply and our follow-up read.
    hub.interfere_after_next_apply(4);
    overlay.trigger(&fire(5, 1.0)).await;

    // Measured, not assumed: requested 5 plus the external 4.
    assert_eq!(overlay.applied_delta().await, 9);
}

#[tokio::test(start_paused = true)]
async fn test_negative_fire_strength_clamped_to_zero() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(-3, 1.0)).await;

    assert_eq!(overlay.applied_delta().await, 0);
    assert_eq!(hub.strength(), 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Re-fire: extension and raise, never sum
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_refire_takes_larger_delta_not_sum() {
    let hub = FakeHub::new(0);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;
    overlay.trigger(&fire(8, 1.0)).await;

    // Only the raise is sent; the attributed total is the larger value.
    assert_eq!(overlay.applied_delta().await, 8);
    assert_eq!(hub.strength(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_refire_with_lower_strength_never_lowers() {
    let hub = FakeHub::new(0);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(8, 1.0)).await;
    overlay.trigger(&fire(3, 1.0)).await;

    assert_eq!(overlay.applied_delta().await, 8);
    assert_eq!(hub.strength(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_refire_without_raise_skips_hub_round_trip() {
    let hub = FakeHub::new(0);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(8, 1.0)).await;
    overlay.trigger(&fire(3, 1.0)).await;

    // Extension only: the second trigger sends nothing to the hub.
    assert_eq!(hub.patches(), vec![StrengthPatch::strength_add(8)]);
    assert_eq!(overlay.applied_delta().await, 8);
}

#[tokio::test(start_paused = true)]
async fn test_refire_extends_expiry_additively() {
    let hub = FakeHub::new(0);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;
    overlay.trigger(&fire(5, 1.0)).await;

    // Two 1s windows stack to ~2s; still active at 1.5s.
    settle(1500).await;
    assert!(overlay.is_active().await);

    // Expired by 2.2s: one reversal of the attributed delta.
    settle(700).await;
    assert!(!overlay.is_active().await);
    assert_eq!(hub.strength(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Expiry reversal
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_expiry_reverses_exactly_once() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;
    settle(1200).await;

    assert!(!overlay.is_active().await);
    assert_eq!(overlay.applied_delta().await, 0);
    let patches = hub.patches();
    assert_eq!(
        patches,
        vec![
            StrengthPatch::strength_add(5),
            StrengthPatch::strength_sub(5),
        ]
    );

    // Further ticks issue nothing more.
    settle(500).await;
    assert_eq!(hub.patches(), patches);
    assert_eq!(hub.strength(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_reversal_uses_measured_delta_under_contention() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    hub.interfere_after_next_apply(4);
    overlay.trigger(&fire(5, 1.0)).await;
    settle(1200).await;

    // Reversal subtracts the measured 9, not the requested 5.
    assert_eq!(*hub.patches().last().unwrap(), StrengthPatch::strength_sub(9));
    assert_eq!(hub.strength(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_overlay_can_reactivate_after_expiry() {
    let hub = FakeHub::new(0);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;
    settle(1200).await;
    assert!(!overlay.is_active().await);

    overlay.trigger(&fire(7, 1.0)).await;
    assert!(overlay.is_active().await);
    assert_eq!(overlay.applied_delta().await, 7);

    settle(1200).await;
    assert_eq!(hub.strength(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure paths
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_pre_read_failure_abandons_activation() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    hub.fail_next_reads(1);
    overlay.trigger(&fire(5, 1.0)).await;

    assert_eq!(overlay.applied_delta().await, 0);
    assert!(hub.patches().is_empty());

    // Delta is zero at expiry, so no reversal is issued either.
    settle(1200).await;
    assert!(hub.patches().is_empty());
    assert_eq!(hub.strength(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_post_apply_read_failure_attributes_requested_value() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    // Pre-apply read succeeds; the follow-up read fails.
    hub.fail_read_after(1);
    overlay.trigger(&fire(5, 1.0)).await;

    // The boost was applied, so the requested value stands in for the
    // unmeasurable diff.
    assert_eq!(overlay.applied_delta().await, 5);
    assert_eq!(hub.strength(), 15);

    // Expiry still reverses that attributed value.
    settle(1200).await;
    assert_eq!(
        *hub.patches().last().unwrap(),
        StrengthPatch::strength_sub(5)
    );
    assert_eq!(hub.strength(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_polling_without_reversal() {
    let hub = FakeHub::new(10);
    let overlay = FireOverlay::new(hub.clone());

    overlay.trigger(&fire(5, 1.0)).await;
    overlay.shutdown().await;

    settle(2000).await;
    // Boost still applied remotely; no reversal was sent.
    assert_eq!(hub.patches(), vec![StrengthPatch::strength_add(5)]);
    assert_eq!(hub.strength(), 15);
}
