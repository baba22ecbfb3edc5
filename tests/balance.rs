#![allow(non_snake_case)]

use proptest::prelude::*;
use river_lobby::session::SessionState;
use river_lobby::test_helpers::{
    FixedChance,
    ScriptedSource,
    logged_in_controller,
};

fn clamped_fold(opening: u64, deltas: &[i64]) -> u64 {
    deltas.iter().fold(opening, |balance, &delta| {
        if delta >= 0 {
            balance.saturating_add(delta as u64)
        } else {
            balance.saturating_sub(delta.unsigned_abs())
        }
    })
}

proptest! {
    #[test]
    fn apply_balance_delta__matches_the_clamped_fold_model(
        opening in 0u64..1_000_000,
        deltas in proptest::collection::vec(-10_000i64..10_000, 0..64),
    ) {
        let mut session = SessionState::new();
        session.login("Alice", "Slots", opening);
        for &delta in &deltas {
            session.apply_balance_delta(delta);
        }
        prop_assert_eq!(session.balance(), clamped_fold(opening, &deltas));
    }

    #[test]
    fn apply_balance_delta__sums_exactly_when_no_debit_crosses_zero(
        opening in 0u64..100_000,
        magnitudes in proptest::collection::vec(0u32..5_000, 0..64),
    ) {
        // Alternate credits and debits, capping each debit at the running
        // balance so no clamp fires; the final balance is then the plain sum.
        let mut session = SessionState::new();
        session.login("Alice", "Slots", opening);
        let mut expected = opening as i128;
        for (i, &m) in magnitudes.iter().enumerate() {
            let delta = if i % 2 == 0 {
                m as i64
            } else {
                -((m as i64).min(expected as i64))
            };
            session.apply_balance_delta(delta);
            expected += delta as i128;
        }
        prop_assert_eq!(session.balance() as i128, expected);
    }
}

#[test]
fn apply_balance_delta__clamps_a_zero_crossing_debit() {
    let mut session = SessionState::new();
    session.login("Alice", "Slots", 300);

    session.apply_balance_delta(-1_000);

    assert_eq!(session.balance(), 0);
}

#[tokio::test(start_paused = true)]
async fn balance__converges_across_interleaved_async_grants_and_game_payouts() {
    // given
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source, Box::new(FixedChance(0.0)));
    let mut events = controller.take_events();
    let opening = controller.session.balance();

    // when: three cheat grants are in flight while synchronous game deltas
    // keep landing between their completions
    for _ in 0..3 {
        controller.session.chat_input = "cheat".to_string();
        controller.send_chat();
    }
    controller.session.apply_balance_delta(-700);
    let event = events.recv().await.unwrap();
    controller.apply(event);
    controller.session.apply_balance_delta(250);
    let event = events.recv().await.unwrap();
    controller.apply(event);
    controller.session.apply_balance_delta(-50);
    let event = events.recv().await.unwrap();
    controller.apply(event);

    // then: opening + 3 * 5000 - 700 + 250 - 50
    assert_eq!(controller.session.balance(), opening + 15_000 - 500);
    assert!(!controller.session.is_assistant_busy());
}
