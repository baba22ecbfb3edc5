#![allow(non_snake_case)]

use river_lobby::session::{
    GameView,
    SessionState,
};
use river_lobby::test_helpers::{
    FixedChance,
    ScriptedSource,
    logged_in_controller,
};

#[test]
fn go_back__returns_to_the_lobby_from_every_view() {
    for target in [
        GameView::Lobby,
        GameView::Fish,
        GameView::Slots,
        GameView::Creative,
    ] {
        let mut session = SessionState::new();
        session.login("Alice", "Slots", 1_000);
        session.select_view(target);

        session.go_back();

        assert_eq!(session.active_view(), GameView::Lobby);
    }
}

#[test]
fn select_view__only_the_lobby_opens_game_views() {
    let mut session = SessionState::new();
    session.login("Alice", "Slots", 1_000);

    assert!(session.select_view(GameView::Creative));
    // Direct jumps between games are rejected and leave the view unchanged.
    assert!(!session.select_view(GameView::Fish));
    assert!(!session.select_view(GameView::Slots));
    assert_eq!(session.active_view(), GameView::Creative);

    // Lobby is always reachable, and from there any game is.
    assert!(session.select_view(GameView::Lobby));
    assert!(session.select_view(GameView::Fish));
}

#[tokio::test]
async fn enter_game__spawns_the_fish_arena_once() {
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source, Box::new(FixedChance(0.0)));
    assert!(controller.fish.is_none());

    controller.enter_game(GameView::Fish);
    assert!(controller.fish.is_some());
    assert_eq!(controller.session.active_view(), GameView::Fish);

    controller.go_back();
    controller.enter_game(GameView::Slots);
    assert_eq!(controller.session.active_view(), GameView::Slots);
}

#[tokio::test]
async fn spin_slots__settles_the_bet_against_the_session_balance() {
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source, Box::new(FixedChance(0.0)));
    controller.enter_game(GameView::Slots);
    let balance_before = controller.session.balance();
    let bet = controller.slots.bet;

    controller.spin_slots();

    // Whatever the reels show, the stake is debited and the win credited.
    assert_eq!(
        controller.session.balance(),
        balance_before - bet + controller.slots.last_win
    );
    assert_eq!(controller.slots.spins, 1);
}
