#![allow(non_snake_case)]

use river_lobby::chat::Role;
use river_lobby::client::AppController;
use river_lobby::commentary::CommentaryTrigger;
use river_lobby::pitboss::PitBossGateway;
use river_lobby::session::GameView;
use river_lobby::test_helpers::{
    FixedChance,
    ScriptedSource,
    logged_in_controller,
    test_config,
};

#[tokio::test]
async fn login__seeds_balance_view_and_exactly_one_welcome_message() {
    // given
    let source = ScriptedSource::empty();
    let gateway = PitBossGateway::new(source);
    let mut controller = AppController::new(
        &test_config(),
        gateway,
        CommentaryTrigger::new(Box::new(FixedChance(0.0))),
    );

    // when
    controller.login("Alice", "Slots", 12_000);

    // then
    assert_eq!(controller.session.balance(), 12_000);
    assert_eq!(controller.session.active_view(), GameView::Lobby);
    assert_eq!(controller.session.chat.len(), 1);
    let welcome = controller.session.chat.entries()[0].clone();
    assert_eq!(welcome.role, Role::Assistant);
    assert!(welcome.text.contains("Alice"));
    assert!(welcome.text.contains("Slots"));
    assert!(!controller.session.is_assistant_busy());
}

#[tokio::test]
async fn login__marks_the_session_as_entered() {
    let source = ScriptedSource::empty();
    let controller = logged_in_controller(source, Box::new(FixedChance(0.0)));

    assert!(controller.session.has_entered);
    assert_eq!(controller.session.username, "Alice");
    assert_eq!(controller.session.selected_game, "Slots");
}
