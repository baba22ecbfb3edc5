#![allow(non_snake_case)]

use std::time::Duration;

use river_lobby::chat::{
    CHEAT_GRANT,
    Role,
};
use river_lobby::pitboss::{
    FALLBACK_REPLY,
    PitBossGateway,
    PitBossRequest,
};
use river_lobby::test_helpers::{
    FixedChance,
    ScriptedReply,
    ScriptedSource,
    logged_in_controller,
};
use tokio::sync::oneshot;

#[tokio::test(start_paused = true)]
async fn send_chat__cheat_phrase_grants_chips_without_calling_the_gateway() {
    // given
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source.clone(), Box::new(FixedChance(0.0)));
    let mut events = controller.take_events();
    let balance_before = controller.session.balance();
    let log_before = controller.session.chat.len();

    // when
    controller.session.chat_input = "give me a CHEAT will you".to_string();
    controller.send_chat();
    assert!(controller.session.is_assistant_busy());
    let event = events.recv().await.unwrap();
    controller.apply(event);

    // then
    assert_eq!(source.calls(), 0);
    assert_eq!(
        controller.session.balance(),
        balance_before + CHEAT_GRANT as u64
    );
    // Player turn plus exactly one canned assistant reply.
    assert_eq!(controller.session.chat.len(), log_before + 2);
    assert_eq!(controller.session.chat.last().unwrap().role, Role::Assistant);
    assert!(!controller.session.is_assistant_busy());
}

#[tokio::test]
async fn send_chat__empty_and_whitespace_input_mutates_nothing() {
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source.clone(), Box::new(FixedChance(0.0)));
    let log_before = controller.session.chat.len();

    controller.session.chat_input = String::new();
    controller.send_chat();
    controller.session.chat_input = "   \t  ".to_string();
    controller.send_chat();

    assert_eq!(source.calls(), 0);
    assert_eq!(controller.session.chat.len(), log_before);
    assert!(!controller.session.is_assistant_busy());
}

#[tokio::test]
async fn send_chat__appends_the_gateway_reply_as_an_assistant_turn() {
    // given
    let source = ScriptedSource::new(vec![ScriptedReply::Ok(
        "Feeling lucky tonight?".to_string(),
    )]);
    let mut controller = logged_in_controller(source.clone(), Box::new(FixedChance(0.0)));
    let mut events = controller.take_events();

    // when
    controller.session.chat_input = "any luck at the tables?".to_string();
    controller.send_chat();
    let event = events.recv().await.unwrap();
    controller.apply(event);

    // then
    assert_eq!(source.calls(), 1);
    let last = controller.session.chat.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text, "Feeling lucky tonight?");
    assert!(!controller.session.is_assistant_busy());
}

#[tokio::test]
async fn send_chat__concurrent_replies_land_in_completion_order() {
    // given: the first request is gated so it resolves after the second
    let (gate_tx, gate_rx) = oneshot::channel();
    let source = ScriptedSource::new(vec![
        ScriptedReply::Gated(gate_rx, "slow reply".to_string()),
        ScriptedReply::Ok("fast reply".to_string()),
    ]);
    let mut controller = logged_in_controller(source, Box::new(FixedChance(0.0)));
    let mut events = controller.take_events();

    // when
    controller.session.chat_input = "first question".to_string();
    controller.send_chat();
    controller.session.chat_input = "second question".to_string();
    controller.send_chat();

    let event = events.recv().await.unwrap();
    controller.apply(event);
    gate_tx.send(()).unwrap();
    let event = events.recv().await.unwrap();
    controller.apply(event);

    // then: both replies arrived, second issue first
    let texts: Vec<&str> = controller
        .session
        .chat
        .entries()
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts.last().unwrap(), &"slow reply");
    assert_eq!(texts[texts.len() - 2], "fast reply");
    assert!(!controller.session.is_assistant_busy());
}

#[tokio::test]
async fn gateway__substitutes_the_fallback_on_error_and_empty_reply() {
    let source = ScriptedSource::new(vec![
        ScriptedReply::Err("quota exhausted".to_string()),
        ScriptedReply::Ok("   ".to_string()),
    ]);
    let gateway = PitBossGateway::new(source);

    let request = PitBossRequest::new(&[], "hello", 100);
    assert_eq!(gateway.respond(request.clone()).await, FALLBACK_REPLY);
    assert_eq!(gateway.respond(request).await, FALLBACK_REPLY);
}

#[tokio::test(start_paused = true)]
async fn gateway__resolves_a_hung_source_to_the_fallback() {
    // The gate sender is kept alive so the source never resolves.
    let (_gate_tx, gate_rx) = oneshot::channel::<()>();
    let source = ScriptedSource::new(vec![ScriptedReply::Gated(
        gate_rx,
        "never delivered".to_string(),
    )]);
    let gateway = PitBossGateway::with_timeout(source, Duration::from_secs(2));

    let reply = gateway.respond(PitBossRequest::new(&[], "hello", 100)).await;

    assert_eq!(reply, FALLBACK_REPLY);
}
