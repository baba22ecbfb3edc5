#![allow(non_snake_case)]

use river_lobby::chat::Role;
use river_lobby::test_helpers::{
    FixedChance,
    ScriptedReply,
    ScriptedSource,
    SequenceChance,
    logged_in_controller,
};

#[tokio::test]
async fn notable_event__always_comments_when_every_draw_exceeds_the_threshold() {
    // given
    let source = ScriptedSource::new(vec![
        ScriptedReply::Ok("what a shot".to_string()),
        ScriptedReply::Ok("the house noticed".to_string()),
        ScriptedReply::Ok("keep it up".to_string()),
    ]);
    let mut controller = logged_in_controller(source.clone(), Box::new(FixedChance(0.95)));
    let mut events = controller.take_events();
    let assistant_before = controller.session.chat.len();

    // when
    for _ in 0..3 {
        controller.notable_event("caught the Ocean King");
    }
    for _ in 0..3 {
        let event = events.recv().await.unwrap();
        controller.apply(event);
    }

    // then: exactly one assistant reply per event
    assert_eq!(source.calls(), 3);
    assert_eq!(controller.session.chat.len(), assistant_before + 3);
    assert!(
        controller
            .session
            .chat
            .entries()
            .iter()
            .skip(assistant_before)
            .all(|m| m.role == Role::Assistant)
    );
}

#[tokio::test]
async fn notable_event__never_comments_at_or_below_the_threshold() {
    let source = ScriptedSource::empty();
    let mut controller = logged_in_controller(source.clone(), Box::new(FixedChance(0.7)));
    let log_before = controller.session.chat.len();

    for _ in 0..10 {
        controller.notable_event("spun the reels");
    }

    assert_eq!(source.calls(), 0);
    assert_eq!(controller.session.chat.len(), log_before);
}

#[tokio::test]
async fn notable_event__follows_the_injected_draw_sequence() {
    // given: fire, skip, fire
    let source = ScriptedSource::new(vec![
        ScriptedReply::Ok("one".to_string()),
        ScriptedReply::Ok("two".to_string()),
    ]);
    let chance = SequenceChance::new(vec![0.9, 0.2, 0.8]);
    let mut controller = logged_in_controller(source.clone(), Box::new(chance));
    let mut events = controller.take_events();

    // when
    controller.notable_event("big win");
    controller.notable_event("big win");
    controller.notable_event("big win");
    for _ in 0..2 {
        let event = events.recv().await.unwrap();
        controller.apply(event);
    }

    // then
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn notable_event__commentary_does_not_mark_the_assistant_busy() {
    let source = ScriptedSource::new(vec![ScriptedReply::Ok("nice".to_string())]);
    let mut controller = logged_in_controller(source, Box::new(FixedChance(0.99)));
    let mut events = controller.take_events();

    controller.notable_event("jackpot");
    assert!(!controller.session.is_assistant_busy());
    let event = events.recv().await.unwrap();
    controller.apply(event);

    assert!(!controller.session.is_assistant_busy());
}
