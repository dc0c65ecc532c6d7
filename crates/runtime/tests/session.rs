use std::path::PathBuf;

use horde_content::{ContentFactory, QuestKind};
use horde_core::{
    BoardBuilder, CellPos, DecisionOptions, Environment, EquipmentKind, GameConfig, GameState,
    PhaseTag, PlayerId, Survivor, ZoneId,
};
use horde_runtime::{
    DecisionAnswer, DecisionEvent, Event, Runtime, RuntimeError, ScriptedProvider, SessionStatus,
    StaleReason, TacticalAi, Topic,
};

fn factory() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../game/content/data"))
}

/// One street zone with Ann in it and nothing hostile on the board.
fn quiet_state() -> GameState {
    let board = BoardBuilder::new(2, 1)
        .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
        .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
        .start(CellPos::new(0, 0))
        .build()
        .unwrap();
    let mut state = GameState::new(GameConfig::default(), board);
    state.add_player("p0");
    let ann = state
        .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
        .unwrap();
    state.give_equipment(ann, EquipmentKind::Sword).unwrap();
    state
}

async fn play_scenario(name: &str, seed: u64) -> (horde_core::GameOver, GameState) {
    let session = factory().build_session(name, Some(seed)).unwrap();
    let rally = match session.scenario.quest {
        QuestKind::ObjectiveHunt { exit, .. } => Some(ZoneId(exit)),
        QuestKind::Holdout { .. } => None,
    };
    let players: Vec<PlayerId> = session.state.players.iter().map(|p| p.id).collect();

    let mut builder = Runtime::builder().session(session);
    for player in players {
        let mut ai = TacticalAi::new(seed ^ u64::from(player.0));
        if let Some(zone) = rally {
            ai = ai.rally_at(zone);
        }
        builder = builder.seat(player, ai);
    }
    let runtime = builder.build().await.unwrap();
    let handle = runtime.handle();

    let outcome = handle.finished().await.unwrap();
    let state = handle.query_state().await.unwrap();
    runtime.shutdown().await.unwrap();
    (outcome, state)
}

fn waiting(status: SessionStatus) -> (u64, horde_core::DecisionRequest) {
    match status {
        SessionStatus::Waiting { ticket, request } => (ticket, request),
        other => panic!("expected a pending decision, got {other:?}"),
    }
}

#[tokio::test]
async fn tactical_ai_finishes_every_bundled_scenario() {
    for name in ["outpost", "crossroads"] {
        let (outcome, state) = play_scenario(name, 11).await;
        assert_eq!(state.outcome, Some(outcome), "{name}");
        assert_eq!(state.phases.tags(), vec![PhaseTag::GameOver], "{name}");
    }
}

#[tokio::test]
async fn same_seed_replays_the_same_session() {
    let (first_outcome, first) = play_scenario("outpost", 4).await;
    let (second_outcome, second) = play_scenario("outpost", 4).await;
    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first, second);
}

#[tokio::test]
async fn external_seat_answers_through_the_handle() {
    let runtime = Runtime::builder()
        .initial_state(quiet_state())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut decisions = handle.subscribe(Topic::Decision);

    let (ticket, request) = waiting(handle.settled().await.unwrap());
    assert_eq!(request.phase, PhaseTag::ActionSelect);
    assert_eq!(request.player, Some(PlayerId(0)));
    let DecisionOptions::Moves(options) = &request.options else {
        panic!("expected the move catalogue");
    };
    let end_turn = options.len() - 1;
    match decisions.recv().await.unwrap() {
        Event::Decision(DecisionEvent::Requested { ticket: t, .. }) => assert_eq!(t, ticket),
        other => panic!("unexpected event {other:?}"),
    }

    // an old ticket and an impossible index are both dropped
    let err = handle
        .answer(DecisionAnswer::pick(ticket + 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::StaleTicket { .. }));
    let err = handle
        .answer(DecisionAnswer::pick(ticket, options.len()))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::AnswerOutOfRange { .. }));
    match decisions.recv().await.unwrap() {
        Event::Decision(DecisionEvent::Stale { reason, .. }) => {
            assert_eq!(reason, StaleReason::OldTicket)
        }
        other => panic!("unexpected event {other:?}"),
    }

    let before = handle.query_state().await.unwrap();
    handle
        .answer(DecisionAnswer::pick(ticket, end_turn))
        .await
        .unwrap();
    let (next, request) = waiting(handle.settled().await.unwrap());
    assert!(next > ticket);
    assert_eq!(request.phase, PhaseTag::ActionSelect);
    assert_eq!(
        handle.query_state().await.unwrap().round.number,
        before.round.number + 1
    );

    // undo lands back on the first decision with a fresh ticket
    assert_eq!(handle.undo().await.unwrap(), before.round.number);
    let (again, _) = waiting(handle.settled().await.unwrap());
    assert!(again > next);
    assert_eq!(handle.query_state().await.unwrap(), before);
    assert!(matches!(
        handle.undo().await.unwrap_err(),
        RuntimeError::NothingToUndo
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn answers_for_bound_seats_are_refused() {
    let runtime = Runtime::builder()
        .initial_state(quiet_state())
        .seat(PlayerId(0), ScriptedProvider::default())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let (ticket, _) = waiting(handle.settled().await.unwrap());
    let err = handle
        .answer(DecisionAnswer::pick(ticket, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotExternalSeat { .. }));
    assert!(matches!(
        handle.finished().await.unwrap_err(),
        RuntimeError::Unanswered { .. }
    ));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn build_rejects_unplayable_states() {
    let err = Runtime::builder().build().await.err().unwrap();
    assert!(matches!(err, RuntimeError::MissingState));

    let board = BoardBuilder::new(1, 1)
        .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
        .start(CellPos::new(0, 0))
        .build()
        .unwrap();
    let empty = GameState::new(GameConfig::default(), board);
    let err = Runtime::builder()
        .initial_state(empty)
        .build()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RuntimeError::Setup(_)));
}
