use werewolf_core::{
    Action, ActionArgs, ActionError, Ballot, Clock, DayPhase, GameStatus, Group, InstanceId,
    InstanceState, Job, NoteError, PlayerIdentifier, StateError, SubmitOutcome, UserId, VoteType,
};
use werewolf_runtime::{
    Event, GameEvent, InstanceHandle, InstanceSetup, Runtime, RuntimeConfig, RuntimeError, Topic,
    VoteEvent,
};

const GAME_MASTER: UserId = UserId(100);

fn config() -> RuntimeConfig {
    RuntimeConfig {
        opening_minute: Some(12 * 60),
        role_seed: 11,
        ..RuntimeConfig::default()
    }
}

fn lobby(runtime: &mut Runtime, id: u32, players: u32) -> InstanceHandle {
    let setup = InstanceSetup::new(InstanceId(id), GAME_MASTER).with_users((1..=players).map(UserId));
    runtime
        .create_instance(setup)
        .expect("instance should be created")
}

async fn started(players: u32) -> (Runtime, InstanceHandle) {
    let mut runtime = Runtime::builder()
        .config(config())
        .build()
        .await
        .expect("runtime should build");
    let handle = lobby(&mut runtime, 1, players);
    handle
        .start_game(GAME_MASTER)
        .await
        .expect("game master can start the game");
    (runtime, handle)
}

fn wolves(state: &InstanceState) -> Vec<PlayerIdentifier> {
    state
        .alive_players()
        .filter(|player| player.is_werewolf())
        .map(|player| player.id)
        .collect()
}

fn villagers(state: &InstanceState) -> Vec<PlayerIdentifier> {
    state
        .alive_players()
        .filter(|player| !player.is_werewolf())
        .map(|player| player.id)
        .collect()
}

async fn ongoing_vote(handle: &InstanceHandle, vote_type: VoteType) -> werewolf_core::VoteRecord {
    handle
        .ongoing_votes()
        .await
        .expect("votes should load")
        .into_iter()
        .find(|record| record.vote_type == vote_type)
        .expect("vote should be running")
}

#[tokio::test]
async fn start_game_enters_the_opening_day_and_opens_elections() {
    let mut runtime = Runtime::builder()
        .config(config())
        .build()
        .await
        .expect("runtime should build");
    let handle = lobby(&mut runtime, 1, 4);

    let denied = handle.start_game(UserId(1)).await;
    assert!(matches!(denied, Err(RuntimeError::State(StateError::NoPermission))));

    let clock = handle.start_game(GAME_MASTER).await.expect("game should start");
    assert_eq!(clock, Clock::new(1, DayPhase::Day));

    let state = handle.query_state().await.expect("state query");
    assert_eq!(state.status, GameStatus::Running);
    assert_eq!(wolves(&state).len(), 1);
    assert!(state.players().all(|player| player.house.is_some()));

    let mut types: Vec<_> = handle
        .ongoing_votes()
        .await
        .expect("votes should load")
        .into_iter()
        .map(|record| record.vote_type)
        .collect();
    types.sort();
    assert_eq!(types, vec![VoteType::Mayor, VoteType::AlphaWolf]);

    let again = handle.start_game(GAME_MASTER).await;
    assert!(matches!(again, Err(RuntimeError::State(StateError::GameAlreadyStarted))));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn lynching_the_only_wolf_ends_the_game() {
    let mut runtime = Runtime::builder()
        .config(config())
        .build()
        .await
        .expect("runtime should build");
    let handle = lobby(&mut runtime, 1, 4);
    let mut game_events = handle.subscribe(Topic::Game);
    handle.start_game(GAME_MASTER).await.expect("game should start");

    let state = handle.query_state().await.expect("state query");
    let wolf = wolves(&state)[0];

    let clock = handle.advance_phase().await.expect("enter VOTE");
    assert_eq!(clock.phase, DayPhase::Vote);
    let lynch = ongoing_vote(&handle, VoteType::Lynch).await;
    assert_eq!(lynch.allowed().len(), 4);

    for voter in state.alive_ids() {
        let outcome = handle
            .submit_ballot(lynch.id, voter, Ballot::new(voter, wolf))
            .await
            .expect("ballot should be accepted");
        assert_eq!(outcome, SubmitOutcome::Recorded);
    }

    handle.advance_phase().await.expect("enter EXECUTION");
    let clock = handle.advance_phase().await.expect("enter EVENING");
    assert_eq!(clock, Clock::new(1, DayPhase::Evening));

    let state = handle.query_state().await.expect("state query");
    assert!(!state.player(wolf).expect("wolf exists").is_alive());
    assert_eq!(
        state.status,
        GameStatus::Ended {
            winner: Some(Group::Townspeople)
        }
    );

    let started = game_events.recv().await.expect("start event");
    assert!(matches!(
        started,
        Event::Game(GameEvent::GameStarted { players: 4, .. })
    ));
    let won = game_events.recv().await.expect("win event");
    assert!(matches!(
        won,
        Event::Game(GameEvent::GameWon {
            winner: Group::Townspeople,
            ..
        })
    ));

    let late = handle.advance_phase().await;
    assert!(matches!(late, Err(RuntimeError::State(StateError::GameEnded))));
    let sealed = handle.update_deathnote(wolf, "too late").await;
    assert!(matches!(
        sealed,
        Err(RuntimeError::Note(NoteError::ModificationNotAllowed))
    ));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn alpha_wolf_vote_ends_early_and_the_wolf_kills_at_night() {
    let (runtime, handle) = started(4).await;
    let state = handle.query_state().await.expect("state query");
    let wolf = wolves(&state)[0];
    let victim = villagers(&state)[0];
    let victim_house = state.player(victim).and_then(|p| p.house).expect("victim house");

    let mut vote_events = handle.subscribe(Topic::Vote);
    let election = ongoing_vote(&handle, VoteType::AlphaWolf).await;
    let outcome = handle
        .submit_ballot(election.id, wolf, Ballot::new(wolf, wolf))
        .await
        .expect("wolf may vote");
    assert_eq!(outcome, SubmitOutcome::Unanimous);

    let state = handle.query_state().await.expect("state query");
    assert!(state.player(wolf).expect("wolf").has_job(Job::AlphaWolf));
    assert!(
        handle
            .ongoing_votes()
            .await
            .expect("votes")
            .iter()
            .all(|record| record.vote_type != VoteType::AlphaWolf)
    );
    assert!(matches!(
        vote_events.recv().await.expect("ballot event"),
        Event::Vote(VoteEvent::BallotRecorded { .. })
    ));
    assert!(matches!(
        vote_events.recv().await.expect("end event"),
        Event::Vote(VoteEvent::VoteEnded {
            vote_type: VoteType::AlphaWolf,
            forced: true,
            ..
        })
    ));

    for _ in 0..3 {
        handle.advance_phase().await.expect("advance to EVENING");
    }
    let info = handle.information(wolf).await.expect("information");
    let kill = info
        .iter()
        .find(|entry| entry.action == Action::AlphaWolfKill)
        .expect("alpha wolf can kill in the evening");
    assert!(kill.eligible.locations.contains(&victim_house));

    let stored = handle
        .perform_action(wolf, Action::AlphaWolfKill, ActionArgs::locations([victim_house]))
        .await
        .expect("kill should be accepted");
    // Move and kill for the visit, then the walk home.
    assert_eq!(stored.len(), 3);

    let clock = handle.advance_phase().await.expect("enter NIGHT");
    assert_eq!(clock.phase, DayPhase::Night);
    let state = handle.query_state().await.expect("state query");
    assert!(state.player(victim).expect("victim").is_marked());

    handle.advance_phase().await.expect("enter MORNING");
    let clock = handle.advance_phase().await.expect("enter DAY");
    assert_eq!(clock, Clock::new(2, DayPhase::Day));

    let state = handle.query_state().await.expect("state query");
    assert!(!state.player(victim).expect("victim").is_alive());
    assert!(state.player(wolf).expect("wolf").is_alive());
    assert_eq!(state.status, GameStatus::Running);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_abilities_leave_the_instance_untouched() {
    let (runtime, handle) = started(4).await;
    let before = handle.query_state().await.expect("state query");
    let villager = villagers(&before)[0];
    let house = before.player(villager).and_then(|p| p.house).expect("house");

    let result = handle
        .perform_action(villager, Action::AlphaWolfKill, ActionArgs::locations([house]))
        .await;
    assert!(matches!(
        result,
        Err(RuntimeError::Action(ActionError::NoPermission(_)))
    ));

    let after = handle.query_state().await.expect("state query");
    assert_eq!(before, after);
    assert_eq!(handle.clear_actions().await.expect("clear"), 0);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn deathnotes_of_living_players_can_change() {
    let (runtime, handle) = started(3).await;
    let player = PlayerIdentifier::new(InstanceId(1), UserId(2));

    handle
        .update_deathnote(player, "it was the baker")
        .await
        .expect("alive players may write");
    let state = handle.query_state().await.expect("state query");
    assert_eq!(
        state.player(player).expect("player").deathnote.content(),
        "it was the baker"
    );

    let too_long = "x".repeat(werewolf_core::GameConfig::DEATHNOTE_MAX_LENGTH + 1);
    let result = handle.update_deathnote(player, too_long).await;
    assert!(matches!(
        result,
        Err(RuntimeError::Note(NoteError::ContentTooLong { .. }))
    ));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn votes_belong_to_their_instance() {
    let mut runtime = Runtime::builder()
        .config(config())
        .build()
        .await
        .expect("runtime should build");
    let first = lobby(&mut runtime, 1, 3);
    let second = lobby(&mut runtime, 2, 3);
    first.start_game(GAME_MASTER).await.expect("first game");
    second.start_game(GAME_MASTER).await.expect("second game");

    let mayor = ongoing_vote(&first, VoteType::Mayor).await;
    let voter = PlayerIdentifier::new(InstanceId(2), UserId(1));
    let result = second
        .submit_ballot(mayor.id, voter, Ballot::new(voter, voter))
        .await;
    assert!(matches!(result, Err(RuntimeError::UnknownVote(id)) if id == mayor.id));

    let duplicate = runtime.create_instance(InstanceSetup::new(InstanceId(1), GAME_MASTER));
    assert!(matches!(duplicate, Err(RuntimeError::InstanceExists(_))));
    assert_eq!(runtime.instance_ids(), vec![InstanceId(1), InstanceId(2)]);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn clearing_discards_queued_actions() {
    let (runtime, handle) = started(4).await;
    let state = handle.query_state().await.expect("state query");
    let wolf = wolves(&state)[0];
    let victim = villagers(&state)[0];
    let house = state.player(victim).and_then(|p| p.house).expect("house");

    let election = ongoing_vote(&handle, VoteType::AlphaWolf).await;
    handle
        .submit_ballot(election.id, wolf, Ballot::new(wolf, wolf))
        .await
        .expect("wolf may vote");
    handle
        .perform_action(wolf, Action::AlphaWolfKill, ActionArgs::locations([house]))
        .await
        .expect("kill should be accepted");

    assert_eq!(handle.clear_actions().await.expect("clear"), 3);
    handle.advance_phase().await.expect("enter VOTE");
    let state = handle.query_state().await.expect("state query");
    assert!(!state.player(victim).expect("victim").is_marked());

    runtime.shutdown().await.expect("shutdown");
}
