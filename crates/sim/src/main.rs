//! Werewolf simulation binary.
//!
//! Composition root that builds a [`Runtime`], opens one instance and plays
//! it to the end with scripted players:
//!
//! 1. The wolves elect the wolf with the lowest user id as alpha wolf.
//! 2. Everyone elects the lowest living player as mayor.
//! 3. The town lynches the first living wolf.
//! 4. The alpha wolf visits the house of the first living villager.
//!
//! # Examples
//!
//! ```bash
//! WEREWOLF_SIM_PLAYERS=12 WEREWOLF_ROLE_SEED=7 cargo run -p werewolf-sim
//! ```

use std::env;

use anyhow::Result;
use werewolf_core::{
    Action, ActionArgs, Ballot, DayPhase, GameStatus, InstanceId, InstanceState, Job,
    PlayerIdentifier, SubmitOutcome, UserId, VoteRecord, VoteType,
};
use werewolf_runtime::{InstanceHandle, InstanceSetup, Runtime, RuntimeConfig, setup_logging};

const GAME_MASTER: UserId = UserId(0);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = RuntimeConfig::from_env();
    let players = read_env("WEREWOLF_SIM_PLAYERS").unwrap_or(8u32);
    let max_phases = read_env("WEREWOLF_SIM_MAX_PHASES").unwrap_or(60u32);

    // 2. Setup logging; the guard flushes the log file on exit
    let _guard = setup_logging(&config)?;
    tracing::info!(players, max_phases, seed = config.role_seed, "Starting werewolf simulation");

    // 3. Build runtime and open the lobby
    let mut runtime = Runtime::builder().config(config).build().await?;
    let setup = InstanceSetup::new(InstanceId(1), GAME_MASTER).with_users((1..=players).map(UserId));
    let handle = runtime.create_instance(setup)?;

    let clock = handle.start_game(GAME_MASTER).await?;
    tracing::info!(day = clock.day, phase = %clock.phase, "Game started");

    // 4. Play until a faction wins
    for _ in 0..max_phases {
        let state = handle.query_state().await?;
        if let GameStatus::Ended { winner } = state.status {
            match winner {
                Some(group) => tracing::info!(winner = %group, day = state.clock.day, "Game over"),
                None => tracing::info!(day = state.clock.day, "Game over without a winner"),
            }
            break;
        }

        match state.clock.phase {
            DayPhase::Day => {
                let wolves = wolves(&state);
                if let Some(alpha) = wolves.first().copied() {
                    cast_all(&handle, VoteType::AlphaWolf, &wolves, alpha).await?;
                }
                if let Some(mayor) = state.alive_ids().into_iter().min() {
                    cast_all(&handle, VoteType::Mayor, &state.alive_ids(), mayor).await?;
                }
            }
            DayPhase::Vote => {
                if let Some(suspect) = wolves(&state).first().copied() {
                    cast_all(&handle, VoteType::Lynch, &state.alive_ids(), suspect).await?;
                }
            }
            DayPhase::Evening => alpha_wolf_kill(&handle, &state).await?,
            _ => {}
        }

        let clock = handle.advance_phase().await?;
        tracing::debug!(day = clock.day, phase = %clock.phase, "Advanced");
    }

    let state = handle.query_state().await?;
    if state.is_running() {
        tracing::warn!(day = state.clock.day, "Phase limit reached before a faction won");
    }
    tracing::info!(
        alive = state.alive_ids().len(),
        dead = state.dead_ids().len(),
        "Simulation finished"
    );

    drop(handle);
    runtime.shutdown().await?;
    Ok(())
}

fn wolves(state: &InstanceState) -> Vec<PlayerIdentifier> {
    let mut wolves: Vec<_> = state
        .alive_players()
        .filter(|player| player.is_werewolf())
        .map(|player| player.id)
        .collect();
    wolves.sort();
    wolves
}

async fn ongoing(handle: &InstanceHandle, vote_type: VoteType) -> Result<Option<VoteRecord>> {
    Ok(handle
        .ongoing_votes()
        .await?
        .into_iter()
        .find(|record| record.vote_type == vote_type))
}

/// Every voter picks the same target; stops once the vote ends early.
async fn cast_all(
    handle: &InstanceHandle,
    vote_type: VoteType,
    voters: &[PlayerIdentifier],
    target: PlayerIdentifier,
) -> Result<()> {
    let Some(record) = ongoing(handle, vote_type).await? else {
        return Ok(());
    };

    for &voter in voters {
        match handle
            .submit_ballot(record.id, voter, Ballot::new(voter, target))
            .await
        {
            Ok(SubmitOutcome::Unanimous) => break,
            Ok(SubmitOutcome::Recorded) => {}
            Err(error) => tracing::warn!(%voter, vote = %record.id, %error, "Ballot rejected"),
        }
    }
    Ok(())
}

async fn alpha_wolf_kill(handle: &InstanceHandle, state: &InstanceState) -> Result<()> {
    let Some(alpha) = state.job_holder(Job::AlphaWolf) else {
        return Ok(());
    };
    let abilities = handle.information(alpha).await?;
    let Some(kill) = abilities
        .iter()
        .find(|info| info.action == Action::AlphaWolfKill && info.remaining > 0)
    else {
        return Ok(());
    };

    let target = state
        .alive_players()
        .filter(|player| !player.is_werewolf())
        .filter_map(|player| player.house)
        .find(|house| kill.eligible.locations.contains(house));

    if let Some(house) = target {
        let stored = handle
            .perform_action(alpha, Action::AlphaWolfKill, ActionArgs::locations([house]))
            .await?;
        tracing::info!(%alpha, stored = stored.len(), "Alpha wolf set out");
    }
    Ok(())
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
