//! Pending action queue and its scheduler.
//!
//! Composite plans are flattened into leaf records when they are enqueued,
//! so a drain only ever sees leaves. Leaves of one composite share its time
//! and take consecutive ids, and the stable sort by time keeps them in
//! registration order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use werewolf_core::{
    ActionId, ActionRecord, ActionStatus, InstanceId, InstanceState, PlannedAction, RulesEngine,
    Timing,
};

use crate::api::Result;
use crate::events::{ActionEvent, EventBus};
use crate::repository::ActionRepository;

pub struct ActionManager {
    repository: Arc<dyn ActionRepository>,
    last_id: AtomicU64,
    /// One gate per instance; drain and clear hold it for their whole run.
    gates: Mutex<HashMap<InstanceId, Arc<AsyncMutex<()>>>>,
}

impl ActionManager {
    pub fn new(repository: Arc<dyn ActionRepository>) -> Self {
        Self {
            repository,
            last_id: AtomicU64::new(0),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Continues the id sequence after the highest id already stored.
    pub fn resume(repository: Arc<dyn ActionRepository>) -> Result<Self> {
        let last = repository.last_id()?.map_or(0, |id| id.get());
        let manager = Self::new(repository);
        manager.last_id.store(last, Ordering::Relaxed);
        Ok(manager)
    }

    fn next_id(&self) -> ActionId {
        ActionId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn gate(&self, instance: InstanceId) -> Arc<AsyncMutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(gates.entry(instance).or_default())
    }

    /// Stores accepted plans of one instance.
    ///
    /// Immediate plans are executed against `state` first and stored as
    /// already executed. The batch is stored only if every immediate effect
    /// succeeded.
    pub fn enqueue(
        &self,
        state: &mut InstanceState,
        plans: Vec<PlannedAction>,
        events: &EventBus,
    ) -> Result<Vec<ActionRecord>> {
        let instance = state.id;
        let mut records = Vec::new();

        for plan in plans {
            let immediate = plan.timing == Timing::Immediate;
            let leaves = plan.into_records(instance, || self.next_id());
            if immediate {
                let mut engine = RulesEngine::new(state);
                for record in &leaves {
                    engine.execute_record(record)?;
                }
            }
            records.extend(leaves);
        }

        if records.is_empty() {
            return Ok(records);
        }
        self.repository.save_pending(&records)?;

        for record in &records {
            debug!(
                target: "runtime::actions",
                instance = %instance,
                action_id = %record.id,
                actor = %record.payload.actor,
                effect = %record.effect,
                status = %record.status,
                "Action stored"
            );
            events.publish(ActionEvent::ActionQueued {
                instance,
                action_id: record.id,
                effect: record.effect.clone(),
                time: record.time,
            });
        }
        Ok(records)
    }

    /// Executes every NOT_EXECUTED record of the instance in time order.
    ///
    /// The first failing record aborts the drain and stays NOT_EXECUTED;
    /// records executed before it stay EXECUTED and are never run again.
    /// Returns the records executed by this call.
    pub async fn drain(
        &self,
        state: &mut InstanceState,
        events: &EventBus,
    ) -> Result<Vec<ActionRecord>> {
        let instance = state.id;
        let gate = self.gate(instance);
        let _guard = gate.lock().await;

        let mut pending = self.repository.load_pending(instance)?;
        pending.retain(|record| record.status == ActionStatus::NotExecuted);
        pending.sort_by_key(|record| record.time);

        let mut executed = Vec::with_capacity(pending.len());
        for record in pending {
            if let Err(error) = RulesEngine::new(state).execute_record(&record) {
                warn!(
                    target: "runtime::actions",
                    instance = %instance,
                    action_id = %record.id,
                    effect = %record.effect,
                    error = %error,
                    "Action failed, drain aborted"
                );
                events.publish(ActionEvent::ActionFailed {
                    instance,
                    action_id: Some(record.id),
                    effect: error.effect.to_owned(),
                    phase: error.phase(),
                    error: error.to_string(),
                });
                return Err(error.into());
            }
            self.repository.mark_executed(record.id)?;

            debug!(
                target: "runtime::actions",
                instance = %instance,
                action_id = %record.id,
                actor = %record.payload.actor,
                effect = %record.effect,
                "Action executed"
            );
            events.publish(ActionEvent::ActionExecuted {
                instance,
                action_id: record.id,
                effect: record.effect.clone(),
            });
            executed.push(record);
        }
        Ok(executed)
    }

    /// Marks every pending record of the instance COMPLETE without running it.
    pub async fn clear(&self, instance: InstanceId) -> Result<usize> {
        let gate = self.gate(instance);
        let _guard = gate.lock().await;

        let pending = self.repository.load_pending(instance)?;
        for record in &pending {
            self.repository.mark_complete(record.id)?;
        }
        debug!(
            target: "runtime::actions",
            instance = %instance,
            cleared = pending.len(),
            "Pending actions cleared"
        );
        Ok(pending.len())
    }

    /// Drops the gate of an instance that will not drain again.
    ///
    /// Must not race a running drain or clear of the same instance.
    pub fn release(&self, instance: InstanceId) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        gates.remove(&instance);
    }

    pub fn pending_count(&self, instance: InstanceId) -> Result<usize> {
        Ok(self.repository.pending_count(instance)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use werewolf_core::{
        ActionArgs, Effect, GameConfig, MainRole, PlayerIdentifier, PreActionData, UserId,
    };

    use crate::repository::InMemoryActionRepo;

    fn started_instance(roles: &[MainRole]) -> InstanceState {
        let mut state = InstanceState::new(InstanceId(1), UserId(100));
        for user in 1..=roles.len() as u32 {
            state.join(UserId(user)).unwrap();
        }
        state
            .start_game(UserId(100), roles.to_vec(), 12 * 60, &GameConfig::new())
            .unwrap();
        state
    }

    fn pid(user: u32) -> PlayerIdentifier {
        PlayerIdentifier::new(InstanceId(1), UserId(user))
    }

    fn manager() -> ActionManager {
        ActionManager::new(Arc::new(InMemoryActionRepo::new()))
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes)
    }

    fn plan(minutes: i64, effect: Effect, actor: u32, target: u32) -> PlannedAction {
        PlannedAction::queued(
            at(minutes),
            effect,
            PreActionData::new(pid(actor), ActionArgs::players([pid(target)])),
        )
    }

    #[tokio::test]
    async fn drain_runs_in_time_order_with_stable_ties() {
        let mut state =
            started_instance(&[MainRole::Archer, MainRole::Healer, MainRole::Townsperson]);
        let manager = manager();
        let events = EventBus::new();

        // Heal first by time, so the later kill still marks player 3.
        let stored = manager
            .enqueue(
                &mut state,
                vec![
                    plan(10, Effect::KillPlayers, 1, 3),
                    plan(5, Effect::HealPlayer, 2, 3),
                    plan(10, Effect::KillPlayers, 1, 2),
                ],
                &events,
            )
            .unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(manager.pending_count(InstanceId(1)).unwrap(), 3);

        let executed = manager.drain(&mut state, &events).await.unwrap();
        let order: Vec<_> = executed.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![stored[1].id, stored[0].id, stored[2].id]);
        assert!(state.player(pid(3)).unwrap().is_marked());
        assert!(state.player(pid(2)).unwrap().is_marked());
        assert_eq!(manager.pending_count(InstanceId(1)).unwrap(), 0);
    }

    #[tokio::test]
    async fn executed_records_are_not_run_twice() {
        let mut state = started_instance(&[MainRole::Archer, MainRole::Healer]);
        let manager = manager();
        let events = EventBus::new();

        manager
            .enqueue(&mut state, vec![plan(0, Effect::KillPlayers, 1, 2)], &events)
            .unwrap();
        assert_eq!(manager.drain(&mut state, &events).await.unwrap().len(), 1);
        assert!(manager.drain(&mut state, &events).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_aborts_the_drain_and_clear_discards_the_rest() {
        let mut state = started_instance(&[MainRole::Medium, MainRole::Healer]);
        let manager = manager();
        let events = EventBus::new();

        // Reviving an alive player fails in apply.
        manager
            .enqueue(
                &mut state,
                vec![
                    plan(0, Effect::ProtectPlayers, 2, 2),
                    plan(1, Effect::RevivePlayers, 1, 2),
                    plan(2, Effect::KillPlayers, 1, 2),
                ],
                &events,
            )
            .unwrap();

        let result = manager.drain(&mut state, &events).await;
        assert!(matches!(result, Err(crate::RuntimeError::Execute(_))));
        assert!(state.player(pid(2)).unwrap().is_protected());
        assert_eq!(manager.pending_count(InstanceId(1)).unwrap(), 2);

        assert_eq!(manager.clear(InstanceId(1)).await.unwrap(), 3);
        assert_eq!(manager.pending_count(InstanceId(1)).unwrap(), 0);
        assert!(manager.drain(&mut state, &events).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn immediate_plans_run_on_enqueue() {
        let mut state = started_instance(&[MainRole::Medium, MainRole::Healer]);
        state.kill_player(pid(2)).unwrap();
        let manager = manager();
        let events = EventBus::new();

        let revive = PlannedAction::immediate(
            at(0),
            Effect::RevivePlayers,
            PreActionData::new(pid(1), ActionArgs::players([pid(2)])),
        );
        let stored = manager.enqueue(&mut state, vec![revive], &events).unwrap();

        assert_eq!(stored[0].status, ActionStatus::Executed);
        assert!(state.player(pid(2)).unwrap().is_alive());
        assert_eq!(manager.pending_count(InstanceId(1)).unwrap(), 0);
    }

    #[tokio::test]
    async fn composite_children_drain_in_registration_order() {
        let mut state = started_instance(&[MainRole::Werewolf, MainRole::Healer]);
        let manager = manager();
        let events = EventBus::new();
        let target = state.player(pid(2)).unwrap().house.unwrap();

        let composite = PlannedAction::queued(
            at(0),
            Effect::Composite(vec![Effect::MoveToLocation, Effect::KillPlayers]),
            PreActionData::new(pid(1), ActionArgs::locations([target])),
        );
        manager.enqueue(&mut state, vec![composite], &events).unwrap();
        let executed = manager.drain(&mut state, &events).await.unwrap();

        let effects: Vec<_> = executed.iter().map(|r| r.effect.clone()).collect();
        assert_eq!(effects, vec![Effect::MoveToLocation, Effect::KillPlayers]);
        assert_eq!(state.player(pid(1)).unwrap().location, Some(target));
        assert!(state.player(pid(2)).unwrap().is_marked());
    }

    #[tokio::test]
    async fn released_instances_leave_no_gate_behind() {
        let mut first = started_instance(&[MainRole::Archer, MainRole::Healer]);
        let manager = manager();
        let events = EventBus::new();

        manager.drain(&mut first, &events).await.unwrap();
        manager.clear(InstanceId(2)).await.unwrap();
        assert_eq!(manager.gates.lock().unwrap().len(), 2);

        manager.release(InstanceId(1));
        manager.release(InstanceId(2));
        assert!(manager.gates.lock().unwrap().is_empty());

        // A released instance can still be drained; the gate comes back.
        manager
            .enqueue(&mut first, vec![plan(0, Effect::KillPlayers, 1, 2)], &events)
            .unwrap();
        assert_eq!(manager.drain(&mut first, &events).await.unwrap().len(), 1);
    }
}
