//! Entity store contracts used by the runtime.
//!
//! The rules engine never touches storage directly; the runtime loads and
//! saves through these traits so deployments can swap the backing store.

use werewolf_core::{
    ActionId, ActionRecord, Ballot, InstanceId, InstanceState, PlayerIdentifier, VoteId,
    VoteRecord, VoteType,
};

use super::Result;

/// Snapshots of whole instances.
pub trait InstanceRepository: Send + Sync {
    fn save(&self, state: &InstanceState) -> Result<()>;

    fn load(&self, id: InstanceId) -> Result<Option<InstanceState>>;

    fn delete(&self, id: InstanceId) -> Result<()>;

    /// Stored instance ids in ascending order.
    fn list(&self) -> Result<Vec<InstanceId>>;
}

/// Pending action queue of every instance.
pub trait ActionRepository: Send + Sync {
    /// Stores a batch of records of one instance. Either all of them are
    /// stored or none is.
    fn save_pending(&self, records: &[ActionRecord]) -> Result<()>;

    /// Records of `instance` that are not COMPLETE yet, in the order they
    /// were saved.
    fn load_pending(&self, instance: InstanceId) -> Result<Vec<ActionRecord>>;

    fn mark_executed(&self, id: ActionId) -> Result<()>;

    fn mark_complete(&self, id: ActionId) -> Result<()>;

    /// Number of NOT_EXECUTED records of `instance`.
    fn pending_count(&self, instance: InstanceId) -> Result<usize>;

    /// Highest id stored for any instance.
    fn last_id(&self) -> Result<Option<ActionId>>;
}

/// Votes and their ballots.
pub trait VoteRepository: Send + Sync {
    /// Stores a new, not yet started vote and returns it with its id.
    fn create(
        &self,
        instance: InstanceId,
        vote_type: VoteType,
        allowed: Vec<PlayerIdentifier>,
    ) -> Result<VoteRecord>;

    fn load(&self, id: VoteId) -> Result<Option<VoteRecord>>;

    fn save_ballot(&self, id: VoteId, ballot: Ballot) -> Result<()>;

    /// Ballots in submission order.
    fn load_ballots(&self, id: VoteId) -> Result<Vec<Ballot>>;

    fn set_started(&self, id: VoteId, started: bool) -> Result<()>;

    fn set_ended(&self, id: VoteId, ended: bool) -> Result<()>;

    /// Started votes of `instance` that have not ended.
    fn ongoing(&self, instance: InstanceId) -> Result<Vec<VoteRecord>>;
}
