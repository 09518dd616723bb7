use crate::state::{ActionId, PlayerIdentifier};

/// Kind of notification an executed effect leaves behind.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MessageKind {
    ChangedRole,
    ChangedRoleGlobal,
    HealedPlayer,
    LynchKillBroadcast,
    MayorDecide,
    MoveToBridge,
    MoveToHouse,
    NewMayor,
    NightKillBroadcast,
    ProtectPlayer,
    RevivePlayers,
    SeeCharacter,
    SeeRole,
    YouHaveBeenRevived,
    HouseBurned,
}

/// Notification produced by an effect.
///
/// Locked messages stay hidden from their recipients until the next DAY
/// transition unlocks them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionMessage {
    pub kind: MessageKind,
    /// `None` addresses every player of the instance.
    pub recipient: Option<PlayerIdentifier>,
    pub fields: Vec<String>,
    pub action_id: Option<ActionId>,
    pub locked: bool,
}

impl ActionMessage {
    pub fn to(recipient: PlayerIdentifier, kind: MessageKind) -> Self {
        Self {
            kind,
            recipient: Some(recipient),
            fields: Vec::new(),
            action_id: None,
            locked: true,
        }
    }

    pub fn broadcast(kind: MessageKind) -> Self {
        Self {
            kind,
            recipient: None,
            fields: Vec::new(),
            action_id: None,
            locked: true,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.fields.push(field.to_string());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action_id: Option<ActionId>) -> Self {
        self.action_id = action_id;
        self
    }

    #[must_use]
    pub fn unlocked(mut self) -> Self {
        self.locked = false;
        self
    }

    pub fn is_visible_to(&self, player: PlayerIdentifier) -> bool {
        !self.locked && self.recipient.is_none_or(|recipient| recipient == player)
    }
}
