//! Ability tags.

/// Named capability a purpose can invoke.
///
/// A tag is a pure discriminator: behavior lives with the purpose that grants
/// it (see [`crate::role`]) and the effects it schedules.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Action {
    // ========================================================================
    // Main roles
    // ========================================================================
    /// Archer fires an arrow at one player.
    Shoot,
    ClairvoyantSeeRole,
    /// Graverobber takes over the main role of a dead player.
    RobGrave,
    Protect,
    Heal,
    Revive,
    /// Poisoner targets everyone at one location, with a delay.
    Poison,
    PrivateInvestigate,
    Soak,
    Burn,

    // ========================================================================
    // Jobs
    // ========================================================================
    AlphaWolfKill,
    SuccessorAlphaWolf,
    SuccessorMayor,
    /// Mayor settles tied lynch slots.
    MayorDecide,
    /// Blacksmith restores a damaged house.
    Clean,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_use_screaming_snake_case() {
        assert_eq!(Action::AlphaWolfKill.to_string(), "ALPHA_WOLF_KILL");
        assert_eq!("mayor_decide".parse::<Action>().ok(), Some(Action::MayorDecide));
    }
}
