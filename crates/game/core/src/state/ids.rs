use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// One running game session.
    InstanceId(u32),
    "instance#"
);
id_type!(
    /// Stable identity handed out by the external identity provider.
    UserId(u32),
    "user#"
);
id_type!(
    /// A house or bridge; unique within its instance.
    LocationId(u32),
    "location#"
);
id_type!(
    /// A vote within the entity store.
    VoteId(u32),
    "vote#"
);
id_type!(
    /// A queued action record.
    ActionId(u64),
    "action#"
);

/// Composite key `(instance, user)` identifying a player within one instance.
///
/// Ordering is instance-major, so sorted collections of identifiers group by
/// instance and then list users in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerIdentifier {
    pub instance: InstanceId,
    pub user: UserId,
}

impl PlayerIdentifier {
    pub const fn new(instance: InstanceId, user: UserId) -> Self {
        Self { instance, user }
    }
}

impl fmt::Display for PlayerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player({}:{})", self.instance.0, self.user.0)
    }
}
