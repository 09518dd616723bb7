use std::collections::BTreeMap;

/// Consumable resource backing a limited-use ability.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Item {
    Kill,
    Arrow,
    Seen,
    Grave,
    Guard,
    Medkit,
    Revive,
    Poison,
    Investigation,
}

/// Remaining uses per item for one player.
///
/// Items are shared across all purposes the player holds, so a job and a main
/// role granting the same item draw from one pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCounters {
    counts: BTreeMap<Item, u32>,
}

impl ItemCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: Item) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item: Item, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.counts.entry(item).or_insert(0) += amount;
    }

    pub fn set(&mut self, item: Item, amount: u32) {
        if amount == 0 {
            self.counts.remove(&item);
        } else {
            self.counts.insert(item, amount);
        }
    }

    /// Raises the counter to `target`; never lowers it.
    pub fn top_up(&mut self, item: Item, target: u32) {
        if self.get(item) < target {
            self.set(item, target);
        }
    }

    /// Consumes one unit. Returns `false` when none were left.
    pub fn take(&mut self, item: Item) -> bool {
        match self.counts.get_mut(&item) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&item);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, item: Item) {
        self.counts.remove(&item);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.counts.iter().map(|(item, count)| (*item, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_until_empty() {
        let mut items = ItemCounters::new();
        items.add(Item::Kill, 2);

        assert!(items.take(Item::Kill));
        assert!(items.take(Item::Kill));
        assert!(!items.take(Item::Kill));
        assert_eq!(items.get(Item::Kill), 0);
    }

    #[test]
    fn top_up_never_decrements() {
        let mut items = ItemCounters::new();
        items.set(Item::Kill, 3);
        items.top_up(Item::Kill, 2);
        assert_eq!(items.get(Item::Kill), 3);

        items.top_up(Item::Seen, 1);
        assert_eq!(items.get(Item::Seen), 1);
    }
}
