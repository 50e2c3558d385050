use crate::Role;

/// A point-in-time copy of every role's counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CounterSnapshot {
    values: [u32; Role::COUNT],
}

impl CounterSnapshot {
    /// Wraps raw counter values, indexed by [`Role::index`].
    #[must_use]
    pub const fn from_values(values: [u32; Role::COUNT]) -> Self {
        Self { values }
    }

    /// The counter value for `role`.
    #[must_use]
    pub const fn get(&self, role: Role) -> u32 {
        self.values[role.index()]
    }

    /// Iterates `(role, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Whether every counter in `self` is at least the matching one in
    /// `other`.
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(mine, theirs)| mine >= theirs)
    }
}
