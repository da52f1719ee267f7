//! Non-owning, bidirectional owner/member links between records
//!
//! Records never hold references to each other. Instead, a [Relation] keeps
//! both directions of a one-to-many link keyed by handles, so that looking up
//! the owner of a member or the members of an owner is always consistent.
//!
//! Dissolving an owner detaches every member it had, so no member can ever
//! report an owner that no longer exists.

// standard library
use std::collections::BTreeMap;

// internal modules
use crate::error::{Error, Result};

/// One-to-many association between owners and members
///
/// - A member belongs to at most one owner at a time
/// - An owner keeps its members in the order they were attached
/// - Neither side controls the lifetime of the other
///
/// ```rust
/// # use ensdf_decay::Relation;
/// let mut relation: Relation<u8, u32> = Relation::new();
/// relation.attach(10, 1).unwrap();
/// relation.attach(20, 1).unwrap();
///
/// assert_eq!(relation.owner(10), Some(1));
/// assert_eq!(relation.members(1), &[10, 20]);
///
/// // Members may not be attached twice
/// assert!(relation.attach(10, 2).is_err());
///
/// // Tearing down the owner detaches everything
/// assert_eq!(relation.dissolve(1), vec![10, 20]);
/// assert_eq!(relation.owner(10), None);
/// ```
#[derive(Debug, Clone)]
pub struct Relation<O, M> {
    members: BTreeMap<O, Vec<M>>,
    owners: BTreeMap<M, O>,
}

impl<O, M> Default for Relation<O, M> {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
            owners: BTreeMap::new(),
        }
    }
}

impl<O, M> Relation<O, M>
where
    O: Copy + Ord,
    M: Copy + Ord,
{
    /// An empty relation
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an owner, even if it never gains any members
    pub fn add_owner(&mut self, owner: O) {
        self.members.entry(owner).or_default();
    }

    /// Attach a member to an owner
    ///
    /// Fails if the member already belongs to any owner, including this one.
    pub fn attach(&mut self, member: M, owner: O) -> Result<()> {
        if self.owners.contains_key(&member) {
            return Err(Error::MemberAlreadyOwned);
        }
        self.owners.insert(member, owner);
        self.members.entry(owner).or_default().push(member);
        Ok(())
    }

    /// Deregister a member from its owner, returning the old owner
    pub fn release(&mut self, member: M) -> Option<O> {
        let owner = self.owners.remove(&member)?;
        if let Some(members) = self.members.get_mut(&owner) {
            members.retain(|m| *m != member);
        }
        Some(owner)
    }

    /// Remove an owner and detach all of its members
    ///
    /// Returns the members that were detached, in attachment order.
    pub fn dissolve(&mut self, owner: O) -> Vec<M> {
        let members = self.members.remove(&owner).unwrap_or_default();
        for member in &members {
            self.owners.remove(member);
        }
        members
    }

    /// Current owner of a member
    pub fn owner(&self, member: M) -> Option<O> {
        self.owners.get(&member).copied()
    }

    /// Current members of an owner, empty for unknown owners
    pub fn members(&self, owner: O) -> &[M] {
        self.members
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the owner is registered
    pub fn is_owner(&self, owner: O) -> bool {
        self.members.contains_key(&owner)
    }

    /// All registered owners, in key order
    pub fn owners(&self) -> impl Iterator<Item = O> + '_ {
        self.members.keys().copied()
    }

    /// Owner equality: every member of `left` is also a member of `right`
    ///
    /// Not symmetric. An owner without members equals any other owner.
    pub fn owners_equal(&self, left: O, right: O) -> bool {
        let right_members = self.members(right);
        self.members(left)
            .iter()
            .all(|member| right_members.contains(member))
    }

    /// Member equality: both detached, or both owned by equal owners
    pub fn members_equal(&self, left: M, right: M) -> bool {
        match (self.owner(left), self.owner(right)) {
            (None, None) => true,
            (Some(a), Some(b)) => self.owners_equal(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Owner 1 with members 10 and 11, owner 2 with member 20
    #[fixture]
    fn relation() -> Relation<u8, u32> {
        let mut relation = Relation::new();
        relation.attach(10, 1).unwrap();
        relation.attach(11, 1).unwrap();
        relation.attach(20, 2).unwrap();
        relation
    }

    #[rstest]
    fn owners_are_reported(relation: Relation<u8, u32>) {
        assert_eq!(relation.owner(10), Some(1));
        assert_eq!(relation.owner(11), Some(1));
        assert_eq!(relation.owner(20), Some(2));
        assert_eq!(relation.owner(99), None);
        assert_eq!(relation.members(1), &[10, 11]);
        assert!(relation.members(3).is_empty());
    }

    #[rstest]
    fn at_most_one_owner(mut relation: Relation<u8, u32>) {
        assert!(matches!(
            relation.attach(10, 2),
            Err(Error::MemberAlreadyOwned)
        ));
        assert!(relation.attach(10, 1).is_err());
        assert_eq!(relation.owner(10), Some(1));
        assert_eq!(relation.members(2), &[20]);
    }

    #[rstest]
    fn release_then_reattach(mut relation: Relation<u8, u32>) {
        assert_eq!(relation.release(10), Some(1));
        assert_eq!(relation.release(10), None);
        assert_eq!(relation.members(1), &[11]);

        relation.attach(10, 2).unwrap();
        assert_eq!(relation.members(2), &[20, 10]);
    }

    #[rstest]
    fn dissolve_detaches_members(mut relation: Relation<u8, u32>) {
        assert_eq!(relation.dissolve(1), vec![10, 11]);
        assert!(!relation.is_owner(1));
        assert_eq!(relation.owner(10), None);
        assert_eq!(relation.owner(11), None);
        assert_eq!(relation.owner(20), Some(2));
        assert!(relation.dissolve(1).is_empty());
    }

    #[rstest]
    fn owner_equality(mut relation: Relation<u8, u32>) {
        assert!(relation.owners_equal(1, 1));
        assert!(!relation.owners_equal(1, 2));

        // memberless owners compare equal to anything
        relation.add_owner(3);
        assert!(relation.owners_equal(3, 1));
        assert!(!relation.owners_equal(1, 3));
    }

    #[rstest]
    fn member_equality(mut relation: Relation<u8, u32>) {
        assert!(relation.members_equal(10, 11));
        assert!(!relation.members_equal(10, 20));
        assert!(!relation.members_equal(10, 99));
        assert!(relation.members_equal(98, 99));

        relation.dissolve(2);
        assert!(!relation.members_equal(20, 10));
        assert!(relation.members_equal(20, 99));
    }
}
