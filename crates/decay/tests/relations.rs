//! Integration tests for owner/member links between stored records

use ensdf_decay::{Arena, Error, Handle, Relation};
use rstest::rstest;

#[derive(Debug)]
struct Owner(&'static str);

#[derive(Debug)]
struct Member(u32);

/// Two owners with two members each, and one member left detached
struct Links {
    owners: Arena<Owner>,
    members: Arena<Member>,
    relation: Relation<Handle<Owner>, Handle<Member>>,
    a: Handle<Owner>,
    b: Handle<Owner>,
    m: Vec<Handle<Member>>,
}

impl Links {
    fn new() -> Self {
        let mut owners = Arena::new();
        let mut members = Arena::new();
        let mut relation = Relation::new();

        let a = owners.insert(Owner("a"));
        let b = owners.insert(Owner("b"));
        let m = (0..5).map(|i| members.insert(Member(i))).collect::<Vec<_>>();

        relation.attach(m[0], a).unwrap();
        relation.attach(m[1], a).unwrap();
        relation.attach(m[2], b).unwrap();
        relation.attach(m[3], b).unwrap();

        Self {
            owners,
            members,
            relation,
            a,
            b,
            m,
        }
    }

    fn destroy_owner(&mut self, owner: Handle<Owner>) {
        self.relation.dissolve(owner);
        self.owners.remove(owner);
    }

    fn destroy_member(&mut self, member: Handle<Member>) {
        self.relation.release(member);
        self.members.remove(member);
    }

    /// Every link refers to live records in both directions
    fn assert_consistent(&self) {
        for owner in self.relation.owners() {
            assert!(self.owners.contains(owner));
            for member in self.relation.members(owner) {
                assert!(self.members.contains(*member));
                assert_eq!(self.relation.owner(*member), Some(owner));
            }
        }
        for member in self.members.handles() {
            if let Some(owner) = self.relation.owner(member) {
                assert!(self.owners.contains(owner));
                assert!(self.relation.members(owner).contains(&member));
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Owner(usize),
    Member(usize),
}

#[rstest]
#[case(&[Step::Owner(0), Step::Member(2), Step::Owner(1)])]
#[case(&[Step::Member(0), Step::Member(1), Step::Owner(0)])]
#[case(&[Step::Member(3), Step::Owner(1), Step::Member(0), Step::Owner(0)])]
#[case(&[Step::Owner(1), Step::Owner(0), Step::Member(4)])]
#[case(&[Step::Member(4), Step::Member(2), Step::Member(1)])]
fn links_survive_any_destruction_order(#[case] steps: &[Step]) {
    let mut links = Links::new();
    links.assert_consistent();

    for step in steps {
        match *step {
            Step::Owner(i) => {
                let owner = [links.a, links.b][i];
                links.destroy_owner(owner);
            }
            Step::Member(i) => {
                let member = links.m[i];
                links.destroy_member(member);
            }
        }
        links.assert_consistent();
    }
}

#[test]
fn dissolved_owner_frees_members() {
    let mut links = Links::new();
    let (a, b, m) = (links.a, links.b, links.m.clone());

    links.destroy_owner(a);

    assert_eq!(links.relation.owner(m[0]), None);
    assert_eq!(links.relation.owner(m[1]), None);
    assert!(!links.relation.is_owner(a));
    assert!(links.owners.get(a).is_none());

    // freed members may join another owner
    links.relation.attach(m[0], b).unwrap();
    assert_eq!(links.relation.members(b), &[m[2], m[3], m[0]]);
    links.assert_consistent();
}

#[test]
fn stale_handles_are_rejected() {
    let mut links = Links::new();
    let member = links.m[1];

    links.destroy_member(member);
    assert!(links.members.get(member).is_none());
    assert!(links.members.remove(member).is_none());
    assert_eq!(links.relation.release(member), None);
    assert_eq!(links.members.len(), 4);
}

#[test]
fn membership_is_exclusive() {
    let mut links = Links::new();
    let (a, b, m) = (links.a, links.b, links.m.clone());

    assert!(matches!(
        links.relation.attach(m[0], b),
        Err(Error::MemberAlreadyOwned)
    ));
    assert_eq!(links.relation.owner(m[0]), Some(a));
    assert_eq!(links.relation.members(b).len(), 2);
}

#[test]
fn equality_follows_owners() {
    let mut links = Links::new();
    let (a, b, m) = (links.a, links.b, links.m.clone());

    // siblings share an owner
    assert!(links.relation.members_equal(m[0], m[1]));
    assert!(!links.relation.members_equal(m[0], m[2]));

    // one detached member is never equal to an attached one
    assert!(!links.relation.members_equal(m[0], m[4]));
    assert!(links.relation.members_equal(m[4], m[4]));

    // every member of an empty owner is trivially shared
    links.destroy_owner(a);
    let c = links.owners.insert(Owner("c"));
    links.relation.add_owner(c);
    assert!(links.relation.owners_equal(c, b));
    assert!(!links.relation.owners_equal(b, c));
    assert_eq!(links.owners.get(c).map(|o| o.0), Some("c"));
    assert_eq!(links.members.get(m[2]).map(|m| m.0), Some(2));
}
