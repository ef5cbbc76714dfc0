use std::sync::Arc;

use vanish_types::models::{User, UserId};

/// Session roster: the local user plus a static set of peers.
#[derive(Debug, Clone)]
pub struct Roster {
    local: Arc<User>,
    peers: Vec<User>,
}

/// Roster split by presence. Together the halves hold every user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub online: Vec<User>,
    pub offline: Vec<User>,
}

impl Roster {
    pub fn new(local: Arc<User>, peers: Vec<User>) -> Self {
        Self { local, peers }
    }

    pub fn local_user(&self) -> &User {
        &self.local
    }

    pub fn is_local(&self, id: UserId) -> bool {
        self.local.id == id
    }

    pub fn peers(&self) -> &[User] {
        &self.peers
    }

    /// Local user first, then peers in bootstrap order.
    pub fn all_users(&self) -> impl Iterator<Item = &User> {
        std::iter::once(self.local.as_ref()).chain(self.peers.iter())
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.all_users().find(|u| u.id == id)
    }

    pub fn user_count(&self) -> usize {
        self.peers.len() + 1
    }

    pub fn presence(&self) -> Presence {
        let (online, offline): (Vec<User>, Vec<User>) = self.all_users().cloned().partition(|u| u.online);
        Presence { online, offline }
    }

    /// Online users other than the local one.
    pub fn online_peers(&self) -> Vec<&User> {
        self.peers.iter().filter(|u| u.online).collect()
    }

    pub fn offline_peers(&self) -> Vec<&User> {
        self.peers.iter().filter(|u| !u.online).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;
    use crate::random::seeded;
    use chrono::Utc;
    use std::collections::HashSet;

    fn roster(seed: u64) -> Roster {
        let boot = bootstrap(&mut seeded(seed), Utc::now());
        Roster::new(Arc::new(boot.local_user), boot.peers)
    }

    #[test]
    fn presence_partitions_all_users() {
        for seed in 0..32 {
            let roster = roster(seed);
            let presence = roster.presence();

            let online: HashSet<_> = presence.online.iter().map(|u| u.id).collect();
            let offline: HashSet<_> = presence.offline.iter().map(|u| u.id).collect();
            let all: HashSet<_> = roster.all_users().map(|u| u.id).collect();

            assert!(online.is_disjoint(&offline));
            assert_eq!(&online | &offline, all);
            assert!(presence.online.iter().all(|u| u.online));
            assert!(presence.offline.iter().all(|u| !u.online));
        }
    }

    #[test]
    fn local_user_is_distinguished() {
        let roster = roster(1);
        let local = roster.local_user().clone();
        assert!(roster.is_local(local.id));
        assert!(roster.online_peers().iter().all(|u| u.id != local.id));
        assert_eq!(roster.get(local.id), Some(&local));
        assert_eq!(roster.user_count(), roster.peers().len() + 1);
    }
}
