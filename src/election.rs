//! Election Registry
//!
//! Answers the two questions the protocol handler asks: does key K already
//! have an owner, and who is waiting on it. The connection table is the
//! authoritative record of both; these queries are linear scans bounded by
//! the table's high-water mark. At this daemon's intended scale (tens of
//! clients) a scan beats a secondary index that would have to be kept in
//! sync on every state transition.

use crate::connection::{ConnState, ConnectionTable};
use crate::protocol::Key;

/// True iff some connection currently owns `key`.
pub fn owner_exists(table: &ConnectionTable, key: &Key) -> bool {
    table
        .iter_active()
        .any(|(_, conn)| matches!(&conn.state, ConnState::Owner { key: k } if k == key))
}

/// Slots of every connection waiting on `key`, in slot order. Notification
/// order is unspecified by the protocol; slot order is what this
/// implementation does.
pub fn waiters_of(table: &ConnectionTable, key: &Key) -> Vec<usize> {
    table
        .iter_active()
        .filter(|(_, conn)| matches!(&conn.state, ConnState::Waiter { key: k } if k == key))
        .map(|(slot, _)| slot)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, Stream};
    use crate::protocol::KEY_SIZE;
    use tokio::net::UnixStream;

    /// Allocates a connection in the given state, parking the peer half of
    /// the socketpair in `peers` so it stays open for the test's duration.
    fn add_conn(
        table: &mut ConnectionTable,
        peers: &mut Vec<UnixStream>,
        id: u64,
        state: ConnState,
    ) -> usize {
        let (local, peer) = UnixStream::pair().unwrap();
        peers.push(peer);
        let mut conn = Connection::new(id, Stream::Unix(local));
        conn.state = state;
        table.allocate(conn).unwrap()
    }

    #[tokio::test]
    async fn test_owner_is_found_by_key() {
        let key_a = Key::new([0xaa; KEY_SIZE]);
        let key_b = Key::new([0xbb; KEY_SIZE]);

        let mut table = ConnectionTable::with_capacity(4);
        let mut peers = Vec::new();
        add_conn(&mut table, &mut peers, 0, ConnState::Owner { key: key_a });

        assert!(owner_exists(&table, &key_a));
        assert!(!owner_exists(&table, &key_b));
    }

    #[tokio::test]
    async fn test_keyread_and_waiter_are_not_owners() {
        let key = Key::new([0x01; KEY_SIZE]);

        let mut table = ConnectionTable::with_capacity(4);
        let mut peers = Vec::new();
        add_conn(&mut table, &mut peers, 0, ConnState::Waiter { key });
        add_conn(
            &mut table,
            &mut peers,
            1,
            ConnState::KeyRead {
                buf: *key.as_bytes(),
                filled: KEY_SIZE - 1,
            },
        );

        assert!(!owner_exists(&table, &key));
    }

    #[tokio::test]
    async fn test_waiters_enumerated_in_slot_order() {
        let key_a = Key::new([0xaa; KEY_SIZE]);
        let key_b = Key::new([0xbb; KEY_SIZE]);

        let mut table = ConnectionTable::with_capacity(8);
        let mut peers = Vec::new();
        add_conn(&mut table, &mut peers, 0, ConnState::Owner { key: key_a });
        add_conn(&mut table, &mut peers, 1, ConnState::Waiter { key: key_a });
        add_conn(&mut table, &mut peers, 2, ConnState::Waiter { key: key_b });
        add_conn(&mut table, &mut peers, 3, ConnState::Waiter { key: key_a });

        assert_eq!(waiters_of(&table, &key_a), vec![1, 3]);
        assert_eq!(waiters_of(&table, &key_b), vec![2]);

        // Freeing a waiter removes it from the enumeration.
        table.free(1);
        assert_eq!(waiters_of(&table, &key_a), vec![3]);
    }
}
