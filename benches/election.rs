//! Election Scan Benchmark for herdlockd
//!
//! Measures the linear-scan election queries and the slot allocate/free
//! cycle at the daemon's intended connection counts.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use herdlockd::connection::{ConnState, Connection, ConnectionTable, Stream};
use herdlockd::election;
use herdlockd::protocol::{Key, KEY_SIZE};
use tokio::net::UnixStream;
use tokio::runtime::Runtime;

fn key(n: u8) -> Key {
    Key::new([n; KEY_SIZE])
}

/// Builds a fully-populated table: slots 0..n-1 wait on key 1, the tail
/// slot owns it, so an ownership probe scans the whole table. The peer
/// halves are returned to keep the sockets open.
fn build_table(rt: &Runtime, n: usize) -> (ConnectionTable, Vec<UnixStream>) {
    let _guard = rt.enter();
    let mut table = ConnectionTable::with_capacity(n);
    let mut peers = Vec::with_capacity(n);

    for i in 0..n {
        let (local, peer) = UnixStream::pair().unwrap();
        peers.push(peer);
        let mut conn = Connection::new(i as u64, Stream::Unix(local));
        conn.state = if i == n - 1 {
            ConnState::Owner { key: key(1) }
        } else {
            ConnState::Waiter { key: key(1) }
        };
        table.allocate(conn).unwrap();
    }

    (table, peers)
}

/// Benchmark the election queries over a full table
fn bench_election(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (table, _peers) = build_table(&rt, 32);

    let mut group = c.benchmark_group("election");
    group.throughput(Throughput::Elements(1));

    group.bench_function("owner_exists_hit", |b| {
        b.iter(|| black_box(election::owner_exists(&table, black_box(&key(1)))));
    });

    group.bench_function("owner_exists_miss", |b| {
        b.iter(|| black_box(election::owner_exists(&table, black_box(&key(2)))));
    });

    group.bench_function("waiters_of", |b| {
        b.iter(|| black_box(election::waiters_of(&table, black_box(&key(1)))));
    });

    group.finish();
}

/// Benchmark the slot allocate/free cycle
fn bench_table(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (mut table, _peers) = build_table(&rt, 32);

    let mut group = c.benchmark_group("table");
    group.throughput(Throughput::Elements(1));

    group.bench_function("free_allocate_lowest", |b| {
        b.iter(|| {
            let conn = table.free(0).unwrap();
            table.allocate(conn).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_election, bench_table);
criterion_main!(benches);
