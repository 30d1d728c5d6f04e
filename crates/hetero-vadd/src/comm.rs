//! In-process message passing between ranks.
//!
//! A [`World`] runs one thread per rank. Every ordered pair of ranks owns a
//! FIFO channel, so `recv(source)` only ever sees what `source` sent to this
//! rank, in order. The barrier travels over the same channels: a rank that
//! fails or panics drops its endpoints and its peers observe a disconnect
//! instead of blocking forever.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use tracing::{debug, warn};

use crate::error::{ClError, Result};
use crate::vector::{N, Vector};

/// Rank coordinating the distributed addition.
pub const MASTER: usize = 0;

/// One master plus one worker per element.
pub const WORLD_SIZE: usize = N + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Message {
    Data(f32),
    Barrier,
}

/// Endpoint of one rank.
#[derive(Debug)]
pub struct Communicator {
    rank: usize,
    size: usize,
    // indexed by destination rank
    outbox: Vec<Sender<Message>>,
    // indexed by source rank
    inbox: Vec<Receiver<Message>>,
}

impl Communicator {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn peer(&self, other: usize) -> Result<()> {
        if other >= self.size || other == self.rank {
            return Err(ClError::Comm(format!(
                "rank {} cannot address rank {other} in a world of {}",
                self.rank, self.size
            )));
        }
        Ok(())
    }

    fn post(&self, dest: usize, msg: Message) -> Result<()> {
        self.peer(dest)?;
        self.outbox[dest]
            .send(msg)
            .map_err(|_| ClError::Comm(format!("rank {dest} is gone")))
    }

    fn take(&self, source: usize) -> Result<Message> {
        self.peer(source)?;
        self.inbox[source]
            .recv()
            .map_err(|_| ClError::Comm(format!("rank {source} disconnected")))
    }

    /// Synchronous send of one value to `dest`.
    pub fn send(&self, dest: usize, value: f32) -> Result<()> {
        self.post(dest, Message::Data(value))
    }

    /// Blocks until `source` has sent one value.
    pub fn recv(&self, source: usize) -> Result<f32> {
        match self.take(source)? {
            Message::Data(v) => Ok(v),
            Message::Barrier => Err(ClError::Comm(format!(
                "rank {} expected data from rank {source}, got a barrier",
                self.rank
            ))),
        }
    }

    /// Returns once every rank has entered the barrier. Rank 0 gathers one
    /// token from each peer then releases them all.
    pub fn barrier(&self) -> Result<()> {
        if self.rank == MASTER {
            for peer in 1..self.size {
                self.expect_barrier(peer)?;
            }
            for peer in 1..self.size {
                self.post(peer, Message::Barrier)?;
            }
        } else {
            self.post(MASTER, Message::Barrier)?;
            self.expect_barrier(MASTER)?;
        }
        Ok(())
    }

    fn expect_barrier(&self, source: usize) -> Result<()> {
        match self.take(source)? {
            Message::Barrier => Ok(()),
            Message::Data(v) => Err(ClError::Comm(format!(
                "rank {} expected a barrier from rank {source}, got data {v}",
                self.rank
            ))),
        }
    }
}

/// A fixed set of ranks living for one [`World::run`] call.
#[derive(Debug)]
pub struct World;

impl World {
    /// Runs `f` once per rank on its own thread and returns the results in
    /// rank order. The first failing rank's error is returned.
    pub fn run<T, F>(size: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(Communicator) -> Result<T> + Sync,
    {
        if size == 0 {
            return Err(ClError::Comm("a world needs at least one rank".into()));
        }

        let mut outboxes: Vec<Vec<Sender<Message>>> = (0..size).map(|_| Vec::new()).collect();
        let mut inboxes: Vec<Vec<Receiver<Message>>> = (0..size).map(|_| Vec::new()).collect();
        for src in 0..size {
            for dst in 0..size {
                let (tx, rx) = channel();
                outboxes[src].push(tx);
                inboxes[dst].push(rx);
            }
        }

        let comms = outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| Communicator {
                rank,
                size,
                outbox,
                inbox,
            });

        let f = &f;
        let results: Vec<Result<T>> = thread::scope(|s| {
            let handles: Vec<_> = comms.map(|comm| s.spawn(move || f(comm))).collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(rank, h)| {
                    h.join()
                        .unwrap_or_else(|_| Err(ClError::Comm(format!("rank {rank} panicked"))))
                })
                .collect()
        });

        for (rank, r) in results.iter().enumerate() {
            if let Err(e) = r {
                warn!(rank, error = %e, "rank failed");
            }
        }
        results.into_iter().collect()
    }
}

/// Master/worker addition: rank 0 hands `a[i-1]` and `b[i-1]` to rank `i`
/// and collects the sum back, one worker at a time; all ranks then meet at
/// a barrier.
pub fn distributed_vector_add(a: &Vector, b: &Vector) -> Result<Vector> {
    let results = World::run(WORLD_SIZE, |comm| {
        let rank = comm.rank();
        if rank == MASTER {
            let mut c = [0.0; N];
            for i in 1..=N {
                comm.send(i, a[i - 1])?;
                comm.send(i, b[i - 1])?;
                c[i - 1] = comm.recv(i)?;
            }
            comm.barrier()?;
            Ok(Some(c))
        } else {
            let x = comm.recv(MASTER)?;
            let y = comm.recv(MASTER)?;
            debug!(rank, x, y, "worker adding");
            comm.send(MASTER, x + y)?;
            comm.barrier()?;
            Ok(None)
        }
    })?;

    results
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| ClError::Comm("master produced no result".into()))
}
