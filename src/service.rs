//! Single-writer queue in front of a `GameEngine`.
//!
//! The engine itself is synchronous and must never see two moves at once.
//! `spawn` moves it into a task that drains a channel one request at a time;
//! any number of `EngineHandle` clones can submit concurrently.

use anyhow::anyhow;
use log::debug;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::game::{GameEngine, GameState};
use crate::protocol::{GameApi, Move, MoveResult};

const QUEUE_DEPTH: usize = 64;

enum Request {
    Move {
        mv: Move,
        reply: oneshot::Sender<MoveResult>,
    },
    RawMove {
        raw: String,
        reply: oneshot::Sender<MoveResult>,
    },
    State {
        reply: oneshot::Sender<GameState>,
    },
}

/// Task side of the queue: owns the engine and answers requests in order.
pub struct EngineService {
    engine: GameEngine,
    requests: mpsc::Receiver<Request>,
}

impl EngineService {
    /// Serve until every handle has been dropped, then give the engine back.
    pub async fn run(mut self) -> GameEngine {
        while let Some(request) = self.requests.recv().await {
            match request {
                Request::Move { mv, reply } => {
                    let _ = reply.send(self.engine.input_move(mv));
                }
                Request::RawMove { raw, reply } => {
                    let _ = reply.send(self.engine.input_move_json(&raw));
                }
                Request::State { reply } => {
                    let _ = reply.send(self.engine.state());
                }
            }
        }
        debug!("engine queue closed");
        self.engine
    }
}

/// Cloneable submitter for a queued engine.
#[derive(Clone)]
pub struct EngineHandle {
    requests: mpsc::Sender<Request>,
}

impl EngineHandle {
    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> anyhow::Result<T> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(build(tx))
            .await
            .map_err(|_| anyhow!("engine queue is closed"))?;
        rx.await.map_err(|_| anyhow!("engine dropped the request"))
    }
}

/// Pair an engine with a fresh queue without starting it.
pub fn channel(engine: GameEngine) -> (EngineService, EngineHandle) {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    (
        EngineService {
            engine,
            requests: rx,
        },
        EngineHandle { requests: tx },
    )
}

/// Start serving `engine` on the current tokio runtime.
pub fn spawn(engine: GameEngine) -> (EngineHandle, JoinHandle<GameEngine>) {
    let (service, handle) = channel(engine);
    (handle, tokio::spawn(service.run()))
}

#[async_trait::async_trait]
impl GameApi for EngineHandle {
    async fn input_move(&mut self, mv: Move) -> anyhow::Result<MoveResult> {
        self.call(|reply| Request::Move { mv, reply }).await
    }

    async fn input_move_json(&mut self, raw: &str) -> anyhow::Result<MoveResult> {
        let raw = raw.to_string();
        self.call(|reply| Request::RawMove { raw, reply }).await
    }

    async fn game_state(&mut self) -> anyhow::Result<GameState> {
        self.call(|reply| Request::State { reply }).await
    }
}
