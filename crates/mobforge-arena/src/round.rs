//! Round actor: the isolated Tokio task behind each live arena.
//!
//! The round simulation itself (waves, combat, rewards) lives outside
//! Mobforge, behind [`RoundLogic`]. What lives here is the part the
//! registries depend on: a round can be started and ended, its state
//! queried, and above all it can be *forcibly terminated*, with the
//! caller waiting until the task has released everything it held.

use std::fmt;

use mobforge_types::{PlayerId, World};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::ArenaError;

/// Default command channel size for round actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// RoundState
// ---------------------------------------------------------------------------

/// The lifecycle state of an arena's round.
///
/// ```text
/// Idle ⇄ Running
///   └──────┴──(force end)──→ Terminated
/// ```
///
/// `Terminated` is final: the actor has stopped and the arena is about
/// to be dropped or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    Running,
    Terminated,
}

impl RoundState {
    /// Returns `true` while a round is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Idle)
                | (Self::Idle | Self::Running, Self::Terminated)
        )
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoundLogic / RoundFactory
// ---------------------------------------------------------------------------

/// The round simulation of one arena instance.
///
/// All methods run on the round's own task, one at a time.
pub trait RoundLogic: Send + 'static {
    /// A round begins with these players.
    fn on_start(&mut self, _arena: &str, _players: &[PlayerId]) {}

    /// A round ended normally.
    fn on_end(&mut self, _arena: &str) {}

    /// The arena is being removed or replaced. Release every scheduled
    /// task and listener before returning; the caller is waiting.
    fn force_end(&mut self, arena: &str);
}

/// Creates the [`RoundLogic`] for each newly constructed arena.
pub trait RoundFactory: Send + Sync + 'static {
    fn create(&self, arena: &str, world: &World) -> Box<dyn RoundLogic>;
}

/// A factory whose rounds hold no resources and do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleRounds;

struct IdleRound;

impl RoundLogic for IdleRound {
    fn force_end(&mut self, arena: &str) {
        tracing::debug!(%arena, "idle round force-ended");
    }
}

impl RoundFactory for IdleRounds {
    fn create(&self, _arena: &str, _world: &World) -> Box<dyn RoundLogic> {
        Box::new(IdleRound)
    }
}

// ---------------------------------------------------------------------------
// Commands and handle
// ---------------------------------------------------------------------------

/// Commands sent to a round actor through its channel.
enum RoundCommand {
    Start {
        players: Vec<PlayerId>,
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    End {
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    GetState {
        reply: oneshot::Sender<RoundState>,
    },
    ForceEnd {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a running round actor. Owned by its [`Arena`](crate::Arena).
pub struct RoundHandle {
    arena: String,
    sender: mpsc::Sender<RoundCommand>,
    task: Option<JoinHandle<()>>,
}

impl fmt::Debug for RoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundHandle")
            .field("arena", &self.arena)
            .field("terminated", &self.task.is_none())
            .finish()
    }
}

impl RoundHandle {
    fn unavailable(&self) -> ArenaError {
        ArenaError::Unavailable(self.arena.clone())
    }

    /// Starts a round with the given players.
    pub async fn start(&self, players: Vec<PlayerId>) -> Result<(), ArenaError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoundCommand::Start {
                players,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Ends the current round normally.
    pub async fn end(&self) -> Result<(), ArenaError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoundCommand::End { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Asks the actor for its current state. A stopped actor reports
    /// [`RoundState::Terminated`].
    pub async fn state(&self) -> RoundState {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .sender
            .send(RoundCommand::GetState { reply: reply_tx })
            .await
            .is_err()
        {
            return RoundState::Terminated;
        }
        reply_rx.await.unwrap_or(RoundState::Terminated)
    }

    /// Returns `true` once [`force_end`](Self::force_end) has completed.
    pub fn is_terminated(&self) -> bool {
        self.task.is_none()
    }

    /// Forcibly terminates the round and waits for the actor task to
    /// finish. Calling it again is a no-op.
    pub async fn force_end(&mut self) -> Result<(), ArenaError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self
            .sender
            .send(RoundCommand::ForceEnd { reply: reply_tx })
            .await
            .is_ok();
        if sent {
            let _ = reply_rx.await;
        }

        task.await.map_err(|e| {
            tracing::error!(arena = %self.arena, error = %e, "round task did not exit cleanly");
            self.unavailable()
        })
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct RoundActor {
    arena: String,
    state: RoundState,
    logic: Box<dyn RoundLogic>,
    receiver: mpsc::Receiver<RoundCommand>,
}

impl RoundActor {
    /// Processes commands until forced termination.
    async fn run(mut self) {
        tracing::debug!(arena = %self.arena, "round actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoundCommand::Start { players, reply } => {
                    let _ = reply.send(self.handle_start(&players));
                }
                RoundCommand::End { reply } => {
                    let _ = reply.send(self.handle_end());
                }
                RoundCommand::GetState { reply } => {
                    let _ = reply.send(self.state);
                }
                RoundCommand::ForceEnd { reply } => {
                    self.logic.force_end(&self.arena);
                    self.state = RoundState::Terminated;
                    let _ = reply.send(());
                    break;
                }
            }
        }

        tracing::debug!(arena = %self.arena, "round actor stopped");
    }

    fn transition(&mut self, target: RoundState) -> Result<(), ArenaError> {
        if !self.state.can_transition_to(target) {
            return Err(ArenaError::InvalidState(format!(
                "cannot go from {} to {} in arena '{}'",
                self.state, target, self.arena
            )));
        }
        self.state = target;
        Ok(())
    }

    fn handle_start(&mut self, players: &[PlayerId]) -> Result<(), ArenaError> {
        self.transition(RoundState::Running)?;
        self.logic.on_start(&self.arena, players);
        tracing::info!(arena = %self.arena, players = players.len(), "round started");
        Ok(())
    }

    fn handle_end(&mut self) -> Result<(), ArenaError> {
        self.transition(RoundState::Idle)?;
        self.logic.on_end(&self.arena);
        tracing::info!(arena = %self.arena, "round ended");
        Ok(())
    }
}

/// Spawns a round actor for `arena` and returns the handle that owns it.
pub(crate) fn spawn_round(arena: &str, logic: Box<dyn RoundLogic>) -> RoundHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = RoundActor {
        arena: arena.to_string(),
        state: RoundState::Idle,
        logic,
        receiver: rx,
    };

    let task = tokio::spawn(actor.run());

    RoundHandle {
        arena: arena.to_string(),
        sender: tx,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl RoundLogic for Counting {
        fn force_end(&mut self, _arena: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    // =====================================================================
    // RoundState
    // =====================================================================

    #[test]
    fn test_round_state_transitions() {
        assert!(RoundState::Idle.can_transition_to(RoundState::Running));
        assert!(RoundState::Running.can_transition_to(RoundState::Idle));
        assert!(RoundState::Running.can_transition_to(RoundState::Terminated));
        assert!(RoundState::Idle.can_transition_to(RoundState::Terminated));
        assert!(!RoundState::Idle.can_transition_to(RoundState::Idle));
        assert!(!RoundState::Terminated.can_transition_to(RoundState::Idle));
        assert!(!RoundState::Terminated.can_transition_to(RoundState::Terminated));
    }

    #[test]
    fn test_round_state_is_active() {
        assert!(!RoundState::Idle.is_active());
        assert!(RoundState::Running.is_active());
        assert!(!RoundState::Terminated.is_active());
    }

    #[test]
    fn test_round_state_display() {
        assert_eq!(RoundState::Running.to_string(), "Running");
    }

    // =====================================================================
    // Actor
    // =====================================================================

    #[tokio::test]
    async fn test_start_and_end_round() {
        let mut handle = spawn_round("a1", Box::new(IdleRound));
        assert_eq!(handle.state().await, RoundState::Idle);

        handle.start(vec![PlayerId(1)]).await.unwrap();
        assert_eq!(handle.state().await, RoundState::Running);

        handle.end().await.unwrap();
        assert_eq!(handle.state().await, RoundState::Idle);

        handle.force_end().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_twice_is_invalid() {
        let mut handle = spawn_round("a1", Box::new(IdleRound));
        handle.start(vec![]).await.unwrap();

        let result = handle.start(vec![]).await;

        assert!(matches!(result, Err(ArenaError::InvalidState(_))));
        handle.force_end().await.unwrap();
    }

    #[tokio::test]
    async fn test_force_end_waits_and_runs_logic_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut handle = spawn_round("a1", Box::new(Counting(count.clone())));
        handle.start(vec![PlayerId(1)]).await.unwrap();

        handle.force_end().await.unwrap();
        // The logic has already run by the time force_end returns.
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(handle.is_terminated());

        handle.force_end().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1, "second call is a no-op");
    }

    #[tokio::test]
    async fn test_commands_after_force_end_are_unavailable() {
        let mut handle = spawn_round("a1", Box::new(IdleRound));
        handle.force_end().await.unwrap();

        assert_eq!(handle.state().await, RoundState::Terminated);
        assert!(matches!(
            handle.start(vec![]).await,
            Err(ArenaError::Unavailable(_))
        ));
    }
}
