//! Runs orchestrator commands on tokio tasks and reports the replies.

use super::command::{Command, CommentaryTicket, MoveTicket, Reply};
use crate::opponent::{CommentaryClient, CompletionService, MoveClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Executes [`Command`]s and sends [`Reply`]s to the UI loop.
///
/// Tasks never touch session state; they only report back through the
/// channel, tagged with the generation of the command that started them.
#[derive(Clone)]
pub struct Dispatcher {
    move_client: Arc<MoveClient<dyn CompletionService>>,
    commentary_client: Arc<CommentaryClient<dyn CompletionService>>,
    ai_delay: Duration,
    reply_tx: mpsc::UnboundedSender<Reply>,
}

impl Dispatcher {
    /// Creates a dispatcher over `service`.
    ///
    /// `ai_delay` is the pause before each move request; `timeout` bounds
    /// every service call.
    #[instrument(skip(service, persona, reply_tx), fields(service = service.name()))]
    pub fn new(
        service: Arc<dyn CompletionService>,
        persona: &str,
        ai_delay: Duration,
        timeout: Duration,
        reply_tx: mpsc::UnboundedSender<Reply>,
    ) -> Self {
        info!("Creating dispatcher");
        Self {
            move_client: Arc::new(MoveClient::new(Arc::clone(&service), persona, timeout)),
            commentary_client: Arc::new(CommentaryClient::new(service, timeout)),
            ai_delay,
            reply_tx,
        }
    }

    /// Runs every command in order of issue.
    pub fn dispatch_all(&self, commands: Vec<Command>) -> Vec<JoinHandle<()>> {
        commands.into_iter().map(|c| self.dispatch(c)).collect()
    }

    /// Spawns the task for one command.
    pub fn dispatch(&self, command: Command) -> JoinHandle<()> {
        match command {
            Command::RequestMove(ticket) => self.spawn_move(ticket),
            Command::RequestCommentary(ticket) => self.spawn_commentary(ticket),
        }
    }

    fn spawn_move(&self, ticket: MoveTicket) -> JoinHandle<()> {
        let client = Arc::clone(&self.move_client);
        let reply_tx = self.reply_tx.clone();
        let delay = self.ai_delay;
        let span = info_span!("ai_move", generation = ticket.generation());

        tokio::spawn(
            async move {
                // Pacing first, then the request; never both at once.
                tokio::time::sleep(delay).await;
                let suggestion = client
                    .choose_move(ticket.board(), *ticket.ai(), *ticket.opponent())
                    .await;
                debug!(position = suggestion.position.to_index(), "Move ready");
                send(
                    &reply_tx,
                    Reply::Move {
                        generation: *ticket.generation(),
                        suggestion,
                    },
                );
            }
            .instrument(span),
        )
    }

    fn spawn_commentary(&self, ticket: CommentaryTicket) -> JoinHandle<()> {
        let client = Arc::clone(&self.commentary_client);
        let reply_tx = self.reply_tx.clone();
        let span = info_span!("closing_remark", generation = ticket.generation());

        tokio::spawn(
            async move {
                let remark = client
                    .closing_remark(
                        ticket.board(),
                        ticket.outcome(),
                        *ticket.last_player(),
                    )
                    .await;
                send(
                    &reply_tx,
                    Reply::Commentary {
                        generation: *ticket.generation(),
                        remark,
                    },
                );
            }
            .instrument(span),
        )
    }
}

fn send(reply_tx: &mpsc::UnboundedSender<Reply>, reply: Reply) {
    if reply_tx.send(reply).is_err() {
        warn!("Reply channel closed, dropping reply");
    }
}
