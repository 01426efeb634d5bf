#![cfg(feature = "std")]

use alloc::boxed::Box;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::{
    game::Phase,
    player_ai::AutoPilot,
    protocol::{Inbound, Message, Outbound},
    router::{EventRouter, Input, Intent},
    transport::Transport,
    ui::Presenter,
};

/// Why [`ClientNode::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The local intent source closed (user quit).
    IntentsClosed,
    /// The autopilot finished its game.
    Resolved,
}

enum Step {
    Remote(anyhow::Result<Message>),
    Local(Intent),
    LocalClosed,
}

/// Connects one router to the authority and to a local intent source.
///
/// Each input is dispatched to completion before the next one is awaited, so
/// the router never sees interleaved events.
pub struct ClientNode<P: Presenter> {
    router: EventRouter<P>,
    transport: Box<dyn Transport>,
    intents: Option<mpsc::Receiver<Intent>>,
    autopilot: Option<AutoPilot>,
}

impl<P: Presenter> ClientNode<P> {
    pub fn new(router: EventRouter<P>, transport: Box<dyn Transport>) -> Self {
        Self {
            router,
            transport,
            intents: None,
            autopilot: None,
        }
    }

    /// Read user intents from `rx`.
    pub fn with_intents(mut self, rx: mpsc::Receiver<Intent>) -> Self {
        self.intents = Some(rx);
        self
    }

    /// Let `pilot` propose intents after every input.
    pub fn with_autopilot(mut self, pilot: AutoPilot) -> Self {
        self.autopilot = Some(pilot);
        self
    }

    pub fn router(&self) -> &EventRouter<P> {
        &self.router
    }

    pub fn into_router(self) -> EventRouter<P> {
        self.router
    }

    pub fn phase(&self) -> Phase {
        self.router.phase()
    }

    /// Run until the user quits, the autopilot's game is resolved, or the
    /// transport fails. Transport errors (including a closed connection)
    /// are returned as `Err`.
    pub async fn run(&mut self) -> anyhow::Result<StopReason> {
        self.autopilot_step().await?;
        loop {
            if self.autopilot.is_some() && self.router.phase() == Phase::Resolved {
                info!("game resolved; autopilot stopping");
                return Ok(StopReason::Resolved);
            }

            let step = tokio::select! {
                msg = self.transport.recv() => Step::Remote(msg),
                intent = next_intent(&mut self.intents) => match intent {
                    Some(intent) => Step::Local(intent),
                    None => Step::LocalClosed,
                },
            };

            match step {
                Step::Remote(msg) => match msg? {
                    Message::Event(ev) => {
                        debug!("event {}", ev.name());
                        self.on_event(ev).await?;
                    }
                    Message::Push(push) => {
                        warn!("ignoring client-bound push {}", push.name());
                        continue;
                    }
                },
                Step::Local(intent) => self.handle(Input::Intent(intent)).await?,
                Step::LocalClosed => {
                    self.intents = None;
                    if self.autopilot.is_none() {
                        info!("intent source closed; stopping");
                        return Ok(StopReason::IntentsClosed);
                    }
                }
            }
            self.autopilot_step().await?;
        }
    }

    async fn on_event(&mut self, ev: Inbound) -> anyhow::Result<()> {
        if let Some(pilot) = self.autopilot.as_mut() {
            pilot.observe(&ev);
        }
        self.handle(Input::Event(ev)).await
    }

    async fn handle(&mut self, input: Input) -> anyhow::Result<()> {
        match self.router.dispatch(input) {
            Some(push) => self.push(push).await,
            None => Ok(()),
        }
    }

    async fn push(&mut self, push: Outbound) -> anyhow::Result<()> {
        self.transport.send(Message::Push(push)).await
    }

    async fn autopilot_step(&mut self) -> anyhow::Result<()> {
        let Some(pilot) = self.autopilot.as_mut() else {
            return Ok(());
        };
        for intent in pilot.plan(&self.router) {
            if let Some(push) = self.router.dispatch(intent) {
                self.transport.send(Message::Push(push)).await?;
            }
        }
        Ok(())
    }
}

/// Next local intent, or pending forever when there is no intent source.
async fn next_intent(rx: &mut Option<mpsc::Receiver<Intent>>) -> Option<Intent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
