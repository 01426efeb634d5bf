use battleship_client::{
    plan_ship_cells, AutoPilot, ClientNode, Coord, EventRouter, Inbound, InMemoryTransport,
    Intent, Mark, Message, Orientation, Outbound, Phase, PlayerId, Presenter, ShotOutcome,
    Snapshot, StopReason, Transport,
};
use tokio::sync::mpsc;

/// Reports the phase after every dispatched input so the test can wait for
/// the node to catch up.
struct Probe(mpsc::UnboundedSender<Phase>);

impl Presenter for Probe {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let _ = self.0.send(snapshot.phase);
    }
}

fn probe() -> (Probe, mpsc::UnboundedReceiver<Phase>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Probe(tx), rx)
}

fn event(ev: Inbound) -> Message {
    Message::Event(ev)
}

async fn expect_push(t: &mut InMemoryTransport) -> anyhow::Result<Outbound> {
    match t.recv().await? {
        Message::Push(push) => Ok(push),
        other => Err(anyhow::anyhow!("expected a push, got {:?}", other)),
    }
}

#[tokio::test]
async fn manual_session_over_in_memory_transport() -> anyhow::Result<()> {
    let (client_end, mut authority) = InMemoryTransport::pair();
    let (presenter, mut renders) = probe();
    let (tx, rx) = mpsc::channel(8);
    let mut node =
        ClientNode::new(EventRouter::new(presenter), Box::new(client_end)).with_intents(rx);

    let driver = async move {
        tx.send(Intent::RequestMatch).await?;
        assert_eq!(expect_push(&mut authority).await?, Outbound::FindGame);

        authority
            .send(event(Inbound::GameFound {
                game_id: "g9".into(),
                player: PlayerId::from("alice"),
            }))
            .await?;
        assert_eq!(
            expect_push(&mut authority).await?,
            Outbound::JoinGame {
                game_id: "g9".into()
            }
        );
        authority
            .send(event(Inbound::ChannelJoined {
                game_id: "g9".into(),
            }))
            .await?;
        authority.send(event(Inbound::PlaceShip { size: 2 })).await?;
        // FindGame, GameFound, ChannelJoined, PlaceShip.
        for _ in 0..4 {
            renders.recv().await;
        }

        tx.send(Intent::PlaceAt(Coord::new(0, 0)?)).await?;
        assert_eq!(
            expect_push(&mut authority).await?,
            Outbound::PlaceShip {
                x: 0,
                y: 0,
                orientation: Orientation::Horizontal
            }
        );
        renders.recv().await;

        authority
            .send(event(Inbound::ShipPlaced {
                coordinates: vec![[0, 0], [1, 0]],
                last: true,
            }))
            .await?;
        authority
            .send(event(Inbound::NextTurn {
                turn: PlayerId::from("alice"),
            }))
            .await?;
        renders.recv().await;
        assert_eq!(renders.recv().await, Some(Phase::Combat));

        tx.send(Intent::ShootAt(Coord::new(3, 4)?)).await?;
        assert_eq!(expect_push(&mut authority).await?, Outbound::Shoot { x: 3, y: 4 });
        renders.recv().await;

        authority
            .send(event(Inbound::ShotResult {
                shooter: PlayerId::from("alice"),
                result: ShotOutcome::GameOver,
                coordinates: vec![[3, 4]],
            }))
            .await?;
        assert_eq!(renders.recv().await, Some(Phase::Resolved));
        drop(tx);
        Ok::<_, anyhow::Error>(authority)
    };

    let (stopped, authority) = tokio::join!(node.run(), driver);
    let _authority = authority?;
    assert_eq!(stopped?, StopReason::IntentsClosed);
    assert_eq!(node.phase(), Phase::Resolved);
    let opponent = node.router().opponent_board();
    assert_eq!(opponent.mark_at(Coord::new(3, 4)?), Mark::Destroyed);
    Ok(())
}

#[tokio::test]
async fn autopilot_plays_a_scripted_game() -> anyhow::Result<()> {
    let (client_end, mut authority) = InMemoryTransport::pair();
    let mut node = ClientNode::new(EventRouter::headless(), Box::new(client_end))
        .with_autopilot(AutoPilot::seeded(42));

    let driver = async move {
        let me = PlayerId::from("p1");
        assert_eq!(expect_push(&mut authority).await?, Outbound::FindGame);
        authority
            .send(event(Inbound::GameFound {
                game_id: "auto".into(),
                player: me.clone(),
            }))
            .await?;
        assert!(matches!(
            expect_push(&mut authority).await?,
            Outbound::JoinGame { .. }
        ));
        authority
            .send(event(Inbound::ChannelJoined {
                game_id: "auto".into(),
            }))
            .await?;

        let mut occupied: Vec<Coord> = Vec::new();
        let sizes = [3usize, 2];
        for (i, &size) in sizes.iter().enumerate() {
            authority.send(event(Inbound::PlaceShip { size })).await?;
            let Outbound::PlaceShip { x, y, orientation } = expect_push(&mut authority).await?
            else {
                return Err(anyhow::anyhow!("expected a placement"));
            };
            let cells = plan_ship_cells(Coord::new(x as i64, y as i64)?, orientation, size);
            assert_eq!(cells.len(), size);
            assert!(cells.iter().all(|c| !occupied.contains(c)));
            occupied.extend(cells.iter().copied());
            authority
                .send(event(Inbound::ShipPlaced {
                    coordinates: cells
                        .iter()
                        .map(|c| [c.col() as i64, c.row() as i64])
                        .collect(),
                    last: i + 1 == sizes.len(),
                }))
                .await?;
        }

        authority
            .send(event(Inbound::NextTurn { turn: me.clone() }))
            .await?;
        let Outbound::Shoot { x, y } = expect_push(&mut authority).await? else {
            return Err(anyhow::anyhow!("expected a shot"));
        };
        authority
            .send(event(Inbound::ShotResult {
                shooter: me,
                result: ShotOutcome::GameOver,
                coordinates: vec![[x as i64, y as i64]],
            }))
            .await?;
        Ok::<_, anyhow::Error>(authority)
    };

    let (stopped, authority) = tokio::join!(node.run(), driver);
    let mut authority = authority?;
    assert_eq!(stopped?, StopReason::Resolved);
    assert_eq!(node.phase(), Phase::Resolved);
    assert_eq!(node.router().own_board().count(Mark::Ship), 5);
    // Nothing further was pushed after the game ended.
    assert!(authority.try_recv().is_none());
    Ok(())
}

#[tokio::test]
async fn client_bound_pushes_are_ignored() -> anyhow::Result<()> {
    let (client_end, mut authority) = InMemoryTransport::pair();
    let (presenter, mut renders) = probe();
    let mut node = ClientNode::new(EventRouter::new(presenter), Box::new(client_end));

    let driver = async move {
        authority.send(Message::Push(Outbound::FindGame)).await?;
        authority.send(event(Inbound::UnableToJoin)).await?;
        assert_eq!(expect_push(&mut authority).await?, Outbound::FindGame);
        // Only the event was dispatched.
        assert_eq!(renders.recv().await, Some(Phase::MatchSearching));
        assert!(renders.try_recv().is_err());
        Ok::<_, anyhow::Error>(())
    };

    let (stopped, driven) = tokio::join!(node.run(), driver);
    driven?;
    // The authority end was dropped, which closes the session.
    assert!(stopped.is_err());
    Ok(())
}
