use futures_util::StreamExt;
use lib::rules::{Color, Move, Square};
use lib::service::*;
use lib::session::*;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::runtime;

const HOST: ParticipantId = ParticipantId(1);
const GUEST: ParticipantId = ParticipantId(2);
const LATECOMER: ParticipantId = ParticipantId(3);

type Result<T = ()> = std::result::Result<T, Box<dyn Error>>;

fn arbiter() -> Arbiter<Arc<InMemoryRepository>> {
    Arbiter::new(Arc::default(), ArbiterConfig::default())
}

fn find(s: &Session, from: (i8, i8), to: (i8, i8)) -> Option<Move> {
    let from = Square::new(from.0, from.1)?;
    let to = Square::new(to.0, to.1)?;
    s.board().moves(s.turn()).find(from, to).next().cloned()
}

async fn match_in_progress(arbiter: &Arbiter<Arc<InMemoryRepository>>, config: MatchConfig) -> Result<Session> {
    let session = arbiter.open(HOST, Mode::Match, config).await?;
    let id = session.id();

    arbiter
        .execute(id, GUEST, Action::Join(Presence::Player), SystemTime::now())
        .await?;

    Ok(arbiter
        .execute(id, HOST, Action::Start, SystemTime::now())
        .await?
        .session)
}

async fn play(
    arbiter: &Arbiter<Arc<InMemoryRepository>>,
    session: &Session,
    from: (i8, i8),
    to: (i8, i8),
) -> Result<Session> {
    let m = find(session, from, to).ok_or("move not found")?;
    let who = session.player(session.turn()).ok_or("nobody to move")?;

    Ok(arbiter
        .execute(session.id(), who, Action::SubmitMove(m), SystemTime::now())
        .await?
        .session)
}

#[test]
fn white_has_seven_opening_moves() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();
    let session = rt.block_on(match_in_progress(&arbiter, MatchConfig::default()))?;

    assert_eq!(session.turn(), Color::White);
    assert_eq!(session.board().moves(Color::White).len(), 7);
    assert!(!session.board().moves(Color::White).is_capture());
    Ok(())
}

#[test]
fn captures_are_mandatory_in_play() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    let session = rt.block_on(async {
        let s = match_in_progress(&arbiter, MatchConfig::default()).await?;
        let s = play(&arbiter, &s, (5, 3), (4, 4)).await?;
        play(&arbiter, &s, (2, 2), (3, 3)).await
    })?;

    let moves = session.board().moves(Color::White);
    assert!(moves.iter().all(Move::is_capture));
    assert!(find(&session, (4, 4), (2, 2)).is_some());

    // A simple move is refused while a capture is available.
    let pawn = session.board().at(5, 1).ok_or("pawn not found")?;
    let simple = Move {
        piece: pawn.id,
        from: pawn.square,
        to: Square::new(4, 0).ok_or("off the board")?,
        captured: Default::default(),
        promotes: false,
    };

    assert_eq!(
        rt.block_on(arbiter.execute(session.id(), HOST, Action::SubmitMove(simple.clone()), SystemTime::now())),
        Err(ArbiterError::Rejected(Rejection::IllegalMove(simple)))
    );

    Ok(())
}

#[test]
fn running_out_of_time_loses_the_match() -> Result {
    let rt = runtime::Builder::new_multi_thread().enable_time().build()?;
    let arbiter = arbiter();
    let config = MatchConfig {
        time_limit_minutes: 1,
        increment_seconds: 0,
        board_theme: Theme::Minimal,
    };

    let (id, outcome) = rt.block_on(async {
        let s = match_in_progress(&arbiter, config).await?;
        play(&arbiter, &s, (5, 1), (4, 2)).await?;

        let driver = ClockDriver::new(Duration::from_millis(1));
        Ok::<_, Box<dyn Error>>((s.id(), driver.drive(&arbiter, s.id()).await?))
    })?;

    assert_eq!(outcome, Outcome::LossOnTime(Color::Red));

    let session = rt.block_on(arbiter.repository().fetch(id))?;
    assert_eq!(session.status(), Status::Finished);
    assert_eq!(session.clocks()[Color::Red], 0);
    assert_eq!(session.clocks()[Color::White], 60);
    assert_eq!(session.winner(), Some(Winner::White));
    Ok(())
}

#[test]
fn second_draw_offer_is_refused() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = match_in_progress(&arbiter, MatchConfig::default()).await?;
        arbiter
            .execute(s.id(), HOST, Action::ProposeDraw, SystemTime::now())
            .await?;

        assert_eq!(
            arbiter
                .execute(s.id(), HOST, Action::ProposeDraw, SystemTime::now())
                .await,
            Err(ArbiterError::Rejected(Rejection::DrawPending(HOST)))
        );

        let s = arbiter.repository().fetch(s.id()).await?;
        assert_eq!(s.draw_offer(), Some(HOST));
        assert_eq!(s.status(), Status::Playing);
        Ok(())
    })
}

#[test]
fn accepted_draw_ends_the_match() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = match_in_progress(&arbiter, MatchConfig::default()).await?;
        arbiter
            .execute(s.id(), HOST, Action::ProposeDraw, SystemTime::now())
            .await?;

        let t = arbiter
            .execute(s.id(), GUEST, Action::RespondDraw { accept: true }, SystemTime::now())
            .await?;

        assert_eq!(t.session.status(), Status::Finished);
        assert_eq!(t.session.winner(), Some(Winner::Draw));
        assert_eq!(t.session.draw_offer(), None);
        Ok(())
    })
}

#[test]
fn concurrent_moves_for_the_same_turn_apply_once() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = match_in_progress(&arbiter, MatchConfig::default()).await?;
        let a = find(&s, (5, 1), (4, 0)).ok_or("move not found")?;
        let b = find(&s, (5, 7), (4, 6)).ok_or("move not found")?;

        let (x, y) = tokio::join!(
            arbiter.execute(s.id(), HOST, Action::SubmitMove(a), SystemTime::now()),
            arbiter.execute(s.id(), HOST, Action::SubmitMove(b), SystemTime::now()),
        );

        let stale = ArbiterError::Rejected(Rejection::NotYourTurn(Color::Red));
        match (x, y) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => assert_eq!(e, stale),
            (x, y) => panic!("expected exactly one move to apply, got {x:?} and {y:?}"),
        }

        let s = arbiter.repository().fetch(s.id()).await?;
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.turn(), Color::Red);
        Ok(())
    })
}

#[test]
fn stale_snapshots_are_refused() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = arbiter.open(HOST, Mode::Match, MatchConfig::default()).await?;
        let first = s.join(GUEST, Presence::Player)?.session;
        let second = s.join(LATECOMER, Presence::Player)?.session;

        arbiter.repository().update(first).await?;
        assert_eq!(
            arbiter.repository().update(second).await,
            Err(RepositoryError::Conflict {
                id: s.id(),
                expected: 2,
                found: 1
            })
        );

        Ok(())
    })
}

#[test]
fn only_one_of_two_racing_players_gets_the_last_seat() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = arbiter.open(HOST, Mode::Match, MatchConfig::default()).await?;

        let (x, y) = tokio::join!(
            arbiter.execute(s.id(), GUEST, Action::Join(Presence::Player), SystemTime::now()),
            arbiter.execute(s.id(), LATECOMER, Action::Join(Presence::Player), SystemTime::now()),
        );

        let full = ArbiterError::Rejected(Rejection::NoVacantSeat);
        match (x, y) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => assert_eq!(e, full),
            (x, y) => panic!("expected exactly one player to be seated, got {x:?} and {y:?}"),
        }

        let s = arbiter.repository().fetch(s.id()).await?;
        assert!(s.seats().is_full());
        Ok(())
    })
}

#[test]
fn subscribers_follow_the_match() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = arbiter.open(HOST, Mode::Match, MatchConfig::default()).await?;
        let mut updates = arbiter.repository().subscribe(s.id()).await?;

        arbiter
            .execute(s.id(), GUEST, Action::Join(Presence::Player), SystemTime::now())
            .await?;

        let message = arbiter
            .chat(s.id(), GUEST, "guest".into(), "ready".into(), SystemTime::now())
            .await?;

        arbiter
            .execute(s.id(), HOST, Action::Start, SystemTime::now())
            .await?;

        match updates.next().await {
            Some(Notification::Updated(s)) => assert_eq!(s.seats().get(Seat::Second), Some(GUEST)),
            n => panic!("unexpected notification {n:?}"),
        }

        assert_eq!(updates.next().await, Some(Notification::ChatAppended(message.clone())));

        match updates.next().await {
            Some(Notification::Updated(s)) => assert_eq!(s.status(), Status::Playing),
            n => panic!("unexpected notification {n:?}"),
        }

        assert_eq!(arbiter.repository().chat(s.id()).await?, [message]);
        Ok(())
    })
}

#[test]
fn rematch_swaps_colors() -> Result {
    let rt = runtime::Builder::new_multi_thread().build()?;
    let arbiter = arbiter();

    rt.block_on(async {
        let s = match_in_progress(&arbiter, MatchConfig::default()).await?;
        assert_eq!(s.player(Color::White), Some(HOST));

        arbiter
            .execute(s.id(), HOST, Action::Resign, SystemTime::now())
            .await?;

        let t = arbiter
            .execute(s.id(), GUEST, Action::Start, SystemTime::now())
            .await?;

        assert_eq!(t.session.status(), Status::Playing);
        assert_eq!(t.session.player(Color::White), Some(GUEST));
        assert_eq!(t.session.player(Color::Red), Some(HOST));
        assert!(t.session.history().is_empty());
        Ok(())
    })
}
