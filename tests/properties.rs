//! Property tests: whatever the player mashes, entities stay on their
//! boards, score only grows, lives only shrink and pausing is idempotent.

use proptest::prelude::*;

use retro_arcade::games::{self, BlockStack, BubblePop, Chompy, PaddleBall, RoadDash, Wormy};
use retro_arcade::sim::{EdgeMode, Game, GamePhase, HostEvent, InputEvent, Key, Session};
use retro_arcade::{GameKind, RecordingHost, Runner, Settings};

const KEYS: [Key; 13] = [
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::Space,
    Key::Enter,
    Key::Backspace,
    Key::Char('w'),
    Key::Char('s'),
    Key::Char('a'),
    Key::Char('e'),
    Key::Char('1'),
    Key::Char('7'),
];

/// One step of player input: a key going down or up, or a tick passing
#[derive(Debug, Clone, Copy)]
enum Step {
    Down(Key),
    Up(Key),
    Tick,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..KEYS.len()).prop_map(|i| Step::Down(KEYS[i])),
        (0..KEYS.len()).prop_map(|i| Step::Up(KEYS[i])),
        Just(Step::Tick),
        Just(Step::Tick),
    ]
}

fn kind_strategy() -> impl Strategy<Value = GameKind> {
    (0..GameKind::ALL.len()).prop_map(|i| GameKind::ALL[i])
}

/// Drive a bare game with a running session, checking `inside` after every tick
fn play<G: Game>(game: &mut G, steps: &[Step], inside: impl Fn(&G) -> bool) -> bool {
    let mut session = Session::new(Some(3));
    session.begin();
    game.reset(&mut session);
    for step in steps {
        match *step {
            Step::Down(key) => game.handle_input(&InputEvent::KeyDown(key)),
            Step::Up(key) => game.handle_input(&InputEvent::KeyUp(key)),
            Step::Tick => {
                if !session.is_playing() {
                    break;
                }
                game.update(&mut session, 0.05);
                if !inside(game) {
                    return false;
                }
            }
        }
    }
    true
}

proptest! {
    #[test]
    fn prop_wormy_head_stays_on_board(seed in any::<u64>(), wrap in any::<bool>(),
                                       steps in prop::collection::vec(step_strategy(), 0..200)) {
        let edges = if wrap { EdgeMode::Wrap } else { EdgeMode::Solid };
        let mut game = Wormy::new(seed, edges);
        let ok = play(&mut game, &steps, |g| {
            g.body().all(|p| p.in_bounds(games::wormy::COLS, games::wormy::ROWS))
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_chompy_entities_on_board(seed in any::<u64>(),
                                     steps in prop::collection::vec(step_strategy(), 0..300)) {
        let mut game = Chompy::new(seed).unwrap();
        let ok = play(&mut game, &steps, |g| {
            let (w, h) = (g.board().width(), g.board().height());
            g.player().in_bounds(w, h) && g.ghosts().iter().all(|ghost| ghost.pos.in_bounds(w, h))
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_block_stack_piece_stays_in_well(seed in any::<u64>(),
                                            steps in prop::collection::vec(step_strategy(), 0..300)) {
        let mut game = BlockStack::new(seed);
        let ok = play(&mut game, &steps, |g| {
            g.current().occupied().all(|(x, y)| {
                (0..games::block_stack::COLS as i32).contains(&x)
                    && (0..games::block_stack::ROWS as i32).contains(&y)
            })
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_paddle_ball_stays_between_walls(seed in any::<u64>(),
                                            steps in prop::collection::vec(step_strategy(), 0..300)) {
        use games::paddle_ball::{PADDLE_HEIGHT, ROWS, Side};
        let mut game = PaddleBall::new(seed);
        let ok = play(&mut game, &steps, |g| {
            let paddles_ok = [Side::Left, Side::Right]
                .into_iter()
                .all(|side| (0.0..=ROWS - PADDLE_HEIGHT).contains(&g.paddle_y(side)));
            paddles_ok && (0.0..=ROWS).contains(&g.ball().y)
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_bubble_pop_ball_between_side_walls(steps in prop::collection::vec(step_strategy(), 0..300)) {
        use games::bubble_pop::{COLS, PADDLE_WIDTH};
        let mut game = BubblePop::new();
        let ok = play(&mut game, &steps, |g| {
            (0.0..=COLS).contains(&g.ball().x)
                && g.ball().y >= 0.0
                && (0.0..=COLS - PADDLE_WIDTH).contains(&g.paddle_x())
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_road_dash_frog_on_field(seed in any::<u64>(),
                                    steps in prop::collection::vec(step_strategy(), 0..200)) {
        let mut game = RoadDash::new(seed);
        let ok = play(&mut game, &steps, |g| {
            g.frog().in_bounds(games::road_dash::COLS, games::road_dash::ROWS)
        });
        prop_assert!(ok);
    }

    #[test]
    fn prop_score_grows_and_lives_shrink(kind in kind_strategy(), seed in any::<u64>(),
                                         steps in prop::collection::vec(step_strategy(), 0..300)) {
        let mut runner = Runner::new(kind, &Settings::default(), seed, RecordingHost::default()).unwrap();
        runner.start();
        let (mut score, mut lives) = (runner.session().score(), runner.session().lives());
        for step in steps {
            match step {
                Step::Down(key) => runner.handle_event(InputEvent::KeyDown(key)),
                Step::Up(key) => runner.handle_event(InputEvent::KeyUp(key)),
                Step::Tick => runner.step(),
            }
            // A game over followed by Space is a fresh run
            if runner.phase() == GamePhase::GameOver {
                break;
            }
            let session = runner.session();
            prop_assert!(session.score() >= score, "{kind}: score went from {score} to {}", session.score());
            prop_assert!(session.lives() <= lives, "{kind}: lives went from {lives} to {}", session.lives());
            score = session.score();
            lives = session.lives();
        }
    }

    #[test]
    fn prop_pause_is_idempotent(kind in kind_strategy(), extra in 1usize..5, ticks in 0usize..20) {
        let mut runner = Runner::new(kind, &Settings::default(), 3, RecordingHost::default()).unwrap();
        runner.start();
        for _ in 0..ticks {
            runner.step();
        }
        prop_assume!(runner.phase() == GamePhase::Playing);

        runner.host_mut().clear();
        let before = runner.ticks();
        prop_assert!(runner.pause());
        for _ in 0..extra {
            prop_assert!(!runner.pause());
            runner.step();
        }
        prop_assert_eq!(runner.phase(), GamePhase::Paused);
        prop_assert_eq!(runner.ticks(), before);
        let banners = runner.host().count(|e| matches!(e, HostEvent::Status { .. }));
        prop_assert_eq!(banners, 1);

        prop_assert!(runner.resume());
        prop_assert!(!runner.resume());
        prop_assert_eq!(runner.phase(), GamePhase::Playing);
    }
}
