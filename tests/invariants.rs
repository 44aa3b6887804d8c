//! Randomized input sequences against the state rules checked every tick

use flappy_axolotl::highscores::MAX_HIGH_SCORES;
use flappy_axolotl::sim::{GameMode, GameState, PowerUpKind, TickInput, tick};
use proptest::prelude::*;

fn arb_power_up() -> impl Strategy<Value = Option<PowerUpKind>> {
    prop_oneof![
        8 => Just(None),
        1 => prop::sample::select(PowerUpKind::ALL.to_vec()).prop_map(Some),
    ]
}

fn arb_input() -> impl Strategy<Value = TickInput> {
    (
        prop::bool::weighted(0.08),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.5),
        arb_power_up(),
    )
        .prop_map(
            |(activate, up, down, left, right, confirm, autopilot, grant)| TickInput {
                activate,
                up,
                down,
                left,
                right,
                confirm,
                autopilot,
                grant,
            },
        )
}

fn run(seed: u64, inputs: &[TickInput]) -> GameState {
    let mut state = GameState::new(seed);
    for input in inputs {
        tick(&mut state, input);
        state.drain_events();
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn state_rules_hold_every_tick(
        seed in any::<u64>(),
        inputs in prop::collection::vec(arb_input(), 1..1500),
    ) {
        let mut state = GameState::new(seed);
        for input in &inputs {
            let prev_mode = state.mode;
            let prev_max_lives = state.max_lives;
            let prev_score = state.score;

            tick(&mut state, input);
            state.drain_events();

            prop_assert_eq!(state.validate_invariants(), Ok(()));
            prop_assert!(state.best_score >= state.score);
            prop_assert!(state.high_scores.len() <= MAX_HIGH_SCORES);
            prop_assert!(state
                .high_scores
                .entries
                .windows(2)
                .all(|w| w[0].score >= w[1].score));

            if prev_mode == GameMode::Playing && state.mode == GameMode::Playing {
                prop_assert!(state.max_lives >= prev_max_lives);
                prop_assert!(state.score >= prev_score);
            }
        }
    }

    #[test]
    fn same_seed_and_inputs_replay_identically(
        seed in any::<u64>(),
        inputs in prop::collection::vec(arb_input(), 1..600),
    ) {
        let a = run(seed, &inputs);
        let b = run(seed, &inputs);

        prop_assert_eq!(a.mode, b.mode);
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.lives, b.lives);
        prop_assert_eq!(a.time_ticks, b.time_ticks);
        prop_assert_eq!(&a.player, &b.player);
        prop_assert_eq!(&a.obstacles, &b.obstacles);
        prop_assert_eq!(&a.high_scores, &b.high_scores);
    }
}

#[test]
fn autopilot_soak_keeps_state_valid() {
    let mut state = GameState::new(2024);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut runs = 0;
    for _ in 0..20_000 {
        let was_playing = state.mode == GameMode::Playing;
        tick(&mut state, &input);
        state.drain_events();
        assert_eq!(state.validate_invariants(), Ok(()));
        if was_playing && state.mode != GameMode::Playing {
            runs += 1;
        }
    }
    // The autopilot keeps cycling through menus, so at least one run starts
    assert!(state.mode == GameMode::Playing || runs > 0);
}
