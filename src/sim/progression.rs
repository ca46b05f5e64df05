//! Level completion, advancement and bonus lives

use super::generate::initialize_level;
use super::state::{GameEvent, GameState, LevelTransition};
use crate::consts::*;

/// All targets hit, and there was at least one
pub fn level_complete(state: &GameState) -> bool {
    !state.targets.is_empty() && state.targets.iter().all(|t| t.is_hit())
}

/// Lives after the bonus for reaching `level`
pub fn lives_after_advance(lives: u32, level: u32) -> u32 {
    if level % LIFE_BONUS_EVERY == 0 {
        (lives + 1).min(MAX_LIVES)
    } else {
        lives
    }
}

fn advance_level(state: &mut GameState) {
    state.level += 1;
    state.push_event(GameEvent::LevelAdvanced { level: state.level });

    let lives = lives_after_advance(state.lives, state.level);
    if lives != state.lives {
        state.lives = lives;
        state.push_event(GameEvent::LifeRestored { lives });
    }
}

/// Run the level state machine for one tick
pub fn update(state: &mut GameState) {
    state.transition = match state.transition {
        LevelTransition::Idle => {
            if !level_complete(state) {
                return;
            }
            let bonus = state.level as u64 * LEVEL_BONUS_PER_LEVEL;
            state.score += bonus;
            log::info!("Level {} complete (+{} bonus)", state.level, bonus);
            state.push_event(GameEvent::LevelCleared {
                level: state.level,
                bonus,
            });
            LevelTransition::Celebrating {
                ticks: LEVEL_ADVANCE_DELAY_TICKS,
            }
        }
        LevelTransition::Celebrating { ticks } if ticks > 1 => {
            LevelTransition::Celebrating { ticks: ticks - 1 }
        }
        LevelTransition::Celebrating { .. } => {
            advance_level(state);
            LevelTransition::Regenerating {
                ticks: LEVEL_REGEN_DELAY_TICKS,
            }
        }
        LevelTransition::Regenerating { ticks } if ticks > 1 => {
            LevelTransition::Regenerating { ticks: ticks - 1 }
        }
        LevelTransition::Regenerating { .. } => {
            // Sets the transition back to Idle
            initialize_level(state);
            return;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Target, Viewport};
    use glam::Vec2;
    use proptest::prelude::*;

    fn cleared_state(level: u32) -> GameState {
        let mut state = GameState::new(11, Viewport::default());
        state.level = level;
        state.transition = LevelTransition::Idle;
        let mut t = Target::fixed(1, Vec2::new(500.0, 200.0));
        t.mark_hit();
        state.targets.push(t);
        state
    }

    #[test]
    fn test_empty_level_is_never_complete() {
        let mut state = GameState::new(1, Viewport::default());
        state.transition = LevelTransition::Idle;
        assert!(!level_complete(&state));
        update(&mut state);
        assert_eq!(state.transition, LevelTransition::Idle);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_partial_level_is_not_complete() {
        let mut state = cleared_state(1);
        state.targets.push(Target::fixed(2, Vec2::new(600.0, 200.0)));
        assert!(!level_complete(&state));
    }

    #[test]
    fn test_full_transition_sequence() {
        let mut state = cleared_state(2);

        update(&mut state);
        assert_eq!(state.score, 100);
        assert!(matches!(state.transition, LevelTransition::Celebrating { .. }));

        // Bonus is paid once even though targets stay hit during the banner
        for _ in 0..LEVEL_ADVANCE_DELAY_TICKS - 1 {
            update(&mut state);
        }
        assert_eq!(state.level, 2);
        update(&mut state);
        assert_eq!(state.level, 3);
        assert_eq!(state.lives, STARTING_LIVES + 1);
        assert_eq!(state.score, 100);

        for _ in 0..LEVEL_REGEN_DELAY_TICKS {
            update(&mut state);
        }
        assert_eq!(state.transition, LevelTransition::Idle);
        assert_eq!(state.targets.len(), 3);
        assert!(state.targets.iter().all(|t| !t.is_hit()));
    }

    #[test]
    fn test_bonus_life_capped() {
        assert_eq!(lives_after_advance(MAX_LIVES, 3), MAX_LIVES);
        assert_eq!(lives_after_advance(4, 6), 5);
        assert_eq!(lives_after_advance(4, 7), 4);
    }

    proptest! {
        #[test]
        fn prop_lives_never_exceed_cap(lives in 0u32..=MAX_LIVES, level in 1u32..1000) {
            prop_assert!(lives_after_advance(lives, level) <= MAX_LIVES);
        }
    }
}
