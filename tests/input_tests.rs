//! Tests for key mapping, held-key throttling and swipe translation

use std::time::{Duration, Instant};

use blockfall::game::test_helpers::empty_grid;
use blockfall::input::{key_to_command, swipe_to_command, KeyRepeat, SwipeTracker};
use blockfall::{BlockColor, Command, Game, Piece, TetrominoType};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

mod key_mapping {
    use super::*;

    #[test]
    fn arrows_map_to_moves() {
        assert_eq!(key_to_command(key(KeyCode::Left)), Some(Command::MoveLeft));
        assert_eq!(key_to_command(key(KeyCode::Right)), Some(Command::MoveRight));
        assert_eq!(key_to_command(key(KeyCode::Down)), Some(Command::SoftDrop));
        assert_eq!(key_to_command(key(KeyCode::Up)), Some(Command::Rotate));
    }

    #[test]
    fn space_is_hard_drop() {
        assert_eq!(key_to_command(key(KeyCode::Char(' '))), Some(Command::HardDrop));
    }

    #[test]
    fn vim_keys_match_arrows() {
        assert_eq!(key_to_command(key(KeyCode::Char('h'))), Some(Command::MoveLeft));
        assert_eq!(key_to_command(key(KeyCode::Char('l'))), Some(Command::MoveRight));
        assert_eq!(key_to_command(key(KeyCode::Char('j'))), Some(Command::SoftDrop));
        assert_eq!(key_to_command(key(KeyCode::Char('k'))), Some(Command::Rotate));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(key_to_command(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(key_to_command(key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(key_to_command(key(KeyCode::Char('x'))), None);
        assert_eq!(key_to_command(key(KeyCode::Tab)), None);
        assert_eq!(
            key_to_command(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL)),
            None
        );
    }
}

mod key_repeat {
    use super::*;

    #[test]
    fn first_press_is_accepted() {
        let mut repeat = KeyRepeat::default();
        assert!(repeat.accept(Command::MoveLeft, KeyEventKind::Press, Instant::now()));
    }

    #[test]
    fn held_key_is_throttled() {
        let mut repeat = KeyRepeat::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(repeat.accept(Command::MoveLeft, KeyEventKind::Press, start));
        assert!(!repeat.accept(
            Command::MoveLeft,
            KeyEventKind::Repeat,
            start + Duration::from_millis(50)
        ));
        assert!(!repeat.accept(
            Command::MoveLeft,
            KeyEventKind::Repeat,
            start + Duration::from_millis(100)
        ));
        assert!(repeat.accept(
            Command::MoveLeft,
            KeyEventKind::Repeat,
            start + Duration::from_millis(101)
        ));
    }

    #[test]
    fn release_clears_held_state() {
        let mut repeat = KeyRepeat::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(repeat.accept(Command::SoftDrop, KeyEventKind::Press, start));
        assert!(!repeat.accept(Command::SoftDrop, KeyEventKind::Release, start));
        assert!(repeat.accept(
            Command::SoftDrop,
            KeyEventKind::Press,
            start + Duration::from_millis(10)
        ));
    }

    #[test]
    fn quick_taps_without_release_events_all_go_through() {
        let mut repeat = KeyRepeat::default();
        let start = Instant::now();

        for ms in [0, 30, 60, 90] {
            assert!(repeat.accept(
                Command::MoveLeft,
                KeyEventKind::Press,
                start + Duration::from_millis(ms)
            ));
        }
    }

    #[test]
    fn press_restarts_the_repeat_delay() {
        let mut repeat = KeyRepeat::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(repeat.accept(Command::MoveRight, KeyEventKind::Press, start));
        assert!(repeat.accept(
            Command::MoveRight,
            KeyEventKind::Press,
            start + Duration::from_millis(60)
        ));
        assert!(!repeat.accept(
            Command::MoveRight,
            KeyEventKind::Repeat,
            start + Duration::from_millis(150)
        ));
        assert!(repeat.accept(
            Command::MoveRight,
            KeyEventKind::Repeat,
            start + Duration::from_millis(161)
        ));
    }

    #[test]
    fn keys_are_throttled_independently() {
        let mut repeat = KeyRepeat::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(repeat.accept(Command::MoveLeft, KeyEventKind::Press, start));
        assert!(repeat.accept(Command::MoveRight, KeyEventKind::Press, start));
        assert!(repeat.accept(Command::SoftDrop, KeyEventKind::Press, start));
    }

    #[test]
    fn rotate_and_hard_drop_are_never_throttled() {
        let mut repeat = KeyRepeat::new(Duration::from_millis(100));
        let now = Instant::now();

        for _ in 0..3 {
            assert!(repeat.accept(Command::Rotate, KeyEventKind::Press, now));
            assert!(repeat.accept(Command::HardDrop, KeyEventKind::Press, now));
        }
        assert!(!repeat.accept(Command::Rotate, KeyEventKind::Release, now));
    }
}

mod swipe {
    use super::*;

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(swipe_to_command(5, 1), Some(Command::MoveRight));
        assert_eq!(swipe_to_command(-5, 2), Some(Command::MoveLeft));
        assert_eq!(swipe_to_command(1, 4), Some(Command::SoftDrop));
        assert_eq!(swipe_to_command(-1, -4), Some(Command::Rotate));
    }

    #[test]
    fn ties_go_vertical() {
        assert_eq!(swipe_to_command(3, 3), Some(Command::SoftDrop));
        assert_eq!(swipe_to_command(3, -3), Some(Command::Rotate));
    }

    #[test]
    fn no_motion_no_command() {
        assert_eq!(swipe_to_command(0, 0), None);
    }

    #[test]
    fn tracker_follows_the_pointer() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(10, 10);

        assert_eq!(tracker.drag(12, 10), Some(Command::MoveRight));
        // Measured from (12, 10), not from where the drag began.
        assert_eq!(tracker.drag(11, 10), Some(Command::MoveLeft));
        assert_eq!(tracker.drag(11, 11), Some(Command::SoftDrop));
    }

    #[test]
    fn drag_without_anchor_only_sets_it() {
        let mut tracker = SwipeTracker::new();

        assert_eq!(tracker.drag(5, 5), None);
        assert_eq!(tracker.drag(5, 3), Some(Command::Rotate));

        tracker.end();
        assert_eq!(tracker.drag(9, 9), None);
    }
}

mod command_apply {
    use super::*;

    fn game() -> Game {
        Game::with_grid(
            empty_grid(),
            Piece::new_at(TetrominoType::T.shape(), BlockColor::Red, 4, 5),
        )
    }

    #[test]
    fn moves_reach_the_engine() {
        let mut game = game();

        Command::MoveLeft.apply(&mut game);
        assert_eq!(game.current_piece().position.x, 3);
        Command::MoveRight.apply(&mut game);
        assert_eq!(game.current_piece().position.x, 4);
        Command::SoftDrop.apply(&mut game);
        assert_eq!(game.current_piece().position.y, 6);
    }

    #[test]
    fn rotate_reaches_the_engine() {
        let mut game = game();

        Command::Rotate.apply(&mut game);

        assert_eq!(game.current_piece().shape, TetrominoType::T.shape().rotated());
    }

    #[test]
    fn hard_drop_locks() {
        let mut game = game();

        Command::HardDrop.apply(&mut game);

        assert_eq!(game.grid().total_filled_cells(), 4);
    }

    #[test]
    fn soft_drop_key_locks_on_floor() {
        let mut game = Game::with_grid(
            empty_grid(),
            Piece::new_at(TetrominoType::O.shape(), BlockColor::Red, 4, 18),
        );

        Command::SoftDrop.apply(&mut game);

        assert_eq!(game.grid().total_filled_cells(), 4);
    }

    #[test]
    fn quit_leaves_game_alone() {
        let mut game = game();
        let before = game.current_piece().clone();

        Command::Quit.apply(&mut game);

        assert_eq!(game.current_piece(), &before);
    }
}
