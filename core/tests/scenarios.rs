//! End-to-end flows: board to win reward, and a clock-driven watch session.

use pirate_vault_core::*;
use time::{Date, Month};

fn today() -> Date {
    Date::from_calendar_date(2026, Month::October, 19).unwrap()
}

/// First seed whose easy board has a zero corner.
fn board_with_zero_corner() -> (Board, Coord2) {
    let config = GameConfig::new(9, 9, 10).unwrap();
    for seed in 0..1_000 {
        let board = initialize_board(config, seed).unwrap();
        let corner = [(0, 0), (0, 8), (8, 0), (8, 8)]
            .into_iter()
            .find(|&pos| !board[pos].is_mine && board[pos].adjacent_mines == 0);
        if let Some(corner) = corner {
            return (board, corner);
        }
    }
    panic!("no board with a zero corner");
}

#[test]
fn zero_corner_flood_fills() {
    let (board, corner) = board_with_zero_corner();
    let mut engine = PlayEngine::new(board);

    engine.reveal(corner).unwrap();

    let board = engine.board();
    assert!(board.revealed_safe_count() > 1);
    assert!(board.mine_positions().all(|pos| !board[pos].is_revealed));
}

#[test]
fn flood_fill_region_is_closed() {
    let (board, corner) = board_with_zero_corner();
    let mut engine = PlayEngine::new(board);
    engine.reveal(corner).unwrap();
    let board = engine.board();

    // every neighbour of a revealed zero cell is revealed too
    let (rows, cols) = board.size();
    for row in 0..rows {
        for col in 0..cols {
            let cell = board[(row, col)];
            if cell.is_revealed && cell.adjacent_mines == 0 {
                for pos in board.iter_neighbors((row, col)) {
                    assert!(board[pos].is_revealed, "{pos:?} next to open zero {:?}", (row, col));
                }
            }
        }
    }
}

#[test]
fn easy_win_at_thirty_seconds_grants_fourteen_coins() {
    let clock = ManualClock::new(today());
    let board = Board::from_mine_coords((1, 3), &[(0, 0)]).unwrap();
    let mut round = Round::with_board(Difficulty::Easy, board, &clock);
    let mut rewards = GameRewards::new(MemoryCounterStore::new(), &RewardConfig::default());
    let mut ledger = Ledger::new();

    assert_eq!(round.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
    clock.advance_secs(30);
    assert_eq!(round.reveal((0, 2)).unwrap(), RevealOutcome::Won);
    clock.advance_secs(5);
    assert_eq!(round.elapsed_secs(), 30);

    let reward = rewards
        .record_win(&mut ledger, "anne", round.difficulty(), round.elapsed_secs(), clock.today())
        .unwrap();

    assert!(matches!(reward, WinReward::Granted { ref event, plays_today: 1 } if event.amount == 14));
    assert_eq!(ledger.balance("anne"), 14);
}

#[test]
fn daily_cap_resets_next_day() {
    let clock = ManualClock::new(today());
    let mut store = MemoryCounterStore::new();
    let mut ledger = Ledger::new();
    let config = RewardConfig::default();

    {
        let mut rewards = GameRewards::new(&mut store, &config);
        for _ in 0..=config.max_daily_plays {
            rewards
                .record_win(&mut ledger, "anne", Difficulty::Easy, 999, clock.today())
                .unwrap();
        }
    }
    assert_eq!(ledger.balance("anne"), 15);

    clock.next_day();
    let mut rewards = GameRewards::new(&mut store, &config);
    let reward = rewards
        .record_win(&mut ledger, "anne", Difficulty::Easy, 999, clock.today())
        .unwrap();

    assert!(matches!(reward, WinReward::Granted { plays_today: 1, .. }));
    assert_eq!(ledger.balance("anne"), 20);
}

#[test]
fn watch_three_minutes_on_virtual_clock() {
    let clock = ManualClock::new(today());
    let policy = WatchPolicy::default();
    let mut scheduler = RewardScheduler::new(policy);
    let mut ledger = Ledger::new();
    let id = scheduler.start_session(VideoRef::new("treasure", "Treasure maps 101"));
    scheduler.catch_up(id, &clock);

    clock.advance_secs(180);
    for event in scheduler.catch_up(id, &clock) {
        deliver_reward(&mut ledger, "anne", &event).unwrap();
    }

    let session = scheduler.session(id).unwrap();
    assert_eq!(session.coins_earned(), 3 * u64::from(policy.reward_per_interval));
    assert_eq!(session.next_reward_in(), 60);
    assert_eq!(ledger.balance("anne"), 9);

    scheduler.stop_session(id);
    clock.advance_secs(600);
    assert!(scheduler.catch_up(id, &clock).is_empty());
    assert_eq!(ledger.balance("anne"), 9);
}
