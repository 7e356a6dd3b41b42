// Integration tests (native) for the `archery-arcade` crate.
// These drive `GameSession` through its public API only and never touch
// wasm/browser functionality, so they run under plain `cargo test`.

use archery_arcade::schedule::Activity;
use archery_arcade::{Direction, GameConfig, GameEvent, GameSession, Phase};
use glam::DVec2;

fn started(config: GameConfig) -> GameSession {
    let mut s = GameSession::with_seed(config, 2024).unwrap();
    s.start();
    s
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// Aimed preset with a motionless target, so a shot at its center always lands.
fn still_target() -> GameConfig {
    let mut config = GameConfig::aimed();
    config.target.motion = archery_arcade::target::TargetMotion::Bounce {
        speed: 0.0,
        tick: 0.02,
        margin: 50.0,
        level_speed_step: 0.0,
        clock_speed_step: 0.0,
    };
    config
}

fn shoot_at_target(s: &mut GameSession) -> Vec<GameEvent> {
    let aim = s.target().rect().center();
    s.aim_at(aim);
    assert!(s.fire());
    let mut events = Vec::new();
    while s.arrow().is_flying() {
        s.advance(0.02);
        events.extend(s.drain_events());
    }
    events
}

#[test]
fn sixty_quiet_seconds_end_in_one_game_over() {
    let mut s = started(GameConfig::classic());
    let mut events = s.drain_events();
    for _ in 0..60 {
        assert!(s.time_left() <= 60);
        s.tick();
        events.extend(s.drain_events());
    }
    assert_eq!(s.time_left(), 0);
    assert_eq!(s.phase(), Phase::GameOver);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::GameOver { .. })), 1);
    assert!(events.contains(&GameEvent::GameOver { score: 0, level: 1 }));

    // Nothing is left scheduled, and further time changes nothing.
    assert!(s.armed_activities().is_empty());
    s.tick();
    s.advance(30.0);
    assert!(s.drain_events().is_empty());
    assert_eq!(s.score(), 0);
}

#[test]
fn frame_driven_clock_matches_tick_driven_clock() {
    let mut s = started(GameConfig::classic());
    let mut game_overs = 0;
    // ~61 seconds of 60 Hz frames.
    for _ in 0..3660 {
        s.advance(1.0 / 60.0);
        game_overs += count(&s.drain_events(), |e| matches!(e, GameEvent::GameOver { .. }));
        assert!(s.time_left() <= 60);
    }
    assert_eq!(game_overs, 1);
    assert_eq!(s.phase(), Phase::GameOver);
}

#[test]
fn hit_scores_ten_and_returns_arrow_to_bow() {
    let mut s = started(still_target());
    s.drain_events();
    let events = shoot_at_target(&mut s);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Hit { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Missed)), 0);
    assert_eq!(s.score(), 10);
    assert!(!s.arrow().is_flying());
    assert_eq!(s.arrow().tip(), s.bow().nock());
    assert!(!s.armed_activities().contains(&Activity::Projectile));
}

#[test]
fn only_one_arrow_in_flight() {
    let mut s = started(still_target());
    assert!(s.fire());
    s.advance(0.04);
    let tip = s.arrow().tip();
    let velocity = s.arrow().velocity();
    assert!(!s.fire());
    assert_eq!(s.arrow().tip(), tip);
    assert_eq!(s.arrow().velocity(), velocity);
}

#[test]
fn score_fifty_reaches_level_two_without_obstacles() {
    let mut s = started(still_target());
    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(shoot_at_target(&mut s));
    }
    assert_eq!(s.score(), 50);
    assert_eq!(s.level(), 2);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::LevelUp { .. })), 1);
    assert_eq!(s.target().rect().w, 90.0);
    assert!(s.obstacles().is_empty());
    assert_eq!(count(&events, |e| matches!(e, GameEvent::ObstaclesSpawned { .. })), 0);
}

#[test]
fn score_only_grows_in_fixed_steps() {
    let mut s = started(still_target());
    let mut last = 0;
    for _ in 0..8 {
        shoot_at_target(&mut s);
        assert_eq!(s.score(), last + 10);
        last = s.score();
    }
    // A shot straight away from the target misses and scores nothing.
    let nock = s.bow().nock();
    s.aim_at(nock - DVec2::X * 50.0);
    assert!(s.fire());
    let mut missed = false;
    for _ in 0..100 {
        s.advance(0.02);
        missed |= s.drain_events().contains(&GameEvent::Missed);
    }
    assert!(missed);
    assert_eq!(s.score(), last);
}

#[test]
fn reset_mid_game_cancels_everything() {
    let mut s = started(GameConfig::aimed());
    s.move_bow(Direction::Forward);
    s.advance(3.5);
    assert!(s.fire());
    s.reset();

    assert_eq!(s.phase(), Phase::Idle);
    assert!(s.armed_activities().is_empty());
    assert_eq!(s.score(), 0);
    assert_eq!(s.time_left(), 60);
    assert_eq!(s.level(), 1);
    assert!(!s.arrow().is_flying());
    assert_eq!(s.bow().center(), s.config().bow.start);
    let start = s.config().target.start;
    let rect = s.target().rect();
    assert_eq!((rect.x, rect.y), (start.x, start.y));

    s.drain_events();
    s.advance(10.0);
    s.tick();
    assert!(!s.fire());
    assert!(s.drain_events().is_empty());
    assert_eq!(s.time_left(), 60);
}

#[test]
fn restart_after_game_over_plays_a_fresh_round() {
    let mut s = started(still_target());
    shoot_at_target(&mut s);
    for _ in 0..60 {
        s.tick();
    }
    assert_eq!(s.phase(), Phase::GameOver);
    s.restart();
    assert_eq!(s.phase(), Phase::Playing);
    assert_eq!(s.score(), 0);
    assert_eq!(s.time_left(), 60);
    let armed = s.armed_activities();
    assert!(armed.contains(&Activity::Clock) && armed.contains(&Activity::TargetMover));
}

#[test]
fn positions_stay_inside_play_area() {
    for config in [GameConfig::classic(), GameConfig::aimed()] {
        let area = config.play_area;
        let mut s = started(config);
        for frame in 0..3600 {
            if frame % 7 == 0 {
                s.move_bow(if frame % 2 == 0 { Direction::Forward } else { Direction::Backward });
            }
            if frame % 11 == 0 {
                s.aim_at(DVec2::new((frame * 13 % 1000) as f64, (frame * 7 % 700) as f64));
                s.fire();
            }
            s.advance(1.0 / 60.0);
            let t = s.target().rect();
            assert!(t.x >= 0.0 && t.y >= 0.0 && t.right() <= area.width && t.bottom() <= area.height);
            assert!(area.contains(s.arrow().tip()));
            assert!(area.contains(s.bow().center()));
            for o in s.obstacles() {
                assert!(o.rect.right() <= area.width && o.rect.bottom() <= area.height);
            }
        }
    }
}

#[test]
fn level_never_decreases() {
    let mut config = still_target();
    config.difficulty.obstacles = None;
    let mut s = started(config);
    let mut last = s.level();
    for _ in 0..15 {
        shoot_at_target(&mut s);
        assert!(s.level() >= last);
        last = s.level();
    }
    assert_eq!(s.score(), 150);
    assert_eq!(s.level(), 4);
    assert_eq!(s.target().rect().w, 80.0);
    assert!(s.obstacles().is_empty());
}
