use racer_core::{sprite, PlayerInput, Tuning, World, WorldConfig};

const FLAT_OUT: PlayerInput = PlayerInput {
    steer_left: false,
    steer_right: false,
    accelerate: true,
    brake: false,
};

fn small_ring(seed: u32, segments: usize) -> World {
    let mut world = World::new(WorldConfig::default(), Tuning::default(), seed).unwrap();
    for _ in 0..segments {
        world.add_segment(0.0, 0.0);
    }
    world
}

#[test]
fn a_flat_out_player_completes_the_race() {
    let mut world = small_ring(0xABCD, 20);
    let player = world.add_player(sprite::PLAYER).unwrap();
    world.start_race(2).unwrap();
    let dt = world.step();

    let mut ticks = 0u64;
    loop {
        world.set_input(player, FLAT_OUT);
        world.update(dt);
        ticks += 1;
        let snapshot = world.snapshot();
        let me = snapshot.player(player).expect("player is registered");
        if me.finished {
            assert_eq!(me.lap_times.len(), 2);
            assert!(me.lap_times.iter().all(|time| *time > 0.0));
            assert_eq!(me.last_lap_time, me.lap_times.last().copied());
            assert_eq!(me.place, 1);
            break;
        }
        assert!(ticks < 10_000, "race should finish quickly on an empty ring");
    }
}

#[test]
fn standings_follow_race_progress() {
    let mut world = small_ring(0x1111, 20);
    let front = world.add_player(sprite::PLAYER).unwrap();
    let back = world.add_player(sprite::PLAYER).unwrap();
    world.start_race(3).unwrap();
    let dt = world.step();

    // Stop well before the leader can complete the race: finished cars drop
    // out of the ranking.
    for _ in 0..100 {
        world.set_input(front, FLAT_OUT);
        world.set_input(
            back,
            PlayerInput {
                brake: true,
                ..PlayerInput::default()
            },
        );
        world.update(dt);
    }

    let snapshot = world.snapshot();
    assert!(!snapshot.player(front).unwrap().finished);
    assert_eq!(snapshot.player(front).unwrap().place, 1);
    assert_eq!(snapshot.player(back).unwrap().place, 2);
    assert!(snapshot.player(front).unwrap().lap >= snapshot.player(back).unwrap().lap);
}

#[test]
fn a_congested_race_stays_within_bounds() {
    let mut world = small_ring(0xD00D, 40);
    for n in [8usize, 21, 33] {
        world.add_decoration(n, sprite::TREE, -1.3).unwrap();
        world.add_decoration(n, sprite::BILLBOARD, 1.3).unwrap();
    }
    let player = world.add_player(sprite::PLAYER).unwrap();
    world.spawn_traffic(10).unwrap();
    world.start_race(3).unwrap();
    let dt = world.step();

    for tick in 0..2_500u64 {
        world.set_input(
            player,
            PlayerInput {
                accelerate: true,
                steer_left: tick % 140 < 40,
                steer_right: (70..110).contains(&(tick % 140)),
                brake: false,
            },
        );
        world.update(dt);

        let snapshot = world.snapshot();
        for car in &snapshot.cars {
            assert!(car.speed >= 0.0 && car.speed <= snapshot.max_speed);
            assert!(car.x.abs() <= 3.0);
            assert!((0.0..snapshot.track_length).contains(&car.z));
            assert!((0.0..1.0).contains(&car.percent_into_segment));
        }
        if let Err(code) = world.validate_invariants() {
            panic!("invariant {code} broken at tick {tick}");
        }
    }

    // Ranking covers every active car exactly once.
    let snapshot = world.snapshot();
    let mut places: Vec<u32> = snapshot
        .cars
        .iter()
        .filter(|car| !car.finished)
        .map(|car| car.place)
        .collect();
    places.sort_unstable();
    for (rank, place) in places.iter().enumerate() {
        assert_eq!(*place, rank as u32 + 1);
    }
}

#[test]
fn occupant_queries_match_car_positions() {
    let mut world = small_ring(0x7777, 25);
    world.add_player(sprite::PLAYER).unwrap();
    world.spawn_traffic(6).unwrap();
    world.start_race(1).unwrap();

    for index in 0..world.track().len() {
        let segment = world.segment_snapshot(index).unwrap();
        for id in &segment.occupants {
            let car = world.snapshot().car(*id).copied().unwrap();
            assert_eq!(car.segment, index);
        }
    }
    assert!(world.segment_snapshot(25).is_none());
}
