//! Tick integration tests for contact routing, filtering and dedupe.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use glam::Vec2;

use anim2d::components::hitdetector::{
    DetectionKind, HitDetector, HitDetectorConfig, HitTiming,
};
use anim2d::events::hit::{ContactMessage, HitEvent};
use anim2d::resources::worldtime::WorldTime;
use anim2d::systems::hitdetect::hit_detection;
use anim2d::systems::time::update_world_time;

fn make_world() -> (World, Schedule) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.init_resource::<Messages<ContactMessage>>();
    let mut schedule = Schedule::default();
    schedule.add_systems(hit_detection);
    (world, schedule)
}

fn send_contacts(world: &mut World, contacts: Vec<ContactMessage>) {
    let mut state = SystemState::<MessageWriter<ContactMessage>>::new(world);
    let mut writer = state.get_mut(world);
    for contact in contacts {
        writer.write(contact);
    }
    state.apply(world);
}

/// One simulation tick: advance the clock, deliver contacts, run the
/// router, then rotate the message buffers.
fn tick(world: &mut World, schedule: &mut Schedule, dt: f32, contacts: Vec<ContactMessage>) {
    update_world_time(world, dt);
    send_contacts(world, contacts);
    schedule.run(world);
    world.resource_mut::<Messages<ContactMessage>>().update();
}

fn hit_counter(world: &mut World) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    world.add_observer(move |_trigger: On<HitEvent>| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });
    world.flush();
    count
}

fn stay_trigger(interval: f32) -> HitDetector {
    HitDetector::new(HitDetectorConfig {
        timing: HitTiming::Stay,
        hit_interval: interval,
        ..Default::default()
    })
}

#[test]
fn same_tick_duplicate_contacts_yield_one_hit() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let detector = world.spawn(stay_trigger(0.0)).id();
    let other = world.spawn_empty().id();

    let c = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Stay);
    tick(&mut world, &mut schedule, 0.016, vec![c.clone(), c]);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn consecutive_ticks_without_interval_both_hit() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let detector = world.spawn(stay_trigger(0.0)).id();
    let other = world.spawn_empty().id();

    let c = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Stay);
    tick(&mut world, &mut schedule, 0.016, vec![c.clone()]);
    tick(&mut world, &mut schedule, 0.016, vec![c]);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn stay_interval_throttles_until_elapsed() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let detector = world.spawn(stay_trigger(1.0)).id();
    let other = world.spawn_empty().id();

    let c = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Stay);
    tick(&mut world, &mut schedule, 0.5, vec![c.clone()]); // t = 0.5, accepted
    tick(&mut world, &mut schedule, 0.5, vec![c.clone()]); // t = 1.0, 0.5 s since hit
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    tick(&mut world, &mut schedule, 0.5, vec![c]); // t = 1.5, 1.0 s since hit
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn tag_and_layer_filters_drop_contacts() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let detector = world
        .spawn(HitDetector::new(HitDetectorConfig {
            target_tags: vec!["enemy".into()],
            target_layers: 1 << 2,
            ..Default::default()
        }))
        .id();
    let other = world.spawn_empty().id();

    let wrong_tag = ContactMessage::trigger(detector, other, "scenery", 2, HitTiming::Enter);
    let wrong_layer = ContactMessage::trigger(detector, other, "enemy", 3, HitTiming::Enter);
    let matching = ContactMessage::trigger(detector, other, "enemy", 2, HitTiming::Enter);

    tick(&mut world, &mut schedule, 0.016, vec![wrong_tag]);
    tick(&mut world, &mut schedule, 0.016, vec![wrong_layer]);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    tick(&mut world, &mut schedule, 0.016, vec![matching]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn kind_and_timing_mismatches_are_ignored() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    // Enter-only trigger detector
    let detector = world.spawn(HitDetector::default()).id();
    let other = world.spawn_empty().id();

    let stay = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Stay);
    let exit = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Exit);
    let mut collision = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Enter);
    collision.detection = DetectionKind::Collision;

    tick(&mut world, &mut schedule, 0.016, vec![stay, exit, collision]);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let enter = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Enter);
    tick(&mut world, &mut schedule, 0.016, vec![enter]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn detector_observers_receive_hit_info() {
    let (mut world, mut schedule) = make_world();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let mut det = HitDetector::default();
    det.on_hit(move |info| {
        seen_clone.lock().unwrap().push(info.other_tag.clone());
    });

    let detector = world.spawn(det).id();
    let other = world.spawn_empty().id();

    let c = ContactMessage::trigger(detector, other, "enemy", 0, HitTiming::Enter);
    tick(&mut world, &mut schedule, 0.016, vec![c]);

    assert_eq!(*seen.lock().unwrap(), vec!["enemy".to_string()]);
}

#[test]
fn collision_contacts_carry_geometry_into_hit_events() {
    let (mut world, mut schedule) = make_world();

    let received = Arc::new(Mutex::new(None));
    let received_clone = received.clone();
    world.add_observer(move |trigger: On<HitEvent>| {
        *received_clone.lock().unwrap() = Some(trigger.event().info.clone());
    });
    world.flush();

    let detector = world
        .spawn(HitDetector::new(HitDetectorConfig {
            detection: DetectionKind::Collision,
            ..Default::default()
        }))
        .id();
    let other = world.spawn_empty().id();

    let contact = ContactMessage {
        detector,
        other,
        other_tag: "enemy".into(),
        other_layer: 0,
        detection: DetectionKind::Collision,
        timing: HitTiming::Enter,
        contact_point: Vec2::new(1.0, 2.0),
        contact_normal: Vec2::new(0.0, 1.0),
        relative_velocity: Vec2::new(-3.0, 0.0),
    };
    tick(&mut world, &mut schedule, 0.016, vec![contact]);

    let info = received.lock().unwrap().clone().unwrap();
    assert_eq!(info.other, other);
    assert_eq!(info.contact_point, Vec2::new(1.0, 2.0));
    assert_eq!(info.contact_normal, Vec2::new(0.0, 1.0));
    assert_eq!(info.relative_velocity, Vec2::new(-3.0, 0.0));
}

#[test]
fn contacts_for_entities_without_detector_are_dropped() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let bare = world.spawn_empty().id();
    let other = world.spawn_empty().id();

    let c = ContactMessage::trigger(bare, other, "enemy", 0, HitTiming::Enter);
    tick(&mut world, &mut schedule, 0.016, vec![c]);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn distinct_objects_hit_independently_in_one_tick() {
    let (mut world, mut schedule) = make_world();
    let hits = hit_counter(&mut world);

    let detector = world.spawn(stay_trigger(0.0)).id();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    let ca = ContactMessage::trigger(detector, a, "enemy", 0, HitTiming::Stay);
    let cb = ContactMessage::trigger(detector, b, "enemy", 0, HitTiming::Stay);
    tick(&mut world, &mut schedule, 0.016, vec![ca, cb]);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
