//! End-to-end tests for the full robovac stack.
//!
//! Each test wires the real engine, registry, and event bus over the
//! virtual gateway (no network, no real robot) and drives complete
//! scenarios: discovery, cleaning runs, the mid-run room switch with its
//! deferred dock-then-clean sequence, and the fan-out on the bus. Time is
//! paused, so debounce windows and settle delays elapse instantly.

use tokio::time::{Duration, advance};

use robovac_adapter_virtual::{DEMO_SERIAL, VirtualGateway};
use robovac_app::discovery;
use robovac_app::engine::Engine;
use robovac_app::event_bus::InProcessEventBus;
use robovac_app::representation::HiddenServices;
use robovac_app::scheduler::RefreshMode;
use robovac_app::sequencer::DispatchOutcome;
use robovac_domain::event::EventType;
use robovac_domain::id::{BoundaryId, Serial};
use robovac_domain::intent::Intent;

fn serial() -> Serial {
    Serial::new(DEMO_SERIAL)
}

fn kitchen() -> BoundaryId {
    BoundaryId::new("vb-kitchen")
}

fn living_room() -> BoundaryId {
    BoundaryId::new("vb-living")
}

async fn engine_with_mode(
    mode: RefreshMode,
    hidden: &HiddenServices,
) -> (Engine<VirtualGateway, InProcessEventBus>, InProcessEventBus) {
    let gateway = VirtualGateway::default();
    let registry = discovery::discover(&gateway, "demo@example.com", "secret", hidden).await;
    let bus = InProcessEventBus::new(256);
    let engine = Engine::new(gateway, registry, mode, bus.clone());
    (engine, bus)
}

/// Let the debounce window pass so the next interaction refetches state.
async fn let_state_age() {
    advance(Duration::from_millis(2100)).await;
}

#[tokio::test(start_paused = true)]
async fn should_discover_demo_robot_with_polygon_rooms() {
    let (engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    let registry = engine.registry();
    assert_eq!(registry.len(), 1);

    let unit = registry.get(&serial()).unwrap();
    assert_eq!(unit.robot.name, "Virtual Robot");
    let rooms: Vec<_> = unit
        .rooms
        .iter()
        .map(|room| room.region.name.as_str())
        .collect();
    assert_eq!(rooms, vec!["Kitchen", "Living Room"]);
}

#[tokio::test(start_paused = true)]
async fn should_yield_no_robots_when_account_has_none() {
    // An empty virtual cloud still authorizes, but reports no robots;
    // discovery must survive and leave the process with zero devices.
    let gateway = VirtualGateway::empty();
    let registry =
        discovery::discover(&gateway, "demo@example.com", "secret", &HiddenServices::default())
            .await;
    assert!(registry.is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_run_whole_house_clean_and_stop() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    let outcome = engine
        .control(&serial(), Intent::Start { region: None })
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Started);

    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(toggles.clean);
    assert!(!toggles.dock_occupied);

    let_state_age().await;
    let outcome = engine.control(&serial(), Intent::Stop).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Paused);

    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(!toggles.clean);
}

#[tokio::test(start_paused = true)]
async fn should_resume_paused_run_on_start() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    engine
        .control(&serial(), Intent::Start { region: None })
        .await
        .unwrap();
    let_state_age().await;
    engine.control(&serial(), Intent::Stop).await.unwrap();
    let_state_age().await;

    let outcome = engine
        .control(&serial(), Intent::Start { region: None })
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Resumed);
}

#[tokio::test(start_paused = true)]
async fn should_switch_rooms_via_dock_and_deferred_start() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    // Clean the kitchen.
    let outcome = engine
        .control(
            &serial(),
            Intent::Start {
                region: Some(kitchen()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Started);

    let_state_age().await;
    let toggles = engine.room_toggles(&serial(), &kitchen()).await.unwrap();
    assert!(toggles.clean);

    // Ask for the living room mid-run: the robot heads home first.
    let_state_age().await;
    let outcome = engine
        .control(
            &serial(),
            Intent::Start {
                region: Some(living_room()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::ReturningToBase);

    let unit = engine.registry().get(&serial()).unwrap();
    assert_eq!(unit.queue.pending(), Some(&living_room()));

    // The next background cycle sees the robot docked and starts the
    // queued room.
    let_state_age().await;
    engine.update_cycle(&serial()).await;

    let_state_age().await;
    let toggles = engine
        .room_toggles(&serial(), &living_room())
        .await
        .unwrap();
    assert!(toggles.clean);

    let kitchen_toggles = engine.room_toggles(&serial(), &kitchen()).await.unwrap();
    assert!(!kitchen_toggles.clean);

    let unit = engine.registry().get(&serial()).unwrap();
    assert!(unit.queue.pending().is_none(), "slot consumed exactly once");
}

#[tokio::test(start_paused = true)]
async fn should_publish_main_update_before_room_updates() {
    let (mut engine, bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;
    let mut rx = bus.subscribe();

    engine.update_cycle(&serial()).await;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.event_type, EventType::MainUpdated);
    assert_eq!(first.data["dock_occupied"], true);
    assert_eq!(first.data["battery_level"], 95);

    let second = rx.recv().await.unwrap();
    let third = rx.recv().await.unwrap();
    assert_eq!(second.event_type, EventType::RoomUpdated);
    assert_eq!(third.event_type, EventType::RoomUpdated);
    assert_eq!(second.data["name"], "Kitchen");
    assert_eq!(third.data["name"], "Living Room");
}

#[tokio::test(start_paused = true)]
async fn should_hide_configured_categories_from_published_updates() {
    let hidden = HiddenServices::from_names(&["spot", "dockstate"]);
    let (mut engine, bus) = engine_with_mode(RefreshMode::Off, &hidden).await;
    let mut rx = bus.subscribe();

    engine.update_cycle(&serial()).await;

    let main = rx.recv().await.unwrap();
    assert_eq!(main.event_type, EventType::MainUpdated);
    assert!(main.data.get("dock_occupied").is_none());
    assert!(main.data.get("spot_repeat").is_none());
    assert!(main.data.get("clean").is_some());
    assert!(main.data.get("battery_level").is_some());
}

#[tokio::test(start_paused = true)]
async fn should_revert_find_me_switch_through_the_bus() {
    let (mut engine, bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;
    let mut rx = bus.subscribe();

    let outcome = engine.control(&serial(), Intent::FindMe).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::FindMeFired);

    advance(Duration::from_millis(1100)).await;
    tokio::task::yield_now().await;

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, EventType::FindMeReset);
    assert_eq!(event.data["find_me"], false);
}

#[tokio::test(start_paused = true)]
async fn should_toggle_schedule_end_to_end() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    engine
        .control(&serial(), Intent::EnableSchedule)
        .await
        .unwrap();
    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(toggles.schedule);

    let_state_age().await;
    engine
        .control(&serial(), Intent::DisableSchedule)
        .await
        .unwrap();
    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(!toggles.schedule);
}

#[tokio::test(start_paused = true)]
async fn should_carry_local_toggles_into_the_next_clean_start() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    // Prime the snapshot, then flip the toggles; the start request lands
    // inside the debounce window, so the local writes reach the robot.
    engine.main_toggles(&serial()).await.unwrap();
    engine.set_eco(&serial(), true).unwrap();
    engine.set_extra_care(&serial(), true).unwrap();

    engine
        .control(&serial(), Intent::Start { region: None })
        .await
        .unwrap();

    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(toggles.eco, "eco option must reach the robot");
    assert!(toggles.extra_care, "navigation option must reach the robot");
}

#[tokio::test(start_paused = true)]
async fn should_reflect_docked_state_after_go_to_dock() {
    let (mut engine, _bus) = engine_with_mode(RefreshMode::Off, &HiddenServices::default()).await;

    engine
        .control(&serial(), Intent::Start { region: None })
        .await
        .unwrap();

    let_state_age().await;
    let outcome = engine.control(&serial(), Intent::GoToDock).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::ReturningToBase);

    let_state_age().await;
    let toggles = engine.main_toggles(&serial()).await.unwrap();
    assert!(toggles.dock_occupied);
    assert!(toggles.charging);
    assert!(!toggles.clean);
}
