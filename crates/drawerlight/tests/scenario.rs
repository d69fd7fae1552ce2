//! End-to-end behaviour of the application against an in-memory controller.

use std::time::Duration;

use drawerlight::app::{ConnectionChange, Direction};
use drawerlight::{App, Component, ComponentStore, DeviceLink, MemoryLink, ViewMode};
use tempfile::TempDir;

fn write_store(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("komponenter.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn app_with(path: &std::path::Path) -> App<MemoryLink> {
    let store = ComponentStore::load(path).unwrap();
    App::new(store, MemoryLink::connected(), Duration::ZERO)
}

const TWO_PARTS: &str = r#"[
  {"name": "A", "drawer": "1", "led": 0},
  {"name": "B", "drawer": "2", "led": 1}
]"#;

#[test]
fn search_select_clear_delete() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, TWO_PARTS);
    let mut app = app_with(&path);

    app.set_query("a");
    assert_eq!(app.rows(), vec![format!("{:<15} → 1", "A")]);

    app.select(Some(0));
    assert_eq!(app.link().last_sent(), Some(1));

    app.set_query("");
    assert!(app.view().is_empty());
    assert_eq!(app.link().last_sent(), Some(0));

    let a = app.store().find("A").cloned().unwrap();
    app.delete_component(&a).unwrap();
    assert_eq!(app.store().components(), &[Component::new("B", "2", 1)]);
    assert_eq!(app.link().sent(), &[0, 1, 0, 0]);

    let reloaded = ComponentStore::load(&path).unwrap();
    assert_eq!(reloaded.components(), app.store().components());
}

#[test]
fn results_keep_store_order_and_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let path = write_store(
        &dir,
        r#"[
          {"name": "Resistor 1k", "drawer": "A1", "led": 4},
          {"name": "Capacitor", "drawer": "A2", "led": 0},
          {"name": "RESISTOR 10k", "drawer": "A3", "led": 2}
        ]"#,
    );
    let mut app = app_with(&path);

    app.set_query("  resistor ");
    let names: Vec<&str> = app.view().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Resistor 1k", "RESISTOR 10k"]);
    assert_eq!(app.mode(), ViewMode::Search);
}

#[test]
fn add_fills_the_last_free_led_then_refuses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("komponenter.json");
    let mut app = app_with(&path);

    for i in 0..7 {
        app.add_component(&format!("P{i}"), "").unwrap();
    }
    let last = app.add_component("P7", "H8").unwrap();
    assert_eq!(last.led, 7);
    assert_eq!(last.mask(), 128);

    let before = app.store().components().to_vec();
    let notice = app.add_component("P8", "H9").unwrap_err();
    assert_eq!(app.store().components(), before.as_slice());
    assert!(notice.message.contains("LEDs"));

    let on_disk = ComponentStore::load(&path).unwrap();
    assert_eq!(on_disk.len(), 8);
}

#[test]
fn delete_leaves_other_assignments_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("komponenter.json");
    let mut app = app_with(&path);
    for name in ["R1", "R2", "R3"] {
        app.add_component(name, "D").unwrap();
    }

    app.show_all();
    app.move_selection(Direction::Down);
    app.move_selection(Direction::Down);
    let doomed = app.delete_candidate().unwrap();
    assert_eq!(doomed.name, "R2");
    app.delete_component(&doomed).unwrap();

    let leds: Vec<(String, u8)> = app
        .store()
        .components()
        .iter()
        .map(|c| (c.name.clone(), c.led))
        .collect();
    assert_eq!(leds, vec![("R1".to_string(), 0), ("R3".to_string(), 2)]);

    // The freed slot is reused first.
    let next = app.add_component("R4", "D").unwrap();
    assert_eq!(next.led, 1);
}

#[test]
fn missing_drawer_is_kept_as_question_mark() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, r#"[{"name": "Mystery", "led": 3}]"#);
    let app = app_with(&path);

    let component = &app.store().components()[0];
    assert_eq!(component.drawer, "?");
    assert_eq!(component.listing_row(), format!("{:<15} → ? (LED 4)", "Mystery"));
}

#[test]
fn saving_a_loaded_store_is_a_fixed_point() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, TWO_PARTS);

    let first = ComponentStore::load(&path).unwrap();
    first.save().unwrap();
    let written = std::fs::read_to_string(&path).unwrap();

    let second = ComponentStore::load(&path).unwrap();
    second.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    assert_eq!(first.components(), second.components());
}

#[test]
fn offline_session_still_edits_the_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("komponenter.json");
    let store = ComponentStore::load(&path).unwrap();
    let mut app = App::new(store, MemoryLink::unreachable(), Duration::ZERO);

    assert!(app.connect().is_err());
    app.add_component("NE555", "B2").unwrap();
    app.set_query("555");
    app.select(Some(0));

    assert!(app.link().sent().is_empty());
    assert_eq!(
        app.test_all().unwrap_err().message,
        "Controller not connected"
    );
}

#[test]
fn toggling_connection_switches_leds_off() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, TWO_PARTS);
    let store = ComponentStore::load(&path).unwrap();
    let mut app = App::new(store, MemoryLink::new(), Duration::ZERO);

    assert_eq!(
        app.toggle_connection().unwrap(),
        ConnectionChange::Connected("memory".to_string())
    );
    app.test_all().unwrap();
    assert_eq!(app.link().sent(), &[1, 2, 0]);

    assert_eq!(
        app.toggle_connection().unwrap(),
        ConnectionChange::Disconnected
    );
    assert_eq!(app.link().last_sent(), Some(0));
    assert!(!app.link().is_connected());
}
