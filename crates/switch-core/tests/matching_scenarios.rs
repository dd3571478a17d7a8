//! Scenario tests for configuration parsing and device matching together:
//! the exact config-to-match paths the daemon exercises per hotplug event.

use switch_core::{is_target_device, DaemonConfig, HotplugEvent, InputSourceCode};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parsed_config_matches_its_own_device_path() {
    let config = DaemonConfig::parse("ABC123 DEF456 15").unwrap();
    let event =
        HotplugEvent::interface_arrival(r"\\?\USB#VID_ABC123&PID_DEF456#6&2c3f0a&0&2#{guid}");

    assert!(is_target_device(&config.device, &event));
    assert_eq!(config.input_source, InputSourceCode(15));
}

#[test]
fn test_parsed_config_rejects_foreign_vendor() {
    let config = DaemonConfig::parse("ABC123 DEF456 15").unwrap();
    let event =
        HotplugEvent::interface_arrival(r"\\?\USB#VID_ZZZZZZ&PID_DEF456#6&2c3f0a&0&2#{guid}");

    assert!(!is_target_device(&config.device, &event));
}

#[test]
fn test_full_vid_pid_tokens_also_work_as_fragments() {
    // Users may configure the full path tokens instead of the bare hex ids;
    // substring containment makes both spellings equivalent.
    let config = DaemonConfig::parse("VID_046D PID_C52B 17").unwrap();
    let event = HotplugEvent::interface_arrival(r"\\?\USB#VID_046D&PID_C52B#5&1b2c3d&0&1#{guid}");

    assert!(is_target_device(&config.device, &event));
}
