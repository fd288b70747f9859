use domain::data::mask_to_channels;
use domain::{infer_light_on, input_active, split_setpoint, BoardSnapshot};

fn snapshot_with_outputs(output_mask: u8) -> BoardSnapshot {
    BoardSnapshot {
        address: 1,
        board_type: 2,
        release: 1,
        output_mask,
        input_mask: 0xff,
        outputs: mask_to_channels(output_mask),
        inputs: mask_to_channels(0xff),
        dimmer: 0,
        temperature: 21.0,
        power_kw: 0.0,
        setpoint: 20,
        updated_at: 1000,
        frame_hex: String::new(),
    }
}

#[test]
fn snapshot_output_mask_wins_over_everything() {
    let snapshot = snapshot_with_outputs(0x04);
    assert_eq!(
        infer_light_on(3, Some(&snapshot), Some(false), Some("off")),
        Some(true)
    );
    assert_eq!(
        infer_light_on(1, Some(&snapshot), Some(true), Some("on")),
        Some(false)
    );
}

#[test]
fn explicit_actions_without_snapshot() {
    assert_eq!(infer_light_on(1, None, None, Some("on")), Some(true));
    assert_eq!(infer_light_on(1, None, Some(true), Some("off")), Some(false));
}

#[test]
fn toggle_negates_known_previous() {
    assert_eq!(infer_light_on(1, None, Some(true), Some("toggle")), Some(false));
    assert_eq!(infer_light_on(1, None, Some(false), Some("toggle")), Some(true));
    assert_eq!(
        infer_light_on(1, None, Some(true), Some("toggle_no_ack")),
        Some(false)
    );
}

#[test]
fn toggle_without_previous_stays_unknown() {
    assert_eq!(infer_light_on(1, None, None, Some("toggle")), None);
}

#[test]
fn pulse_keeps_previous_or_unknown() {
    assert_eq!(infer_light_on(1, None, Some(true), Some("pulse")), Some(true));
    assert_eq!(infer_light_on(1, None, None, Some("pulse")), None);
    assert_eq!(infer_light_on(1, None, None, None), None);
}

#[test]
fn input_mask_is_inverted_on_projection() {
    // 全置位 = 全部无效，全清零 = 全部有效
    for index in 1..=8 {
        assert!(!input_active(0xff, index));
        assert!(input_active(0x00, index));
    }
    // 第 3 位清零，仅输入 3 有效
    assert!(input_active(0b1111_1011, 3));
    assert!(!input_active(0b1111_1011, 2));
}

#[test]
fn setpoint_split_rounds_half_away_from_zero() {
    assert_eq!(split_setpoint(21.5), (21, 5));
    assert_eq!(split_setpoint(21.55), (21, 6));
    assert_eq!(split_setpoint(-0.04), (0, 0));
    assert_eq!(split_setpoint(0.05), (0, 1));
    assert_eq!(split_setpoint(120.0), (99, 0));
}

#[test]
fn mask_expansion_covers_all_channels() {
    let channels = mask_to_channels(0b0000_0101);
    assert_eq!(channels.len(), 8);
    assert_eq!(channels.get("1"), Some(&true));
    assert_eq!(channels.get("2"), Some(&false));
    assert_eq!(channels.get("3"), Some(&true));
    assert_eq!(channels.get("8"), Some(&false));
}
