use domo_store::normalize_config;
use serde_json::json;

#[test]
fn empty_document_yields_seed_configuration() {
    let config = normalize_config(&json!({}));
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 1470);
    assert_eq!(config.gateway.timeout_ms, 1200);
    assert_eq!(config.api_token, "");
    assert!(config.boards.is_empty());
    assert!(config.lights.is_empty());
}

#[test]
fn numbers_accept_decimal_and_hex_strings() {
    let config = normalize_config(&json!({
        "gateway": {"port": "1470", "timeoutMs": "0x4B0"},
        "lights": [
            {"id": "a", "address": "0x10", "relay": "3"},
            {"id": "b", "address": 12, "relay": 8}
        ]
    }));
    assert_eq!(config.gateway.timeout_ms, 1200);
    assert_eq!(config.lights[0].address, 16);
    assert_eq!(config.lights[0].relay, 3);
    assert_eq!(config.lights[1].address, 12);
}

#[test]
fn bounds_are_clamped_with_defaults_for_garbage() {
    let config = normalize_config(&json!({
        "gateway": {"port": 0, "timeoutMs": 50},
        "lights": [
            {"id": "a", "address": 255, "relay": 0},
            {"id": "b", "address": 254, "relay": 9},
            {"id": "c", "address": "boh", "relay": "x"}
        ]
    }));
    assert_eq!(config.gateway.port, 1);
    assert_eq!(config.gateway.timeout_ms, 100);
    // 255 钳到 254，254 原样保留
    assert_eq!(config.lights[0].address, 254);
    assert_eq!(config.lights[0].relay, 1);
    assert_eq!(config.lights[1].address, 254);
    assert_eq!(config.lights[1].relay, 8);
    // 不可解析时退回缺省
    assert_eq!(config.lights[2].address, 0);
    assert_eq!(config.lights[2].relay, 1);
}

#[test]
fn timeout_upper_bound_clamps() {
    let config = normalize_config(&json!({"gateway": {"timeoutMs": 30000}}));
    assert_eq!(config.gateway.timeout_ms, 20000);
}

#[test]
fn ids_are_slug_normalized() {
    let config = normalize_config(&json!({
        "lights": [
            {"id": "  Luce   Cucina! "},
            {"id": "già--pronta"},
            {"id": "ok_cosi-1"}
        ]
    }));
    assert_eq!(config.lights[0].id, "luce-cucina");
    assert_eq!(config.lights[1].id, "gi-pronta");
    assert_eq!(config.lights[2].id, "ok_cosi-1");
}

#[test]
fn blank_ids_fall_back_to_role_and_position() {
    let config = normalize_config(&json!({
        "lights": [{"name": "Prima"}, {"id": "///"}],
        "shutters": [{}]
    }));
    assert_eq!(config.lights[0].id, "light-1");
    assert_eq!(config.lights[1].id, "light-2");
    assert_eq!(config.shutters[0].id, "shutter-1");
}

#[test]
fn duplicate_ids_get_positional_suffixes() {
    let config = normalize_config(&json!({
        "lights": [{"id": "luce"}, {"id": "Luce"}, {"id": "luce"}]
    }));
    let ids: Vec<&str> = config.lights.iter().map(|light| light.id.as_str()).collect();
    assert_eq!(ids, vec!["luce", "luce-2", "luce-3"]);
}

#[test]
fn names_and_rooms_are_trimmed_with_fallbacks() {
    let config = normalize_config(&json!({
        "lights": [{"id": "luce-1", "name": "  ", "room": ""}]
    }));
    assert_eq!(config.lights[0].name, "luce-1");
    assert_eq!(config.lights[0].room, "Senza stanza");
}

#[test]
fn board_inputs_are_deduplicated_filled_and_sorted() {
    let config = normalize_config(&json!({
        "boards": [{
            "id": "scheda",
            "address": 7,
            "inputs": [
                {"index": 3, "name": "Campanello", "g2": 1, "g3": "0x02", "g4": 3},
                {"index": 3, "name": "Doppione"},
                {"index": 1, "enabled": false, "targetAddress": 9}
            ]
        }]
    }));
    let board = &config.boards[0];
    assert_eq!(board.inputs.len(), 8);
    let indices: Vec<u8> = board.inputs.iter().map(|input| input.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    // 同序号首次出现优先
    assert_eq!(board.inputs[2].name, "Campanello");
    assert_eq!(board.inputs[2].g3, 2);
    assert!(!board.inputs[0].enabled);
    assert_eq!(board.inputs[0].target_address, 9);
    // 补齐的输入指回所属板卡
    assert_eq!(board.inputs[4].target_address, 7);
    assert!(board.inputs[4].enabled);
}

#[test]
fn unknown_keys_are_dropped() {
    let config = normalize_config(&json!({
        "mistero": 42,
        "lights": [{"id": "luce-1", "colore": "rosso"}]
    }));
    let rendered = serde_json::to_value(&config).expect("serialize");
    assert!(rendered.get("mistero").is_none());
    assert!(rendered["lights"][0].get("colore").is_none());
}

#[test]
fn normalization_is_idempotent() {
    let doc = json!({
        "gateway": {"host": " 10.0.0.3 ", "port": "0x5BE", "timeoutMs": 99999},
        "apiToken": "  segreto  ",
        "boards": [{"id": "Scheda Uno", "address": "0x05", "inputs": [{"index": 9}]}],
        "lights": [{"id": "", "address": 300, "relay": -2}, {"id": "luce"}, {"id": "luce"}],
        "shutters": [{"id": "Tapparella Studio", "channel": 7}],
        "thermostats": [{"id": "termo", "setpoint": "21.5"}]
    });
    let once = normalize_config(&doc);
    let rendered = serde_json::to_value(&once).expect("serialize");
    let twice = normalize_config(&rendered);
    assert_eq!(once, twice);
}

#[test]
fn api_token_is_trimmed() {
    let config = normalize_config(&json!({"apiToken": "  segreto "}));
    assert_eq!(config.api_token, "segreto");
}

#[test]
fn thermostat_setpoint_parses_as_real() {
    let config = normalize_config(&json!({
        "thermostats": [
            {"id": "a", "setpoint": "21.5"},
            {"id": "b"}
        ]
    }));
    assert_eq!(config.thermostats[0].setpoint, 21.5);
    assert_eq!(config.thermostats[1].setpoint, 20.0);
}
