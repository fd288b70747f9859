use api_contract::{
    phrases, ApplyInputsReply, ErrorBody, InputPushResult, LightCommandReply, LightDto,
    ProgramAddressReply, RefreshError, StatusReply,
};

#[test]
fn error_body_shape() {
    let body = ErrorBody::new(phrases::UNAUTHORIZED);
    let json = serde_json::to_value(&body).expect("serialize");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "token non valido");
}

#[test]
fn light_command_reply_uses_camel_case() {
    let reply = LightCommandReply {
        ok: true,
        entity: LightDto {
            id: "luce-1".to_string(),
            name: "Luce".to_string(),
            room: "Cucina".to_string(),
            address: 1,
            relay: 3,
        },
        action: "on".to_string(),
        is_on: Some(true),
        snapshot: None,
    };
    let json = serde_json::to_value(&reply).expect("serialize");
    assert_eq!(json["entity"]["id"], "luce-1");
    assert_eq!(json["isOn"], true);
    // 没有快照时字段整个省略
    assert!(json.get("snapshot").is_none());
}

#[test]
fn apply_inputs_omits_error_on_success() {
    let reply = ApplyInputsReply {
        ok: false,
        results: vec![
            InputPushResult {
                board_id: "scheda-1".to_string(),
                address: 1,
                index: 1,
                ok: true,
                error: None,
            },
            InputPushResult {
                board_id: "scheda-1".to_string(),
                address: 1,
                index: 2,
                ok: false,
                error: Some(phrases::GATEWAY_TIMEOUT.to_string()),
            },
        ],
    };
    let json = serde_json::to_value(&reply).expect("serialize");
    assert!(json["results"][0].get("error").is_none());
    assert_eq!(json["results"][1]["error"], "timeout del gateway");
}

#[test]
fn program_address_reply_shape() {
    let reply = ProgramAddressReply {
        ok: true,
        address: 5,
        ack: 165,
        ack_hex: "0xa5".to_string(),
    };
    let json = serde_json::to_value(&reply).expect("serialize");
    assert_eq!(json["ack"], 165);
    assert_eq!(json["ackHex"], "0xa5");
}

#[test]
fn status_reply_shape() {
    let reply = StatusReply {
        ok: true,
        updated_at: 1234,
        refresh_errors: vec![RefreshError {
            address: 7,
            error: phrases::GATEWAY_NO_REPLY.to_string(),
        }],
        rooms: Vec::new(),
    };
    let json = serde_json::to_value(&reply).expect("serialize");
    assert_eq!(json["updatedAt"], 1234);
    assert_eq!(json["refreshErrors"][0]["address"], 7);
    assert!(json["rooms"].as_array().expect("rooms array").is_empty());
}
