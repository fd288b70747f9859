//! 状态聚合
//!
//! /api/status 的主流程：收集配置里出现过的地址，可选地逐个刷新，
//! 把快照投影到各实体上，再按房间分组。输入掩码的反相约定只在
//! 投影这一层反转一次；没有快照的输入报 null，不报 false。

use crate::utils::response::gateway_phrase;
use crate::AppState;
use api_contract::{
    InputStatus, LightStatus, RefreshError, RoomStatus, ShutterStatus, StatusReply,
    ThermostatStatus,
};
use domain::data::mask_to_channels;
use domain::{
    infer_light_on, input_active, now_epoch_ms, BoardSnapshot, Configuration, DerivedLightState,
    GatewaySettings, ROOM_FALLBACK,
};
use domo_protocol::{Frame, GatewayClient, GatewayEndpoint, PollingReply, ProtocolError};
use std::collections::BTreeMap;

/// 网关配置到客户端。
pub fn gateway_client(settings: &GatewaySettings) -> GatewayClient {
    GatewayClient::new(GatewayEndpoint {
        host: settings.host.clone(),
        port: settings.port,
        timeout_ms: settings.timeout_ms,
    })
}

/// 轮询一块板并解码成快照。
pub async fn poll_board(
    client: &GatewayClient,
    address: u8,
) -> Result<BoardSnapshot, ProtocolError> {
    let reply = client.transact_frame(&Frame::poll(address), None).await?;
    Ok(snapshot_from_reply(address, &reply))
}

/// 回帧到快照的投影。快照归属请求的地址，与存储键保持一致。
pub fn snapshot_from_reply(address: u8, reply: &Frame) -> BoardSnapshot {
    let decoded = PollingReply::from_frame(reply);
    BoardSnapshot {
        address,
        board_type: decoded.board_type,
        release: decoded.release,
        output_mask: decoded.output_mask,
        input_mask: decoded.input_mask,
        outputs: mask_to_channels(decoded.output_mask),
        inputs: mask_to_channels(decoded.input_mask),
        dimmer: decoded.dimmer,
        temperature: decoded.temperature,
        power_kw: decoded.power_kw,
        setpoint: decoded.setpoint,
        updated_at: now_epoch_ms(),
        frame_hex: reply.hex(),
    }
}

/// /api/status 的聚合主流程。
pub async fn aggregate_status(
    state: &AppState,
    config: &Configuration,
    refresh: bool,
) -> StatusReply {
    let addresses = config.known_addresses();
    let mut refresh_errors = Vec::new();

    if refresh {
        let client = gateway_client(&config.gateway);
        // 顺序刷新：单地址失败只记录，不中断聚合
        for address in &addresses {
            let handle = state.locks.for_address(*address).await;
            let _guard = handle.lock().await;
            match poll_board(&client, *address).await {
                Ok(snapshot) => state.state_store.record_board(snapshot).await,
                Err(error) => refresh_errors.push(RefreshError {
                    address: *address,
                    error: gateway_phrase(&error).to_string(),
                }),
            }
        }
    }

    let bridge = state.state_store.read().await;
    let mut rooms: BTreeMap<String, RoomStatus> = BTreeMap::new();

    for light in &config.lights {
        let snapshot = bridge.boards.get(&light.address);
        let previous = bridge.lights.get(&light.id);
        let is_on = infer_light_on(
            light.relay,
            snapshot,
            previous.and_then(|derived| derived.is_on),
            None,
        );
        let last_action = previous.and_then(|derived| derived.last_action.clone());
        if previous.map(|derived| derived.is_on) != Some(is_on) {
            state
                .state_store
                .record_light(
                    &light.id,
                    DerivedLightState {
                        is_on,
                        last_action: last_action.clone(),
                        updated_at: now_epoch_ms(),
                    },
                )
                .await;
        }
        let updated_at = snapshot
            .map(|snapshot| snapshot.updated_at)
            .or(previous.map(|derived| derived.updated_at));
        room_entry(&mut rooms, &light.room).lights.push(LightStatus {
            id: light.id.clone(),
            name: light.name.clone(),
            address: light.address,
            relay: light.relay,
            is_on,
            last_action,
            updated_at,
        });
    }

    for shutter in &config.shutters {
        let derived = bridge.shutters.get(&shutter.id);
        room_entry(&mut rooms, &shutter.room)
            .shutters
            .push(ShutterStatus {
                id: shutter.id.clone(),
                name: shutter.name.clone(),
                address: shutter.address,
                channel: shutter.channel,
                last_action: derived
                    .and_then(|derived| derived.last_action.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                updated_at: derived.map(|derived| derived.updated_at),
            });
    }

    for thermostat in &config.thermostats {
        let snapshot = bridge.boards.get(&thermostat.address);
        let derived = bridge.thermostats.get(&thermostat.id);
        room_entry(&mut rooms, &thermostat.room)
            .thermostats
            .push(ThermostatStatus {
                id: thermostat.id.clone(),
                name: thermostat.name.clone(),
                address: thermostat.address,
                temperature: snapshot.map(|snapshot| snapshot.temperature),
                // 最近下发的设定点，未下发过时退回配置值
                setpoint: derived
                    .map(|derived| derived.setpoint)
                    .unwrap_or(thermostat.setpoint),
                board_setpoint: snapshot.map(|snapshot| snapshot.setpoint),
                updated_at: derived
                    .map(|derived| derived.updated_at)
                    .or(snapshot.map(|snapshot| snapshot.updated_at)),
            });
    }

    for board in &config.boards {
        let snapshot = bridge.boards.get(&board.address);
        for input in &board.inputs {
            let active = snapshot.map(|snapshot| input_active(snapshot.input_mask, input.index));
            room_entry(&mut rooms, &input.room).inputs.push(InputStatus {
                board_id: board.id.clone(),
                index: input.index,
                name: input.name.clone(),
                enabled: input.enabled,
                active,
            });
        }
    }

    StatusReply {
        ok: true,
        updated_at: bridge.updated_at,
        refresh_errors,
        rooms: rooms.into_values().collect(),
    }
}

/// 房间分组入口；空房间名归入缺省分组。BTreeMap 的键序给出
/// 与区域设置无关的大小写敏感排序。
fn room_entry<'a>(rooms: &'a mut BTreeMap<String, RoomStatus>, room: &str) -> &'a mut RoomStatus {
    let name = if room.trim().is_empty() {
        ROOM_FALLBACK
    } else {
        room
    };
    rooms.entry(name.to_string()).or_insert_with(|| RoomStatus {
        name: name.to_string(),
        ..RoomStatus::default()
    })
}
