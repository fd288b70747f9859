use domain::{Board, Configuration, Input, Light, Shutter, Thermostat};

fn sample_config() -> Configuration {
    Configuration {
        lights: vec![
            Light {
                id: "luce-cucina".to_string(),
                name: "Luce cucina".to_string(),
                room: "Cucina".to_string(),
                address: 1,
                relay: 3,
            },
            Light {
                id: "luce-salotto".to_string(),
                name: "Luce salotto".to_string(),
                room: "Salotto".to_string(),
                address: 2,
                relay: 1,
            },
        ],
        shutters: vec![Shutter {
            id: "tapparella-studio".to_string(),
            name: "Tapparella studio".to_string(),
            room: "Studio".to_string(),
            address: 1,
            channel: 2,
        }],
        thermostats: vec![Thermostat {
            id: "termo-soggiorno".to_string(),
            name: "Termostato".to_string(),
            room: "Soggiorno".to_string(),
            address: 4,
            setpoint: 20.5,
        }],
        boards: vec![Board {
            id: "scheda-piano-terra".to_string(),
            address: 1,
            name: "Piano terra".to_string(),
            inputs: Vec::new(),
        }],
        ..Configuration::default()
    }
}

#[test]
fn id_lookup_wins_over_address() {
    let config = sample_config();
    let light = config
        .find_light(Some("luce-salotto"), Some(1), Some(3))
        .expect("light by id");
    assert_eq!(light.address, 2);
}

#[test]
fn unknown_id_does_not_fall_back_to_address() {
    let config = sample_config();
    assert!(config.find_light(Some("inesistente"), Some(1), Some(3)).is_none());
}

#[test]
fn empty_id_falls_back_to_address_pair() {
    let config = sample_config();
    let light = config
        .find_light(Some(""), Some(1), Some(3))
        .expect("light by address pair");
    assert_eq!(light.id, "luce-cucina");
    assert!(config.find_light(None, Some(1), Some(4)).is_none());
}

#[test]
fn shutter_resolves_by_address_and_channel() {
    let config = sample_config();
    let shutter = config
        .find_shutter(None, Some(1), Some(2))
        .expect("shutter by pair");
    assert_eq!(shutter.id, "tapparella-studio");
    assert!(config.find_shutter(None, Some(1), None).is_none());
}

#[test]
fn thermostat_resolves_by_address_alone() {
    let config = sample_config();
    let thermo = config
        .find_thermostat(None, Some(4))
        .expect("thermostat by address");
    assert_eq!(thermo.id, "termo-soggiorno");
}

#[test]
fn known_addresses_are_sorted_and_deduplicated() {
    let config = sample_config();
    assert_eq!(config.known_addresses(), vec![1, 2, 4]);
}
