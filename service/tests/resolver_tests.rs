//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for endpoint attribute resolution

use proptest::prelude::*;
use switchyard_entity::Entity;
use switchyard_service::{ConfigResolver, ManagerConfig, PlatformWidth, Role, SslProfileRegistry};

fn endpoint(port: &str) -> Entity {
    Entity::new()
        .with("port", port)
        .with("role", "normal")
        .with("maxFrameSize", 16384)
        .with("maxSessions", 100)
        .with("idleTimeoutSeconds", 16)
}

#[test]
fn test_defaults() {
    let config = ManagerConfig::default();
    let profiles = SslProfileRegistry::new();
    let resolved = ConfigResolver::new(&config, &profiles)
        .resolve(&endpoint("amqp"))
        .unwrap();

    assert_eq!(resolved.host, "127.0.0.1");
    assert_eq!(resolved.host_port, "127.0.0.1:amqp");
    assert_eq!(resolved.role, Role::Normal);
    assert_eq!(resolved.cost, 1);
    assert_eq!(resolved.link_capacity, 250);
    assert!(resolved.verify_host_name);
    assert!(!resolved.require_encryption);
    assert!(!resolved.ssl_required);
    assert!(resolved.strip_inbound_annotations);
    assert!(resolved.strip_outbound_annotations);
    assert!(resolved.log_components.is_empty());
    assert!(resolved.failover_list.is_none());
}

#[test]
fn test_32bit_truncation() {
    let config = ManagerConfig::default().with_platform(PlatformWidth::Bits32);
    let profiles = SslProfileRegistry::new();
    let resolved = ConfigResolver::new(&config, &profiles)
        .resolve(&endpoint("5672").with("maxSessionFrames", 1_000_000))
        .unwrap();
    assert_eq!(resolved.incoming_capacity, 2_147_483_647);
}

#[test]
fn test_frames_beyond_u32_truncated() {
    let config = ManagerConfig::default().with_platform(PlatformWidth::Bits32);
    let profiles = SslProfileRegistry::new();
    let resolved = ConfigResolver::new(&config, &profiles)
        .resolve(&endpoint("5672").with("maxSessionFrames", 5_000_000_000i64))
        .unwrap();
    assert_eq!(resolved.incoming_capacity, 0x7FFF_FFFF);

    let err = ConfigResolver::new(&config, &profiles)
        .resolve(&endpoint("5672").with("maxSessionFrames", -1))
        .unwrap_err();
    assert!(err.is_validation_error());
}

#[test]
fn test_connector_role_and_cost() {
    let config = ManagerConfig::default();
    let profiles = SslProfileRegistry::new();
    let resolved = ConfigResolver::new(&config, &profiles)
        .resolve(
            &endpoint("55672")
                .with("host", "hub.example.com")
                .with("role", "route-container")
                .with("cost", 10)
                .with("protocolFamily", "IPv6"),
        )
        .unwrap();

    assert_eq!(resolved.role, Role::RouteContainer);
    assert_eq!(resolved.cost, 10);
    assert_eq!(
        resolved.summary(),
        "hub.example.com:55672 proto=IPv6, role=route-container"
    );
}

proptest! {
    #[test]
    fn prop_resolved_limits_are_in_range(
        max_sessions in any::<i32>(),
        max_frame_size in -1_000i64..=(u32::MAX as i64) + 1_000,
        session_frames in 0i64..=i64::MAX,
        port in 1u16..,
        bits32 in any::<bool>(),
    ) {
        let platform = if bits32 { PlatformWidth::Bits32 } else { PlatformWidth::Bits64 };
        let config = ManagerConfig::default().with_platform(platform);
        let profiles = SslProfileRegistry::new();
        let entity = endpoint(&port.to_string())
            .with("maxSessions", max_sessions)
            .with("maxFrameSize", max_frame_size)
            .with("maxSessionFrames", session_frames);

        let resolved = ConfigResolver::new(&config, &profiles).resolve(&entity).unwrap();

        prop_assert!((1..=32768).contains(&resolved.max_sessions));
        prop_assert!(resolved.max_frame_size >= 512);
        prop_assert!(resolved.incoming_capacity >= 512);
        prop_assert!(resolved.incoming_capacity <= platform.size_limit());
        prop_assert_eq!(&resolved.host_port, &format!("127.0.0.1:{}", port));
    }
}
