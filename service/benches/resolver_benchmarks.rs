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

//! Benchmarks for endpoint resolution and registry operations

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use switchyard_entity::Entity;
use switchyard_service::{
    ConfigResolver, ConnectionManager, LogComponents, ManagerConfig, PlatformWidth,
    SslProfileRegistry, incoming_capacity,
};

fn endpoint() -> Entity {
    Entity::new()
        .with("host", "0.0.0.0")
        .with("port", "5671")
        .with("role", "inter-router")
        .with("maxFrameSize", 65536)
        .with("maxSessions", 1000)
        .with("maxSessionFrames", 100)
        .with("idleTimeoutSeconds", 16)
        .with("sslProfile", "router-tls")
        .with("saslMechanisms", "EXTERNAL")
        .with("logMessage", "message-id,user-id,to,subject")
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let config = ManagerConfig::default();
    let profiles = SslProfileRegistry::new();
    let entity = endpoint();

    group.bench_function("without_profile", |b| {
        let resolver = ConfigResolver::new(&config, &profiles);
        b.iter(|| resolver.resolve(black_box(&entity)))
    });

    let with_profiles = SslProfileRegistry::new();
    for i in 0..32 {
        with_profiles
            .create(&Entity::new().with("name", format!("profile-{}", i)))
            .unwrap();
    }
    with_profiles
        .create(
            &Entity::new()
                .with("name", "router-tls")
                .with("certFile", "/etc/pki/router.crt"),
        )
        .unwrap();

    group.bench_function("with_profile_lookup", |b| {
        let resolver = ConfigResolver::new(&config, &with_profiles);
        b.iter(|| resolver.resolve(black_box(&entity)))
    });

    group.finish();
}

fn bench_derivations(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivations");

    group.bench_function("incoming_capacity_64", |b| {
        b.iter(|| incoming_capacity(black_box(1_000_000), black_box(16384), PlatformWidth::Bits64))
    });

    group.bench_function("incoming_capacity_32_truncated", |b| {
        b.iter(|| incoming_capacity(black_box(1_000_000), black_box(16384), PlatformWidth::Bits32))
    });

    group.bench_function("log_components_parse", |b| {
        b.iter(|| LogComponents::parse(black_box(Some("message-id,to,subject,app-properties"))))
    });

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    group.bench_function("configure_and_remove_listener", |b| {
        let manager = ConnectionManager::default();
        let entity = endpoint();
        b.iter(|| {
            let listener = manager.configure_listener(black_box(&entity)).unwrap();
            manager.remove_listener(listener.id())
        })
    });

    group.bench_function("snapshot_100_listeners", |b| {
        let manager = ConnectionManager::default();
        for _ in 0..100 {
            manager.configure_listener(&endpoint()).unwrap();
        }
        b.iter(|| manager.listeners())
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_derivations, bench_registry);
criterion_main!(benches);
