// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the call path in the dingo-bridge crate: parsing a
// call line, routing it through the dispatch surface onto the host thread,
// and building the callback script.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dingo_bridge::{
    CallbackInvocation, DispatchRequest, HostThread, NativeBridge, RecordingChannel, Transformer,
    ValueRef, host_platform,
};
use dingo_core::BridgeConfig;

const SET_BUTTONS: &str = r#"navigationBar.setButtons([{"title":"Cancel","id":"cancel"},{"title":"Done","id":"done"}], function (id) { onTap(id); })"#;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_parse_call(c: &mut Criterion) {
    c.bench_function("parse_call (setButtons)", |b| {
        b.iter(|| DispatchRequest::parse_call(black_box(SET_BUTTONS)));
    });
}

/// Decode, schedule, run on the host thread, and record the callback script.
fn bench_info_round_trip(c: &mut Criterion) {
    let host_thread = HostThread::spawn("bench-host").expect("spawn host thread");
    let channel = Arc::new(RecordingChannel::new());
    let bridge = NativeBridge::new(
        BridgeConfig::default(),
        channel.clone(),
        host_platform(),
        host_thread.handle(),
    )
    .expect("bridge");
    let handle = host_thread.handle();

    c.bench_function("platform.info round trip", |b| {
        b.iter(|| {
            let request = DispatchRequest::new("platform", "info").with_callback("i => show(i)");
            bridge.handle(black_box(request)).expect("dispatch");
            handle.sync().expect("sync");
            black_box(channel.take());
        });
    });
}

fn bench_callback_script(c: &mut Criterion) {
    let transformer = Transformer::default();
    let callback = ValueRef::parse("function (error, id) { done(error, id); }");

    c.bench_function("callback script (2 args)", |b| {
        b.iter(|| {
            let script = CallbackInvocation::new(black_box(&callback), transformer.clone())
                .arg("")
                .arg("confirm")
                .script();
            black_box(script);
        });
    });
}

criterion_group!(benches, bench_parse_call, bench_info_round_trip, bench_callback_script);
criterion_main!(benches);
