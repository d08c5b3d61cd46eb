use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdu_codec::{decode, lacp::LacpDu, SystemId};

fn bench_lacp_round_trip(c: &mut Criterion) {
    let du = LacpDu::default();
    let frame = pdu_codec::lacp::encode_frame(SystemId([0; 6]), &du);

    c.bench_function("lacp_encode", |b| {
        b.iter(|| black_box(du.encode()));
    });

    c.bench_function("lacp_decode", |b| {
        b.iter(|| black_box(decode(black_box(&frame))));
    });
}

criterion_group!(benches, bench_lacp_round_trip);
criterion_main!(benches);
