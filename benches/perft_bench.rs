use criterion::{criterion_group, criterion_main, Criterion, black_box};
use pulsar::board::Position;
use pulsar::perft::{perft, perft_parallel};

fn bench_perft(c: &mut Criterion) {
    c.bench_function("perft_3_startpos", |ben| {
        let mut p = Position::startpos();
        ben.iter(|| black_box(perft(&mut p, 3)))
    });
    c.bench_function("perft_parallel_4_startpos", |ben| {
        let p = Position::startpos();
        ben.iter(|| black_box(perft_parallel(&p, 4)))
    });
}

criterion_group!(benches, bench_perft);
criterion_main!(benches);
