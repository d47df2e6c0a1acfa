use criterion::{criterion_group, criterion_main, Criterion, black_box};
use pulsar::board::Position;
use pulsar::search::{NullListener, Search};

fn bench_search(c: &mut Criterion) {
    c.bench_function("search_depth_4_startpos", |ben| {
        ben.iter(|| {
            let out = Search::depth(Position::startpos(), 4).run(NullListener);
            black_box(out.best.nodes)
        })
    });
    let kiwipete = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    c.bench_function("search_depth_3_kiwipete", |ben| {
        ben.iter(|| {
            let out = Search::depth(kiwipete.clone(), 3).run(NullListener);
            black_box(out.best.nodes)
        })
    });
}

fn bench_qsearch(c: &mut Criterion) {
    let p = Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3").unwrap();
    c.bench_function("qsearch_open_center", |ben| {
        ben.iter(|| black_box(pulsar::search::alphabeta::qsearch_eval_cp(black_box(&p))))
    });
}

criterion_group!(benches, bench_search, bench_qsearch);
criterion_main!(benches);
