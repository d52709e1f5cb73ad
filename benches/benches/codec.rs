use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fxparam_eq::{discover, PresetCatalog, SimulatedFactory};
use fxparam_protocol::{EqParam, ParamBuffer, SessionId};

fn bench_pack(c: &mut Criterion) {
    let mut scratch = ParamBuffer::query(EqParam::NumBands, 0);
    c.bench_function("pack all known params", |b| {
        b.iter(|| {
            for param in EqParam::KNOWN {
                scratch.reset_update(param, black_box(3), black_box(&[1, 2, 3, 4]));
                black_box(scratch.value());
            }
        })
    });
}

fn bench_discovery(c: &mut Criterion) {
    let factory = SimulatedFactory::default();
    let descriptor = SimulatedFactory::descriptor();
    c.bench_function("discover reference equalizer", |b| {
        b.iter(|| {
            let catalog = PresetCatalog::new();
            let eq = discover(&factory, &descriptor, SessionId(1), &catalog);
            black_box(eq.is_ok())
        })
    });
}

criterion_group!(benches, bench_pack, bench_discovery);
criterion_main!(benches);
