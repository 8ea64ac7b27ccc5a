use criterion::{Criterion, black_box, criterion_group, criterion_main};
use text_layout_harness::cases::text_layout_consistency;
use text_layout_harness::config::StageConfig;
use text_layout_harness::harness::{Harness, MutationSequence, Sequencer, Traversal};
use text_layout_harness::scene::render::render_to_buffer;

fn benchmark_step(c: &mut Criterion) {
    let mut builder = MutationSequence::<u64>::builder();
    for i in 0..64u64 {
        builder = builder.then(move |n: &mut u64| {
            *n = n.wrapping_add(i);
            Ok(())
        });
    }
    let mut bare = Harness::new(Sequencer::new(builder.build().unwrap()), 0u64);

    c.bench_function("looping step bare", |b| {
        b.iter(|| bare.advance(black_box(Traversal::Looping)))
    });

    let (mut case, _) = text_layout_consistency::build(&StageConfig::default()).unwrap();
    case.seek(0).unwrap();
    c.bench_function("looping step text layout case", |b| {
        b.iter(|| case.advance(black_box(Traversal::Looping)))
    });

    c.bench_function("render text layout case", |b| {
        b.iter(|| render_to_buffer(black_box(case.entities())))
    });
}

criterion_group!(benches, benchmark_step);
criterion_main!(benches);
