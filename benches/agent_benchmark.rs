use criterion::{black_box, criterion_group, criterion_main, Criterion};
use daedalus::agent::InformedDqnAgentBuilder;
use ndarray::array;

fn bench_act(c: &mut Criterion) {
    let mut agent = InformedDqnAgentBuilder::new()
        .observation_dim(4)
        .num_actions(2)
        .build()
        .unwrap();
    let state = array![0.1, -0.2, 0.3, -0.1];

    c.bench_function("act", |b| {
        b.iter(|| {
            let action = agent.act(black_box(state.view())).unwrap();
            black_box(action)
        })
    });
}

fn bench_update_model(c: &mut Criterion) {
    let mut agent = InformedDqnAgentBuilder::new()
        .observation_dim(4)
        .num_actions(2)
        .build()
        .unwrap();
    let state = array![0.1, -0.2, 0.3, -0.1];
    let next_state = array![0.15, -0.25, 0.35, -0.05];

    c.bench_function("update_model", |b| {
        b.iter(|| {
            agent
                .update_model(
                    black_box(state.view()),
                    0,
                    1.0,
                    black_box(next_state.view()),
                    false,
                )
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_act, bench_update_model);
criterion_main!(benches);
