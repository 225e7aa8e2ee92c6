use criterion::{criterion_group, criterion_main, Criterion};
use literary_clock_core::{
    resolve, Quote, QuoteIndex, ResolverState, SelectionPolicy, TimeKey, MINUTES_PER_DAY,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mk_quote(index: usize) -> Quote {
    let time_key = match TimeKey::from_minute_of_day(index % MINUTES_PER_DAY) {
        Ok(key) => key,
        Err(err) => panic!("benchmark fixture key failed: {err}"),
    };
    Quote {
        time_key,
        prefix: "The clock on the mantel said ".to_string(),
        time_phrase: time_key.to_string(),
        suffix: ", and nobody in the room believed it.".to_string(),
        title: format!("Benchmark Volume {index}"),
        author: "Bench Author".to_string(),
        sfw: None,
    }
}

fn bench_lookup(c: &mut Criterion) {
    let index = (0..10_000).map(mk_quote).collect::<QuoteIndex>();
    let keys = TimeKey::all().collect::<Vec<_>>();

    c.bench_function("lookup_all_minutes_10000_quotes", |b| {
        b.iter(|| {
            let total = keys.iter().map(|key| index.lookup(*key).len()).sum::<usize>();
            if total != 10_000 {
                panic!("lookup benchmark lost quotes: {total}");
            }
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let index = (0..10_000).map(mk_quote).collect::<QuoteIndex>();
    let keys = TimeKey::all().collect::<Vec<_>>();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("resolve_day_of_minute_transitions_10000_quotes", |b| {
        b.iter(|| {
            let mut state = ResolverState::new();
            for key in &keys {
                let (_, next) = resolve(&index, *key, &state, SelectionPolicy::Random, &mut rng);
                state = next;
            }
        });
    });

    c.bench_function("resolve_same_minute_tick_10000_quotes", |b| {
        let (_, state) =
            resolve(&index, keys[720], &ResolverState::new(), SelectionPolicy::Random, &mut rng);
        b.iter(|| {
            let (resolution, _) =
                resolve(&index, keys[720], &state, SelectionPolicy::Random, &mut rng);
            if !resolution.reused {
                panic!("same-minute benchmark should reuse the prior choice");
            }
        });
    });
}

criterion_group!(resolver_benches, bench_lookup, bench_resolve);
criterion_main!(resolver_benches);
