use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng, XorShiftRng};
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1000;

fn bench_btreeset_insert(c: &mut Criterion) {
    c.bench_function("bench btreeset insert", |b| {
        b.iter(|| {
            let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
            let mut set = BTreeSet::new();
            for _ in 0..NUM_OF_OPERATIONS {
                set.insert(rng.next_u32());
            }
        })
    });
}

fn bench_btreeset_contains(c: &mut Criterion) {
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = BTreeSet::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        set.insert(key);
        values.push(key);
    }

    c.bench_function("bench btreeset contains", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(set.contains(key));
            }
        })
    });
}

macro_rules! ordered_set_benches {
    ($($module_name:ident: $type_name:ident,)*) => {
        $(
            mod $module_name {
                use search_trees::$module_name::$type_name;
                use rand::{Rng, SeedableRng, XorShiftRng};
                use super::NUM_OF_OPERATIONS;
                use criterion::{Criterion, black_box};

                pub fn bench_insert(c: &mut Criterion) {
                    c.bench_function(&format!("bench {} insert", stringify!($module_name)), |b| b.iter(|| {
                        let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
                        let mut set = $type_name::new();
                        for _ in 0..NUM_OF_OPERATIONS {
                            set.insert(rng.next_u32());
                        }
                    }));
                }

                pub fn bench_find(c: &mut Criterion) {
                    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut set = $type_name::new();
                    let mut values = Vec::new();

                    for _ in 0..NUM_OF_OPERATIONS {
                        let key = rng.next_u32();
                        set.insert(key);
                        values.push(key);
                    }

                    c.bench_function(&format!("bench {} find", stringify!($module_name)), move |b| b.iter(|| {
                        for key in &values {
                            black_box(set.find(key).get());
                        }
                    }));
                }

                pub fn bench_iter(c: &mut Criterion) {
                    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
                    let mut set = $type_name::new();
                    for _ in 0..NUM_OF_OPERATIONS {
                        set.insert(rng.next_u32());
                    }

                    c.bench_function(&format!("bench {} iter", stringify!($module_name)), move |b| b.iter(|| {
                        black_box(set.iter().count());
                    }));
                }
            }
        )*

        criterion_group!(
            benches,
            bench_btreeset_contains,
            bench_btreeset_insert,
            $(
                $module_name::bench_find,
                $module_name::bench_insert,
                $module_name::bench_iter,
            )*
        );
    }
}

ordered_set_benches!(
    bst: BstSet,
    rst: RstSet,
);

criterion_main!(benches);
