// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqvis::{Classifier, Notifier, TopicBus};

const ADDRESSES: &[&str] = &[
    "https://a.test/resources/trusted-bidding-signals.py?keys=k1&uuid=1",
    "https://a.test/resources/bidding-logic.py?uuid=1",
    "https://a.test/resources/direct-from-seller-signals.py",
    "https://a.test/resources/fledge-util.sub.js",
    "https://a.test/auction.html",
];

fn classify_benchmark(c: &mut Criterion) {
    let classifier = Classifier::default();

    c.bench_function("classify", |b| {
        b.iter(|| {
            for address in ADDRESSES {
                black_box(classifier.classify(address));
            }
        })
    });

    c.bench_function("matches", |b| {
        b.iter(|| {
            for address in ADDRESSES {
                black_box(classifier.matches(address).len());
            }
        })
    });
}

fn notify_benchmark(c: &mut Criterion) {
    let notifier = Notifier::new(Classifier::default(), TopicBus::new());

    c.bench_function("notify_address_no_subscribers", |b| {
        b.iter(|| {
            for address in ADDRESSES {
                black_box(notifier.notify_address(address).total());
            }
        })
    });
}

criterion_group!(benches, classify_benchmark, notify_benchmark);
criterion_main!(benches);
