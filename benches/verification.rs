use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nowpayments::IpnVerifier;
use nowpayments::ipn::{canonical_json, sign};
use serde_json::{Value, json};

fn payment_webhook() -> Value {
    json!({
        "payment_id": 5077125051u64,
        "payment_status": "finished",
        "pay_address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh",
        "price_amount": 100,
        "price_currency": "usd",
        "pay_amount": 0.00234567,
        "actually_paid": 0.00234567,
        "pay_currency": "btc",
        "order_id": "user_12345",
        "order_description": "Top-up",
        "outcome_amount": 0.0023,
        "outcome_currency": "btc",
        "fee": {"currency": "btc", "depositFee": 0.00001, "withdrawalFee": 0, "serviceFee": 0},
        "created_at": "2024-01-01T12:00:00.000Z",
        "updated_at": "2024-01-01T12:05:00.000Z"
    })
}

fn bench_canonical_json(c: &mut Criterion) {
    let payload = payment_webhook();
    c.bench_function("canonical_json", |b| {
        b.iter(|| canonical_json(black_box(&payload)))
    });
}

fn bench_verify(c: &mut Criterion) {
    let verifier = IpnVerifier::new("bench_secret");
    let payload = payment_webhook();
    let signature = sign(&payload, "bench_secret");
    let body = payload.to_string();

    c.bench_function("verify_signature", |b| {
        b.iter(|| verifier.verify_signature(black_box(&payload), Some(&signature)))
    });

    c.bench_function("parse_callback", |b| {
        b.iter(|| verifier.parse_callback(black_box(body.as_str()), Some(&signature)))
    });
}

criterion_group!(benches, bench_canonical_json, bench_verify);
criterion_main!(benches);
