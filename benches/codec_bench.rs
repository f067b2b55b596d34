use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unicorn_draw::rendering::raster::rasterize;
use unicorn_draw::{codec, paint, Drawing};

fn busy_drawing() -> Drawing {
    let mut d = Drawing::blank();
    for i in 0..1024usize {
        let color = format!("#{:02x}{:02x}{:02x}", (i * 7) % 256, (i * 13) % 256, (i / 4) % 256);
        paint::paint_pixel(&mut d, i, color.as_str());
    }
    d
}

fn bench_codec(c: &mut Criterion) {
    let drawing = busy_drawing().normalized();
    let token = codec::encode(&drawing);

    c.bench_function("encode_busy", |b| b.iter(|| codec::encode(black_box(&drawing))));
    c.bench_function("decode_busy", |b| b.iter(|| codec::decode(black_box(&token))));
}

fn bench_flood_fill(c: &mut Criterion) {
    let blank = Drawing::blank();
    c.bench_function("flood_fill_blank", |b| {
        b.iter(|| {
            let mut d = blank.clone();
            paint::flood_fill(&mut d, black_box(517), "#ff0000")
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let drawing = busy_drawing().normalized();
    c.bench_function("rasterize_surface", |b| b.iter(|| rasterize(black_box(&drawing))));
}

criterion_group!(benches, bench_codec, bench_flood_fill, bench_rasterize);
criterion_main!(benches);
