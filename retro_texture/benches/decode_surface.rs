use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retro_texture::{PixelFormat, Surface, Tiling};

fn criterion_benchmark(c: &mut Criterion) {
    let etc1 = Surface {
        width: 512,
        height: 512,
        image_format: PixelFormat::Etc1A4,
        tiling: Tiling::Ctr,
        data: vec![0u8; 512 * 512],
    };
    c.bench_function("decode_ctr_etc1a4", |b| {
        b.iter(|| black_box(&etc1).decode_rgba8())
    });

    let rgb565 = Surface {
        width: 512,
        height: 512,
        image_format: PixelFormat::Rgb565,
        tiling: Tiling::Gx,
        data: vec![0u8; 512 * 512 * 2],
    };
    c.bench_function("decode_gx_rgb565", |b| {
        b.iter(|| black_box(&rgb565).decode_rgba8())
    });

    let cmpr = Surface {
        width: 512,
        height: 512,
        image_format: PixelFormat::Dxt1,
        tiling: Tiling::Gx,
        data: vec![0u8; 512 * 512 / 2],
    };
    c.bench_function("decode_gx_cmpr", |b| {
        b.iter(|| black_box(&cmpr).decode_rgba8())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
