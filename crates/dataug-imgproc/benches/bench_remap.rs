use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dataug_image::{Image, ImageError};
use dataug_imgproc::interpolation::{remap, BorderMode, CoordinateMap, InterpolationMode};

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("Remap");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
        let image_f32 = image.map_dtype::<f32>();

        // a slight rotation around the image center, partly sampling outside
        let (cx, cy) = (*width as f32 / 2.0, *height as f32 / 2.0);
        let (sin, cos) = 0.2f32.sin_cos();
        let map = CoordinateMap::from_fn::<_, ImageError>(image_size, |x, y| {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            Ok((cos * dx - sin * dy + cx, sin * dx + cos * dy + cy))
        })
        .unwrap();

        // output image
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();

        for interpolation in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", interpolation), &parameter_string),
                &(&image_f32, &output, &map),
                |b, i| {
                    let (src, mut dst, map) = (i.0, i.1.clone(), i.2);
                    b.iter(|| {
                        remap(
                            black_box(src),
                            black_box(&mut dst),
                            black_box(map),
                            black_box(interpolation),
                            BorderMode::Constant,
                            [0.0; 3],
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_remap);
criterion_main!(benches);
