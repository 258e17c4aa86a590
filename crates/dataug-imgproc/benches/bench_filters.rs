use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dataug_image::Image;
use dataug_imgproc::{filter::gaussian_blur, interpolation::BorderMode};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for kernel_size in [3, 5, 7, 11].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);
            let sigma = *kernel_size as f32 / 2.5;

            // input image
            let image_size = [*width, *height].into();
            let image_u8 = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
            let image_f32 = image_u8.map_dtype::<f32>();

            // output image
            let output_u8 = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();
            let output_f32 = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_u8", &parameter_string),
                &(&image_u8, &output_u8),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(gaussian_blur(
                            src,
                            &mut dst,
                            (*kernel_size, *kernel_size),
                            (sigma, sigma),
                            BorderMode::Reflect101,
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_f32", &parameter_string),
                &(&image_f32, &output_f32),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(gaussian_blur(
                            src,
                            &mut dst,
                            (*kernel_size, *kernel_size),
                            (sigma, sigma),
                            BorderMode::Reflect101,
                        ))
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
