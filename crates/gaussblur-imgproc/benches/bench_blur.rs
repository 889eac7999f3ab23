use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use std::hint::black_box;

use gaussblur_image::Rgba8Image;
use gaussblur_imgproc::{gaussian_blur_rgba, BlurConfig};

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur RGBA");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        let image_size = [*width, *height].into();
        let image_data = (0..width * height * 4)
            .map(|i| (i % 251) as u8)
            .collect::<Vec<_>>();
        let image = Rgba8Image::new(image_size, image_data).unwrap();

        for sigma in [1.0f32, 3.0].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            for num_threads in [1, 2, 4, 8].iter() {
                let parameter_string =
                    format!("{}x{}_s{}_t{}", width, height, sigma, num_threads);
                let config = BlurConfig::new(*sigma, *num_threads);

                group.bench_with_input(
                    BenchmarkId::new("gaussian_blur_rgba", &parameter_string),
                    &(&image, config),
                    |b, i| {
                        let (src, config) = (i.0, i.1);
                        b.iter(|| black_box(gaussian_blur_rgba(src, &config)))
                    },
                );
            }
        }
    }
    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
