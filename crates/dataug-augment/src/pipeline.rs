use std::sync::atomic::{AtomicBool, Ordering};

use dataug_image::{Image, Rect};
use dataug_io::{
    annotation::AnnotatedImage,
    functional::{read_image_any, GenericImage},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::AugmentationConfig,
    error::AugmentError,
    projective::WarpParams,
    sink::{AugmentedSample, SampleSink},
    transform::transform_image,
};

/// Counters of an augmentation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Source images decoded.
    pub images_loaded: usize,
    /// Source images that could not be read.
    pub images_skipped: usize,
    /// Samples handed to the sink successfully.
    pub samples_saved: usize,
    /// Variants that failed to generate or to save.
    pub samples_failed: usize,
    /// Whether the run stopped before the last image.
    pub cancelled: bool,
}

impl RunSummary {
    fn absorb(&mut self, other: RunSummary) {
        self.images_loaded += other.images_loaded;
        self.images_skipped += other.images_skipped;
        self.samples_saved += other.samples_saved;
        self.samples_failed += other.samples_failed;
        self.cancelled |= other.cancelled;
    }
}

/// Generates randomized variants of labeled image regions.
///
/// The augmenter owns the random generator and draws from it sequentially, so
/// a seeded configuration reproduces the same samples in the same order.
///
/// # Examples
///
/// ```
/// use dataug_augment::{config::AugmentationConfig, pipeline::Augmenter, sink::AugmentedSample};
/// use dataug_image::{Image, Rect};
/// use dataug_io::functional::GenericImage;
///
/// let config = AugmentationConfig { generate_num: 2, seed: Some(0), ..Default::default() };
/// let mut augmenter = Augmenter::new(config).unwrap();
///
/// let image = GenericImage::L8(Image::from_size_val([100, 100].into(), 128).unwrap());
/// let mut samples: Vec<AugmentedSample> = Vec::new();
/// let summary = augmenter.augment_image(0, &image, &[Rect::new(10, 10, 40, 40)], &mut samples);
///
/// assert_eq!(summary.samples_saved, 2);
/// assert_eq!(samples[1].name(), "img0_0_1");
/// assert_eq!(samples[1].bbox, Rect::new(0, 0, 40, 40));
/// ```
pub struct Augmenter {
    config: AugmentationConfig,
    params: WarpParams,
    rng: StdRng,
}

impl Augmenter {
    /// Create an augmenter, seeding the generator from the configuration or the OS.
    ///
    /// # Errors
    ///
    /// [`AugmentError::InvalidConfig`] when the configuration does not validate.
    pub fn new(config: AugmentationConfig) -> Result<Self, AugmentError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            config,
            params: WarpParams::default(),
            rng,
        })
    }

    /// Replace the warp parameters.
    pub fn with_params(mut self, params: WarpParams) -> Self {
        self.params = params;
        self
    }

    /// The configuration of the run.
    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// Augment every entry, handing the samples to `sink`.
    ///
    /// Unreadable images and failing variants are logged and skipped.
    pub fn run<S: SampleSink + ?Sized>(
        &mut self,
        entries: &[AnnotatedImage],
        sink: &mut S,
    ) -> RunSummary {
        self.run_until(entries, sink, &AtomicBool::new(false))
    }

    /// Same as [`Augmenter::run`], stopping before the next image once `cancel` is set.
    pub fn run_until<S: SampleSink + ?Sized>(
        &mut self,
        entries: &[AnnotatedImage],
        sink: &mut S,
        cancel: &AtomicBool,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, entry) in entries.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                log::warn!("Cancelled before image {}", entry.path.display());
                summary.cancelled = true;
                break;
            }

            log::info!("Load {}", entry.path.display());
            let image = match read_image_any(&entry.path) {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", entry.path.display());
                    summary.images_skipped += 1;
                    continue;
                }
            };
            summary.images_loaded += 1;

            summary.absorb(self.augment_image(index, &image, &entry.rects, sink));
        }

        summary
    }

    /// Augment every region of one decoded image.
    ///
    /// An empty `areas` list stands for the whole image. Samples are named after
    /// `index`, the region index and the variant index.
    pub fn augment_image<S: SampleSink + ?Sized>(
        &mut self,
        index: usize,
        image: &GenericImage,
        areas: &[Rect],
        sink: &mut S,
    ) -> RunSummary {
        let whole = [Rect::from_size(image.size())];
        let areas = if areas.is_empty() { &whole[..] } else { areas };

        match image {
            GenericImage::L8(img) => self.augment_typed(index, img, areas, sink, GenericImage::L8),
            GenericImage::Rgb8(img) => {
                self.augment_typed(index, img, areas, sink, GenericImage::Rgb8)
            }
        }
    }

    fn augment_typed<S: SampleSink + ?Sized, const C: usize>(
        &mut self,
        index: usize,
        img: &Image<u8, C>,
        areas: &[Rect],
        sink: &mut S,
        wrap: fn(Image<u8, C>) -> GenericImage,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for (rect_index, &area) in areas.iter().enumerate() {
            for variant_index in 0..self.config.generate_num {
                let res = transform_image(img, area, &self.config, &self.params, &mut self.rng)
                    .and_then(|out| {
                        let bbox = Rect::from_size(out.size());
                        sink.save(AugmentedSample {
                            image: wrap(out),
                            bbox,
                            image_index: index,
                            rect_index,
                            variant_index,
                        })
                    });

                match res {
                    Ok(()) => summary.samples_saved += 1,
                    Err(e) => {
                        log::warn!("img{index}_{rect_index}_{variant_index} failed: {e}");
                        summary.samples_failed += 1;
                    }
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use dataug_image::{Image, Rect};
    use dataug_io::{
        annotation::AnnotatedImage, error::IoError, functional::GenericImage, png::write_image_png_rgb8,
    };

    use super::*;

    fn config(generate_num: usize) -> AugmentationConfig {
        AugmentationConfig {
            generate_num,
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let res = Augmenter::new(AugmentationConfig {
            roll_sigma: -1.0,
            ..config(1)
        });
        assert!(matches!(res, Err(AugmentError::InvalidConfig(_))));
    }

    #[test]
    fn whole_image_when_no_rects() -> Result<(), AugmentError> {
        let mut augmenter = Augmenter::new(config(3))?;
        let image = GenericImage::Rgb8(Image::from_size_val([32, 24].into(), 50)?);
        let mut samples = Vec::new();

        let summary = augmenter.augment_image(4, &image, &[], &mut samples);

        assert_eq!(summary.samples_saved, 3);
        let names: Vec<_> = samples.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["img4_0_0", "img4_0_1", "img4_0_2"]);
        assert!(samples.iter().all(|s| s.image == image));
        Ok(())
    }

    #[test]
    fn failing_variants_are_counted() -> Result<(), AugmentError> {
        let mut augmenter = Augmenter::new(config(2))?;
        let image = GenericImage::L8(Image::from_size_val([20, 20].into(), 0)?);
        let mut samples = Vec::new();

        let areas = [Rect::new(50, 50, 5, 5), Rect::new(2, 2, 10, 10)];
        let summary = augmenter.augment_image(0, &image, &areas, &mut samples);

        assert_eq!(summary.samples_failed, 2);
        assert_eq!(summary.samples_saved, 2);
        assert_eq!(samples[0].name(), "img0_1_0");
        Ok(())
    }

    #[test]
    fn unreadable_images_are_skipped() -> Result<(), AugmentError> {
        let tmp_dir = tempfile::tempdir().map_err(IoError::from)?;
        let good = tmp_dir.path().join("good.png");
        write_image_png_rgb8(&good, &Image::from_size_val([16, 16].into(), 90)?)?;

        let entries = [
            AnnotatedImage::whole(tmp_dir.path().join("missing.png")),
            AnnotatedImage::whole(&good),
        ];

        let mut augmenter = Augmenter::new(config(1))?;
        let mut samples = Vec::new();
        let summary = augmenter.run(&entries, &mut samples);

        assert_eq!(summary.images_skipped, 1);
        assert_eq!(summary.images_loaded, 1);
        assert_eq!(samples.len(), 1);
        // the image keeps its index in the input list
        assert_eq!(samples[0].name(), "img1_0_0");
        Ok(())
    }

    #[test]
    fn cancelled_run_stops() -> Result<(), AugmentError> {
        let mut augmenter = Augmenter::new(config(1))?;
        let mut samples = Vec::new();
        let cancel = AtomicBool::new(true);

        let summary = augmenter.run_until(&[AnnotatedImage::whole("x.png")], &mut samples, &cancel);

        assert!(summary.cancelled);
        assert_eq!(summary.images_loaded + summary.images_skipped, 0);
        assert!(samples.is_empty());
        Ok(())
    }

    #[test]
    fn same_seed_same_samples() -> Result<(), AugmentError> {
        let config = AugmentationConfig {
            yaw_sigma: 4.0,
            noise_max_sigma: 10.0,
            blur_max_sigma: 1.0,
            x_slide_sigma: 0.02,
            ..config(2)
        };
        let data = (0..48 * 40 * 3).map(|i| (i % 253) as u8).collect();
        let image = GenericImage::Rgb8(Image::new([48, 40].into(), data)?);
        let areas = [Rect::new(10, 8, 24, 20)];

        let mut a = Vec::new();
        Augmenter::new(config.clone())?.augment_image(0, &image, &areas, &mut a);
        let mut b = Vec::new();
        Augmenter::new(config)?.augment_image(0, &image, &areas, &mut b);

        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
        Ok(())
    }
}
