use std::path::{Path, PathBuf};

use dataug_image::Rect;
use dataug_io::{
    annotation::{append_annotation_line, DEFAULT_SEPARATOR},
    functional::{write_image_png, GenericImage},
};

use crate::error::AugmentError;

/// A generated image and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct AugmentedSample {
    /// The generated image.
    pub image: GenericImage,
    /// The labeled region, covering the whole generated image.
    pub bbox: Rect,
    /// Index of the source image in the run.
    pub image_index: usize,
    /// Index of the labeled region in the source image.
    pub rect_index: usize,
    /// Index of the variant generated from the region.
    pub variant_index: usize,
}

impl AugmentedSample {
    /// The sample name, `img{image}_{region}_{variant}`.
    pub fn name(&self) -> String {
        format!(
            "img{}_{}_{}",
            self.image_index, self.rect_index, self.variant_index
        )
    }
}

/// Destination of the generated samples.
pub trait SampleSink {
    /// Store one sample.
    fn save(&mut self, sample: AugmentedSample) -> Result<(), AugmentError>;
}

/// Collects the samples in memory.
impl SampleSink for Vec<AugmentedSample> {
    fn save(&mut self, sample: AugmentedSample) -> Result<(), AugmentError> {
        self.push(sample);
        Ok(())
    }
}

/// Writes every sample as `<output_dir>/<name>.png` and appends its label to an
/// annotation file.
///
/// The label is appended only once the image is written.
#[derive(Clone, Debug)]
pub struct FolderSink {
    output_dir: PathBuf,
    annotation_file: PathBuf,
    separator: String,
}

impl FolderSink {
    /// Create a sink writing into `output_dir` and appending to `annotation_file`.
    pub fn new(output_dir: impl Into<PathBuf>, annotation_file: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            annotation_file: annotation_file.into(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// The folder receiving the images.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The annotation file receiving the labels.
    pub fn annotation_file(&self) -> &Path {
        &self.annotation_file
    }

    /// The path an image named `name` is written to.
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.png"))
    }
}

impl SampleSink for FolderSink {
    fn save(&mut self, sample: AugmentedSample) -> Result<(), AugmentError> {
        let path = self.image_path(&sample.name());

        write_image_png(&path, &sample.image)?;
        append_annotation_line(&self.annotation_file, &path, &[sample.bbox], &self.separator)?;

        log::info!("Saved image {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dataug_image::{Image, Rect};
    use dataug_io::{error::IoError, functional::read_image_any};

    use super::*;

    fn sample(variant_index: usize) -> Result<AugmentedSample, AugmentError> {
        let image = Image::<u8, 1>::from_size_val([4, 3].into(), 17)?;
        Ok(AugmentedSample {
            image: GenericImage::L8(image),
            bbox: Rect::new(0, 0, 4, 3),
            image_index: 2,
            rect_index: 1,
            variant_index,
        })
    }

    #[test]
    fn sample_name() -> Result<(), AugmentError> {
        assert_eq!(sample(5)?.name(), "img2_1_5");
        Ok(())
    }

    #[test]
    fn folder_sink_writes_image_and_label() -> Result<(), AugmentError> {
        let tmp_dir = tempfile::tempdir().map_err(IoError::from)?;
        let anno = tmp_dir.path().join("annotation.txt");
        let mut sink = FolderSink::new(tmp_dir.path(), &anno);

        sink.save(sample(0)?)?;
        sink.save(sample(1)?)?;

        let first = tmp_dir.path().join("img2_1_0.png");
        assert_eq!(read_image_any(&first)?, sample(0)?.image);

        let content = fs::read_to_string(&anno).map_err(IoError::from)?;
        let second = tmp_dir.path().join("img2_1_1.png");
        assert_eq!(
            content,
            format!(
                "{} 1 0 0 4 3\n{} 1 0 0 4 3\n",
                first.display(),
                second.display()
            )
        );
        Ok(())
    }

    #[test]
    fn folder_sink_missing_dir_writes_no_label() -> Result<(), AugmentError> {
        let tmp_dir = tempfile::tempdir().map_err(IoError::from)?;
        let anno = tmp_dir.path().join("annotation.txt");
        let mut sink = FolderSink::new(tmp_dir.path().join("missing"), &anno);

        assert!(sink.save(sample(0)?).is_err());
        assert!(!anno.exists());
        Ok(())
    }
}
