use std::path::{Path, PathBuf};

use dataug_image::{Image, ImageSize};

use crate::{
    error::IoError,
    png::{write_image_png_gray8, write_image_png_rgb8},
};

/// File extensions recognized as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "bmp", "png", "dib", "pbm", "pgm", "ppm", "sr", "ras",
];

/// A decoded 8-bit image, either single channel or rgb.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
}

impl GenericImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
        }
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(img) => img.num_channels(),
            GenericImage::Rgb8(img) => img.num_channels(),
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate,
/// guessing the format from the file content. Grayscale images (with or
/// without alpha, any depth) are decoded to [`GenericImage::L8`], everything
/// else to [`GenericImage::Rgb8`].
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::L8
        | image::ColorType::La8
        | image::ColorType::L16
        | image::ColorType::La16 => {
            GenericImage::L8(Image::<u8, 1>::new(size, img.into_luma8().into_raw())?)
        }
        _ => GenericImage::Rgb8(Image::<u8, 3>::new(size, img.into_rgb8().into_raw())?),
    };

    Ok(image)
}

/// Writes an image as an 8-bit PNG, grayscale or rgb depending on the variant.
pub fn write_image_png(file_path: impl AsRef<Path>, image: &GenericImage) -> Result<(), IoError> {
    match image {
        GenericImage::L8(img) => write_image_png_gray8(file_path, img),
        GenericImage::Rgb8(img) => write_image_png_rgb8(file_path, img),
    }
}

/// Whether the path has one of the [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Lists the image files of a directory, not recursing into subdirectories.
///
/// The paths are sorted to give a stable iteration order.
pub fn list_image_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(IoError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn read_any_missing() {
        let res = read_image_any("/definitely/not/here.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_any_not_an_image() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("fake.png");
        fs::write(&file_path, b"certainly not a png")?;
        assert!(read_image_any(&file_path).is_err());
        Ok(())
    }

    #[test]
    fn read_any_rgba_to_rgb() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgba.png");
        let rgba = image::RgbaImage::from_raw(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 128])
            .ok_or(IoError::PngEncodingError("buffer".to_string()))?;
        rgba.save(&file_path)?;

        let image = read_image_any(&file_path)?;
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.size(), [2, 1].into());
        match image {
            GenericImage::Rgb8(img) => assert_eq!(img.as_slice(), &[1, 2, 3, 4, 5, 6]),
            GenericImage::L8(_) => panic!("expected a rgb image"),
        }
        Ok(())
    }

    #[test]
    fn write_generic_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("out.png");
        let image = GenericImage::L8(Image::new([2, 2].into(), vec![9, 8, 7, 6])?);
        write_image_png(&file_path, &image)?;
        assert_eq!(read_image_any(&file_path)?, image);
        Ok(())
    }

    #[test]
    fn image_extensions() {
        assert!(has_image_extension("a/b/c.JPG"));
        assert!(has_image_extension("c.ras"));
        assert!(has_image_extension("c.Pgm"));
        assert!(!has_image_extension("c.txt"));
        assert!(!has_image_extension("png"));
        assert!(!has_image_extension("c.tiff"));
    }

    #[test]
    fn list_images_sorted() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        for name in ["b.png", "a.JPG", "notes.txt", "c.bmp"] {
            fs::write(tmp_dir.path().join(name), b"")?;
        }
        fs::create_dir(tmp_dir.path().join("dir.png"))?;

        let files = list_image_files(tmp_dir.path())?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, ["a.JPG", "b.png", "c.bmp"]);

        assert!(matches!(
            list_image_files(tmp_dir.path().join("b.png")),
            Err(IoError::NotADirectory(_))
        ));
        Ok(())
    }
}
