use std::path::Path;

use gaussblur_image::{ImageSize, Rgba8Image};

use crate::error::IoError;

/// Reads an image from the given file path as 8-bit RGBA.
///
/// The method tries to read from any image format supported by the image crate and converts
/// the decoded pixels to RGBA, adding an opaque alpha channel when the source has none.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGBA image containing the image data.
pub fn read_image_rgba8(file_path: impl AsRef<Path>) -> Result<Rgba8Image, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Rgba8Image::new(size, img.into_rgba8().into_raw())?)
}

/// Writes an RGBA image to the given file path.
///
/// The format is chosen from the file extension. Formats without an alpha channel, such as
/// JPEG, receive the RGB channels only.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The RGBA image to write.
pub fn write_image_rgba8(file_path: impl AsRef<Path>, image: &Rgba8Image) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let (width, height) = (image.width(), image.height());
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(IoError::InvalidImageDimensions(width, height));
    };

    let buffer = image::RgbaImage::from_raw(w, h, image.as_slice().to_vec())
        .ok_or(IoError::InvalidImageDimensions(width, height))?;

    let is_jpeg = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

    if is_jpeg {
        image::DynamicImage::ImageRgba8(buffer)
            .to_rgb8()
            .save(file_path)?;
    } else {
        buffer.save(file_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file() {
        let res = read_image_rgba8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn write_unknown_extension() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let img = Rgba8Image::from_size_val([2, 2].into(), 0)?;
        let res = write_image_rgba8(tmp_dir.path().join("image.unknown"), &img);
        assert!(matches!(res, Err(IoError::ImageCodecError(_))));
        Ok(())
    }
}
