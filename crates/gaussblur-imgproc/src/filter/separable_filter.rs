use gaussblur_image::{Image, ImageError};

use super::{border::clamp_index, kernels::GaussianKernel};
use crate::parallel::RowRange;

/// Slack added before truncating an accumulated value to `u8`.
///
/// A normalized kernel only sums to one up to rounding, so a uniform 255 field can accumulate to
/// 254.9999.. and truncate to 254. The slack is far below one quantization step.
const TRUNCATION_SLACK: f64 = 1e-3;

/// Convert an accumulated value to `u8` by truncating toward zero and saturating to `[0, 255]`.
#[inline]
pub fn truncate_to_u8(acc: f64) -> u8 {
    (acc + TRUNCATION_SLACK).trunc().clamp(0.0, 255.0) as u8
}

fn check_dst_len(dst_len: usize, rows: RowRange, row_stride: usize) -> Result<(), ImageError> {
    let expected = rows.len() * row_stride;
    if dst_len != expected {
        return Err(ImageError::InvalidChannelShape(dst_len, expected));
    }
    Ok(())
}

/// Convolve a range of rows of the source image along the x axis.
///
/// Out-of-bounds taps replicate the nearest edge pixel. The result is written unclamped as
/// floating point since the vertical pass still has to consume it.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The rows `rows.start..rows.end` of the intermediate buffer, with length
///   `rows.len() * W * C`.
/// * `rows` - The range of rows to process.
/// * `kernel` - The 1-D gaussian kernel.
///
/// PRECONDITION: `rows.end <= H`.
pub fn horizontal_pass<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut [f32],
    rows: RowRange,
    kernel: &GaussianKernel,
) -> Result<(), ImageError> {
    let cols = src.cols();
    let row_stride = src.row_stride();
    check_dst_len(dst.len(), rows, row_stride)?;
    if rows.is_empty() {
        return Ok(());
    }

    let src_rows = &src.as_slice()[rows.start * row_stride..rows.end * row_stride];

    for (src_row, dst_row) in src_rows
        .chunks_exact(row_stride)
        .zip(dst.chunks_exact_mut(row_stride))
    {
        for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let mut acc = [0.0f64; C];
            for (offset, w) in kernel.taps() {
                let sx = clamp_index(x as isize + offset, cols);
                let src_pixel = &src_row[sx * C..(sx + 1) * C];
                for (acc_val, &v) in acc.iter_mut().zip(src_pixel) {
                    *acc_val += w * v as f64;
                }
            }
            for (d, &acc_val) in dst_pixel.iter_mut().zip(acc.iter()) {
                *d = acc_val as f32;
            }
        }
    }

    Ok(())
}

/// Convolve a range of rows of the intermediate image along the y axis.
///
/// Taps above the first row or below the last row replicate the edge row. Every accumulated
/// value is truncated toward zero and clamped to `[0, 255]`.
///
/// # Arguments
///
/// * `src` - The fully written intermediate image with shape (H, W, C).
/// * `dst` - The rows `rows.start..rows.end` of the output buffer, with length
///   `rows.len() * W * C`.
/// * `rows` - The range of rows to process.
/// * `kernel` - The 1-D gaussian kernel.
///
/// PRECONDITION: `rows.end <= H`.
pub fn vertical_pass<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut [u8],
    rows: RowRange,
    kernel: &GaussianKernel,
) -> Result<(), ImageError> {
    let num_rows = src.rows();
    let row_stride = src.row_stride();
    check_dst_len(dst.len(), rows, row_stride)?;

    let src_data = src.as_slice();
    let mut acc = vec![0.0f64; row_stride];

    for (y, dst_row) in (rows.start..rows.end).zip(dst.chunks_exact_mut(row_stride)) {
        acc.iter_mut().for_each(|a| *a = 0.0);

        for (offset, w) in kernel.taps() {
            let sy = clamp_index(y as isize + offset, num_rows);
            let src_row = &src_data[sy * row_stride..(sy + 1) * row_stride];
            for (acc_val, &v) in acc.iter_mut().zip(src_row) {
                *acc_val += w * v as f64;
            }
        }

        for (d, &acc_val) in dst_row.iter_mut().zip(acc.iter()) {
            *d = truncate_to_u8(acc_val);
        }
    }

    Ok(())
}
