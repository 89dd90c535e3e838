use image::RgbaImage;
use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, RGBA_CHANNEL_COUNT};

/// Apply a separable Gaussian blur to a single channel plane.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve(data, &kernel, Axis(1));
    convolve(&row_pass, &kernel, Axis(0))
}

/// Blur an RGBA image and decimate it to `floor(w/2) x floor(h/2)` by
/// averaging each 2x2 block of the blurred planes.
pub fn blur_and_halve(image: &RgbaImage, sigma: f32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let (new_w, new_h) = (w / 2, h / 2);

    let planes = split_planes(image);
    let halved: Vec<Array2<f32>> = planes
        .par_iter()
        .map(|plane| downsample_2x(&gaussian_blur_array(plane, sigma)))
        .collect();

    merge_planes(&halved, new_w, new_h)
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(f32::EPSILON);
    let radius = (sigma * 3.0).ceil() as usize;
    let s2 = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// 1D convolution along `axis` with clamp-to-edge borders.
fn convolve(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let along_cols = axis == Axis(1);

    let sample = |row: usize, col: usize| -> f32 {
        kernel
            .iter()
            .enumerate()
            .map(|(ki, &kv)| {
                let offset = ki as isize - radius as isize;
                let v = if along_cols {
                    let c = (col as isize + offset).clamp(0, w as isize - 1) as usize;
                    data[[row, c]]
                } else {
                    let r = (row as isize + offset).clamp(0, h as isize - 1) as usize;
                    data[[r, col]]
                };
                v * kv
            })
            .sum()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut out)| {
                for col in 0..w {
                    out[col] = sample(row, col);
                }
            });
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = sample(row, col);
            }
        }
    }
    result
}

/// Average each 2x2 block; a trailing odd row/column is dropped.
fn downsample_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let (new_h, new_w) = (h / 2, w / 2);
    Array2::from_shape_fn((new_h, new_w), |(r, c)| {
        let (r2, c2) = (r * 2, c * 2);
        (data[[r2, c2]] + data[[r2, c2 + 1]] + data[[r2 + 1, c2]] + data[[r2 + 1, c2 + 1]]) * 0.25
    })
}

fn split_planes(image: &RgbaImage) -> Vec<Array2<f32>> {
    let (w, h) = image.dimensions();
    let raw = image.as_raw();
    (0..RGBA_CHANNEL_COUNT)
        .map(|ch| {
            Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
                f32::from(raw[(r * w as usize + c) * RGBA_CHANNEL_COUNT + ch])
            })
        })
        .collect()
}

fn merge_planes(planes: &[Array2<f32>], w: u32, h: u32) -> RgbaImage {
    let mut out = RgbaImage::new(w, h);
    for (i, px) in out.chunks_exact_mut(RGBA_CHANNEL_COUNT).enumerate() {
        let (r, c) = (i / w as usize, i % w as usize);
        for (ch, plane) in planes.iter().enumerate() {
            px[ch] = plane[[r, c]].round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
