/// Tensor preparation for the classifier
///
/// Converts an ARGB pixel buffer into a `[1, 3, H, W]` float tensor:
/// channels scaled to [0, 1], then normalized with per-channel mean/std.
use ndarray::Array4;

use crate::pixel_buffer::PixelBuffer;

/// Per-channel normalization (R, G, B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    /// Scale to [0, 1] only
    pub const IDENTITY: Normalization = Normalization {
        mean: [0.0; 3],
        std: [1.0; 3],
    };
}

/// Build an NCHW batch of one from `buffer`
pub fn to_nchw(buffer: &PixelBuffer, norm: &Normalization) -> Array4<f32> {
    let (w, h) = (buffer.width(), buffer.height());
    let mut tensor = Array4::<f32>::zeros((1, 3, h, w));

    for y in 0..h {
        for (x, px) in buffer.row(y).chunks_exact(4).enumerate() {
            // px = [a, r, g, b]
            for c in 0..3 {
                let value = px[c + 1] as f32 / 255.0;
                tensor[[0, c, y, x]] = (value - norm.mean[c]) / norm.std[c];
            }
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn test_shape_is_nchw() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(50, 30));
        let buffer = PixelBuffer::from_image(&img, 20, 10).unwrap();

        let tensor = to_nchw(&buffer, &Normalization::IDENTITY);
        assert_eq!(tensor.shape(), &[1, 3, 10, 20]);
    }

    #[test]
    fn test_channels_are_rgb_and_normalized() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 0, 51])));
        let buffer = PixelBuffer::from_image(&img, 4, 4).unwrap();
        let norm = Normalization {
            mean: [0.5, 0.0, 0.0],
            std: [0.5, 1.0, 0.1],
        };

        let tensor = to_nchw(&buffer, &norm);

        assert!((tensor[[0, 0, 2, 2]] - 1.0).abs() < 1e-2);
        assert!(tensor[[0, 1, 2, 2]].abs() < 1e-2);
        assert!((tensor[[0, 2, 2, 2]] - 2.0).abs() < 0.1);
    }
}
