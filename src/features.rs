use ndarray::{Array2, Array3, ArrayView3, ArrayView4, Axis};

/// Largest 8-bit pixel intensity.
pub const MAX_PIXEL_VALUE: f64 = 255.0;

/// Flattens a batch of images `(m, height, width, channels)` into a feature
/// matrix `(height * width * channels, m)` with values rescaled to `[0, 1]`.
///
/// Pixels of one image are laid out row by row, channels innermost.
pub fn flatten(images: ArrayView4<u8>) -> Array2<f64> {
    let (examples, height, width, channels) = images.dim();
    let row_len = width * channels;

    Array2::from_shape_fn((height * row_len, examples), |(feature, example)| {
        let pixel = images[[
            example,
            feature / row_len,
            (feature % row_len) / channels,
            feature % channels,
        ]];
        f64::from(pixel) / MAX_PIXEL_VALUE
    })
}

/// Flattens one image `(height, width, channels)` into a `(dim, 1)` column.
pub fn flatten_image(image: ArrayView3<u8>) -> Array2<f64> {
    flatten(image.insert_axis(Axis(0)))
}

/// Nearest-neighbour resampling to `height x width`, keeping the channel count.
pub fn resize(image: ArrayView3<u8>, height: usize, width: usize) -> Array3<u8> {
    let (source_height, source_width, channels) = image.dim();

    if (source_height, source_width) == (height, width) {
        return image.to_owned();
    }

    if source_height == 0 || source_width == 0 {
        return Array3::zeros((height, width, channels));
    }

    // sample at the centre of each destination pixel
    let source_index = |index: usize, source_len: usize, len: usize| {
        ((2 * index + 1) * source_len / (2 * len)).min(source_len - 1)
    };

    Array3::from_shape_fn((height, width, channels), |(y, x, channel)| {
        image[[
            source_index(y, source_height, height),
            source_index(x, source_width, width),
            channel,
        ]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array4};

    #[test]
    fn test_flatten_shape_and_order() {
        // 2 images of 1x2 pixels with 3 channels
        let images = Array4::from_shape_vec(
            (2, 1, 2, 3),
            vec![0, 51, 102, 153, 204, 255, 255, 204, 153, 102, 51, 0],
        )
        .unwrap();

        let features = flatten(images.view());

        assert_eq!(features.dim(), (6, 2));
        assert_eq!(
            features.column(0).to_vec(),
            vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
        );
        assert_eq!(
            features.column(1).to_vec(),
            vec![1.0, 0.8, 0.6, 0.4, 0.2, 0.0]
        );
    }

    #[test]
    fn test_flatten_matches_row_major_reshape() {
        let images = Array4::from_shape_fn((3, 4, 5, 3), |(i, y, x, c)| {
            u8::try_from((i * 60 + y * 15 + x * 3 + c) % 256).unwrap()
        });

        let features = flatten(images.view());

        for (example, image) in images.outer_iter().enumerate() {
            let expected: Vec<f64> = image.iter().map(|&p| f64::from(p) / 255.0).collect();
            assert_eq!(features.column(example).to_vec(), expected);
        }
    }

    #[test]
    fn test_flatten_values_in_unit_interval() {
        let images = Array4::from_shape_fn((4, 3, 3, 3), |(i, y, x, c)| {
            u8::try_from((i * 71 + y * 29 + x * 13 + c * 7) % 256).unwrap()
        });

        let features = flatten(images.view());

        assert!(features.iter().all(|value| (0.0..=1.0).contains(value)));
    }

    #[test]
    fn test_flatten_image_is_single_column() {
        let image = Array3::from_elem((2, 2, 3), 255u8);

        let features = flatten_image(image.view());

        assert_eq!(features.dim(), (12, 1));
        assert!(features.iter().all(|&value| (value - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_resize_downsamples() {
        let image = Array3::from_shape_fn((4, 4, 1), |(y, x, _)| u8::try_from(y * 4 + x).unwrap());

        let resized = resize(image.view(), 2, 2);

        assert_eq!(resized.dim(), (2, 2, 1));
        assert_eq!(
            resized.index_axis(Axis(2), 0),
            array![[5, 7], [13, 15]]
        );
    }

    #[test]
    fn test_resize_upsamples_and_keeps_channels() {
        let image = Array3::from_shape_vec((1, 2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();

        let resized = resize(image.view(), 2, 4);

        assert_eq!(resized.dim(), (2, 4, 3));
        for channel in 0..3 {
            assert_eq!(resized[[0, 0, channel]], image[[0, 0, channel]]);
            assert_eq!(resized[[1, 3, channel]], image[[0, 1, channel]]);
        }
    }

    #[test]
    fn test_resize_empty_source_gives_black_image() {
        let image = Array3::<u8>::zeros((0, 4, 3));

        let resized = resize(image.view(), 2, 2);

        assert_eq!(resized.dim(), (2, 2, 3));
        assert!(resized.iter().all(|&pixel| pixel == 0));
    }
}
