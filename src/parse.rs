use csv::{ReaderBuilder, StringRecord};
use ndarray::{Array2, Array3, Array4};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::features::flatten;

pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const CLASSES_FILE: &str = "classes.csv";

pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageShape {
    /// `num_px x num_px` RGB images.
    pub fn square(num_px: usize) -> Self {
        Self {
            height: num_px,
            width: num_px,
            channels: CHANNELS,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.height * self.width * self.channels
    }
}

/// Images `(m, height, width, channels)` with their `(1, m)` labels.
#[derive(Debug, Clone)]
pub struct LabeledImages {
    pub images: Array4<u8>,
    pub labels: Array2<f64>,
}

impl LabeledImages {
    pub fn len(&self) -> usize {
        self.images.len_of(ndarray::Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened, normalized feature matrix `(dim, m)`.
    pub fn features(&self) -> Array2<f64> {
        flatten(self.images.view())
    }
}

/// Human readable names of class 0 and class 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: [String; 2],
}

impl ClassNames {
    pub fn new(negative: impl Into<String>, positive: impl Into<String>) -> Self {
        Self {
            names: [negative.into(), positive.into()],
        }
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Name for a predicted 0/1 label.
    #[allow(clippy::float_cmp)]
    pub fn for_label(&self, label: f64) -> Option<&str> {
        if label == 0.0 {
            self.get(0)
        } else if label == 1.0 {
            self.get(1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: LabeledImages,
    pub test: LabeledImages,
    pub classes: ClassNames,
}

fn parse_error(source: &Path, record: &StringRecord, message: impl Into<String>) -> Error {
    Error::Parse {
        path: source.to_path_buf(),
        line: record.position().map_or(0, csv::Position::line),
        message: message.into(),
    }
}

fn parse_field<T: std::str::FromStr>(
    source: &Path,
    record: &StringRecord,
    index: usize,
    what: &str,
) -> Result<T> {
    let value = record
        .get(index)
        .ok_or_else(|| parse_error(source, record, format!("missing {what}")))?;

    value
        .trim()
        .parse::<T>()
        .map_err(|_| parse_error(source, record, format!("invalid {what} {value:?}")))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Reads records `label,p0,...,pN` after a header row. `source` only labels errors.
pub fn read_labeled_images<R: Read>(
    reader: R,
    shape: ImageShape,
    source: &Path,
) -> Result<LabeledImages> {
    const LABEL_FIELD_INDEX: usize = 0;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut pixels = Vec::new();
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result?;

        if record.len() != shape.pixel_count() + 1 {
            return Err(parse_error(
                source,
                &record,
                format!(
                    "expected {} fields, found {}",
                    shape.pixel_count() + 1,
                    record.len()
                ),
            ));
        }

        let label: u8 = parse_field(source, &record, LABEL_FIELD_INDEX, "label")?;
        if label > 1 {
            return Err(parse_error(source, &record, format!("label {label} is not 0 or 1")));
        }
        labels.push(f64::from(label));

        for index in LABEL_FIELD_INDEX + 1..record.len() {
            pixels.push(parse_field::<u8>(source, &record, index, "pixel")?);
        }
    }

    if labels.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let examples = labels.len();
    let images = Array4::from_shape_vec(
        (examples, shape.height, shape.width, shape.channels),
        pixels,
    )?;
    let labels = Array2::from_shape_vec((1, examples), labels)?;

    Ok(LabeledImages { images, labels })
}

pub fn load_labeled_images(path: &Path, shape: ImageShape) -> Result<LabeledImages> {
    read_labeled_images(open(path)?, shape, path)
}

/// Reads `id,name` records after a header row; ids 0 and 1 must both be present.
pub fn read_classes<R: Read>(reader: R, source: &Path) -> Result<ClassNames> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut names: [Option<String>; 2] = [None, None];

    for result in reader.records() {
        let record = result?;

        let class_id: usize = parse_field(source, &record, 0, "class id")?;
        let name = record
            .get(1)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| parse_error(source, &record, "missing class name"))?;

        let slot = names
            .get_mut(class_id)
            .ok_or_else(|| parse_error(source, &record, format!("unknown class id {class_id}")))?;
        *slot = Some(name.to_string());
    }

    match names {
        [Some(negative), Some(positive)] => Ok(ClassNames::new(negative, positive)),
        _ => Err(Error::Parse {
            path: source.to_path_buf(),
            line: 0,
            message: "class ids 0 and 1 must both be named".to_string(),
        }),
    }
}

pub fn load_classes(path: &Path) -> Result<ClassNames> {
    read_classes(open(path)?, path)
}

/// Loads the train split, the test split and the class names from `directory`.
pub fn load_dataset(directory: &Path, shape: ImageShape) -> Result<Dataset> {
    let path = |file: &str| -> PathBuf { directory.join(file) };

    Ok(Dataset {
        train: load_labeled_images(&path(TRAIN_FILE), shape)?,
        test: load_labeled_images(&path(TEST_FILE), shape)?,
        classes: load_classes(&path(CLASSES_FILE))?,
    })
}

/// Reads a single image: a `height,width,channels` record followed by one
/// record of pixel values.
pub fn read_image<R: Read>(reader: R, source: &Path) -> Result<Array3<u8>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let missing = |what: &str| Error::Parse {
        path: source.to_path_buf(),
        line: 0,
        message: format!("missing {what}"),
    };

    let header = records.next().ok_or_else(|| missing("image dimensions"))??;
    let height: usize = parse_field(source, &header, 0, "height")?;
    let width: usize = parse_field(source, &header, 1, "width")?;
    let channels: usize = parse_field(source, &header, 2, "channels")?;

    let pixel_count = height
        .checked_mul(width)
        .and_then(|count| count.checked_mul(channels))
        .ok_or_else(|| parse_error(source, &header, "image dimensions overflow"))?;

    let record = records.next().ok_or_else(|| missing("pixel values"))??;
    if record.len() != pixel_count {
        return Err(parse_error(
            source,
            &record,
            format!(
                "expected {pixel_count} pixel values, found {}",
                record.len()
            ),
        ));
    }

    let pixels = (0..record.len())
        .map(|index| parse_field::<u8>(source, &record, index, "pixel"))
        .collect::<Result<Vec<_>>>()?;

    Ok(Array3::from_shape_vec((height, width, channels), pixels)?)
}

pub fn load_image(path: &Path) -> Result<Array3<u8>> {
    read_image(open(path)?, path)
}
