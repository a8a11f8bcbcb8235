use std::{ops::Deref, path::Path};

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::{
    error::{Error, Result},
    geometry::Point,
    verboser::{Message, Verboser},
    Grid,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        let pixels = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| Point { x, y }))
            .map(&mut builder)
            .collect();
        Self { pixels, grid }
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

/// Square single channel intensity buffer, 0 is black and 255 is white.
pub type GrayImage = PixelData<u8>;

/// ITU-R 601-2 luma in 16 bit fixed point, rounded: `L = R * 299/1000 + G * 587/1000 + B * 114/1000`.
pub fn luma(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

impl From<RgbImage> for GrayImage {
    fn from(value: RgbImage) -> Self {
        Self {
            grid: Grid {
                height: value.height() as usize,
                width: value.width() as usize,
            },
            pixels: value.pixels().map(|&pixel| luma(pixel)).collect(),
        }
    }
}

/// Opens and decodes `path`, then [`preprocess`]es it.
pub fn open(
    path: impl AsRef<Path>,
    resolution: u32,
    verboser: &mut impl Verboser,
) -> Result<GrayImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|err| Error::invalid_image(path, err))?;
    preprocess(&image, resolution, verboser).map_err(|err| match err {
        Error::InvalidImage { reason, .. } => Error::invalid_image(path, reason),
        other => other,
    })
}

/// Crops the largest centered square out of `image`, resizes it to `resolution`² with a
/// Lanczos filter and converts it to [`luma`].
pub fn preprocess(
    image: &DynamicImage,
    resolution: u32,
    verboser: &mut impl Verboser,
) -> Result<GrayImage> {
    verboser.verbose(Message::Preprocessing);
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::invalid_image(
            "<memory>",
            format!("image has no pixels ({width}x{height})"),
        ));
    }
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    log::debug!("cropping {width}x{height} to {side}x{side} at ({x}, {y})");

    let gray = image
        .crop_imm(x, y, side, side)
        .resize_exact(resolution, resolution, FilterType::Lanczos3)
        .to_rgb8();
    Ok(gray.into())
}
