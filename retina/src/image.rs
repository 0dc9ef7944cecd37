use rand::Rng;

use crate::topology::Orientation;

/// Row-major grid of brightness values, one per photoreceptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    pixels: Vec<f32>,
}

impl Image {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            pixels: vec![0.0; rows * cols],
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut pixels = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                pixels.push(f(r, c));
            }
        }
        Self { rows, cols, pixels }
    }

    /// Uniform noise in `[0, 1)`.
    pub fn noise<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self::from_fn(rows, cols, |_, _| rng.random::<f32>())
    }

    /// A one-pixel line of `intensity` through the centre, along `orientation`.
    pub fn bar(rows: usize, cols: usize, orientation: Orientation, intensity: f32) -> Self {
        let (cr, cc) = ((rows / 2) as isize, (cols / 2) as isize);
        Self::from_fn(rows, cols, |r, c| {
            let (dr, dc) = (r as isize - cr, c as isize - cc);
            if orientation.on_line(dr, dc) { intensity } else { 0.0 }
        })
    }

    /// A single lit pixel.
    pub fn spot(rows: usize, cols: usize, row: usize, col: usize, intensity: f32) -> Self {
        let mut image = Self::new(rows, cols);
        image.set(row, col, intensity);
        image
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Brightness at `(row, col)`; 0 outside the image.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        if row < self.rows && col < self.cols {
            self.pixels[row * self.cols + col]
        } else {
            0.0
        }
    }

    /// Ignored outside the image.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        if row < self.rows && col < self.cols {
            self.pixels[row * self.cols + col] = value;
        }
    }
}

/// Supplies the frame that drives the photoreceptors.
pub trait ImageSource {
    fn current(&self) -> &Image;
}

impl ImageSource for Image {
    fn current(&self) -> &Image {
        self
    }
}

/// Browsable list of images. Stepping past either end stays on the end.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    images: Vec<Image>,
    index: usize,
}

impl ImageSequence {
    /// `None` when `images` is empty.
    pub fn new(images: Vec<Image>) -> Option<Self> {
        (!images.is_empty()).then_some(Self { images, index: 0 })
    }

    pub fn single(image: Image) -> Self {
        Self {
            images: vec![image],
            index: 0,
        }
    }

    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_forward(&mut self) -> usize {
        self.index = (self.index + 1).min(self.images.len() - 1);
        self.index
    }

    pub fn step_back(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }
}

impl ImageSource for ImageSequence {
    fn current(&self) -> &Image {
        &self.images[self.index]
    }
}
