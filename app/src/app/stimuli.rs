use rand::Rng;
use retina::{Image, ImageSequence, Orientation};

/// Blank frame, one bar per orientation, then noise.
pub fn sequence<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> ImageSequence {
    let mut images = ImageSequence::single(Image::new(rows, cols));
    for orientation in Orientation::ALL {
        images.push(Image::bar(rows, cols, orientation, 1.0));
    }
    images.push(Image::noise(rows, cols, rng));
    images
}
