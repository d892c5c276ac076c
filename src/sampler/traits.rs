//! Sampler trait.

use rand::rngs::StdRng;

use crate::{Image, Sample};

/// Produces the next generation of particles.
pub trait Sampler {
    /// Reset image-dependent state with the first frame of a sequence.
    fn init(&mut self, image: &Image);

    /// Fill `new_samples` with the next generation.
    ///
    /// # Arguments
    /// * `samples` - Weighted particles of the previous frame
    /// * `new_samples` - Output buffer, cleared before use
    /// * `image` - Current frame
    /// * `target` - Estimated target of the previous frame, if any
    /// * `rng` - Random source
    fn sample(
        &mut self,
        samples: &[Sample],
        new_samples: &mut Vec<Sample>,
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    );
}
