//! Enum-based transition model dispatch.

use rand::rngs::StdRng;

use super::optical_flow::OpticalFlowTransitionModel;
use super::simple::SimpleTransitionModel;
use super::traits::TransitionModel;
use crate::{Image, Sample};

/// Closed set of transition models with static dispatch.
#[derive(Debug)]
pub enum TransitionModelEnum {
    Simple(SimpleTransitionModel),
    OpticalFlow(OpticalFlowTransitionModel),
}

impl Default for TransitionModelEnum {
    fn default() -> Self {
        TransitionModelEnum::Simple(SimpleTransitionModel::default())
    }
}

impl TransitionModel for TransitionModelEnum {
    #[inline(always)]
    fn init(&mut self, image: &Image) {
        match self {
            TransitionModelEnum::Simple(m) => m.init(image),
            TransitionModelEnum::OpticalFlow(m) => m.init(image),
        }
    }

    #[inline(always)]
    fn predict(
        &mut self,
        samples: &mut [Sample],
        image: &Image,
        target: Option<&Sample>,
        rng: &mut StdRng,
    ) {
        match self {
            TransitionModelEnum::Simple(m) => m.predict(samples, image, target, rng),
            TransitionModelEnum::OpticalFlow(m) => m.predict(samples, image, target, rng),
        }
    }
}
