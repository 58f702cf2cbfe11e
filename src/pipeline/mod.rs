// Evaluation pipeline: raw interactions to a calibrated score.

pub mod evaluate;
