// Score calibration: folds coordination signals into a heuristic score.

pub mod calibrator;
pub mod envelope;
