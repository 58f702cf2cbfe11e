// SponsorScope: coordination signals and score calibration for creator accounts
//
// This is the library root. Data flows strictly forward:
//   raw interactions -> engagement graph -> coordination signals
//   (+ pod/reuse detectors) -> calibrated score envelope
// Every stage is a pure, synchronous function of its inputs.

pub mod calibration;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod pipeline;
