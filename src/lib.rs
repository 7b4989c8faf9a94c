pub mod anchor;
pub mod annotate;
pub mod args;
pub mod capture;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod template_matching;

pub use anchor::{AnchorRegion, Point, TemplateSize, compute_anchor};
pub use config::{OffsetConfig, ProbeConfig};
pub use error::{ProbeError, ProbeResult};
pub use pipeline::{Probe, ProbeReport};
