//! Value objects - Immutable objects defined by their attributes

mod die;
mod ids;
mod roll_outcome;
mod roll_request;

pub use die::DieVariant;
pub use ids::SubmissionId;
pub use roll_outcome::{
    AdditiveOutcome, ExplodingOutcome, OnesDigit, PercentileOutcome, RollOutcome, RollValue,
};
pub use roll_request::{Modifier, PercentileRequest, PoolRequest, RollRequest};
