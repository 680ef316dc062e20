//! Business logic services
//!
//! Pure decision logic that operates on domain models. Apart from the
//! ledger and the orchestrator, which go through port traits, these
//! services have no dependencies: they operate on data passed in and
//! return results.
//!
//! - [`validator`] - Structural validation of embedding payloads
//! - [`matcher`] - Cosine similarity and vote-based face verification
//! - [`subnet`] - Subnet co-location of two network addresses
//! - [`schedule`] - Active session resolution
//! - [`ledger`] - Once-per-session attendance crediting
//! - [`orchestrator`] - The full verification pipeline

pub mod ledger;
pub mod matcher;
pub mod orchestrator;
pub mod schedule;
pub mod subnet;
pub mod validator;

pub use ledger::{CreditOutcome, try_credit};
pub use matcher::{MatchReport, cosine_similarity, verify};
pub use orchestrator::{Orchestrator, Stores};
pub use schedule::find_active_session;
pub use subnet::{SubnetPolicy, same_subnet};
pub use validator::{average, validate, validate_batch};
