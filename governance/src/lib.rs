//! Governance orchestration.
//!
//! Sequences a proposal through oracle review, decidability routing,
//! voting or jury resolution, timelock, and execution. The orchestrator
//! is the sole writer of [`GovernanceProposal`] records; it owns the
//! consensus, voting, and jury engines and emits an observable event on
//! every transition. Invalid transition requests are rejected with an
//! error and never corrupt state; rejection at any stage is terminal.

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod proposal;
pub mod router;

pub use error::GovernanceError;
pub use events::{GovernanceEvent, GovernanceObserver};
pub use orchestrator::GovernanceOrchestrator;
pub use proposal::{GovernancePhase, GovernanceProposal};
pub use router::{route_proposal, Route, RoutingDecision};
