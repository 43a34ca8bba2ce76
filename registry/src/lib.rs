//! Oracle registry — operator records, active-set selection, epoch rotation.
//!
//! The registry is the single owner of [`OracleOperator`] records and the
//! source of truth for operator status. The staking ledger mutates bond
//! amounts through `operator_mut`, and coordinates with the registry via
//! the status field; no other component writes operator state.

pub mod epoch;
pub mod error;
pub mod operator;
pub mod registry;

pub use epoch::Epoch;
pub use error::RegistryError;
pub use operator::{OperatorMetrics, OperatorStatus, OracleOperator};
pub use registry::OracleRegistry;
