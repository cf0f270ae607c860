//! Domain model (contracts, steps, payloads, receipts, outcomes, events).

pub mod contract;
pub mod events;
pub mod ids;
pub mod outcome;
pub mod payload;
pub mod receipt;
pub mod signature;
pub mod step;

pub use contract::ContractRef;
pub use events::SetupEvent;
pub use ids::RunId;
pub use outcome::{SequenceOutcome, StepReport, StepStatus};
pub use payload::CallPayload;
pub use receipt::{ConfirmationResult, Receipt, Terminal, TransactionHandle};
pub use signature::FunctionSignature;
pub use step::Step;
