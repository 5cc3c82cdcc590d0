mod aggregate;
mod budget;
mod ledger;
mod money;
mod period;
mod transaction;

pub use aggregate::*;
pub use budget::*;
pub use ledger::*;
pub use money::*;
pub use period::*;
pub use transaction::*;
