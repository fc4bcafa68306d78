mod flag;
mod money;
mod operation;
mod quantity;
mod time;

pub use self::{flag::*, money::*, operation::*, quantity::*, time::*};
