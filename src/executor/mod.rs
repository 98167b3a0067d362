mod builtins;
mod dispatch;
mod spawn;

pub use builtins::Builtins;
pub use dispatch::{Dispatcher, ExecError, ExecOutcome, ExecStatus};
pub use spawn::{PathResolver, run_external};
