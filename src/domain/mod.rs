//! Hospital rules that do not touch storage: queue ordering, the bed state
//! machine, bill settlement and the role/permission matrix.
//!
//! Services and the console both call into these; nothing here performs I/O.

pub mod beds;
pub mod billing;
pub mod queue;
pub mod rbac;
