//! Command implementations.

pub mod acquire;
pub mod generate;
pub mod history;
pub mod init;
pub mod recent;
pub mod run;
pub mod search;

pub use self::acquire::execute_acquire;
pub use self::generate::execute_generate;
pub use self::history::execute_history;
pub use self::init::execute_init;
pub use self::recent::execute_recent;
pub use self::run::execute_run;
pub use self::search::execute_search;
