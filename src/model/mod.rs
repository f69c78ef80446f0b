pub mod project;
pub mod filter;
pub mod activity;
pub mod history;
pub mod migrate;
pub mod template;

pub use project::*;
pub use filter::*;
pub use activity::*;
pub use history::*;
pub use migrate::*;
pub use template::*;
