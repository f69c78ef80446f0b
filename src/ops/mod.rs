pub mod check;
pub mod health;
pub mod links;
pub mod stats;
pub mod suggest;
pub mod view;
