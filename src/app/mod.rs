pub mod app_state;
pub mod fps;
pub mod operator;
pub mod runner;

pub use app_state::AppState;
pub use fps::FpsMeter;
pub use operator::OperatorCommand;
pub use runner::{Application, RunSummary};
