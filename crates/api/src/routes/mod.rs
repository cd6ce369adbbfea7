mod evaluation;
mod misc;
mod panels;
mod questions;
mod search;

pub use evaluation::{batch_routes, evaluation_routes};
pub use misc::misc_routes;
pub use panels::panel_routes;
pub use questions::question_routes;
pub use search::search_routes;
