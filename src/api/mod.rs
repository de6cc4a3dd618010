pub mod files;
pub mod health;
pub mod submit;

pub use files::download_file;
pub use health::health_check;
pub use submit::{SubmitResponse, submit_job};
