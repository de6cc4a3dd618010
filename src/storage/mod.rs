pub mod backend;
pub mod filesystem;

pub use backend::Storage;
pub use filesystem::FilesystemStorage;

use crate::jobs::JobKind;
use rand::Rng;
use rand::distr::Alphanumeric;

const SUFFIX_LEN: usize = 8;

/// Storage key for a job's output:
/// `<slug(author)>/<report segment>/<jobId>-<8 random chars>.<extension>`.
pub fn object_key(author: &str, kind: JobKind, job_id: &str, extension: &str) -> String {
    let mut author = slug::slugify(author);
    if author.is_empty() {
        author = "anonymous".into();
    }
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!(
        "{author}/{}/{job_id}-{suffix}.{extension}",
        kind.report_segment()
    )
}
