//! Artifact key convention: `jobs/{job_id}/{artifact}.{ext}`.

use crate::defaults;

pub fn article_key(job_id: &str) -> String {
    format!("jobs/{job_id}/article.txt")
}

pub fn script_key(job_id: &str) -> String {
    format!("jobs/{job_id}/script.txt")
}

pub fn script_metadata_key(job_id: &str) -> String {
    format!("jobs/{job_id}/script.json")
}

/// Audio key; the extension follows the synthesis output format.
pub fn audio_key(job_id: &str, output_format: &str) -> String {
    format!(
        "jobs/{job_id}/audio.{}",
        defaults::audio_extension(output_format)
    )
}
