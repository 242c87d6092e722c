use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("target is not a recognizable cluster object")]
    MalformedTarget,
    #[error("delete request failed: {0}")]
    Commit(#[source] anyhow::Error),
    #[error("kube error: {0}")]
    Kube(#[from] kube::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
