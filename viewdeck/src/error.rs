use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("route table is empty"))]
    EmptyRoutes,

    #[snafu(display("failed to lock mutex: poisoned"))]
    LockPoisoned,

    #[snafu(display("could not read store file {}: {source}", path.display()))]
    StoreRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("could not write store file {}: {source}", path.display()))]
    StoreWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("store file {} is not a valid JSON object: {source}", path.display()))]
    StoreFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
