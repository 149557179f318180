use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloaderError>;

#[derive(Debug, Error)]
pub enum DownloaderError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status} while writing {output}\n{stderr}")]
    TranscodeFailed {
        program: String,
        status: String,
        output: String,
        stderr: String,
    },

    #[error("{0} of the transcoder was not captured")]
    MissingPipe(&'static str),
}
