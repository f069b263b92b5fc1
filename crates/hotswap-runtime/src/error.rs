use crate::bollard::errors::Error as BollardError;
use hotswap_common::SwapError;

/// The daemon call that produced an error, with the names involved.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Call<'a> {
    Inspect { container: &'a str },
    CopyOut { container: &'a str, path: &'a str },
    Create { name: &'a str, image: &'a str },
    Stop { container: &'a str },
    Start { container: &'a str },
    CopyIn { container: &'a str, dir: &'a str },
    Rename { container: &'a str, name: &'a str },
    Remove { container: &'a str },
}

impl Call<'_> {
    fn operation(&self) -> &'static str {
        match self {
            Call::Inspect { .. } => "inspect",
            Call::CopyOut { .. } => "copy from container",
            Call::Create { .. } => "create",
            Call::Stop { .. } => "stop",
            Call::Start { .. } => "start",
            Call::CopyIn { .. } => "copy to container",
            Call::Rename { .. } => "rename",
            Call::Remove { .. } => "remove",
        }
    }
}

/// Transport-level failures: the daemon was never reached or never answered.
fn is_unavailable(err: &BollardError) -> bool {
    matches!(
        err,
        BollardError::RequestTimeoutError
            | BollardError::IOError { .. }
            | BollardError::HyperResponseError { .. }
            | BollardError::HyperLegacyError { .. }
            | BollardError::SocketNotFoundError(_)
    )
}

/// 304 from stop means the container was not running.
pub(crate) fn is_not_modified(err: &BollardError) -> bool {
    matches!(
        err,
        BollardError::DockerResponseServerError {
            status_code: 304,
            ..
        }
    )
}

pub(crate) fn classify(call: Call<'_>, err: BollardError) -> SwapError {
    if is_unavailable(&err) {
        return SwapError::RuntimeUnavailable(err.to_string());
    }

    let (status, message) = match err {
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } => (Some(status_code), message),
        other => (None, other.to_string()),
    };

    match (call, status) {
        (Call::Create { image, .. }, Some(404)) => SwapError::ImageNotFound {
            image: image.to_string(),
            message,
        },
        (Call::CopyOut { container, path }, Some(404)) => SwapError::FileNotFound {
            container: container.to_string(),
            path: path.to_string(),
            message,
        },
        (Call::CopyIn { container, dir }, _) => SwapError::WriteFailed {
            container: container.to_string(),
            path: dir.to_string(),
            message,
        },
        (
            Call::Inspect { container }
            | Call::Stop { container }
            | Call::Start { container }
            | Call::Rename { container, .. }
            | Call::Remove { container },
            Some(404),
        ) => SwapError::NotFound {
            container: container.to_string(),
            message,
        },
        (Call::Create { name, .. } | Call::Rename { name, .. }, Some(409)) => {
            SwapError::NameConflict {
                name: name.to_string(),
                message,
            }
        }
        (Call::Start { container }, _) => SwapError::StartFailed {
            container: container.to_string(),
            message,
        },
        (call, _) => SwapError::Operation {
            operation: call.operation(),
            message,
        },
    }
}
