use std::fmt;

// Failures talking to the game authority. All of them are transient from the view's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    Transport(String),
    Upstream {
        status: u16,
        message: Option<String>,
    },
    Decode(String),
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityError::Transport(err) => write!(f, "authority transport error: {err}"),
            AuthorityError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "authority upstream error {status}: {message}")
                } else {
                    write!(f, "authority upstream error {status}")
                }
            }
            AuthorityError::Decode(err) => write!(f, "authority response decode error: {err}"),
        }
    }
}

impl std::error::Error for AuthorityError {}
