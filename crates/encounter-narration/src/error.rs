use thiserror::Error;

/// Errors raised while loading or rendering narration templates.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("no narration template named {0}")]
    TemplateNotFound(String),

    #[error("narration template {name} failed to render")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("narration template {name} does not parse")]
    InvalidTemplate {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
