use cmdkit_core::error::CommandError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("core: {0}")]
    Core(#[from] CommandError),

    #[error("not a module: {0}")]
    NotAModule(String),

    #[error("module already registered: module={module}")]
    AlreadyRegistered { module: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl ServiceError {
    /// 是否为前置条件未满足
    pub fn is_precondition_failure(&self) -> bool {
        matches!(self, Self::Core(CommandError::PreconditionFailed { .. }))
    }
}
