use justerror::Error;

pub type ChainResult<T = ()> = Result<T, ChainError>;

#[Error]
#[derive(Eq, PartialEq)]
pub enum ChainError {
    Companion(#[from] CompanionError),
    Extension(#[from] ExtensionError),
}

#[Error]
#[derive(Eq, PartialEq)]
pub enum CompanionError {
    NotAWait,
    AlreadyAttached,
}

#[Error]
#[derive(Eq, PartialEq)]
pub enum ExtensionError {
    NotRegistered,
}
