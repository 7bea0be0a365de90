use crate::error::ArbintError;

pub(crate) type AResult<T> = Result<T, ArbintError>;
