//! String argument conversion for create and update parameters.
//!
//! Entry points receive positional string arguments. For updates an empty string
//! means "leave this field as it is".

/// Positional string form of a parameter struct.
pub trait ContractArgs: Sized {
    /// Number of arguments after the record id.
    const ARITY: usize;

    /// Builds the parameters. `args.len()` is always `ARITY`.
    fn from_args(args: &[String]) -> Self;

    fn to_args(&self) -> Vec<String>;
}

/// `None` for an empty argument.
pub fn optional(arg: &str) -> Option<String> {
    (!arg.is_empty()).then(|| arg.to_string())
}

/// Inverse of [`optional`].
pub fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
