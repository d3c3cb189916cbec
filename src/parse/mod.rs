mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedPolicy;

/// Parse policy text into `(resource, policy)` entries in declaration order.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid policy text.
pub fn parse(input: &str) -> Result<Vec<ParsedPolicy>, ParseError> {
    use winnow::Parser;
    grammar::parse_policies
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.to_string()))
}
