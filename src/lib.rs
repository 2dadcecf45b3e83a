pub mod ast;
pub mod builder;
pub mod config;
pub mod token;
pub mod writer;

pub use ast::{Document, Node};
pub use builder::BuildError;
pub use config::Config;
pub use config::ConfigBuilder;
pub use token::{Token, TokenKind};
pub use writer::SchemaVersion;

#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Failure anywhere between token JSON and Pandoc JSON.
#[derive(Debug)]
pub enum RenderError {
    /// The input is not a markdown-it token array.
    Tokens(serde_json::Error),
    /// The token stream is structurally broken.
    Build(BuildError),
    /// Writing the output failed.
    Json(serde_json::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Tokens(e) => write!(f, "invalid token stream: {}", e),
            RenderError::Build(e) => write!(f, "cannot build document: {}", e),
            RenderError::Json(e) => write!(f, "cannot write JSON: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Tokens(e) | RenderError::Json(e) => Some(e),
            RenderError::Build(e) => Some(e),
        }
    }
}

impl From<BuildError> for RenderError {
    fn from(e: BuildError) -> Self {
        RenderError::Build(e)
    }
}

/// Builds the document tree for a token stream.
///
/// Each call runs an independent pass with its own cursor and footnote
/// registry.
pub fn convert(tokens: &[Token], config: &Config) -> Result<Document, BuildError> {
    builder::build(tokens, config)
}

/// Converts a token stream into a Pandoc JSON value using `config.schema`.
pub fn render_value(tokens: &[Token], config: &Config) -> Result<serde_json::Value, BuildError> {
    let document = convert(tokens, config)?;
    Ok(writer::to_value(&document, config.schema))
}

/// Converts a token stream into Pandoc JSON text.
///
/// # Examples
///
/// ```rust
/// use pandoc_tree::{Config, Token, TokenKind};
///
/// let tokens = vec![
///     Token::new(TokenKind::HeadingOpen, 0).with_tag("h1"),
///     Token::new(TokenKind::Inline, 1)
///         .with_children(vec![Token::new(TokenKind::Text, 0).with_content("abc")]),
///     Token::new(TokenKind::HeadingClose, 0).with_tag("h1"),
/// ];
/// let json = pandoc_tree::render(&tokens, &Config::default()).unwrap();
/// assert_eq!(
///     json,
///     r#"[{"unMeta":{}},[{"t":"Header","c":[1,["",[],[]],[{"t":"Str","c":"abc"}]]}]]"#
/// );
/// ```
pub fn render(tokens: &[Token], config: &Config) -> Result<String, RenderError> {
    let document = convert(tokens, config)?;
    writer::to_string(&document, config.schema, config.pretty).map_err(RenderError::Json)
}

/// Converts the JSON form of a markdown-it token stream into Pandoc JSON text.
pub fn render_json(tokens_json: &str, config: &Config) -> Result<String, RenderError> {
    let tokens = token::tokens_from_json(tokens_json).map_err(RenderError::Tokens)?;
    log::debug!("Parsed {} top-level tokens", tokens.len());
    render(&tokens, config)
}
