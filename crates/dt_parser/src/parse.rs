use dt_ast::Error;
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax};
use tracing::debug;

/// Result of parsing one source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub source_map: Lrc<SourceMap>,
    /// The file registered with the source map. Spans in `module` are offsets
    /// relative to `source_file.start_pos`.
    pub source_file: Lrc<SourceFile>,
}

/// Parse a source string with inline tag elements enabled.
pub fn parse_markup(source: &str, filename: &str) -> Result<ParseResult, Error> {
    parse_with_syntax(source, filename, true)
}

/// Parse a source string as plain ECMAScript, with tag syntax disabled.
///
/// Used to verify that rewritten output is valid tag-free code.
pub fn parse_plain(source: &str, filename: &str) -> Result<ParseResult, Error> {
    parse_with_syntax(source, filename, false)
}

fn parse_with_syntax(source: &str, filename: &str, markup: bool) -> Result<ParseResult, Error> {
    debug!(filename, bytes = source.len(), markup, "parsing source");

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let syntax = Syntax::Es(EsSyntax {
        jsx: markup,
        ..Default::default()
    });

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax,
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .map_err(|e| Error::Parse(format!("{filename}: {}", e.kind().msg())))?;

    Ok(ParseResult {
        module,
        source_map,
        source_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_elements() {
        let result = parse_markup("var el = <div className=\"row\">Hi</div>;", "test.jsx");
        assert!(result.is_ok());
    }

    #[test]
    fn plain_syntax_rejects_tag_elements() {
        let result = parse_plain("var el = <div/>;", "test.js");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let result = parse_markup("var = ;", "broken.js");
        match result {
            Err(Error::Parse(message)) => assert!(message.starts_with("broken.js:")),
            other => panic!("expected parse error, got {:?}", other.is_ok()),
        }
    }
}
