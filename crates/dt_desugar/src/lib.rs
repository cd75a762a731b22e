//! Range-addressed rewriter that desugars inline tag elements into plain
//! function-call expressions.
//!
//! The parser (see `dt_parser`) produces an AST whose nodes carry byte-offset
//! ranges into the source; a single-pass visitor walks it, reconstructs output
//! text with a cursor-based emitter, and reproduces input formatting
//! byte-for-byte outside the spans it rewrites:
//!
//! - `<div className="row"/>` → `DOM('div', {className: "row"})`
//! - `<Component {...props} foo="bar"/>` → `Component(Object.assign({}, props, {foo: "bar"}))`
//!
//! Entry points: [`transform_str`], [`transform_file`], and the
//! bundler-oriented [`FilterTransform`] adapter.

pub mod emitter;
pub mod filter;
pub mod literal;
pub mod visitor;

use std::path::Path;

use dt_ast::{Error, NormalizedOptions, Options};
use tracing::debug;

pub use filter::FilterTransform;
pub use visitor::TagVisitor;

/// Desugar tag elements in `source` and return the rewritten string.
///
/// Fails with `Error::Configuration` when the factory identifier is missing,
/// `Error::UnsupportedSyntax` on constructs the rewriter refuses, and
/// `Error::Parse` when the source itself does not parse. No partial output is
/// ever produced.
pub fn transform_str(source: &str, options: &Options) -> Result<String, Error> {
    let opts = options.normalize()?;
    transform_parsed(source, "input.js", &opts)
}

/// Read `path` as UTF-8 and desugar it. See [`transform_str`].
pub fn transform_file(path: impl AsRef<Path>, options: &Options) -> Result<String, Error> {
    let path = path.as_ref();
    let opts = options.normalize()?;
    let source = std::fs::read_to_string(path)?;
    transform_parsed(&source, &path.display().to_string(), &opts)
}

fn transform_parsed(
    source: &str,
    filename: &str,
    opts: &NormalizedOptions,
) -> Result<String, Error> {
    debug!(filename, bytes = source.len(), "rewriting tag elements");

    let parsed = dt_parser::parse_markup(source, filename)?;
    let base = parsed.source_file.start_pos.0;

    let visitor = TagVisitor::new(source, base, opts);
    let output = visitor.rewrite_module(&parsed.module)?;

    Ok(trim_trailing_spaces(&output))
}

/// Remove trailing spaces and tabs from every output line, keeping line
/// terminators intact. Literal rendering re-emits interior whitespace ahead
/// of synthesized newlines; this pass sweeps up what lands at line ends.
fn trim_trailing_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chunk in text.split_inclusive('\n') {
        match chunk.strip_suffix('\n') {
            Some(line) => {
                match line.strip_suffix('\r') {
                    Some(body) => {
                        out.push_str(body.trim_end_matches([' ', '\t']));
                        out.push('\r');
                    }
                    None => out.push_str(line.trim_end_matches([' ', '\t'])),
                }
                out.push('\n');
            }
            None => out.push_str(chunk.trim_end_matches([' ', '\t'])),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom() -> Options {
        Options {
            factory: Some("DOM".into()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_factory_is_a_configuration_error() {
        let result = transform_str("var el = <div/>;", &Options::default());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn tag_free_source_round_trips() {
        let source = "var total = add(1, 2);\nmodule.exports = total;\n";
        assert_eq!(transform_str(source, &dom()).unwrap(), source);
    }

    #[test]
    fn known_tag_becomes_quoted_factory_argument() {
        assert_eq!(
            transform_str("var el = <div/>;", &dom()).unwrap(),
            "var el = DOM('div');"
        );
    }

    #[test]
    fn unknown_tag_uses_default_pattern() {
        assert_eq!(
            transform_str("var el = <Foo/>;", &dom()).unwrap(),
            "var el = Foo();"
        );
    }

    #[test]
    fn unknown_tag_passed_to_factory() {
        let options = Options {
            pass_unknown_tags_to_factory: true,
            ..dom()
        };
        assert_eq!(
            transform_str("var el = <Foo/>;", &options).unwrap(),
            "var el = DOM(Foo);"
        );
    }

    #[test]
    fn unknown_tag_passed_to_factory_as_string() {
        let options = Options {
            pass_unknown_tags_to_factory: true,
            unknown_tags_as_string: true,
            ..dom()
        };
        assert_eq!(
            transform_str("var el = <Foo/>;", &options).unwrap(),
            "var el = DOM('Foo');"
        );
    }

    #[test]
    fn member_expression_tag_is_unknown() {
        assert_eq!(
            transform_str("var el = <app.views.Item/>;", &dom()).unwrap(),
            "var el = app.views.Item();"
        );
    }

    #[test]
    fn attributes_become_an_object_literal() {
        assert_eq!(
            transform_str("var el = <div a=\"x\" b=\"y\"/>;", &dom()).unwrap(),
            "var el = DOM('div', {a: \"x\", b: \"y\"});"
        );
    }

    #[test]
    fn boolean_attribute_shorthand() {
        assert_eq!(
            transform_str("var el = <input disabled/>;", &dom()).unwrap(),
            "var el = DOM('input', {disabled: true});"
        );
    }

    #[test]
    fn expression_attribute_value() {
        assert_eq!(
            transform_str("var el = <a href={url} download/>;", &dom()).unwrap(),
            "var el = DOM('a', {href: url, download: true});"
        );
    }

    #[test]
    fn invalid_identifier_keys_are_quoted() {
        assert_eq!(
            transform_str("var el = <div data-id=\"1\"/>;", &dom()).unwrap(),
            "var el = DOM('div', {'data-id': \"1\"});"
        );
    }

    #[test]
    fn rename_map_applies_before_key_quoting() {
        let options = Options {
            rename_attrs: Some(
                [("class".to_string(), "className".to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..dom()
        };
        assert_eq!(
            transform_str("var el = <div class=\"row\"/>;", &options).unwrap(),
            "var el = DOM('div', {className: \"row\"});"
        );
    }

    #[test]
    fn spread_attributes_wrap_in_one_merge_call() {
        assert_eq!(
            transform_str("var el = <C {...x} {...y} foo=\"z\"/>;", &dom()).unwrap(),
            "var el = C(Object.assign({}, x, y, {foo: \"z\"}));"
        );
    }

    #[test]
    fn plain_attributes_before_spread_form_leading_group() {
        assert_eq!(
            transform_str("var el = <C a=\"1\" {...rest}/>;", &dom()).unwrap(),
            "var el = C(Object.assign({a: \"1\"}, rest));"
        );
    }

    #[test]
    fn spread_with_known_tag_keeps_name_argument() {
        assert_eq!(
            transform_str("var el = <div {...props}/>;", &dom()).unwrap(),
            "var el = DOM('div', Object.assign({}, props));"
        );
    }

    #[test]
    fn spread_member_and_indexed_expressions() {
        assert_eq!(
            transform_str("var el = <C {...state.nested} foo=\"bar\"/>;", &dom()).unwrap(),
            "var el = C(Object.assign({}, state.nested, {foo: \"bar\"}));"
        );
        assert_eq!(
            transform_str("var el = <C {...state[0]}/>;", &dom()).unwrap(),
            "var el = C(Object.assign({}, state[0]));"
        );
    }

    #[test]
    fn unknown_tag_pattern_substitution() {
        let options = Options {
            unknown_tag_pattern: Some("{tag}.render".into()),
            array_children: Some(false),
            ..dom()
        };
        assert_eq!(
            transform_str("<Component foo=\"bar\" />", &options).unwrap(),
            "Component.render({foo: \"bar\"})"
        );
    }

    #[test]
    fn children_wrap_in_array_by_default() {
        assert_eq!(
            transform_str("var el = <div>hi</div>;", &dom()).unwrap(),
            "var el = DOM('div', null, [\"hi\"]);"
        );
    }

    #[test]
    fn children_as_arguments_when_array_disabled() {
        let options = Options {
            array_children: Some(false),
            ..dom()
        };
        assert_eq!(
            transform_str("var el = <div>hi {name}</div>;", &options).unwrap(),
            "var el = DOM('div', null, \"hi \", name);"
        );
    }

    #[test]
    fn nested_tags_rewrite_recursively() {
        assert_eq!(
            transform_str("var el = <div><span>a</span></div>;", &dom()).unwrap(),
            "var el = DOM('div', null, [DOM('span', null, [\"a\"])]);"
        );
    }

    #[test]
    fn tags_inside_child_expressions_rewrite_too() {
        let source = "var el = <ul>{items.map(function (i) { return <li>{i}</li>; })}</ul>;";
        assert_eq!(
            transform_str(source, &dom()).unwrap(),
            "var el = DOM('ul', null, [items.map(function (i) { return DOM('li', null, [i]); })]);"
        );
    }

    #[test]
    fn multiline_text_joins_lines_with_space_literal() {
        let source = "var el = <p>\n  Hello\n  World\n</p>;";
        assert_eq!(
            transform_str(source, &dom()).unwrap(),
            "var el = DOM('p', null, [\n  \"Hello\" + ' ' +\n  \"World\"\n]);"
        );
    }

    #[test]
    fn sibling_indentation_survives_outside_rewritten_spans() {
        let source = "var el = <nav>\n  <a/>\n  <b/>\n</nav>;";
        assert_eq!(
            transform_str(source, &dom()).unwrap(),
            "var el = DOM('nav', null, [\n  DOM('a'),\n  DOM('b')\n]);"
        );
    }

    #[test]
    fn namespaced_attribute_is_rejected() {
        let result = transform_str("var el = <div xml:lang=\"en\"/>;", &dom());
        assert!(matches!(result, Err(Error::UnsupportedSyntax { .. })));
    }

    #[test]
    fn namespaced_tag_name_is_rejected() {
        let result = transform_str("var el = <svg:rect/>;", &dom());
        assert!(matches!(result, Err(Error::UnsupportedSyntax { .. })));
    }

    #[test]
    fn fragment_syntax_is_rejected() {
        let result = transform_str("var el = <><div/></>;", &dom());
        assert!(matches!(result, Err(Error::UnsupportedSyntax { .. })));
    }

    #[test]
    fn unsupported_error_carries_position() {
        let result = transform_str("var el =\n  <div xml:lang=\"en\"/>;", &dom());
        match result {
            Err(Error::UnsupportedSyntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected unsupported syntax, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = transform_file("/nonexistent/view.jsx", &dom());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn trim_trailing_spaces_keeps_terminators() {
        assert_eq!(trim_trailing_spaces("a  \nb\t\r\nc"), "a\nb\r\nc");
        assert_eq!(trim_trailing_spaces("end  "), "end");
        assert_eq!(trim_trailing_spaces(""), "");
    }
}
