//! The tag-element visitor.
//!
//! Registered with the generic SWC walker by implementing `Visit`; the match
//! predicate is the `visit_jsx_element` override itself. On a match the
//! visitor takes over the emitter cursor, writes the call-expression prefix,
//! copies/transforms attributes, recurses into children (re-entering the
//! walker for nested expressions so tags at any depth are rewritten), writes
//! the suffix, and leaves the cursor at the element's end offset. Default
//! traversal of a handled subtree is suppressed by not delegating to
//! `visit_children_with`.

use dt_ast::{Error, NormalizedOptions};
use swc_common::Spanned;
use swc_ecma_ast::{
    JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild,
    JSXElementName, JSXExpr, JSXExprContainer, JSXFragment, Module, SpreadElement,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::emitter::{CopyFilter, Emitter};
use crate::literal::render_text;

/// Single-pass rewriter over one parsed module.
pub struct TagVisitor<'a> {
    em: Emitter<'a>,
    opts: &'a NormalizedOptions,
    error: Option<Error>,
}

impl<'a> TagVisitor<'a> {
    /// `base` is the `BytePos` of the source's first byte in the parser's
    /// source map; spans are resolved relative to it.
    pub fn new(source: &'a str, base: u32, opts: &'a NormalizedOptions) -> Self {
        Self {
            em: Emitter::new(source, base),
            opts,
            error: None,
        }
    }

    /// Walk the module and return the rewritten source.
    pub fn rewrite_module(mut self, module: &Module) -> Result<String, Error> {
        module.visit_with(&mut self);
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.em.finish()),
        }
    }

    fn unsupported(&self, message: impl Into<String>, offset: usize) -> Error {
        Error::unsupported(message, self.em.source(), offset)
    }

    fn rewrite_element(&mut self, el: &JSXElement) -> Result<(), Error> {
        let opening = &el.opening;
        let attrs = &opening.attrs;
        let open_lo = self.em.offset(opening.span.lo);
        let open_hi = self.em.offset(opening.span.hi);

        self.em
            .catch_up_filtered(open_lo, CopyFilter::TrimLeadingSpaces);

        let name_span = opening.name.span();
        let name_lo = self.em.offset(name_span.lo);
        let name_hi = self.em.offset(name_span.hi);

        // Known tags are lowercase-leading bare identifiers; everything else
        // is a component reference.
        let known = match &opening.name {
            JSXElementName::Ident(ident) => {
                ident.sym.chars().next().is_some_and(|c| c.is_lowercase())
            }
            JSXElementName::JSXMemberExpr(_) => false,
            JSXElementName::JSXNamespacedName(name) => {
                return Err(self.unsupported(
                    format!(
                        "namespaced tag name `{}:{}` is not supported; the output language has no namespace concept",
                        name.ns.sym, name.name.sym
                    ),
                    open_lo,
                ));
            }
        };

        let factory = self.opts.factory.clone();
        let mut second_arg = false;

        if known {
            self.em.append(&format!("{factory}('"));
        } else if self.opts.pass_unknown_tags_to_factory {
            if self.opts.unknown_tags_as_string {
                self.em.append(&format!("{factory}('"));
            } else {
                self.em.append(&format!("{factory}("));
            }
        }

        self.em.skip_to(name_lo);

        if known {
            // factory('div', ...)
            self.em.catch_up(name_hi);
            self.em.append("'");
            second_arg = true;
        } else if self.opts.pass_unknown_tags_to_factory {
            // factory(Component, ...)
            self.em.catch_up(name_hi);
            if self.opts.unknown_tags_as_string {
                self.em.append("'");
            }
            second_arg = true;
        } else {
            // Component(...), via the configured pattern
            let tag_text = self.em.slice(name_lo, name_hi);
            let target = self.opts.unknown_tag_pattern.replace("{tag}", tag_text);
            self.em.append(&target);
            self.em.skip_to(name_hi);
            self.em.append("(");
        }

        let has_spread = attrs
            .iter()
            .any(|attr| matches!(attr, JSXAttrOrSpread::SpreadElement(_)));

        if has_spread {
            if known || self.opts.pass_unknown_tags_to_factory {
                self.em.append(&format!(", {}({{", self.opts.spread_fn));
            } else {
                self.em.append(&format!("{}({{", self.opts.spread_fn));
            }
        } else if !attrs.is_empty() {
            if second_arg {
                self.em.append(", ");
            }
            self.em.append("{");
        }

        let mut previous_was_spread = false;

        for (index, attr) in attrs.iter().enumerate() {
            let is_last = index == attrs.len() - 1;
            match attr {
                JSXAttrOrSpread::SpreadElement(spread) => {
                    self.rewrite_spread_attribute(spread, is_last, previous_was_spread)?;
                    if self.error.is_some() {
                        return Ok(());
                    }
                    previous_was_spread = true;
                }
                JSXAttrOrSpread::JSXAttr(attr) => {
                    // A following spread closes this object group, so the
                    // attribute is effectively last within it.
                    let is_last = is_last
                        || matches!(attrs[index + 1], JSXAttrOrSpread::SpreadElement(_));
                    self.rewrite_plain_attribute(attr, is_last, previous_was_spread)?;
                    if self.error.is_some() {
                        return Ok(());
                    }
                    previous_was_spread = false;
                }
            }
        }

        if !opening.self_closing {
            // Everything up to (but not including) `>`.
            self.em
                .catch_up_filtered(open_hi - 1, CopyFilter::TrimLeadingSpaces);
            self.em.skip_to(open_hi);
        }

        if !attrs.is_empty() && !previous_was_spread {
            self.em.append("}");
        }
        if has_spread {
            self.em.append(")");
        }

        // Drop text children that are pure whitespace spanning a line break.
        let children: Vec<&JSXElementChild> = el
            .children
            .iter()
            .filter(|child| match child {
                JSXElementChild::JSXText(text) => !is_line_break_whitespace(&text.value),
                _ => true,
            })
            .collect();

        if !children.is_empty() {
            if attrs.is_empty() {
                if second_arg {
                    self.em.append(", ");
                }
                self.em.append("null");
            }

            // An empty `{}` placeholder is present in source but renders
            // nothing, so it does not count toward separator placement.
            let mut last_renderable = None;
            for (index, child) in children.iter().enumerate() {
                let empty = matches!(
                    child,
                    JSXElementChild::JSXExprContainer(container)
                        if matches!(container.expr, JSXExpr::JSXEmptyExpr(_))
                );
                if !empty {
                    last_renderable = Some(index);
                }
            }

            if last_renderable.is_some() {
                self.em.append(", ");
            }
            if self.opts.array_children {
                self.em.append("[");
            }

            for (index, child) in children.iter().enumerate() {
                let child_span = child.span();
                let child_lo = self.em.offset(child_span.lo);
                let child_hi = self.em.offset(child_span.hi);
                self.em
                    .catch_up_filtered(child_lo, CopyFilter::TrimLeadingSpaces);

                let is_last = last_renderable.is_some_and(|last| index >= last);

                match child {
                    JSXElementChild::JSXText(text) => {
                        render_text(&mut self.em, &text.value, child_hi, is_last);
                    }
                    JSXElementChild::JSXExprContainer(container) => {
                        self.rewrite_expr_container(container, is_last);
                        if self.error.is_some() {
                            return Ok(());
                        }
                    }
                    JSXElementChild::JSXElement(child_el) => {
                        self.visit_jsx_element(child_el);
                        if self.error.is_some() {
                            return Ok(());
                        }
                        if !is_last {
                            self.em.append(",");
                        }
                    }
                    JSXElementChild::JSXFragment(_) => {
                        return Err(self.unsupported(
                            "fragment children are not supported; give the fragment a named tag",
                            child_lo,
                        ));
                    }
                    JSXElementChild::JSXSpreadChild(_) => {
                        return Err(
                            self.unsupported("spread children are not supported", child_lo)
                        );
                    }
                }

                self.em
                    .catch_up_filtered(child_hi, CopyFilter::TrimLeadingSpaces);
            }
        }

        if opening.self_closing {
            // Everything up to `/>`.
            self.em
                .catch_up_filtered(open_hi - 2, CopyFilter::TrimLeadingSpaces);
            self.em.skip_to(open_hi);
        } else if let Some(closing) = &el.closing {
            // Everything up to `</tag>`.
            let closing_lo = self.em.offset(closing.span.lo);
            let closing_hi = self.em.offset(closing.span.hi);
            self.em
                .catch_up_filtered(closing_lo, CopyFilter::TrimLeadingSpaces);
            self.em.skip_to(closing_hi);
        }

        if self.opts.array_children && !children.is_empty() {
            self.em.append("]");
        }
        self.em.append(")");

        Ok(())
    }

    /// Splice one spread attribute as an argument to the merge helper. The
    /// surrounding `{ ... }` syntax is elided; only parenthesization around
    /// the inner expression survives.
    fn rewrite_spread_attribute(
        &mut self,
        spread: &SpreadElement,
        is_last: bool,
        previous_was_spread: bool,
    ) -> Result<(), Error> {
        if !previous_was_spread {
            // Close the previous (or initial, empty) object group.
            self.em.append("}, ");
        }

        let dot3_lo = self.em.offset(spread.dot3_token.lo);
        let expr_span = spread.expr.span();
        let expr_lo = self.em.offset(expr_span.lo);
        let expr_hi = self.em.offset(expr_span.hi);

        let brace_open = self.em.source()[..dot3_lo]
            .rfind('{')
            .ok_or_else(|| self.unsupported("malformed spread attribute", dot3_lo))?;
        let brace_close = self.em.source()[expr_hi..]
            .find('}')
            .map(|rel| expr_hi + rel)
            .ok_or_else(|| self.unsupported("malformed spread attribute", expr_hi))?;

        self.em
            .catch_up_filtered(brace_open, CopyFilter::ParensOnly);
        self.em.skip_to(brace_open + 1);
        self.em.catch_up_filtered(expr_lo, CopyFilter::ParensOnly);

        // Nested tags inside the spread expression are rewritten too.
        spread.expr.visit_with(self);
        if self.error.is_some() {
            return Ok(());
        }

        self.em.catch_up(expr_hi);
        self.em
            .catch_up_filtered(brace_close, CopyFilter::ParensOnly);
        if !is_last {
            self.em.append(", ");
        }
        self.em.skip_to(brace_close + 1);

        Ok(())
    }

    fn rewrite_plain_attribute(
        &mut self,
        attr: &JSXAttr,
        is_last: bool,
        previous_was_spread: bool,
    ) -> Result<(), Error> {
        let attr_lo = self.em.offset(attr.span.lo);
        let attr_hi = self.em.offset(attr.span.hi);

        let name = match &attr.name {
            JSXAttrName::Ident(ident) => &*ident.sym,
            JSXAttrName::JSXNamespacedName(name) => {
                return Err(self.unsupported(
                    format!(
                        "namespaced attribute `{}:{}` is not supported; the output language has no namespace concept",
                        name.ns.sym, name.name.sym
                    ),
                    attr_lo,
                ));
            }
        };

        self.em
            .catch_up_filtered(attr_lo, CopyFilter::TrimLeadingSpaces);

        if previous_was_spread {
            self.em.append("{");
        }

        let key = self
            .opts
            .rename_attrs
            .get(name)
            .map(String::as_str)
            .unwrap_or(name);
        self.em.append(&quote_object_key(key));
        self.em.append(": ");

        let name_hi = self.em.offset(attr.name.span().hi);

        match &attr.value {
            Some(value) => {
                self.em.skip_to(name_hi);
                let value_lo = self.em.offset(value.span().lo);
                // Skip `=` but keep any line breaks around it.
                self.em
                    .catch_up_filtered(value_lo, CopyFilter::NewlinesOnly);
                match value {
                    JSXAttrValue::Str(text) => {
                        let value_hi = self.em.offset(text.span.hi);
                        render_text(&mut self.em, &text.value.to_string_lossy(), value_hi, is_last);
                    }
                    JSXAttrValue::JSXExprContainer(container) => {
                        self.rewrite_expr_container(container, is_last);
                        if self.error.is_some() {
                            return Ok(());
                        }
                    }
                    JSXAttrValue::JSXElement(child_el) => {
                        self.visit_jsx_element(child_el);
                        if self.error.is_some() {
                            return Ok(());
                        }
                        if !is_last {
                            self.em.append(", ");
                        }
                    }
                    JSXAttrValue::JSXFragment(_) => {
                        return Err(self.unsupported(
                            "fragment attribute values are not supported",
                            value_lo,
                        ));
                    }
                }
            }
            None => {
                // Boolean shorthand: `disabled` becomes `disabled: true`.
                self.em.append("true");
                self.em.skip_to(name_hi);
                if !is_last {
                    self.em.append(", ");
                }
            }
        }

        self.em
            .catch_up_filtered(attr_hi, CopyFilter::TrimLeadingSpaces);

        Ok(())
    }

    /// Unwrap an embedded `{expr}` container, delegating the inner expression
    /// back to the walker so nested tags and host expressions are rewritten.
    fn rewrite_expr_container(&mut self, container: &JSXExprContainer, is_last: bool) {
        let lo = self.em.offset(container.span.lo);
        let hi = self.em.offset(container.span.hi);

        // Skip `{`.
        self.em.skip_to(lo + 1);

        if let JSXExpr::Expr(expr) = &container.expr {
            expr.visit_with(self);
            if self.error.is_some() {
                return;
            }
            if !is_last {
                // The separator goes after the expression, before any
                // interior trailing trivia.
                let expr_hi = self.em.offset(expr.span().hi);
                self.em
                    .catch_up_filtered(expr_hi, CopyFilter::TrimLeadingSpaces);
                self.em.append(", ");
            }
        }

        // Copy up to, but not including, `}`.
        self.em
            .catch_up_filtered(hi - 1, CopyFilter::TrimLeadingSpaces);
        self.em.skip_to(hi);
    }
}

impl Visit for TagVisitor<'_> {
    fn visit_jsx_element(&mut self, el: &JSXElement) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.rewrite_element(el) {
            self.error = Some(error);
        }
    }

    fn visit_jsx_fragment(&mut self, fragment: &JSXFragment) {
        if self.error.is_none() {
            let offset = self.em.offset(fragment.span.lo);
            self.error = Some(self.unsupported(
                "fragment syntax is not supported; give the fragment a named tag",
                offset,
            ));
        }
    }
}

/// Emit an attribute key bare when it is a valid identifier, single-quoted
/// otherwise.
fn quote_object_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{name}'")
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// True for text runs of spaces/tabs containing at least one line break and
/// nothing else — the formatting-only gaps between sibling tags.
fn is_line_break_whitespace(value: &str) -> bool {
    let rest = value.trim_start_matches([' ', '\t']);
    match rest.chars().next() {
        Some('\n') | Some('\r') => {}
        _ => return false,
    }
    rest.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_keys_stay_bare() {
        assert_eq!(quote_object_key("className"), "className");
        assert_eq!(quote_object_key("_x$1"), "_x$1");
    }

    #[test]
    fn invalid_keys_are_single_quoted() {
        assert_eq!(quote_object_key("data-id"), "'data-id'");
        assert_eq!(quote_object_key("1abc"), "'1abc'");
        assert_eq!(quote_object_key(""), "''");
    }

    #[test]
    fn line_break_whitespace_detection() {
        assert!(is_line_break_whitespace("\n"));
        assert!(is_line_break_whitespace("  \n\t "));
        assert!(is_line_break_whitespace(" \t\r\n  "));
        assert!(!is_line_break_whitespace("  "));
        assert!(!is_line_break_whitespace("\n text \n"));
        assert!(!is_line_break_whitespace(""));
    }
}
