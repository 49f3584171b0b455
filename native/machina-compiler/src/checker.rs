//! Diagnostics collection for a rewritten program.
//!
//! Three sources feed one list: parser errors, the semantic checker's syntax
//! errors, and [`AnnotationChecker`]. The latter reports names that resolve to
//! nothing, literals assigned against a primitive type annotation, labels
//! nothing jumps to, and module-only syntax the inline artifact cannot carry.

use lazy_static::lazy_static;
use oxc_ast::ast::*;
use oxc_ast_visit::walk::{
    walk_arrow_function_expression, walk_await_expression, walk_for_of_statement, walk_function,
    walk_labeled_statement, walk_return_statement, walk_variable_declarator,
};
use oxc_ast_visit::Visit;
use oxc_diagnostics::OxcDiagnostic;
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::GetSpan;
use oxc_syntax::operator::UnaryOperator;
use oxc_syntax::scope::ScopeFlags;
use std::collections::HashSet;

use crate::diagnostic::{
    Diagnostic, CODE_CANNOT_FIND_NAME, CODE_IMPORT_META, CODE_NOT_ASSIGNABLE,
    CODE_RESERVED_EXPORTS, CODE_TOP_LEVEL_AWAIT, CODE_TOP_LEVEL_FOR_AWAIT, CODE_UNUSED_LABEL,
};
use crate::module_lowerer::EXPORTS_BINDING;
use crate::options::CompileOptions;
use crate::source::SourceUnit;

lazy_static! {
    /// Names the evaluating host always provides.
    pub static ref SCRIPT_GLOBALS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        // Host container
        s.insert(EXPORTS_BINDING);

        // Standard JS globals
        s.insert("globalThis");
        s.insert("undefined");
        s.insert("NaN");
        s.insert("Infinity");
        s.insert("arguments");
        s.insert("Math");
        s.insert("JSON");
        s.insert("Reflect");
        s.insert("Proxy");
        s.insert("Intl");
        s.insert("Atomics");
        s.insert("Object");
        s.insert("Function");
        s.insert("Array");
        s.insert("String");
        s.insert("Number");
        s.insert("Boolean");
        s.insert("BigInt");
        s.insert("Symbol");
        s.insert("Date");
        s.insert("RegExp");
        s.insert("Promise");
        s.insert("Map");
        s.insert("Set");
        s.insert("WeakMap");
        s.insert("WeakSet");
        s.insert("WeakRef");
        s.insert("ArrayBuffer");
        s.insert("SharedArrayBuffer");
        s.insert("DataView");
        s.insert("Uint8Array");
        s.insert("Uint8ClampedArray");
        s.insert("Uint16Array");
        s.insert("Uint32Array");
        s.insert("Int8Array");
        s.insert("Int16Array");
        s.insert("Int32Array");
        s.insert("Float32Array");
        s.insert("Float64Array");
        s.insert("BigInt64Array");
        s.insert("BigUint64Array");
        s.insert("Error");
        s.insert("TypeError");
        s.insert("RangeError");
        s.insert("SyntaxError");
        s.insert("ReferenceError");
        s.insert("AggregateError");
        s.insert("parseInt");
        s.insert("parseFloat");
        s.insert("isNaN");
        s.insert("isFinite");
        s.insert("encodeURIComponent");
        s.insert("decodeURIComponent");
        s.insert("encodeURI");
        s.insert("decodeURI");

        // Runtime environment
        s.insert("console");
        s.insert("fetch");
        s.insert("setTimeout");
        s.insert("clearTimeout");
        s.insert("setInterval");
        s.insert("clearInterval");
        s.insert("queueMicrotask");
        s.insert("structuredClone");
        s.insert("URL");
        s.insert("URLSearchParams");
        s.insert("TextEncoder");
        s.insert("TextDecoder");
        s.insert("AbortController");
        s.insert("Headers");
        s.insert("Request");
        s.insert("Response");
        s.insert("atob");
        s.insert("btoa");
        s
    };
}

pub struct CheckResult {
    /// Ordered by source offset, ignored codes removed.
    pub diagnostics: Vec<Diagnostic>,
    pub scoping: Scoping,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

pub fn check_program(
    program: &Program<'_>,
    parse_errors: &[OxcDiagnostic],
    source: &SourceUnit,
    options: &CompileOptions,
) -> CheckResult {
    let mut diagnostics: Vec<Diagnostic> = parse_errors
        .iter()
        .map(|e| Diagnostic::from_oxc(e, source))
        .collect();

    let semantic = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(program);
    diagnostics.extend(semantic.errors.iter().map(|e| Diagnostic::from_oxc(e, source)));
    let scoping = semantic.semantic.into_scoping();

    // The artifact body shares a scope with the host's `exports` container.
    if let Some(symbol_id) = scoping.get_root_binding(EXPORTS_BINDING) {
        if scoping.symbol_flags(symbol_id).is_value() {
            diagnostics.push(Diagnostic::error(
                CODE_RESERVED_EXPORTS,
                format!(
                    "Compiler reserves name '{}' in top level scope of a module.",
                    EXPORTS_BINDING
                ),
                source,
                scoping.symbol_span(symbol_id).start,
            ));
        }
    }

    let mut checker = AnnotationChecker::new(source, &scoping, options);
    checker.visit_program(program);
    diagnostics.extend(checker.diagnostics);

    diagnostics.retain(|d| !options.is_ignored(d.code));
    diagnostics.sort_by_key(|d| d.position.offset);

    log::debug!(
        "checked {}: {} diagnostic(s), {} error(s)",
        source.name(),
        diagnostics.len(),
        diagnostics.iter().filter(|d| d.is_error()).count()
    );

    CheckResult {
        diagnostics,
        scoping,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Number,
    String,
    Boolean,
    BigInt,
}

impl Primitive {
    fn name(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::BigInt => "bigint",
        }
    }
}

fn declared_primitive(ty: &TSType) -> Option<Primitive> {
    match ty {
        TSType::TSNumberKeyword(_) => Some(Primitive::Number),
        TSType::TSStringKeyword(_) => Some(Primitive::String),
        TSType::TSBooleanKeyword(_) => Some(Primitive::Boolean),
        TSType::TSBigIntKeyword(_) => Some(Primitive::BigInt),
        TSType::TSParenthesizedType(inner) => declared_primitive(&inner.type_annotation),
        _ => None,
    }
}

/// Primitive kind of a literal expression and the literal type as it is
/// printed in messages (`"s"`, `42`, `true`, `-1n`). `None` for anything that
/// is not a literal.
fn literal_type(expr: &Expression) -> Option<(Primitive, String)> {
    match expr.without_parentheses() {
        Expression::NumericLiteral(lit) => Some((Primitive::Number, lit.value.to_string())),
        Expression::StringLiteral(lit) => Some((Primitive::String, format!("\"{}\"", lit.value))),
        // Templates widen to `string`.
        Expression::TemplateLiteral(_) => Some((Primitive::String, "string".to_string())),
        Expression::BooleanLiteral(lit) => Some((Primitive::Boolean, lit.value.to_string())),
        Expression::BigIntLiteral(lit) => Some((Primitive::BigInt, format!("{}n", lit.value))),
        Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::UnaryNegation => {
            match literal_type(&unary.argument) {
                Some((p @ (Primitive::Number | Primitive::BigInt), text)) => {
                    Some((p, format!("-{}", text)))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

struct LabelUse {
    name: String,
    offset: u32,
    used: bool,
}

pub struct AnnotationChecker<'s> {
    source: &'s SourceUnit,
    scoping: &'s Scoping,
    options: &'s CompileOptions,
    pub diagnostics: Vec<Diagnostic>,
    return_types: Vec<Option<Primitive>>,
    labels: Vec<LabelUse>,
    /// Functions (of any kind) enclosing the current node. Zero is the top level.
    function_depth: u32,
}

impl<'s> AnnotationChecker<'s> {
    pub fn new(source: &'s SourceUnit, scoping: &'s Scoping, options: &'s CompileOptions) -> Self {
        Self {
            source,
            scoping,
            options,
            diagnostics: Vec::new(),
            return_types: Vec::new(),
            labels: Vec::new(),
            function_depth: 0,
        }
    }

    fn error(&mut self, code: u32, message: impl Into<String>, offset: u32) {
        self.diagnostics
            .push(Diagnostic::error(code, message, self.source, offset));
    }

    fn check_assignable(&mut self, declared: Primitive, expr: &Expression, offset: u32) {
        if let Some((found, text)) = literal_type(expr) {
            if found != declared {
                self.error(
                    CODE_NOT_ASSIGNABLE,
                    format!(
                        "Type '{}' is not assignable to type '{}'.",
                        text,
                        declared.name()
                    ),
                    offset,
                );
            }
        }
    }

    fn is_known_global(&self, name: &str) -> bool {
        SCRIPT_GLOBALS.contains(name) || self.options.is_host_global(name)
    }

    fn mark_label_used(&mut self, label: &Option<LabelIdentifier>) {
        if let Some(label) = label {
            if let Some(entry) = self
                .labels
                .iter_mut()
                .rev()
                .find(|l| l.name == label.name.as_str())
            {
                entry.used = true;
            }
        }
    }
}

impl<'a, 's> Visit<'a> for AnnotationChecker<'s> {
    fn visit_variable_declarator(&mut self, decl: &VariableDeclarator<'a>) {
        let declared = decl
            .type_annotation
            .as_ref()
            .and_then(|annotation| declared_primitive(&annotation.type_annotation));
        if let (Some(declared), Some(init)) = (declared, &decl.init) {
            self.check_assignable(declared, init, decl.id.span().start);
        }
        walk_variable_declarator(self, decl);
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        // async and generator functions declare the awaited or yielded type, not the return value
        let declared = if func.r#async || func.generator {
            None
        } else {
            func.return_type
                .as_ref()
                .and_then(|annotation| declared_primitive(&annotation.type_annotation))
        };
        self.return_types.push(declared);
        self.function_depth += 1;
        walk_function(self, func, flags);
        self.function_depth -= 1;
        self.return_types.pop();
    }

    fn visit_arrow_function_expression(&mut self, func: &ArrowFunctionExpression<'a>) {
        let declared = if func.r#async {
            None
        } else {
            func.return_type
                .as_ref()
                .and_then(|annotation| declared_primitive(&annotation.type_annotation))
        };
        self.return_types.push(declared);
        self.function_depth += 1;
        walk_arrow_function_expression(self, func);
        self.function_depth -= 1;
        self.return_types.pop();
    }

    fn visit_return_statement(&mut self, stmt: &ReturnStatement<'a>) {
        let declared = self.return_types.last().copied().flatten();
        if let (Some(declared), Some(argument)) = (declared, &stmt.argument) {
            self.check_assignable(declared, argument, stmt.span.start);
        }
        walk_return_statement(self, stmt);
    }

    fn visit_labeled_statement(&mut self, stmt: &LabeledStatement<'a>) {
        self.labels.push(LabelUse {
            name: stmt.label.name.to_string(),
            offset: stmt.label.span.start,
            used: false,
        });
        walk_labeled_statement(self, stmt);
        if let Some(label) = self.labels.pop() {
            if !label.used {
                self.diagnostics.push(Diagnostic::warning(
                    CODE_UNUSED_LABEL,
                    "Unused label.",
                    self.source,
                    label.offset,
                ));
            }
        }
    }

    fn visit_break_statement(&mut self, stmt: &BreakStatement<'a>) {
        self.mark_label_used(&stmt.label);
    }

    fn visit_continue_statement(&mut self, stmt: &ContinueStatement<'a>) {
        self.mark_label_used(&stmt.label);
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        let Some(reference_id) = ident.reference_id.get() else {
            return;
        };
        let reference = self.scoping.get_reference(reference_id);
        // Type positions are erased before emission.
        if reference.symbol_id().is_some() || !reference.is_value() {
            return;
        }
        if !self.is_known_global(&ident.name) {
            self.error(
                CODE_CANNOT_FIND_NAME,
                format!("Cannot find name '{}'.", ident.name),
                ident.span.start,
            );
        }
    }

    fn visit_await_expression(&mut self, expr: &AwaitExpression<'a>) {
        if self.function_depth == 0 {
            self.error(
                CODE_TOP_LEVEL_AWAIT,
                "Top-level 'await' expressions are only allowed inside a labeled block.",
                expr.span.start,
            );
        }
        walk_await_expression(self, expr);
    }

    fn visit_for_of_statement(&mut self, stmt: &ForOfStatement<'a>) {
        if stmt.r#await && self.function_depth == 0 {
            self.error(
                CODE_TOP_LEVEL_FOR_AWAIT,
                "Top-level 'for await' loops are only allowed inside a labeled block.",
                stmt.span.start,
            );
        }
        walk_for_of_statement(self, stmt);
    }

    fn visit_meta_property(&mut self, meta: &MetaProperty<'a>) {
        if meta.meta.name == "import" && meta.property.name == "meta" {
            self.error(
                CODE_IMPORT_META,
                "The 'import.meta' meta-property is not allowed in an inline script.",
                meta.span.start,
            );
        }
    }
}
