//! Module syntax lowering.
//!
//! The artifact is evaluated inline by the host, so static `import`/`export`
//! syntax has to become plain statements that fill an `exports` container:
//!
//! - exported functions keep their place; `exports.f = f;` is hoisted to the top
//! - exported constants and classes are followed by `exports.x = x;`
//! - exported `let`/`var` bindings are followed by a getter,
//!   `Object.defineProperty(exports, "x", { enumerable: true, get: () => x });`,
//!   so later reassignments stay visible through `exports`
//! - `export { a as b }` becomes `exports.b = a;` (or a getter when `a` is mutable)
//!
//! Imports, re-exports and default exports have no inline form and are rejected.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_span::{Span, SPAN};
use oxc_syntax::operator::AssignmentOperator;
use std::collections::HashSet;

use crate::error::EmitFailure;
use crate::source::SourceUnit;

/// Name of the exports container the evaluating host provides.
pub const EXPORTS_BINDING: &str = "exports";

pub struct ModuleLowerer<'a, 's> {
    pub ast: AstBuilder<'a>,
    source: &'s SourceUnit,
}

impl<'a, 's> ModuleLowerer<'a, 's> {
    pub fn new(allocator: &'a Allocator, source: &'s SourceUnit) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            source,
        }
    }

    pub fn lower_program(&self, program: &mut Program<'a>) -> Result<(), EmitFailure> {
        let mutable = mutable_top_level_names(&program.body);
        let body = std::mem::replace(&mut program.body, self.ast.vec());
        let mut hoisted = self.ast.vec();
        let mut lowered = self.ast.vec();

        for statement in body {
            match statement {
                Statement::ExportNamedDeclaration(export) => {
                    let export = export.unbox();
                    if export.source.is_some() {
                        return Err(self.unsupported("re-export", export.span));
                    }
                    match export.declaration {
                        Some(Declaration::FunctionDeclaration(function)) => {
                            if let Some(id) = &function.id {
                                hoisted.push(self.export_assignment(&id.name, &id.name));
                            }
                            lowered.push(Statement::FunctionDeclaration(function));
                        }
                        Some(declaration) => {
                            let mut names = Vec::new();
                            collect_declared_names(&declaration, &mut names);
                            lowered.push(Statement::from(declaration));
                            for name in &names {
                                lowered.push(self.export_binding(name, name, &mutable));
                            }
                        }
                        // `export { a as b }`; an empty list is only a module marker
                        None => {
                            for specifier in &export.specifiers {
                                let local = module_export_name(&specifier.local);
                                let exported = module_export_name(&specifier.exported);
                                lowered.push(self.export_binding(&exported, &local, &mutable));
                            }
                        }
                    }
                }
                Statement::ExportDefaultDeclaration(export) => {
                    return Err(self.unsupported("default export", export.span));
                }
                Statement::ExportAllDeclaration(export) => {
                    return Err(self.unsupported("re-export", export.span));
                }
                Statement::ImportDeclaration(import) => {
                    let construct = format!("import of '{}'", import.source.value);
                    return Err(self.unsupported(&construct, import.span));
                }
                Statement::TSExportAssignment(export) => {
                    return Err(self.unsupported("export assignment", export.span));
                }
                statement => lowered.push(statement),
            }
        }

        for statement in lowered {
            hoisted.push(statement);
        }
        program.body = hoisted;
        Ok(())
    }

    fn export_binding(&self, exported: &str, local: &str, mutable: &HashSet<String>) -> Statement<'a> {
        if mutable.contains(local) {
            self.export_getter(exported, local)
        } else {
            self.export_assignment(exported, local)
        }
    }

    /// `Object.defineProperty(exports, "<exported>", { enumerable: true, get: () => <local> });`
    fn export_getter(&self, exported: &str, local: &str) -> Statement<'a> {
        let exported = self.ast.allocator.alloc_str(exported);
        let local = self.ast.allocator.alloc_str(local);

        let define_property = self.ast.member_expression_static(
            SPAN,
            self.ast.expression_identifier(SPAN, "Object"),
            self.ast.identifier_name(SPAN, "defineProperty"),
            false,
        );

        let getter_body = self.ast.alloc_function_body(
            SPAN,
            self.ast.vec(),
            self.ast.vec1(
                self.ast
                    .statement_expression(SPAN, self.ast.expression_identifier(SPAN, local)),
            ),
        );
        let getter = self.ast.expression_arrow_function(
            SPAN,
            true,
            false,
            NONE,
            self.ast.alloc_formal_parameters(
                SPAN,
                FormalParameterKind::ArrowFormalParameters,
                self.ast.vec(),
                NONE,
            ),
            NONE,
            getter_body,
        );

        let descriptor = self.ast.expression_object(
            SPAN,
            self.ast.vec_from_array([
                self.ast.object_property_kind_object_property(
                    SPAN,
                    PropertyKind::Init,
                    self.ast.property_key_static_identifier(SPAN, "enumerable"),
                    self.ast.expression_boolean_literal(SPAN, true),
                    false,
                    false,
                    false,
                ),
                self.ast.object_property_kind_object_property(
                    SPAN,
                    PropertyKind::Init,
                    self.ast.property_key_static_identifier(SPAN, "get"),
                    getter,
                    false,
                    false,
                    false,
                ),
            ]),
        );

        let call = self.ast.expression_call(
            SPAN,
            Expression::from(define_property),
            NONE,
            self.ast.vec_from_array([
                Argument::from(self.ast.expression_identifier(SPAN, EXPORTS_BINDING)),
                Argument::from(self.ast.expression_string_literal(SPAN, exported, None)),
                Argument::from(descriptor),
            ]),
            false,
        );
        self.ast.statement_expression(SPAN, call)
    }

    /// `exports.<exported> = <local>;`
    fn export_assignment(&self, exported: &str, local: &str) -> Statement<'a> {
        let exported = self.ast.allocator.alloc_str(exported);
        let local = self.ast.allocator.alloc_str(local);

        let target = self.ast.member_expression_static(
            SPAN,
            self.ast.expression_identifier(SPAN, EXPORTS_BINDING),
            self.ast.identifier_name(SPAN, exported),
            false,
        );
        let assignment = self.ast.expression_assignment(
            SPAN,
            AssignmentOperator::Assign,
            AssignmentTarget::from(SimpleAssignmentTarget::from(target)),
            self.ast.expression_identifier(SPAN, local),
        );
        self.ast.statement_expression(SPAN, assignment)
    }

    fn unsupported(&self, construct: &str, span: Span) -> EmitFailure {
        EmitFailure::Unsupported {
            construct: construct.to_string(),
            line: self.source.position(span.start).line + 1,
        }
    }
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

/// Top-level `let`/`var` bindings, exported or not.
fn mutable_top_level_names(body: &[Statement]) -> HashSet<String> {
    let mut names = Vec::new();
    for statement in body {
        let declaration = match statement {
            Statement::VariableDeclaration(decl) => Some(&**decl),
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(decl)) => Some(&**decl),
                _ => None,
            },
            _ => None,
        };
        if let Some(decl) = declaration {
            if matches!(decl.kind, VariableDeclarationKind::Let | VariableDeclarationKind::Var) {
                for declarator in &decl.declarations {
                    collect_binding_pattern(&declarator.id, &mut names);
                }
            }
        }
    }
    names.into_iter().collect()
}

fn collect_declared_names(declaration: &Declaration, names: &mut Vec<String>) {
    match declaration {
        Declaration::VariableDeclaration(var_decl) => {
            for decl in &var_decl.declarations {
                collect_binding_pattern(&decl.id, names);
            }
        }
        Declaration::FunctionDeclaration(function) => {
            if let Some(id) = &function.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(id.name.to_string());
            }
        }
        // Type-only declarations are gone once TypeScript has been stripped.
        _ => {}
    }
}

fn collect_binding_pattern(pattern: &BindingPattern, names: &mut Vec<String>) {
    match pattern {
        BindingPattern::BindingIdentifier(id) => {
            names.push(id.name.to_string());
        }
        BindingPattern::ObjectPattern(obj) => {
            for prop in &obj.properties {
                collect_binding_pattern(&prop.value, names);
            }
            if let Some(rest) = &obj.rest {
                collect_binding_pattern(&rest.argument, names);
            }
        }
        BindingPattern::ArrayPattern(arr) => {
            for pattern in arr.elements.iter().flatten() {
                collect_binding_pattern(pattern, names);
            }
            if let Some(rest) = &arr.rest {
                collect_binding_pattern(&rest.argument, names);
            }
        }
        BindingPattern::AssignmentPattern(assign) => {
            collect_binding_pattern(&assign.left, names);
        }
    }
}
