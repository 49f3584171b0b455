//! Label Lowering for the Machina Compiler
//!
//! Turns every top-level labeled statement into an exported async function:
//!
//! ```text
//! greet: console.log("hi");      export async function exec_greet_1() {
//!                          ==>       console.log("hi");
//!                                }
//! ```
//!
//! Only labels whose parent is the program are lowered. Labels nested in
//! functions, blocks, loops or inside a lowered body keep their meaning as
//! jump targets.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_ast_visit::walk_mut::walk_labeled_statement;
use oxc_ast_visit::VisitMut;
use oxc_span::{GetSpan, SPAN};
use serde::{Deserialize, Serialize};

use crate::source::SourceUnit;

/// Name of the generated unit for `label` starting on 0-based `line`.
///
/// Hosts rebuild this name from their own scan of the source, so it must stay
/// a pure function of the label text and line.
pub fn unit_name(label: &str, line: u32) -> String {
    format!("exec_{}_{}", label, line)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedUnit {
    pub name: String,
    pub label: String,
    pub line: u32,
    pub column: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// LABEL LOWERER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct LabelLowerer<'a, 's> {
    pub ast: AstBuilder<'a>,
    source: &'s SourceUnit,
    /// Units generated so far, in source order.
    pub units: Vec<GeneratedUnit>,
}

impl<'a, 's> LabelLowerer<'a, 's> {
    pub fn new(allocator: &'a Allocator, source: &'s SourceUnit) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            source,
            units: Vec::new(),
        }
    }

    fn lower_labeled_statement(&mut self, labeled: LabeledStatement<'a>) -> Statement<'a> {
        let span = labeled.span;
        let position = self.source.position(labeled.label.span.start);
        let label = labeled.label.name.to_string();
        let name = unit_name(&label, position.line);

        let mut body = labeled.body;
        // Nested labels inside the lowered body stay untouched, but are still visited.
        self.visit_statement(&mut body);

        let statements = match body {
            Statement::BlockStatement(block) => block.unbox().body,
            statement => self.ast.vec1(statement),
        };

        log::debug!(
            "lowering label `{}` at {}:{} into `{}` ({} statement(s))",
            label,
            position.line,
            position.column,
            name,
            statements.len()
        );

        let name_atom = self.ast.allocator.alloc_str(&name);
        let id = self.ast.binding_identifier(labeled.label.span, name_atom);
        let params = self.ast.alloc_formal_parameters(
            SPAN,
            FormalParameterKind::FormalParameter,
            self.ast.vec(),
            NONE,
        );
        let function_body = self.ast.alloc_function_body(span, self.ast.vec(), statements);

        let declaration = self.ast.declaration_function(
            span,
            FunctionType::FunctionDeclaration,
            Some(id),
            false, // generator
            true,  // async
            false, // declare
            NONE,
            NONE,
            params,
            NONE,
            Some(function_body),
        );

        self.units.push(GeneratedUnit {
            name,
            label,
            line: position.line,
            column: position.column,
        });

        Statement::ExportNamedDeclaration(self.ast.alloc_export_named_declaration(
            span,
            Some(declaration),
            self.ast.vec(),
            None,
            ImportOrExportKind::Value,
            NONE,
        ))
    }
}

impl<'a, 's> VisitMut<'a> for LabelLowerer<'a, 's> {
    fn visit_program(&mut self, program: &mut Program<'a>) {
        let body = std::mem::replace(&mut program.body, self.ast.vec());
        for statement in body {
            match statement {
                Statement::LabeledStatement(labeled) => {
                    let lowered = self.lower_labeled_statement(labeled.unbox());
                    program.body.push(lowered);
                }
                mut statement => {
                    self.visit_statement(&mut statement);
                    program.body.push(statement);
                }
            }
        }
    }

    fn visit_labeled_statement(&mut self, stmt: &mut LabeledStatement<'a>) {
        // Only reached below the top level.
        let position = self.source.position(stmt.span().start);
        log::debug!(
            "keeping nested label `{}` at {}:{}",
            stmt.label.name,
            position.line,
            position.column
        );
        walk_labeled_statement(self, stmt);
    }
}
