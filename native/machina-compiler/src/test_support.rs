//! Re-parses emitted artifacts so tests can assert on their structure instead
//! of exact printer output.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::SourceType;
use oxc_syntax::scope::ScopeFlags;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionShape {
    pub is_async: bool,
    pub params: usize,
    /// Identifier callees of calls made directly in this function.
    pub calls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ArtifactShape {
    pub parse_errors: usize,
    /// Names assigned as `exports.<name> = ...` or defined with
    /// `Object.defineProperty(exports, "<name>", ...)`, in order.
    pub exported: Vec<String>,
    pub functions: HashMap<String, FunctionShape>,
    pub labels: Vec<String>,
}

impl ArtifactShape {
    pub fn function(&self, name: &str) -> &FunctionShape {
        self.functions
            .get(name)
            .unwrap_or_else(|| panic!("no function named {} in artifact", name))
    }
}

pub fn inspect_artifact(code: &str) -> ArtifactShape {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, SourceType::cjs()).parse();

    let mut collector = ShapeCollector {
        shape: ArtifactShape {
            parse_errors: ret.errors.len(),
            ..ArtifactShape::default()
        },
        current: Vec::new(),
    };
    collector.visit_program(&ret.program);
    collector.shape
}

struct ShapeCollector {
    shape: ArtifactShape,
    current: Vec<Option<String>>,
}

impl<'a> Visit<'a> for ShapeCollector {
    fn visit_assignment_expression(&mut self, expr: &AssignmentExpression<'a>) {
        if let AssignmentTarget::StaticMemberExpression(member) = &expr.left {
            if let Expression::Identifier(object) = &member.object {
                if object.name == "exports" {
                    self.shape.exported.push(member.property.name.to_string());
                }
            }
        }
        walk::walk_assignment_expression(self, expr);
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        let name = func.id.as_ref().map(|id| id.name.to_string());
        if let Some(name) = &name {
            self.shape.functions.insert(
                name.clone(),
                FunctionShape {
                    is_async: func.r#async,
                    params: func.params.items.len(),
                    calls: Vec::new(),
                },
            );
        }
        self.current.push(name);
        walk::walk_function(self, func, flags);
        self.current.pop();
    }

    fn visit_call_expression(&mut self, expr: &CallExpression<'a>) {
        if let Some(name) = defined_export(expr) {
            self.shape.exported.push(name);
        }
        if let (Some(Some(name)), Expression::Identifier(callee)) =
            (self.current.last(), &expr.callee)
        {
            if let Some(function) = self.shape.functions.get_mut(name) {
                function.calls.push(callee.name.to_string());
            }
        }
        walk::walk_call_expression(self, expr);
    }

    fn visit_labeled_statement(&mut self, stmt: &LabeledStatement<'a>) {
        self.shape.labels.push(stmt.label.name.to_string());
        walk::walk_labeled_statement(self, stmt);
    }
}

fn defined_export(expr: &CallExpression) -> Option<String> {
    let Expression::StaticMemberExpression(callee) = &expr.callee else {
        return None;
    };
    match (&callee.object, callee.property.name.as_str()) {
        (Expression::Identifier(object), "defineProperty") if object.name == "Object" => {}
        _ => return None,
    }
    match (expr.arguments.first(), expr.arguments.get(1)) {
        (Some(Argument::Identifier(target)), Some(Argument::StringLiteral(name)))
            if target.name == "exports" && name.value != "__esModule" =>
        {
            Some(name.value.to_string())
        }
        _ => None,
    }
}
