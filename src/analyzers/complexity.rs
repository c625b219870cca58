//! Cyclomatic complexity and documentation metadata extraction.
//!
//! Walks a parsed module once, producing a record per function-like node
//! (sync and async defs, methods and nested functions included) and per
//! class, plus the module docstring flag. Complexity starts at 1 and grows
//! by one per decision construct in the function's entire subtree; boolean
//! operator chains add `operand_count - 1` for short-circuit branching.

use super::LineIndex;
use crate::core::{ClassRecord, DocumentationStats, FunctionRecord};
use rustpython_parser::ast;

/// Everything the single walk extracts from one module
#[derive(Debug, Default)]
pub struct ModuleMetrics {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub has_module_docstring: bool,
}

impl ModuleMetrics {
    /// Fold the per-node docstring flags into the six coverage counters
    pub fn documentation_stats(&self) -> DocumentationStats {
        let documented_functions = self.functions.iter().filter(|f| f.has_docstring).count();
        let documented_classes = self.classes.iter().filter(|c| c.has_docstring).count();
        DocumentationStats {
            functions_with_docstrings: documented_functions,
            functions_without_docstrings: self.functions.len() - documented_functions,
            classes_with_docstrings: documented_classes,
            classes_without_docstrings: self.classes.len() - documented_classes,
            modules_with_docstrings: usize::from(self.has_module_docstring),
            modules_without_docstrings: usize::from(!self.has_module_docstring),
        }
    }
}

/// Walk one module and collect function/class records
pub fn analyze_module(module: &ast::Mod, index: &LineIndex) -> ModuleMetrics {
    let body = super::module_body(module);
    let mut metrics = ModuleMetrics {
        has_module_docstring: has_docstring(body),
        ..Default::default()
    };
    collect_stmts(body, index, &mut metrics);
    metrics
}

/// True when the first statement of a body is a bare string-literal
/// expression, regardless of quoting style in the source.
pub fn has_docstring(body: &[ast::Stmt]) -> bool {
    matches!(
        body.first(),
        Some(ast::Stmt::Expr(expr)) if matches!(
            expr.value.as_ref(),
            ast::Expr::Constant(c) if matches!(c.value, ast::Constant::Str(_))
        )
    )
}

fn collect_stmts(stmts: &[ast::Stmt], index: &LineIndex, metrics: &mut ModuleMetrics) {
    for stmt in stmts {
        match stmt {
            ast::Stmt::FunctionDef(def) => {
                metrics.functions.push(function_record(
                    &def.name,
                    def.range.start().to_usize(),
                    def.range.end().to_usize(),
                    &def.args,
                    &def.body,
                    index,
                ));
                collect_stmts(&def.body, index, metrics);
            }
            ast::Stmt::AsyncFunctionDef(def) => {
                metrics.functions.push(function_record(
                    &def.name,
                    def.range.start().to_usize(),
                    def.range.end().to_usize(),
                    &def.args,
                    &def.body,
                    index,
                ));
                collect_stmts(&def.body, index, metrics);
            }
            ast::Stmt::ClassDef(def) => {
                let method_count = def
                    .body
                    .iter()
                    .filter(|s| {
                        matches!(
                            s,
                            ast::Stmt::FunctionDef(_) | ast::Stmt::AsyncFunctionDef(_)
                        )
                    })
                    .count();
                metrics.classes.push(ClassRecord {
                    name: def.name.to_string(),
                    line: index.line_of(def.range.start().to_usize()),
                    has_docstring: has_docstring(&def.body),
                    method_count,
                });
                collect_stmts(&def.body, index, metrics);
            }
            ast::Stmt::If(s) => {
                collect_stmts(&s.body, index, metrics);
                collect_stmts(&s.orelse, index, metrics);
            }
            ast::Stmt::While(s) => {
                collect_stmts(&s.body, index, metrics);
                collect_stmts(&s.orelse, index, metrics);
            }
            ast::Stmt::For(s) => {
                collect_stmts(&s.body, index, metrics);
                collect_stmts(&s.orelse, index, metrics);
            }
            ast::Stmt::AsyncFor(s) => {
                collect_stmts(&s.body, index, metrics);
                collect_stmts(&s.orelse, index, metrics);
            }
            ast::Stmt::With(s) => collect_stmts(&s.body, index, metrics),
            ast::Stmt::AsyncWith(s) => collect_stmts(&s.body, index, metrics),
            ast::Stmt::Try(s) => {
                collect_stmts(&s.body, index, metrics);
                for handler in &s.handlers {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    collect_stmts(&h.body, index, metrics);
                }
                collect_stmts(&s.orelse, index, metrics);
                collect_stmts(&s.finalbody, index, metrics);
            }
            _ => {}
        }
    }
}

fn function_record(
    name: &str,
    start: usize,
    end: usize,
    args: &ast::Arguments,
    body: &[ast::Stmt],
    index: &LineIndex,
) -> FunctionRecord {
    FunctionRecord {
        name: name.to_string(),
        line: index.line_of(start),
        end_line: index.line_of(end.saturating_sub(1).max(start)),
        has_docstring: has_docstring(body),
        parameter_count: args.args.len(),
        complexity: complexity_of(body),
    }
}

/// Cyclomatic complexity of a function body: base 1 plus the decision
/// points of the whole subtree.
pub fn complexity_of(body: &[ast::Stmt]) -> u32 {
    1 + count_body(body)
}

fn count_body(stmts: &[ast::Stmt]) -> u32 {
    stmts.iter().map(count_stmt).sum()
}

fn count_stmt(stmt: &ast::Stmt) -> u32 {
    match stmt {
        ast::Stmt::If(s) => 1 + count_expr(&s.test) + count_body(&s.body) + count_body(&s.orelse),
        ast::Stmt::While(s) => {
            1 + count_expr(&s.test) + count_body(&s.body) + count_body(&s.orelse)
        }
        ast::Stmt::For(s) => {
            1 + count_expr(&s.iter) + count_body(&s.body) + count_body(&s.orelse)
        }
        ast::Stmt::AsyncFor(s) => {
            1 + count_expr(&s.iter) + count_body(&s.body) + count_body(&s.orelse)
        }
        // with and async-with are one decision-point category
        ast::Stmt::With(s) => {
            1 + s
                .items
                .iter()
                .map(|item| count_expr(&item.context_expr))
                .sum::<u32>()
                + count_body(&s.body)
        }
        ast::Stmt::AsyncWith(s) => {
            1 + s
                .items
                .iter()
                .map(|item| count_expr(&item.context_expr))
                .sum::<u32>()
                + count_body(&s.body)
        }
        ast::Stmt::Try(s) => {
            let handler_count = s.handlers.len() as u32;
            let handler_bodies: u32 = s
                .handlers
                .iter()
                .map(|handler| {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    h.type_.as_deref().map(count_expr).unwrap_or(0) + count_body(&h.body)
                })
                .sum();
            handler_count
                + count_body(&s.body)
                + handler_bodies
                + count_body(&s.orelse)
                + count_body(&s.finalbody)
        }
        ast::Stmt::Assert(s) => {
            1 + count_expr(&s.test) + s.msg.as_deref().map(count_expr).unwrap_or(0)
        }
        // Nested defs contribute their subtree to the enclosing function
        ast::Stmt::FunctionDef(def) => count_body(&def.body),
        ast::Stmt::AsyncFunctionDef(def) => count_body(&def.body),
        ast::Stmt::ClassDef(def) => count_body(&def.body),
        ast::Stmt::Return(s) => s.value.as_deref().map(count_expr).unwrap_or(0),
        ast::Stmt::Delete(s) => s.targets.iter().map(count_expr).sum(),
        ast::Stmt::Assign(s) => {
            s.targets.iter().map(count_expr).sum::<u32>() + count_expr(&s.value)
        }
        ast::Stmt::AugAssign(s) => count_expr(&s.target) + count_expr(&s.value),
        ast::Stmt::AnnAssign(s) => {
            count_expr(&s.target) + s.value.as_deref().map(count_expr).unwrap_or(0)
        }
        ast::Stmt::Raise(s) => {
            s.exc.as_deref().map(count_expr).unwrap_or(0)
                + s.cause.as_deref().map(count_expr).unwrap_or(0)
        }
        ast::Stmt::Expr(s) => count_expr(&s.value),
        _ => 0,
    }
}

fn count_expr(expr: &ast::Expr) -> u32 {
    match expr {
        ast::Expr::BoolOp(e) => {
            (e.values.len().saturating_sub(1)) as u32
                + e.values.iter().map(count_expr).sum::<u32>()
        }
        ast::Expr::NamedExpr(e) => count_expr(&e.target) + count_expr(&e.value),
        ast::Expr::BinOp(e) => count_expr(&e.left) + count_expr(&e.right),
        ast::Expr::UnaryOp(e) => count_expr(&e.operand),
        ast::Expr::Lambda(e) => count_expr(&e.body),
        ast::Expr::IfExp(e) => count_expr(&e.test) + count_expr(&e.body) + count_expr(&e.orelse),
        ast::Expr::Dict(e) => {
            e.keys.iter().flatten().map(count_expr).sum::<u32>()
                + e.values.iter().map(count_expr).sum::<u32>()
        }
        ast::Expr::Set(e) => e.elts.iter().map(count_expr).sum(),
        ast::Expr::ListComp(e) => count_expr(&e.elt) + count_generators(&e.generators),
        ast::Expr::SetComp(e) => count_expr(&e.elt) + count_generators(&e.generators),
        ast::Expr::DictComp(e) => {
            count_expr(&e.key) + count_expr(&e.value) + count_generators(&e.generators)
        }
        ast::Expr::GeneratorExp(e) => count_expr(&e.elt) + count_generators(&e.generators),
        ast::Expr::Await(e) => count_expr(&e.value),
        ast::Expr::Yield(e) => e.value.as_deref().map(count_expr).unwrap_or(0),
        ast::Expr::YieldFrom(e) => count_expr(&e.value),
        ast::Expr::Compare(e) => {
            count_expr(&e.left) + e.comparators.iter().map(count_expr).sum::<u32>()
        }
        ast::Expr::Call(e) => {
            count_expr(&e.func)
                + e.args.iter().map(count_expr).sum::<u32>()
                + e.keywords.iter().map(|k| count_expr(&k.value)).sum::<u32>()
        }
        ast::Expr::FormattedValue(e) => count_expr(&e.value),
        ast::Expr::JoinedStr(e) => e.values.iter().map(count_expr).sum(),
        ast::Expr::Attribute(e) => count_expr(&e.value),
        ast::Expr::Subscript(e) => count_expr(&e.value) + count_expr(&e.slice),
        ast::Expr::Starred(e) => count_expr(&e.value),
        ast::Expr::List(e) => e.elts.iter().map(count_expr).sum(),
        ast::Expr::Tuple(e) => e.elts.iter().map(count_expr).sum(),
        ast::Expr::Slice(e) => {
            e.lower.as_deref().map(count_expr).unwrap_or(0)
                + e.upper.as_deref().map(count_expr).unwrap_or(0)
                + e.step.as_deref().map(count_expr).unwrap_or(0)
        }
        _ => 0,
    }
}

fn count_generators(generators: &[ast::Comprehension]) -> u32 {
    generators
        .iter()
        .map(|g| count_expr(&g.iter) + g.ifs.iter().map(count_expr).sum::<u32>())
        .sum()
}
