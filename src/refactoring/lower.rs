//! Lowering from the parser AST into the refactoring tree.
//!
//! Lowering is total over the statement and expression forms the serializer
//! can render. Anything outside that set (match statements, `except*`
//! groups, folded constant tuples) reports an unsupported-construct reason;
//! the caller skips the file instead of risking a lossy rewrite.

use super::tree::{
    self, Alias, BinOp, BoolOpKind, ClassDef, CmpOp, Comprehension, ExceptHandler, ForLoop,
    FStringPart, FunctionDef, IfStmt, Keyword, Literal, Module, Param, Parameters, Stmt, TryStmt,
    UnaryOpKind, WithItem,
};
use rustpython_parser::ast;

type Lowered<T> = Result<T, String>;

pub fn lower_module(module: &ast::Mod) -> Lowered<Module> {
    let body = match module {
        ast::Mod::Module(m) => lower_body(&m.body)?,
        _ => return Err("not a module".to_string()),
    };
    Ok(Module { body })
}

fn lower_body(stmts: &[ast::Stmt]) -> Lowered<Vec<Stmt>> {
    stmts.iter().map(lower_stmt).collect()
}

fn lower_stmt(stmt: &ast::Stmt) -> Lowered<Stmt> {
    let lowered = match stmt {
        ast::Stmt::FunctionDef(s) => Stmt::FunctionDef(FunctionDef {
            name: s.name.to_string(),
            params: lower_parameters(&s.args)?,
            body: lower_body(&s.body)?,
            decorators: lower_exprs(&s.decorator_list)?,
            returns: lower_opt(&s.returns)?,
            is_async: false,
        }),
        ast::Stmt::AsyncFunctionDef(s) => Stmt::FunctionDef(FunctionDef {
            name: s.name.to_string(),
            params: lower_parameters(&s.args)?,
            body: lower_body(&s.body)?,
            decorators: lower_exprs(&s.decorator_list)?,
            returns: lower_opt(&s.returns)?,
            is_async: true,
        }),
        ast::Stmt::ClassDef(s) => Stmt::ClassDef(ClassDef {
            name: s.name.to_string(),
            bases: lower_exprs(&s.bases)?,
            keywords: lower_keywords(&s.keywords)?,
            body: lower_body(&s.body)?,
            decorators: lower_exprs(&s.decorator_list)?,
        }),
        ast::Stmt::Return(s) => Stmt::Return(lower_opt(&s.value)?),
        ast::Stmt::Delete(s) => Stmt::Delete(lower_exprs(&s.targets)?),
        ast::Stmt::Assign(s) => Stmt::Assign {
            targets: lower_exprs(&s.targets)?,
            value: lower_expr(&s.value)?,
        },
        ast::Stmt::AugAssign(s) => Stmt::AugAssign {
            target: lower_expr(&s.target)?,
            op: lower_operator(&s.op),
            value: lower_expr(&s.value)?,
        },
        ast::Stmt::AnnAssign(s) => Stmt::AnnAssign {
            target: lower_expr(&s.target)?,
            annotation: lower_expr(&s.annotation)?,
            value: lower_opt(&s.value)?,
        },
        ast::Stmt::For(s) => Stmt::For(ForLoop {
            is_async: false,
            target: lower_expr(&s.target)?,
            iter: lower_expr(&s.iter)?,
            body: lower_body(&s.body)?,
            orelse: lower_body(&s.orelse)?,
        }),
        ast::Stmt::AsyncFor(s) => Stmt::For(ForLoop {
            is_async: true,
            target: lower_expr(&s.target)?,
            iter: lower_expr(&s.iter)?,
            body: lower_body(&s.body)?,
            orelse: lower_body(&s.orelse)?,
        }),
        ast::Stmt::While(s) => Stmt::While {
            test: lower_expr(&s.test)?,
            body: lower_body(&s.body)?,
            orelse: lower_body(&s.orelse)?,
        },
        ast::Stmt::If(s) => Stmt::If(IfStmt {
            test: lower_expr(&s.test)?,
            body: lower_body(&s.body)?,
            orelse: lower_body(&s.orelse)?,
        }),
        ast::Stmt::With(s) => Stmt::With {
            is_async: false,
            items: lower_with_items(&s.items)?,
            body: lower_body(&s.body)?,
        },
        ast::Stmt::AsyncWith(s) => Stmt::With {
            is_async: true,
            items: lower_with_items(&s.items)?,
            body: lower_body(&s.body)?,
        },
        ast::Stmt::Raise(s) => Stmt::Raise {
            exc: lower_opt(&s.exc)?,
            cause: lower_opt(&s.cause)?,
        },
        ast::Stmt::Try(s) => Stmt::Try(TryStmt {
            body: lower_body(&s.body)?,
            handlers: s
                .handlers
                .iter()
                .map(|handler| {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    Ok(ExceptHandler {
                        type_: lower_opt(&h.type_)?,
                        name: h.name.as_ref().map(|n| n.to_string()),
                        body: lower_body(&h.body)?,
                    })
                })
                .collect::<Lowered<Vec<_>>>()?,
            orelse: lower_body(&s.orelse)?,
            finalbody: lower_body(&s.finalbody)?,
        }),
        ast::Stmt::Assert(s) => Stmt::Assert {
            test: lower_expr(&s.test)?,
            msg: lower_opt(&s.msg)?,
        },
        ast::Stmt::Import(s) => Stmt::Import(lower_aliases(&s.names)),
        ast::Stmt::ImportFrom(s) => Stmt::ImportFrom {
            module: s.module.as_ref().map(|m| m.to_string()),
            names: lower_aliases(&s.names),
            level: s.level.as_ref().map(|l| l.to_u32()).unwrap_or(0),
        },
        ast::Stmt::Global(s) => Stmt::Global(s.names.iter().map(|n| n.to_string()).collect()),
        ast::Stmt::Nonlocal(s) => {
            Stmt::Nonlocal(s.names.iter().map(|n| n.to_string()).collect())
        }
        ast::Stmt::Expr(s) => Stmt::Expr(lower_expr(&s.value)?),
        ast::Stmt::Pass(_) => Stmt::Pass,
        ast::Stmt::Break(_) => Stmt::Break,
        ast::Stmt::Continue(_) => Stmt::Continue,
        ast::Stmt::Match(_) => return Err("match statement".to_string()),
        ast::Stmt::TryStar(_) => return Err("except* group".to_string()),
        _ => return Err("unsupported statement form".to_string()),
    };
    Ok(lowered)
}

fn lower_exprs(exprs: &[ast::Expr]) -> Lowered<Vec<tree::Expr>> {
    exprs.iter().map(lower_expr).collect()
}

fn lower_opt(expr: &Option<Box<ast::Expr>>) -> Lowered<Option<tree::Expr>> {
    expr.as_deref().map(lower_expr).transpose()
}

fn lower_expr(expr: &ast::Expr) -> Lowered<tree::Expr> {
    use tree::Expr as E;
    let lowered = match expr {
        ast::Expr::BoolOp(e) => E::BoolOp {
            op: match e.op {
                ast::BoolOp::And => BoolOpKind::And,
                ast::BoolOp::Or => BoolOpKind::Or,
            },
            values: lower_exprs(&e.values)?,
        },
        ast::Expr::NamedExpr(e) => E::Named {
            target: Box::new(lower_expr(&e.target)?),
            value: Box::new(lower_expr(&e.value)?),
        },
        ast::Expr::BinOp(e) => E::BinOp {
            left: Box::new(lower_expr(&e.left)?),
            op: lower_operator(&e.op),
            right: Box::new(lower_expr(&e.right)?),
        },
        ast::Expr::UnaryOp(e) => E::UnaryOp {
            op: match e.op {
                ast::UnaryOp::Invert => UnaryOpKind::Invert,
                ast::UnaryOp::Not => UnaryOpKind::Not,
                ast::UnaryOp::UAdd => UnaryOpKind::UAdd,
                ast::UnaryOp::USub => UnaryOpKind::USub,
            },
            operand: Box::new(lower_expr(&e.operand)?),
        },
        ast::Expr::Lambda(e) => E::Lambda {
            params: Box::new(lower_parameters(&e.args)?),
            body: Box::new(lower_expr(&e.body)?),
        },
        ast::Expr::IfExp(e) => E::IfExp {
            test: Box::new(lower_expr(&e.test)?),
            body: Box::new(lower_expr(&e.body)?),
            orelse: Box::new(lower_expr(&e.orelse)?),
        },
        ast::Expr::Dict(e) => E::Dict {
            keys: e
                .keys
                .iter()
                .map(|k| k.as_ref().map(lower_expr).transpose())
                .collect::<Lowered<Vec<_>>>()?,
            values: lower_exprs(&e.values)?,
        },
        ast::Expr::Set(e) => E::Set(lower_exprs(&e.elts)?),
        ast::Expr::ListComp(e) => E::ListComp {
            elt: Box::new(lower_expr(&e.elt)?),
            generators: lower_generators(&e.generators)?,
        },
        ast::Expr::SetComp(e) => E::SetComp {
            elt: Box::new(lower_expr(&e.elt)?),
            generators: lower_generators(&e.generators)?,
        },
        ast::Expr::DictComp(e) => E::DictComp {
            key: Box::new(lower_expr(&e.key)?),
            value: Box::new(lower_expr(&e.value)?),
            generators: lower_generators(&e.generators)?,
        },
        ast::Expr::GeneratorExp(e) => E::GeneratorExp {
            elt: Box::new(lower_expr(&e.elt)?),
            generators: lower_generators(&e.generators)?,
        },
        ast::Expr::Await(e) => E::Await(Box::new(lower_expr(&e.value)?)),
        ast::Expr::Yield(e) => E::Yield(match &e.value {
            Some(v) => Some(Box::new(lower_expr(v)?)),
            None => None,
        }),
        ast::Expr::YieldFrom(e) => E::YieldFrom(Box::new(lower_expr(&e.value)?)),
        ast::Expr::Compare(e) => E::Compare {
            left: Box::new(lower_expr(&e.left)?),
            ops: e.ops.iter().map(lower_cmp_op).collect(),
            comparators: lower_exprs(&e.comparators)?,
        },
        ast::Expr::Call(e) => E::Call {
            func: Box::new(lower_expr(&e.func)?),
            args: lower_exprs(&e.args)?,
            keywords: lower_keywords(&e.keywords)?,
        },
        ast::Expr::JoinedStr(e) => E::FString(lower_fstring_parts(&e.values)?),
        ast::Expr::FormattedValue(_) => {
            return Err("formatted value outside an f-string".to_string())
        }
        ast::Expr::Constant(e) => E::Literal(lower_constant(&e.value)?),
        ast::Expr::Attribute(e) => E::Attribute {
            value: Box::new(lower_expr(&e.value)?),
            attr: e.attr.to_string(),
        },
        ast::Expr::Subscript(e) => E::Subscript {
            value: Box::new(lower_expr(&e.value)?),
            index: Box::new(lower_expr(&e.slice)?),
        },
        ast::Expr::Starred(e) => E::Starred(Box::new(lower_expr(&e.value)?)),
        ast::Expr::Name(e) => E::Name(e.id.to_string()),
        ast::Expr::List(e) => E::List(lower_exprs(&e.elts)?),
        ast::Expr::Tuple(e) => E::Tuple(lower_exprs(&e.elts)?),
        ast::Expr::Slice(e) => E::Slice {
            lower: lower_opt(&e.lower)?.map(Box::new),
            upper: lower_opt(&e.upper)?.map(Box::new),
            step: lower_opt(&e.step)?.map(Box::new),
        },
    };
    Ok(lowered)
}

fn lower_constant(constant: &ast::Constant) -> Lowered<Literal> {
    Ok(match constant {
        ast::Constant::None => Literal::None,
        ast::Constant::Bool(b) => Literal::Bool(*b),
        ast::Constant::Str(s) => Literal::Str(s.clone()),
        ast::Constant::Bytes(b) => Literal::Bytes(b.clone()),
        ast::Constant::Int(i) => Literal::Int(i.to_string()),
        ast::Constant::Float(f) => Literal::Float(*f),
        ast::Constant::Complex { imag, .. } => Literal::Complex(*imag),
        ast::Constant::Ellipsis => Literal::Ellipsis,
        ast::Constant::Tuple(_) => return Err("constant tuple".to_string()),
    })
}

fn lower_operator(op: &ast::Operator) -> BinOp {
    match op {
        ast::Operator::Add => BinOp::Add,
        ast::Operator::Sub => BinOp::Sub,
        ast::Operator::Mult => BinOp::Mult,
        ast::Operator::MatMult => BinOp::MatMult,
        ast::Operator::Div => BinOp::Div,
        ast::Operator::Mod => BinOp::Mod,
        ast::Operator::Pow => BinOp::Pow,
        ast::Operator::LShift => BinOp::LShift,
        ast::Operator::RShift => BinOp::RShift,
        ast::Operator::BitOr => BinOp::BitOr,
        ast::Operator::BitXor => BinOp::BitXor,
        ast::Operator::BitAnd => BinOp::BitAnd,
        ast::Operator::FloorDiv => BinOp::FloorDiv,
    }
}

fn lower_cmp_op(op: &ast::CmpOp) -> CmpOp {
    match op {
        ast::CmpOp::Eq => CmpOp::Eq,
        ast::CmpOp::NotEq => CmpOp::NotEq,
        ast::CmpOp::Lt => CmpOp::Lt,
        ast::CmpOp::LtE => CmpOp::LtE,
        ast::CmpOp::Gt => CmpOp::Gt,
        ast::CmpOp::GtE => CmpOp::GtE,
        ast::CmpOp::Is => CmpOp::Is,
        ast::CmpOp::IsNot => CmpOp::IsNot,
        ast::CmpOp::In => CmpOp::In,
        ast::CmpOp::NotIn => CmpOp::NotIn,
    }
}

fn lower_generators(generators: &[ast::Comprehension]) -> Lowered<Vec<Comprehension>> {
    generators
        .iter()
        .map(|g| {
            Ok(Comprehension {
                target: lower_expr(&g.target)?,
                iter: lower_expr(&g.iter)?,
                ifs: lower_exprs(&g.ifs)?,
                is_async: g.is_async,
            })
        })
        .collect()
}

fn lower_keywords(keywords: &[ast::Keyword]) -> Lowered<Vec<Keyword>> {
    keywords
        .iter()
        .map(|k| {
            Ok(Keyword {
                arg: k.arg.as_ref().map(|a| a.to_string()),
                value: lower_expr(&k.value)?,
            })
        })
        .collect()
}

fn lower_aliases(aliases: &[ast::Alias]) -> Vec<Alias> {
    aliases
        .iter()
        .map(|a| Alias {
            name: a.name.to_string(),
            asname: a.asname.as_ref().map(|n| n.to_string()),
        })
        .collect()
}

fn lower_with_items(items: &[ast::WithItem]) -> Lowered<Vec<WithItem>> {
    items
        .iter()
        .map(|item| {
            Ok(WithItem {
                context: lower_expr(&item.context_expr)?,
                vars: lower_opt(&item.optional_vars)?,
            })
        })
        .collect()
}

fn lower_parameters(args: &ast::Arguments) -> Lowered<Parameters> {
    let lower_arg_with_default = |arg: &ast::ArgWithDefault| -> Lowered<Param> {
        Ok(Param {
            name: arg.def.arg.to_string(),
            annotation: lower_opt(&arg.def.annotation)?,
            default: lower_opt(&arg.default)?,
        })
    };
    let lower_bare_arg = |arg: &ast::Arg| -> Lowered<Param> {
        Ok(Param {
            name: arg.arg.to_string(),
            annotation: lower_opt(&arg.annotation)?,
            default: None,
        })
    };
    Ok(Parameters {
        posonly: args
            .posonlyargs
            .iter()
            .map(lower_arg_with_default)
            .collect::<Lowered<Vec<_>>>()?,
        args: args
            .args
            .iter()
            .map(lower_arg_with_default)
            .collect::<Lowered<Vec<_>>>()?,
        vararg: args.vararg.as_deref().map(lower_bare_arg).transpose()?,
        kwonly: args
            .kwonlyargs
            .iter()
            .map(lower_arg_with_default)
            .collect::<Lowered<Vec<_>>>()?,
        kwarg: args.kwarg.as_deref().map(lower_bare_arg).transpose()?,
    })
}

fn lower_fstring_parts(values: &[ast::Expr]) -> Lowered<Vec<FStringPart>> {
    values
        .iter()
        .map(|value| match value {
            ast::Expr::Constant(c) => match &c.value {
                ast::Constant::Str(s) => Ok(FStringPart::Literal(s.clone())),
                _ => Err("non-string literal in f-string".to_string()),
            },
            ast::Expr::FormattedValue(f) => {
                let value = lower_expr(&f.value)?;
                if field_quote_clash(&value) {
                    return Err("f-string field would need quote reuse".to_string());
                }
                let conversion = match f.conversion {
                    ast::ConversionFlag::None => None,
                    ast::ConversionFlag::Str => Some('s'),
                    ast::ConversionFlag::Repr => Some('r'),
                    ast::ConversionFlag::Ascii => Some('a'),
                };
                let format_spec = match f.format_spec.as_deref() {
                    Some(ast::Expr::JoinedStr(spec)) => Some(lower_fstring_parts(&spec.values)?),
                    Some(other) => Some(vec![FStringPart::Field {
                        value: lower_expr(other)?,
                        conversion: None,
                        format_spec: None,
                    }]),
                    None => None,
                };
                Ok(FStringPart::Field {
                    value,
                    conversion,
                    format_spec,
                })
            }
            _ => Err("unsupported f-string part".to_string()),
        })
        .collect()
}

/// Rendered f-strings always use double quotes, and before Python 3.12 a
/// field cannot contain the enclosing quote or a backslash. A string or
/// bytes literal that would render with either, or a nested f-string,
/// forces exactly that, so such fields are unsupported.
fn field_quote_clash(expr: &tree::Expr) -> bool {
    use tree::Expr as E;
    let any = |exprs: &[tree::Expr]| exprs.iter().any(field_quote_clash);
    let opt = |e: &Option<Box<tree::Expr>>| e.as_deref().is_some_and(field_quote_clash);
    match expr {
        E::Literal(Literal::Str(s)) => s
            .chars()
            .any(|c| matches!(c, '\'' | '"' | '\\' | '\n' | '\r' | '\t')),
        E::Literal(Literal::Bytes(bytes)) => bytes
            .iter()
            .any(|&b| !matches!(b, 0x20..=0x7e) || matches!(b, b'\'' | b'"' | b'\\')),
        E::Literal(_) | E::Name(_) => false,
        E::FString(_) => true,
        E::BoolOp { values, .. } => any(values),
        E::Named { target, value } => field_quote_clash(target) || field_quote_clash(value),
        E::BinOp { left, right, .. } => field_quote_clash(left) || field_quote_clash(right),
        E::UnaryOp { operand, .. } => field_quote_clash(operand),
        E::Lambda { params, body } => params_quote_clash(params) || field_quote_clash(body),
        E::IfExp { test, body, orelse } => {
            field_quote_clash(test) || field_quote_clash(body) || field_quote_clash(orelse)
        }
        E::Dict { keys, values } => keys.iter().flatten().any(field_quote_clash) || any(values),
        E::Set(elts) | E::List(elts) | E::Tuple(elts) => any(elts),
        E::ListComp { elt, generators }
        | E::SetComp { elt, generators }
        | E::GeneratorExp { elt, generators } => {
            field_quote_clash(elt) || generators_quote_clash(generators)
        }
        E::DictComp {
            key,
            value,
            generators,
        } => {
            field_quote_clash(key)
                || field_quote_clash(value)
                || generators_quote_clash(generators)
        }
        E::Await(v) | E::YieldFrom(v) | E::Starred(v) => field_quote_clash(v),
        E::Yield(v) => v.as_deref().is_some_and(field_quote_clash),
        E::Compare {
            left, comparators, ..
        } => field_quote_clash(left) || any(comparators),
        E::Call {
            func,
            args,
            keywords,
        } => {
            field_quote_clash(func)
                || any(args)
                || keywords.iter().any(|k| field_quote_clash(&k.value))
        }
        E::Attribute { value, .. } => field_quote_clash(value),
        E::Subscript { value, index } => field_quote_clash(value) || field_quote_clash(index),
        E::Slice { lower, upper, step } => opt(lower) || opt(upper) || opt(step),
    }
}

fn generators_quote_clash(generators: &[Comprehension]) -> bool {
    generators.iter().any(|g| {
        field_quote_clash(&g.target)
            || field_quote_clash(&g.iter)
            || g.ifs.iter().any(field_quote_clash)
    })
}

fn params_quote_clash(params: &Parameters) -> bool {
    params
        .posonly
        .iter()
        .chain(&params.args)
        .chain(&params.kwonly)
        .chain(&params.vararg)
        .chain(&params.kwarg)
        .any(|p| {
            p.annotation.as_ref().is_some_and(field_quote_clash)
                || p.default.as_ref().is_some_and(field_quote_clash)
        })
}
