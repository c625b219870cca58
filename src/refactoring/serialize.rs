//! Rendering the refactoring tree back to Python source.
//!
//! Output follows the shape of CPython's `ast.unparse`: four-space indents,
//! no blank lines between statements, docstrings triple-quoted, other
//! strings repr-style, and parentheses inserted from operator precedence.
//! Rendering is a pure function of the tree, which is what makes the
//! unchanged-file write guard and the idempotence property hold.

use super::tree::{
    Alias, BinOp, BoolOpKind, ClassDef, CmpOp, Comprehension, ExceptHandler, Expr, FStringPart,
    ForLoop, FunctionDef, IfStmt, Keyword, Literal, Module, Param, Parameters, Stmt, TryStmt,
    UnaryOpKind, WithItem,
};

/// Operator precedence levels, lowest binds loosest
mod prec {
    pub const TUPLE: u8 = 0;
    pub const TEST: u8 = 1;
    pub const OR: u8 = 2;
    pub const AND: u8 = 3;
    pub const NOT: u8 = 4;
    pub const CMP: u8 = 5;
    pub const BOR: u8 = 6;
    pub const BXOR: u8 = 7;
    pub const BAND: u8 = 8;
    pub const SHIFT: u8 = 9;
    pub const ARITH: u8 = 10;
    pub const TERM: u8 = 11;
    pub const FACTOR: u8 = 12;
    pub const POWER: u8 = 13;
    pub const AWAIT: u8 = 14;
    pub const ATOM: u8 = 15;
}

pub fn to_source(module: &Module) -> String {
    let mut writer = Writer::default();
    writer.write_suite(&module.body, true);
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn block(&mut self, body: &[Stmt], docstring_ok: bool) {
        self.indent += 1;
        self.write_suite(body, docstring_ok);
        self.indent -= 1;
    }

    fn write_suite(&mut self, body: &[Stmt], docstring_ok: bool) {
        if body.is_empty() {
            self.line("pass");
            return;
        }
        let mut rest = body;
        if docstring_ok {
            if let Some(Stmt::Expr(Expr::Literal(Literal::Str(doc)))) = body.first() {
                self.write_docstring(doc);
                rest = &body[1..];
            }
        }
        for stmt in rest {
            self.write_stmt(stmt);
        }
    }

    /// Triple-quoted; embedded newlines stay raw, matching ast.unparse
    fn write_docstring(&mut self, doc: &str) {
        let mut escaped = doc.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
        if escaped.ends_with('"') {
            escaped.pop();
            escaped.push_str("\\\"");
        }
        self.line(&format!("\"\"\"{escaped}\"\"\""));
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(def) => self.write_function(def),
            Stmt::ClassDef(def) => self.write_class(def),
            Stmt::Return(None) => self.line("return"),
            Stmt::Return(Some(value)) => {
                let rendered = expr(value, prec::TUPLE);
                self.line(&format!("return {rendered}"));
            }
            Stmt::Delete(targets) => {
                let rendered = join_exprs(targets, prec::TEST);
                self.line(&format!("del {rendered}"));
            }
            Stmt::Assign { targets, value } => {
                let mut parts: Vec<String> =
                    targets.iter().map(|t| expr(t, prec::TUPLE)).collect();
                parts.push(expr(value, prec::TUPLE));
                self.line(&parts.join(" = "));
            }
            Stmt::AugAssign { target, op, value } => {
                let target = expr(target, prec::TUPLE);
                let value = expr(value, prec::TUPLE);
                self.line(&format!("{target} {}= {value}", op_token(*op)));
            }
            Stmt::AnnAssign {
                target,
                annotation,
                value,
            } => {
                let mut text = format!(
                    "{}: {}",
                    expr(target, prec::ATOM),
                    expr(annotation, prec::TEST)
                );
                if let Some(value) = value {
                    text.push_str(&format!(" = {}", expr(value, prec::TUPLE)));
                }
                self.line(&text);
            }
            Stmt::For(f) => self.write_for(f),
            Stmt::While { test, body, orelse } => {
                let test = expr(test, prec::TEST);
                self.line(&format!("while {test}:"));
                self.block(body, false);
                if !orelse.is_empty() {
                    self.line("else:");
                    self.block(orelse, false);
                }
            }
            Stmt::If(s) => self.write_if(s, "if"),
            Stmt::With {
                is_async,
                items,
                body,
            } => {
                let items: Vec<String> = items.iter().map(with_item).collect();
                let keyword = if *is_async { "async with" } else { "with" };
                self.line(&format!("{keyword} {}:", items.join(", ")));
                self.block(body, false);
            }
            Stmt::Raise { exc: None, .. } => self.line("raise"),
            Stmt::Raise {
                exc: Some(exc),
                cause,
            } => {
                let mut text = format!("raise {}", expr(exc, prec::TEST));
                if let Some(cause) = cause {
                    text.push_str(&format!(" from {}", expr(cause, prec::TEST)));
                }
                self.line(&text);
            }
            Stmt::Try(t) => self.write_try(t),
            Stmt::Assert { test, msg } => {
                let mut text = format!("assert {}", expr(test, prec::TEST));
                if let Some(msg) = msg {
                    text.push_str(&format!(", {}", expr(msg, prec::TEST)));
                }
                self.line(&text);
            }
            Stmt::Import(names) => {
                self.line(&format!("import {}", join_aliases(names)));
            }
            Stmt::ImportFrom {
                module,
                names,
                level,
            } => {
                let dots = ".".repeat(*level as usize);
                let module = module.as_deref().unwrap_or("");
                self.line(&format!(
                    "from {dots}{module} import {}",
                    join_aliases(names)
                ));
            }
            Stmt::Global(names) => self.line(&format!("global {}", names.join(", "))),
            Stmt::Nonlocal(names) => self.line(&format!("nonlocal {}", names.join(", "))),
            Stmt::Expr(e) => {
                let rendered = expr(e, prec::TUPLE);
                self.line(&rendered);
            }
            Stmt::Pass => self.line("pass"),
            Stmt::Break => self.line("break"),
            Stmt::Continue => self.line("continue"),
        }
    }

    fn write_function(&mut self, def: &FunctionDef) {
        for decorator in &def.decorators {
            let rendered = expr(decorator, prec::TEST);
            self.line(&format!("@{rendered}"));
        }
        let keyword = if def.is_async { "async def" } else { "def" };
        let mut header = format!("{keyword} {}({})", def.name, params_str(&def.params));
        if let Some(returns) = &def.returns {
            header.push_str(&format!(" -> {}", expr(returns, prec::TEST)));
        }
        header.push(':');
        self.line(&header);
        self.block(&def.body, true);
    }

    fn write_class(&mut self, def: &ClassDef) {
        for decorator in &def.decorators {
            let rendered = expr(decorator, prec::TEST);
            self.line(&format!("@{rendered}"));
        }
        let mut header = format!("class {}", def.name);
        if !def.bases.is_empty() || !def.keywords.is_empty() {
            let mut parts: Vec<String> =
                def.bases.iter().map(|b| expr(b, prec::TEST)).collect();
            parts.extend(def.keywords.iter().map(keyword_str));
            header.push_str(&format!("({})", parts.join(", ")));
        }
        header.push(':');
        self.line(&header);
        self.block(&def.body, true);
    }

    fn write_for(&mut self, f: &ForLoop) {
        let keyword = if f.is_async { "async for" } else { "for" };
        let target = expr(&f.target, prec::TUPLE);
        let iter = expr(&f.iter, prec::TEST);
        self.line(&format!("{keyword} {target} in {iter}:"));
        self.block(&f.body, false);
        if !f.orelse.is_empty() {
            self.line("else:");
            self.block(&f.orelse, false);
        }
    }

    fn write_if(&mut self, s: &IfStmt, keyword: &str) {
        let test = expr(&s.test, prec::TEST);
        self.line(&format!("{keyword} {test}:"));
        self.block(&s.body, false);
        match s.orelse.as_slice() {
            [] => {}
            [Stmt::If(inner)] => self.write_if(inner, "elif"),
            other => {
                self.line("else:");
                self.block(other, false);
            }
        }
    }

    fn write_try(&mut self, t: &TryStmt) {
        self.line("try:");
        self.block(&t.body, false);
        for handler in &t.handlers {
            self.write_handler(handler);
        }
        if !t.orelse.is_empty() {
            self.line("else:");
            self.block(&t.orelse, false);
        }
        if !t.finalbody.is_empty() {
            self.line("finally:");
            self.block(&t.finalbody, false);
        }
    }

    fn write_handler(&mut self, handler: &ExceptHandler) {
        let mut header = "except".to_string();
        if let Some(type_) = &handler.type_ {
            header.push_str(&format!(" {}", expr(type_, prec::TEST)));
            if let Some(name) = &handler.name {
                header.push_str(&format!(" as {name}"));
            }
        }
        header.push(':');
        self.line(&header);
        self.block(&handler.body, false);
    }
}

/// Render an expression, parenthesizing when its own precedence is too low
fn expr(e: &Expr, min: u8) -> String {
    let (text, level) = render(e);
    if level < min {
        format!("({text})")
    } else {
        text
    }
}

fn join_exprs(exprs: &[Expr], min: u8) -> String {
    exprs
        .iter()
        .map(|e| expr(e, min))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render(e: &Expr) -> (String, u8) {
    match e {
        Expr::BoolOp { op, values } => {
            let (token, level) = match op {
                BoolOpKind::And => (" and ", prec::AND),
                BoolOpKind::Or => (" or ", prec::OR),
            };
            let parts: Vec<String> = values.iter().map(|v| expr(v, level + 1)).collect();
            (parts.join(token), level)
        }
        // Walrus is self-parenthesized: bare `x := v` is not a valid statement
        Expr::Named { target, value } => (
            format!("({} := {})", expr(target, prec::ATOM), expr(value, prec::TEST)),
            prec::ATOM,
        ),
        Expr::BinOp { left, op, right } => {
            let (token, level, right_assoc) = binop_info(*op);
            let (left_min, right_min) = if right_assoc {
                (level + 1, level)
            } else {
                (level, level + 1)
            };
            (
                format!("{} {token} {}", expr(left, left_min), expr(right, right_min)),
                level,
            )
        }
        Expr::UnaryOp { op, operand } => match op {
            UnaryOpKind::Not => (format!("not {}", expr(operand, prec::NOT)), prec::NOT),
            UnaryOpKind::Invert => (format!("~{}", expr(operand, prec::FACTOR)), prec::FACTOR),
            UnaryOpKind::UAdd => (format!("+{}", expr(operand, prec::FACTOR)), prec::FACTOR),
            UnaryOpKind::USub => (format!("-{}", expr(operand, prec::FACTOR)), prec::FACTOR),
        },
        Expr::Lambda { params, body } => {
            let params_text = params_str(params);
            let body = expr(body, prec::TEST);
            if params_text.is_empty() {
                (format!("lambda: {body}"), prec::TEST)
            } else {
                (format!("lambda {params_text}: {body}"), prec::TEST)
            }
        }
        Expr::IfExp { test, body, orelse } => (
            format!(
                "{} if {} else {}",
                expr(body, prec::TEST + 1),
                expr(test, prec::TEST + 1),
                expr(orelse, prec::TEST)
            ),
            prec::TEST,
        ),
        Expr::Dict { keys, values } => {
            let parts: Vec<String> = keys
                .iter()
                .zip(values)
                .map(|(key, value)| match key {
                    Some(key) => {
                        format!("{}: {}", expr(key, prec::TEST), expr(value, prec::TEST))
                    }
                    None => format!("**{}", expr(value, prec::ATOM)),
                })
                .collect();
            (format!("{{{}}}", parts.join(", ")), prec::ATOM)
        }
        Expr::Set(elts) => (format!("{{{}}}", join_exprs(elts, prec::TEST)), prec::ATOM),
        Expr::ListComp { elt, generators } => (
            format!("[{}{}]", expr(elt, prec::TEST), generators_str(generators)),
            prec::ATOM,
        ),
        Expr::SetComp { elt, generators } => (
            format!("{{{}{}}}", expr(elt, prec::TEST), generators_str(generators)),
            prec::ATOM,
        ),
        Expr::DictComp {
            key,
            value,
            generators,
        } => (
            format!(
                "{{{}: {}{}}}",
                expr(key, prec::TEST),
                expr(value, prec::TEST),
                generators_str(generators)
            ),
            prec::ATOM,
        ),
        Expr::GeneratorExp { elt, generators } => (
            format!("({}{})", expr(elt, prec::TEST), generators_str(generators)),
            prec::ATOM,
        ),
        Expr::Await(value) => (format!("await {}", expr(value, prec::ATOM)), prec::AWAIT),
        Expr::Yield(None) => ("(yield)".to_string(), prec::ATOM),
        Expr::Yield(Some(value)) => (
            format!("(yield {})", expr(value, prec::TEST)),
            prec::ATOM,
        ),
        Expr::YieldFrom(value) => (
            format!("(yield from {})", expr(value, prec::TEST)),
            prec::ATOM,
        ),
        Expr::Compare {
            left,
            ops,
            comparators,
        } => {
            let mut text = expr(left, prec::CMP + 1);
            for (op, comparator) in ops.iter().zip(comparators) {
                text.push_str(&format!(
                    " {} {}",
                    cmp_token(*op),
                    expr(comparator, prec::CMP + 1)
                ));
            }
            (text, prec::CMP)
        }
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            let mut parts: Vec<String> = args.iter().map(|a| expr(a, prec::TEST)).collect();
            parts.extend(keywords.iter().map(keyword_str));
            (
                format!("{}({})", expr(func, prec::ATOM), parts.join(", ")),
                prec::ATOM,
            )
        }
        Expr::FString(parts) => (fstring_str(parts), prec::ATOM),
        Expr::Literal(lit) => (literal_str(lit), prec::ATOM),
        Expr::Attribute { value, attr } => {
            let base = expr(value, prec::ATOM);
            // 1.foo would tokenize as a float
            let text = if matches!(
                value.as_ref(),
                Expr::Literal(Literal::Int(_)) | Expr::Literal(Literal::Float(_))
            ) {
                format!("({base}).{attr}")
            } else {
                format!("{base}.{attr}")
            };
            (text, prec::ATOM)
        }
        Expr::Subscript { value, index } => (
            format!("{}[{}]", expr(value, prec::ATOM), index_str(index)),
            prec::ATOM,
        ),
        Expr::Starred(value) => (format!("*{}", expr(value, prec::ATOM)), prec::TEST),
        Expr::Name(name) => (name.clone(), prec::ATOM),
        Expr::List(elts) => (format!("[{}]", join_exprs(elts, prec::TEST)), prec::ATOM),
        Expr::Tuple(elts) => match elts.len() {
            0 => ("()".to_string(), prec::ATOM),
            1 => (format!("{},", expr(&elts[0], prec::TEST)), prec::TUPLE),
            _ => (join_exprs(elts, prec::TEST), prec::TUPLE),
        },
        Expr::Slice { lower, upper, step } => {
            let part = |side: &Option<Box<Expr>>| {
                side.as_deref().map(|e| expr(e, prec::TEST)).unwrap_or_default()
            };
            let mut text = format!("{}:{}", part(lower), part(upper));
            if let Some(step) = step {
                text.push_str(&format!(":{}", expr(step, prec::TEST)));
            }
            (text, prec::TUPLE)
        }
    }
}

/// Subscript indexes print tuples and slices without parentheses
fn index_str(index: &Expr) -> String {
    match index {
        Expr::Tuple(elts) if !elts.is_empty() => elts
            .iter()
            .map(|e| match e {
                Expr::Slice { .. } => expr(e, prec::TUPLE),
                _ => expr(e, prec::TEST),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => expr(index, prec::TUPLE),
    }
}

fn binop_info(op: BinOp) -> (&'static str, u8, bool) {
    match op {
        BinOp::Add => ("+", prec::ARITH, false),
        BinOp::Sub => ("-", prec::ARITH, false),
        BinOp::Mult => ("*", prec::TERM, false),
        BinOp::MatMult => ("@", prec::TERM, false),
        BinOp::Div => ("/", prec::TERM, false),
        BinOp::Mod => ("%", prec::TERM, false),
        BinOp::FloorDiv => ("//", prec::TERM, false),
        BinOp::Pow => ("**", prec::POWER, true),
        BinOp::LShift => ("<<", prec::SHIFT, false),
        BinOp::RShift => (">>", prec::SHIFT, false),
        BinOp::BitOr => ("|", prec::BOR, false),
        BinOp::BitXor => ("^", prec::BXOR, false),
        BinOp::BitAnd => ("&", prec::BAND, false),
    }
}

fn op_token(op: BinOp) -> &'static str {
    binop_info(op).0
}

fn cmp_token(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "==",
        CmpOp::NotEq => "!=",
        CmpOp::Lt => "<",
        CmpOp::LtE => "<=",
        CmpOp::Gt => ">",
        CmpOp::GtE => ">=",
        CmpOp::Is => "is",
        CmpOp::IsNot => "is not",
        CmpOp::In => "in",
        CmpOp::NotIn => "not in",
    }
}

fn generators_str(generators: &[Comprehension]) -> String {
    let mut text = String::new();
    for g in generators {
        let keyword = if g.is_async { " async for " } else { " for " };
        text.push_str(keyword);
        text.push_str(&expr(&g.target, prec::TUPLE));
        text.push_str(" in ");
        text.push_str(&expr(&g.iter, prec::TEST + 1));
        for cond in &g.ifs {
            text.push_str(&format!(" if {}", expr(cond, prec::TEST + 1)));
        }
    }
    text
}

fn with_item(item: &WithItem) -> String {
    match &item.vars {
        Some(vars) => format!(
            "{} as {}",
            expr(&item.context, prec::TEST),
            expr(vars, prec::TEST)
        ),
        None => expr(&item.context, prec::TEST),
    }
}

fn keyword_str(keyword: &Keyword) -> String {
    match &keyword.arg {
        Some(arg) => format!("{arg}={}", expr(&keyword.value, prec::TEST)),
        None => format!("**{}", expr(&keyword.value, prec::TEST)),
    }
}

fn join_aliases(aliases: &[Alias]) -> String {
    aliases
        .iter()
        .map(|a| match &a.asname {
            Some(asname) => format!("{} as {asname}", a.name),
            None => a.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn params_str(params: &Parameters) -> String {
    let mut parts: Vec<String> = Vec::new();
    for param in &params.posonly {
        parts.push(param_str(param));
    }
    if !params.posonly.is_empty() {
        parts.push("/".to_string());
    }
    for param in &params.args {
        parts.push(param_str(param));
    }
    match &params.vararg {
        Some(vararg) => parts.push(format!("*{}", param_str(vararg))),
        None if !params.kwonly.is_empty() => parts.push("*".to_string()),
        None => {}
    }
    for param in &params.kwonly {
        parts.push(param_str(param));
    }
    if let Some(kwarg) = &params.kwarg {
        parts.push(format!("**{}", param_str(kwarg)));
    }
    parts.join(", ")
}

fn param_str(param: &Param) -> String {
    let mut text = param.name.clone();
    if let Some(annotation) = &param.annotation {
        text.push_str(&format!(": {}", expr(annotation, prec::TEST)));
    }
    match (&param.default, &param.annotation) {
        (Some(default), Some(_)) => text.push_str(&format!(" = {}", expr(default, prec::TEST))),
        (Some(default), None) => text.push_str(&format!("={}", expr(default, prec::TEST))),
        (None, _) => {}
    }
    text
}

fn literal_str(lit: &Literal) -> String {
    match lit {
        Literal::None => "None".to_string(),
        Literal::Ellipsis => "...".to_string(),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Int(text) => text.clone(),
        Literal::Float(value) => format!("{value:?}"),
        Literal::Complex(imag) => format!("{imag:?}j"),
        Literal::Str(value) => str_repr(value),
        Literal::Bytes(bytes) => bytes_repr(bytes),
    }
}

/// Python repr-style quoting: single quotes unless the content forces double
fn str_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn bytes_repr(bytes: &[u8]) -> String {
    let mut out = String::from("b'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('\'');
    out
}

fn fstring_str(parts: &[FStringPart]) -> String {
    let mut out = String::from("f\"");
    push_fstring_parts(&mut out, parts);
    out.push('"');
    out
}

fn push_fstring_parts(out: &mut String, parts: &[FStringPart]) {
    for part in parts {
        match part {
            FStringPart::Literal(text) => {
                for c in text.chars() {
                    match c {
                        '{' => out.push_str("{{"),
                        '}' => out.push_str("}}"),
                        '\\' => out.push_str("\\\\"),
                        '"' => out.push_str("\\\""),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c => out.push(c),
                    }
                }
            }
            FStringPart::Field {
                value,
                conversion,
                format_spec,
            } => {
                out.push('{');
                let rendered = expr(value, prec::TEST + 1);
                // a leading brace would read as an escaped literal brace
                if rendered.starts_with('{') {
                    out.push(' ');
                }
                out.push_str(&rendered);
                if let Some(flag) = conversion {
                    out.push('!');
                    out.push(*flag);
                }
                if let Some(spec) = format_spec {
                    out.push(':');
                    push_fstring_parts(out, spec);
                }
                out.push('}');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::parse_module;
    use crate::refactoring::lower::lower_module;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn roundtrip(source: &str) -> String {
        let module = parse_module(source, &PathBuf::from("test.py")).unwrap();
        to_source(&lower_module(&module).unwrap())
    }

    /// Rendering must be stable under its own parse; this is what the
    /// unchanged-file guard relies on.
    fn assert_stable(source: &str) {
        let first = roundtrip(source);
        let second = roundtrip(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn renders_simple_function() {
        let out = roundtrip("def f(x):\n    return x + 1\n");
        assert_eq!(out, "def f(x):\n    return x + 1\n");
    }

    #[test]
    fn renders_docstrings_triple_quoted() {
        let out = roundtrip("def f():\n    'doc'\n    return 1\n");
        assert_eq!(out, "def f():\n    \"\"\"doc\"\"\"\n    return 1\n");
        assert_stable("def f():\n    'doc'\n    return 1\n");
    }

    #[test]
    fn precedence_parens_are_minimal() {
        assert_eq!(roundtrip("x = (a + b) * c\n"), "x = (a + b) * c\n");
        assert_eq!(roundtrip("x = a + b * c\n"), "x = a + b * c\n");
        assert_eq!(roundtrip("x = -(a ** b)\n"), "x = -a ** b\n");
        assert_eq!(roundtrip("x = (-a) ** b\n"), "x = (-a) ** b\n");
        assert_eq!(roundtrip("x = a or b and c\n"), "x = a or b and c\n");
        assert_eq!(roundtrip("x = (a or b) and c\n"), "x = (a or b) and c\n");
    }

    #[test]
    fn renders_elif_chains() {
        let source = indoc! {"
            if a:
                x = 1
            elif b:
                x = 2
            else:
                x = 3
        "};
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn renders_conditional_expression() {
        assert_eq!(roundtrip("x = 1 if c else 2\n"), "x = 1 if c else 2\n");
        assert_stable("x = 1 if c else 2 if d else 3\n");
    }

    #[test]
    fn renders_collections_and_comprehensions() {
        assert_stable("x = [i * 2 for i in range(10) if i % 2 == 0]\n");
        assert_stable("x = {k: v for k, v in items}\n");
        assert_stable("x = {1, 2, 3}\n");
        assert_stable("x = {'a': 1, **extra}\n");
        assert_stable("total = sum(v for v in data)\n");
    }

    #[test]
    fn renders_slices_and_tuples() {
        assert_stable("x = data[1:2]\n");
        assert_stable("x = data[1:2, ::3]\n");
        assert_stable("x = a, b\n");
        assert_stable("x = (a,)\n");
        assert_stable("a, b = b, a\n");
    }

    #[test]
    fn renders_strings_and_fstrings() {
        assert_eq!(roundtrip("x = \"it's\"\n"), "x = \"it's\"\n");
        assert_eq!(roundtrip("x = 'plain'\n"), "x = 'plain'\n");
        assert_stable("x = f'{a}: {b!r} {c:>10}'\n");
        assert_stable("x = 'line1\\nline2'\n");
    }

    #[test]
    fn renders_try_with_and_imports() {
        let source = indoc! {"
            import os
            from typing import List
            try:
                with open(p) as fh:
                    data = fh.read()
            except OSError as err:
                raise RuntimeError('bad') from err
            finally:
                cleanup()
        "};
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn renders_parameters_with_defaults_and_annotations() {
        assert_stable("def f(a, b=1, *args, c, d=2, **kw):\n    pass\n");
        assert_stable("def f(a: int, b: str = 'x') -> bool:\n    return True\n");
        assert_stable("lambda x, y=2: x + y\n");
    }

    #[test]
    fn renders_async_constructs() {
        let source = indoc! {"
            async def f(xs):
                async for x in xs:
                    await g(x)
                async with lock:
                    return [y async for y in gen()]
        "};
        assert_stable(source);
    }

    #[test]
    fn renders_numbers_exactly() {
        assert_eq!(roundtrip("x = 1.0\n"), "x = 1.0\n");
        assert_eq!(roundtrip("x = 10\n"), "x = 10\n");
        assert_eq!(roundtrip("x = 3j\n"), "x = 3.0j\n");
        assert_stable("x = 3j\n");
    }

    #[test]
    fn empty_class_body_gets_pass() {
        assert_stable("class A:\n    pass\n");
        assert_stable("class B(Base, metaclass=Meta):\n    pass\n");
    }
}
