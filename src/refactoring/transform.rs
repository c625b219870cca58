//! Conservative tree rewrites applied before serialization.
//!
//! Three rules, all bottom-up so nested functions are handled before their
//! enclosing scope:
//! 1. insert a stub docstring into functions and classes that lack one
//! 2. collapse a trailing `if c: return a else: return b` into a single
//!    conditional-expression return
//! 3. detect (but never rewrite) the common string/int normalization method
//!    shape, logging it for review
//!
//! Every applied rule appends a human-readable line to the change log; a
//! transformer whose log stays empty left the tree untouched.

use super::tree::{
    body_has_docstring, ClassDef, Expr, FunctionDef, IfStmt, Module, Stmt,
};

#[derive(Default)]
pub struct RefactorTransformer {
    change_log: Vec<String>,
}

impl RefactorTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_change_log(self) -> Vec<String> {
        self.change_log
    }

    pub fn transform_module(&mut self, module: Module) -> Module {
        Module {
            body: self.transform_body(module.body),
        }
    }

    fn transform_body(&mut self, body: Vec<Stmt>) -> Vec<Stmt> {
        body.into_iter().map(|s| self.transform_stmt(s)).collect()
    }

    fn transform_stmt(&mut self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::FunctionDef(def) => Stmt::FunctionDef(self.transform_function(def)),
            Stmt::ClassDef(def) => Stmt::ClassDef(self.transform_class(def)),
            Stmt::If(mut s) => {
                s.body = self.transform_body(s.body);
                s.orelse = self.transform_body(s.orelse);
                Stmt::If(s)
            }
            Stmt::For(mut f) => {
                f.body = self.transform_body(f.body);
                f.orelse = self.transform_body(f.orelse);
                Stmt::For(f)
            }
            Stmt::While { test, body, orelse } => Stmt::While {
                test,
                body: self.transform_body(body),
                orelse: self.transform_body(orelse),
            },
            Stmt::With {
                is_async,
                items,
                body,
            } => Stmt::With {
                is_async,
                items,
                body: self.transform_body(body),
            },
            Stmt::Try(mut t) => {
                t.body = self.transform_body(t.body);
                for handler in &mut t.handlers {
                    handler.body = self.transform_body(std::mem::take(&mut handler.body));
                }
                t.orelse = self.transform_body(t.orelse);
                t.finalbody = self.transform_body(t.finalbody);
                Stmt::Try(t)
            }
            other => other,
        }
    }

    fn transform_function(&mut self, mut def: FunctionDef) -> FunctionDef {
        def.body = self.transform_body(def.body);

        if !body_has_docstring(&def.body) {
            let doc = function_doc_template(&def);
            def.body.insert(0, Stmt::Expr(Expr::str(doc)));
            self.change_log
                .push(format!("Added docstring to function '{}'", def.name));
        }

        if let Some(last) = def.body.last() {
            if let Some(collapsed) = collapse_return_if(last) {
                let index = def.body.len() - 1;
                def.body[index] = collapsed;
                self.change_log
                    .push(format!("Simplified return logic in function '{}'", def.name));
            }
        }

        if is_normalization_method(&def) {
            self.change_log.push(format!(
                "Detected simple string/int normalization pattern in '{}'",
                def.name
            ));
        }

        def
    }

    fn transform_class(&mut self, mut def: ClassDef) -> ClassDef {
        def.body = self.transform_body(def.body);

        if !body_has_docstring(&def.body) {
            def.body
                .insert(0, Stmt::Expr(Expr::str(format!("{} class.", def.name))));
            self.change_log
                .push(format!("Added docstring to class '{}'", def.name));
        }

        def
    }
}

fn function_doc_template(def: &FunctionDef) -> String {
    let names = def.params.positional_names();
    if names.is_empty() {
        format!("{} function.", def.name)
    } else {
        format!("{} function.\n\nArgs: {}.", def.name, names.join(", "))
    }
}

/// `if c: return a` / `else: return b` as the trailing statement becomes
/// `return a if c else b`; both branches must carry values
fn collapse_return_if(stmt: &Stmt) -> Option<Stmt> {
    let Stmt::If(IfStmt { test, body, orelse }) = stmt else {
        return None;
    };
    let [Stmt::Return(Some(then_value))] = body.as_slice() else {
        return None;
    };
    let [Stmt::Return(Some(else_value))] = orelse.as_slice() else {
        return None;
    };
    Some(Stmt::Return(Some(Expr::IfExp {
        test: Box::new(test.clone()),
        body: Box::new(then_value.clone()),
        orelse: Box::new(else_value.clone()),
    })))
}

/// Method whose first loop branches on isinstance(x, str) then
/// isinstance(x, int); flagged for review, never rewritten
fn is_normalization_method(def: &FunctionDef) -> bool {
    if def.params.args.first().map(|p| p.name.as_str()) != Some("self") {
        return false;
    }
    let Some(for_loop) = def.body.iter().find_map(|s| match s {
        Stmt::For(f) => Some(f),
        _ => None,
    }) else {
        return false;
    };
    let (Expr::Name(target), Expr::Name(_)) = (&for_loop.target, &for_loop.iter) else {
        return false;
    };

    let Some(Stmt::If(first)) = for_loop.body.first() else {
        return false;
    };
    if !is_isinstance_check(&first.test, target, "str") {
        return false;
    }
    matches!(first.orelse.first(),
        Some(Stmt::If(second)) if is_isinstance_check(&second.test, target, "int"))
}

fn is_isinstance_check(test: &Expr, target: &str, type_name: &str) -> bool {
    let Expr::Call { func, args, .. } = test else {
        return false;
    };
    if !matches!(func.as_ref(), Expr::Name(n) if n == "isinstance") {
        return false;
    }
    matches!(args.as_slice(),
        [Expr::Name(arg), Expr::Name(ty)] if arg == target && ty == type_name)
}
