//! Names bound by patterns, declarations and whole modules.

use std::collections::HashSet;

use swc_ecma_ast as ast;
use swc_ecma_visit::{Visit, VisitWith};

/// Names bound by a pattern, in source order.
pub fn pat_names(pat: &ast::Pat, out: &mut Vec<String>) {
    match pat {
        ast::Pat::Ident(binding) => out.push(binding.id.sym.to_string()),
        ast::Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, out);
            }
        }
        ast::Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ast::ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, out),
                    ast::ObjectPatProp::Assign(assign) => out.push(assign.key.sym.to_string()),
                    ast::ObjectPatProp::Rest(rest) => pat_names(&rest.arg, out),
                }
            }
        }
        ast::Pat::Rest(rest) => pat_names(&rest.arg, out),
        ast::Pat::Assign(assign) => pat_names(&assign.left, out),
        _ => {}
    }
}

/// Names a top-level module item binds in the module scope.
pub fn top_level_names(item: &ast::ModuleItem) -> Vec<String> {
    let mut names = Vec::new();
    match item {
        ast::ModuleItem::Stmt(ast::Stmt::Decl(decl))
        | ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(ast::ExportDecl {
            decl, ..
        })) => decl_names(decl, &mut names),
        ast::ModuleItem::ModuleDecl(ast::ModuleDecl::Import(import)) => {
            for specifier in &import.specifiers {
                names.push(import_local(specifier).sym.to_string());
            }
        }
        _ => {}
    }
    names
}

/// Names declared directly in a block, not in blocks nested inside it.
pub fn block_names(stmts: &[ast::Stmt]) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in stmts {
        if let ast::Stmt::Decl(decl) = stmt {
            decl_names(decl, &mut names);
        }
    }
    names
}

fn decl_names(decl: &ast::Decl, out: &mut Vec<String>) {
    match decl {
        ast::Decl::Var(var) => {
            for declarator in &var.decls {
                pat_names(&declarator.name, out);
            }
        }
        ast::Decl::Fn(f) => out.push(f.ident.sym.to_string()),
        ast::Decl::Class(c) => out.push(c.ident.sym.to_string()),
        _ => {}
    }
}

fn import_local(specifier: &ast::ImportSpecifier) -> &ast::Ident {
    match specifier {
        ast::ImportSpecifier::Named(named) => &named.local,
        ast::ImportSpecifier::Default(default) => &default.local,
        ast::ImportSpecifier::Namespace(namespace) => &namespace.local,
    }
}

/// Every name bound anywhere in `module`, in any scope.
pub fn bound_names(module: &ast::Module) -> HashSet<String> {
    let mut collector = BoundNames::default();
    module.visit_with(&mut collector);
    collector.names
}

#[derive(Default)]
struct BoundNames {
    names: HashSet<String>,
}

impl Visit for BoundNames {
    fn visit_binding_ident(&mut self, binding: &ast::BindingIdent) {
        self.names.insert(binding.id.sym.to_string());
    }

    fn visit_fn_decl(&mut self, f: &ast::FnDecl) {
        self.names.insert(f.ident.sym.to_string());
        f.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, f: &ast::FnExpr) {
        if let Some(ident) = &f.ident {
            self.names.insert(ident.sym.to_string());
        }
        f.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, c: &ast::ClassDecl) {
        self.names.insert(c.ident.sym.to_string());
        c.visit_children_with(self);
    }

    fn visit_class_expr(&mut self, c: &ast::ClassExpr) {
        if let Some(ident) = &c.ident {
            self.names.insert(ident.sym.to_string());
        }
        c.visit_children_with(self);
    }

    fn visit_import_specifier(&mut self, specifier: &ast::ImportSpecifier) {
        self.names.insert(import_local(specifier).sym.to_string());
    }
}
