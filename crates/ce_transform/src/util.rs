//! AST builders shared by the rewriting passes.

use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast as ast;

pub(crate) fn ident(name: &str) -> ast::Ident {
    ast::Ident::new_no_ctxt(name.into(), DUMMY_SP)
}

pub(crate) fn str_lit(value: &str) -> ast::Str {
    ast::Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

/// Read the value of a string literal. `None` for lone surrogates.
pub(crate) fn str_value(lit: &ast::Str) -> Option<String> {
    lit.value.as_str().map(str::to_owned)
}

/// Text of a non-computed property key, if it has one.
pub(crate) fn prop_name_text(key: &ast::PropName) -> Option<String> {
    match key {
        ast::PropName::Ident(name) => Some(name.sym.to_string()),
        ast::PropName::Str(lit) => str_value(lit),
        _ => None,
    }
}

/// Whether `name` can be written as an unquoted IdentifierName.
pub(crate) fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c == '$' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

/// `name` as an import/export name, quoted when it is not an identifier.
pub(crate) fn export_name(name: &str) -> ast::ModuleExportName {
    if is_identifier_name(name) {
        ast::ModuleExportName::Ident(ident(name))
    } else {
        ast::ModuleExportName::Str(str_lit(name))
    }
}

/// `import <local> from "<src>"`
pub(crate) fn default_import(local: ast::Ident, src: &str) -> ast::ImportDecl {
    import_decl(
        vec![ast::ImportSpecifier::Default(ast::ImportDefaultSpecifier {
            span: DUMMY_SP,
            local,
        })],
        src,
    )
}

/// `{ imported as local }`, without the alias clause when the names match.
pub(crate) fn named_specifier(imported: &str, local: ast::Ident) -> ast::ImportSpecifier {
    let imported = if *local.sym == *imported {
        None
    } else {
        Some(export_name(imported))
    };

    ast::ImportSpecifier::Named(ast::ImportNamedSpecifier {
        span: DUMMY_SP,
        local,
        imported,
        is_type_only: false,
    })
}

pub(crate) fn import_decl(specifiers: Vec<ast::ImportSpecifier>, src: &str) -> ast::ImportDecl {
    ast::ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(str_lit(src)),
        type_only: false,
        with: None,
        phase: ast::ImportPhase::Evaluation,
    }
}

/// `callee(args...)`
pub(crate) fn call(callee: ast::Expr, args: Vec<ast::ExprOrSpread>) -> ast::Expr {
    ast::Expr::Call(ast::CallExpr {
        span: DUMMY_SP,
        callee: ast::Callee::Expr(Box::new(callee)),
        args,
        type_args: None,
        ..Default::default()
    })
}

pub(crate) fn arg(expr: ast::Expr) -> ast::ExprOrSpread {
    ast::ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

/// `import.meta.url`
pub(crate) fn import_meta_url() -> ast::Expr {
    ast::Expr::Member(ast::MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(ast::Expr::MetaProp(ast::MetaPropExpr {
            span: DUMMY_SP,
            kind: ast::MetaPropKind::ImportMeta,
        })),
        prop: ast::MemberProp::Ident(ast::IdentName::new("url".into(), DUMMY_SP)),
    })
}

/// `const <name> = <init>;`
pub(crate) fn const_decl(name: &str, init: ast::Expr) -> ast::ModuleItem {
    ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(Box::new(ast::VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: ast::VarDeclKind::Const,
        declare: false,
        decls: vec![ast::VarDeclarator {
            span: DUMMY_SP,
            name: ast::Pat::Ident(ast::BindingIdent {
                id: ident(name),
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
    }))))
}

pub(crate) fn import_item(decl: ast::ImportDecl) -> ast::ModuleItem {
    ast::ModuleItem::ModuleDecl(ast::ModuleDecl::Import(decl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_names() {
        assert!(is_identifier_name("readFile"));
        assert!(is_identifier_name("$el"));
        assert!(is_identifier_name("_private1"));
        assert!(is_identifier_name("default"));
        assert!(!is_identifier_name("foo-bar"));
        assert!(!is_identifier_name("1abc"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn named_specifier_omits_identity_alias() {
        let ast::ImportSpecifier::Named(spec) = named_specifier("a", ident("a")) else {
            panic!("expected a named specifier");
        };
        assert!(spec.imported.is_none());

        let ast::ImportSpecifier::Named(spec) = named_specifier("readFileSync", ident("rfs"))
        else {
            panic!("expected a named specifier");
        };
        assert!(matches!(
            spec.imported,
            Some(ast::ModuleExportName::Ident(ref i)) if &*i.sym == "readFileSync"
        ));
    }

    #[test]
    fn non_identifier_names_are_quoted() {
        assert!(matches!(export_name("foo-bar"), ast::ModuleExportName::Str(_)));
        assert!(matches!(export_name("foo"), ast::ModuleExportName::Ident(_)));
    }
}
