//! Lowering of `const x = require(...)` declarators into imports.
//!
//! | binding        | shape                | result                                                     |
//! |----------------|----------------------|------------------------------------------------------------|
//! | `x`            | `require("m")`       | `import x from "m"`                                        |
//! | `x`            | `require("m")(a)`    | `import xFactory from "m"` + `const x = xFactory(a)`        |
//! | `x`            | `require("m").p`     | `import { p as x } from "m"`                               |
//! | `{ a, b: c }`  | `require("m")`       | `import { a, b as c } from "m"`                            |

use std::collections::HashSet;

use ce_ast::{BindingTarget, LoaderCall, LoaderShape};
use swc_ecma_ast as ast;

use crate::util::{call, default_import, ident, import_decl, named_specifier};

/// Result of lowering one declarator.
#[derive(Debug)]
pub struct Lowered {
    /// Import inserted before the declaration.
    pub import: ast::ImportDecl,
    /// New initialiser when the declarator stays in the declaration
    /// (factory pattern); `None` when the import replaces it.
    pub init: Option<Box<ast::Expr>>,
}

/// Lower a static loader call bound to `binding`.
///
/// Returns `None` for combinations without a lowering (destructuring bound
/// to a factory or member access); see [`crate::classify::is_lowerable`].
///
/// `taken` holds every name bound in the unit. A synthesised factory name is
/// chosen outside it and then added to it.
pub fn lower_declarator(
    call: LoaderCall,
    binding: BindingTarget,
    src: &str,
    factory_suffix: &str,
    taken: &mut HashSet<String>,
) -> Option<Lowered> {
    match (call.shape, binding) {
        (LoaderShape::Plain, BindingTarget::Name(name)) => Some(Lowered {
            import: default_import(name, src),
            init: None,
        }),
        (LoaderShape::Factory { args }, BindingTarget::Name(name)) => {
            let factory = fresh_name(&format!("{}{}", name.sym, factory_suffix), taken);
            Some(Lowered {
                import: default_import(ident(&factory), src),
                init: Some(Box::new(call_factory(&factory, args))),
            })
        }
        (LoaderShape::Member { property }, BindingTarget::Name(name)) => Some(Lowered {
            import: import_decl(vec![named_specifier(&property, name)], src),
            init: None,
        }),
        (LoaderShape::Plain, BindingTarget::Object(bindings)) => {
            let specifiers = bindings
                .into_iter()
                .map(|b| named_specifier(&b.imported, b.local))
                .collect();
            Some(Lowered {
                import: import_decl(specifiers, src),
                init: None,
            })
        }
        (LoaderShape::Factory { .. } | LoaderShape::Member { .. }, BindingTarget::Object(_)) => {
            None
        }
    }
}

/// `base`, or `base` followed by the first counter that makes it unbound.
fn fresh_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut n = 1;
    while taken.contains(&name) {
        name = format!("{base}{n}");
        n += 1;
    }
    taken.insert(name.clone());
    name
}

fn call_factory(factory: &str, args: Vec<ast::ExprOrSpread>) -> ast::Expr {
    call(ast::Expr::Ident(ident(factory)), args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{binding_target, classify};
    use ce_parser::parse_commonjs;

    fn lower(source: &str) -> Option<Lowered> {
        lower_with(source, &mut HashSet::new())
    }

    fn lower_with(source: &str, taken: &mut HashSet<String>) -> Option<Lowered> {
        let parsed = parse_commonjs(source, "test.js").unwrap();
        let ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var))) =
            parsed.module.body.into_iter().next().unwrap()
        else {
            panic!("expected a variable declaration");
        };
        let declarator = var.decls.into_iter().next().unwrap();
        let call = classify(declarator.init.as_deref().unwrap()).unwrap();
        let binding = binding_target(&declarator.name).unwrap();
        let src = call.specifier().unwrap().to_string();
        lower_declarator(call, binding, &src, "Factory", taken)
    }

    fn specifier_names(import: &ast::ImportDecl) -> Vec<(String, Option<String>)> {
        import
            .specifiers
            .iter()
            .map(|s| match s {
                ast::ImportSpecifier::Named(named) => (
                    named.local.sym.to_string(),
                    named.imported.as_ref().map(|i| match i {
                        ast::ModuleExportName::Ident(i) => i.sym.to_string(),
                        ast::ModuleExportName::Str(s) => {
                            s.value.as_str().unwrap_or_default().to_string()
                        }
                    }),
                ),
                ast::ImportSpecifier::Default(d) => (format!("default:{}", d.local.sym), None),
                ast::ImportSpecifier::Namespace(n) => (format!("*:{}", n.local.sym), None),
            })
            .collect()
    }

    #[test]
    fn plain_name_becomes_default_import() {
        let lowered = lower("const fs = require('node:fs');").unwrap();
        assert!(lowered.init.is_none());
        assert_eq!(specifier_names(&lowered.import), vec![("default:fs".into(), None)]);
        assert_eq!(lowered.import.src.value.as_str(), Some("node:fs"));
    }

    #[test]
    fn factory_synthesises_name_and_keeps_arguments() {
        let lowered = lower("const pkgA = require('packageA')({ name: 1 });").unwrap();
        assert_eq!(
            specifier_names(&lowered.import),
            vec![("default:pkgAFactory".into(), None)]
        );
        let Some(init) = lowered.init else {
            panic!("factory keeps its declarator");
        };
        let ast::Expr::Call(call) = *init else {
            panic!("expected a call");
        };
        let ast::Callee::Expr(callee) = &call.callee else {
            panic!("expected an expression callee");
        };
        assert!(matches!(&**callee, ast::Expr::Ident(i) if &*i.sym == "pkgAFactory"));
        assert_eq!(call.args.len(), 1);
        assert!(matches!(*call.args[0].expr, ast::Expr::Object(_)));
    }

    #[test]
    fn factory_name_avoids_existing_bindings() {
        let mut taken: HashSet<String> = ["pkgAFactory", "pkgAFactory1"]
            .into_iter()
            .map(String::from)
            .collect();
        let lowered = lower_with("const pkgA = require('packageA')(1);", &mut taken).unwrap();
        assert_eq!(
            specifier_names(&lowered.import),
            vec![("default:pkgAFactory2".into(), None)]
        );
        assert!(taken.contains("pkgAFactory2"));

        let again = lower_with("var pkgA = require('packageA')(2);", &mut taken).unwrap();
        assert_eq!(
            specifier_names(&again.import),
            vec![("default:pkgAFactory3".into(), None)]
        );
    }

    #[test]
    fn member_access_becomes_named_import() {
        let lowered = lower("const a = require('../x').a;").unwrap();
        assert_eq!(specifier_names(&lowered.import), vec![("a".into(), None)]);

        let lowered = lower("const join = require('node:path').posix;").unwrap();
        assert_eq!(
            specifier_names(&lowered.import),
            vec![("join".into(), Some("posix".into()))]
        );
    }

    #[test]
    fn object_pattern_becomes_named_imports_in_order() {
        let lowered = lower("const { readFile, readFileSync: rfs } = require('node:fs');").unwrap();
        assert_eq!(
            specifier_names(&lowered.import),
            vec![
                ("readFile".into(), None),
                ("rfs".into(), Some("readFileSync".into())),
            ]
        );
    }

    #[test]
    fn destructured_member_access_has_no_lowering() {
        assert!(lower("const { a } = require('x').b;").is_none());
    }
}
