//! Recognition of `require(...)` expressions.
//!
//! Three shapes are recognised:
//! - `require("x")` / `require(name)`
//! - `require("x")(args...)`
//! - `require("x").property`
//!
//! Anything else is not a loader call and its declaration is left alone.

use ce_ast::{BindingTarget, ImportBinding, LoaderCall, LoaderShape, LoaderTarget, LOADER};
use swc_ecma_ast as ast;

use crate::util::{prop_name_text, str_value};

/// Classify an initialiser expression.
pub fn classify(expr: &ast::Expr) -> Option<LoaderCall> {
    match expr {
        ast::Expr::Paren(paren) => classify(&paren.expr),
        ast::Expr::Call(call) => {
            if let Some(target) = loader_target(call) {
                return Some(LoaderCall {
                    target,
                    shape: LoaderShape::Plain,
                });
            }

            let ast::Callee::Expr(callee) = &call.callee else {
                return None;
            };
            let ast::Expr::Call(inner) = &**callee else {
                return None;
            };
            let target = static_target(inner)?;

            Some(LoaderCall {
                target,
                shape: LoaderShape::Factory {
                    args: call.args.clone(),
                },
            })
        }
        ast::Expr::Member(member) => {
            let ast::Expr::Call(inner) = &*member.obj else {
                return None;
            };
            let ast::MemberProp::Ident(property) = &member.prop else {
                return None;
            };
            let target = static_target(inner)?;

            Some(LoaderCall {
                target,
                shape: LoaderShape::Member {
                    property: property.sym.to_string(),
                },
            })
        }
        _ => None,
    }
}

/// `require(<single argument>)`.
fn loader_target(call: &ast::CallExpr) -> Option<LoaderTarget> {
    let ast::Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let ast::Expr::Ident(name) = &**callee else {
        return None;
    };
    if &*name.sym != LOADER {
        return None;
    }

    let [arg] = call.args.as_slice() else {
        return None;
    };
    if arg.spread.is_some() {
        return None;
    }

    match &*arg.expr {
        ast::Expr::Lit(ast::Lit::Str(lit)) => str_value(lit).map(LoaderTarget::Static),
        _ => Some(LoaderTarget::Dynamic),
    }
}

fn static_target(call: &ast::CallExpr) -> Option<LoaderTarget> {
    loader_target(call).filter(|t| matches!(t, LoaderTarget::Static(_)))
}

/// Extract the binding a loader call is assigned to.
///
/// Only plain names and flat object patterns (`{ a, b: c }`) qualify;
/// defaults, rest elements, nested patterns and computed keys do not.
pub fn binding_target(pat: &ast::Pat) -> Option<BindingTarget> {
    match pat {
        ast::Pat::Ident(binding) => Some(BindingTarget::Name(binding.id.clone())),
        ast::Pat::Object(object) => object
            .props
            .iter()
            .map(|prop| match prop {
                ast::ObjectPatProp::Assign(assign) if assign.value.is_none() => {
                    Some(ImportBinding {
                        imported: assign.key.sym.to_string(),
                        local: ast::Ident::from(assign.key.clone()),
                    })
                }
                ast::ObjectPatProp::KeyValue(kv) => {
                    let ast::Pat::Ident(binding) = &*kv.value else {
                        return None;
                    };
                    Some(ImportBinding {
                        imported: prop_name_text(&kv.key)?,
                        local: binding.id.clone(),
                    })
                }
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(BindingTarget::Object),
        _ => None,
    }
}

/// Whether the rewriter has a lowering for this combination.
pub fn is_lowerable(call: &LoaderCall, binding: &BindingTarget) -> bool {
    match (&call.shape, binding) {
        (_, BindingTarget::Name(_)) => true,
        (LoaderShape::Plain, BindingTarget::Object(_)) => true,
        (LoaderShape::Factory { .. } | LoaderShape::Member { .. }, BindingTarget::Object(_)) => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_parser::parse_commonjs;

    fn init_of(source: &str) -> ast::Expr {
        let parsed = parse_commonjs(source, "test.js").unwrap();
        let ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var))) =
            parsed.module.body.into_iter().next().unwrap()
        else {
            panic!("expected a variable declaration");
        };
        *var.decls.into_iter().next().unwrap().init.unwrap()
    }

    fn pat_of(source: &str) -> ast::Pat {
        let parsed = parse_commonjs(source, "test.js").unwrap();
        let ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var))) =
            parsed.module.body.into_iter().next().unwrap()
        else {
            panic!("expected a variable declaration");
        };
        var.decls.into_iter().next().unwrap().name
    }

    #[test]
    fn plain_static_call() {
        let call = classify(&init_of("const fs = require('node:fs');")).unwrap();
        assert_eq!(call.target, LoaderTarget::Static("node:fs".into()));
        assert_eq!(call.shape, LoaderShape::Plain);
        assert_eq!(call.specifier(), Some("node:fs"));
    }

    #[test]
    fn plain_dynamic_call() {
        let call = classify(&init_of("const m = require(name);")).unwrap();
        assert_eq!(call.target, LoaderTarget::Dynamic);
        assert_eq!(call.specifier(), None);
    }

    #[test]
    fn factory_call_keeps_arguments() {
        let call = classify(&init_of("const a = require('pkg')({ name: 1 }, 2);")).unwrap();
        let LoaderShape::Factory { args } = &call.shape else {
            panic!("expected factory shape");
        };
        assert_eq!(args.len(), 2);
        assert_eq!(call.specifier(), Some("pkg"));
    }

    #[test]
    fn member_access() {
        let call = classify(&init_of("const a = require('../x').a;")).unwrap();
        assert_eq!(
            call.shape,
            LoaderShape::Member {
                property: "a".into()
            }
        );
    }

    #[test]
    fn parenthesized_call() {
        assert!(classify(&init_of("const a = (require('x'));")).is_some());
    }

    #[test]
    fn unrecognised_shapes() {
        for source in [
            "const a = require('x')['a'];",
            "const a = require('x').a.b;",
            "const a = require();",
            "const a = require('x', 'y');",
            "const a = require(...names);",
            "const a = require(name).a;",
            "const a = require(name)(1);",
            "const a = load('x');",
            "const a = require('x')(1)(2);",
        ] {
            assert!(classify(&init_of(source)).is_none(), "{source}");
        }
    }

    #[test]
    fn object_pattern_keeps_order_and_aliases() {
        let Some(BindingTarget::Object(bindings)) =
            binding_target(&pat_of("const { readFile, readFileSync: rfs, 'a-b': ab } = x;"))
        else {
            panic!("expected object binding");
        };
        let pairs: Vec<_> = bindings
            .iter()
            .map(|b| (b.imported.as_str(), b.local.sym.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("readFile", "readFile".to_string()),
                ("readFileSync", "rfs".to_string()),
                ("a-b", "ab".to_string()),
            ]
        );
    }

    #[test]
    fn unsupported_patterns() {
        for source in [
            "const { a = 1 } = x;",
            "const { a, ...rest } = x;",
            "const { a: { b } } = x;",
            "const { [k]: v } = x;",
            "const [a] = x;",
        ] {
            assert!(binding_target(&pat_of(source)).is_none(), "{source}");
        }
    }

    #[test]
    fn destructured_factory_is_not_lowerable() {
        let call = classify(&init_of("const a = require('x')(1);")).unwrap();
        let binding = binding_target(&pat_of("const { a } = x;")).unwrap();
        assert!(!is_lowerable(&call, &binding));
        let name = binding_target(&pat_of("const a = x;")).unwrap();
        assert!(is_lowerable(&call, &name));
    }
}
