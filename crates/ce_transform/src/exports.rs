//! Lowering of `module.exports = { ... }`.
//!
//! `module.exports = { age, a: b }` becomes
//!
//! ```js
//! export { age, b as a };
//! export default { age, a: b };
//! ```
//!
//! Only object literals made of shorthand and `key: identifier` properties
//! are lowered. Any other right-hand side is left as written.

use ce_ast::ExportMap;
use swc_common::{Span, DUMMY_SP};
use swc_ecma_ast as ast;

use crate::util::{export_name, prop_name_text};

/// If `stmt` is `module.exports = { ... }`, return the object literal.
pub fn module_exports_object(stmt: &ast::ExprStmt) -> Option<&ast::ObjectLit> {
    let ast::Expr::Assign(assign) = &*stmt.expr else {
        return None;
    };
    if assign.op != ast::AssignOp::Assign || !is_module_exports(&assign.left) {
        return None;
    }
    match &*assign.right {
        ast::Expr::Object(object) => Some(object),
        _ => None,
    }
}

fn is_module_exports(target: &ast::AssignTarget) -> bool {
    let ast::AssignTarget::Simple(ast::SimpleAssignTarget::Member(member)) = target else {
        return false;
    };
    let ast::Expr::Ident(obj) = &*member.obj else {
        return false;
    };
    let ast::MemberProp::Ident(prop) = &member.prop else {
        return false;
    };
    &*obj.sym == "module" && &*prop.sym == "exports"
}

/// Build the export map of an object literal, or `None` if any property is
/// not a plain `key: identifier` pair.
pub fn export_map(object: &ast::ObjectLit) -> Option<ExportMap> {
    let mut map = ExportMap::default();
    for prop in &object.props {
        let ast::PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match &**prop {
            ast::Prop::Shorthand(local) => map.insert(local.sym.to_string(), local.clone()),
            ast::Prop::KeyValue(kv) => {
                let ast::Expr::Ident(local) = &*kv.value else {
                    return None;
                };
                map.insert(prop_name_text(&kv.key)?, local.clone());
            }
            _ => return None,
        }
    }
    Some(map)
}

/// Emit `export { ... }` followed by `export default <object>`.
///
/// A `default` key is only exported through the default object, since a
/// second default export would not parse.
pub fn lower_exports(map: &ExportMap, object: ast::ObjectLit, span: Span) -> Vec<ast::ModuleItem> {
    let specifiers: Vec<_> = map
        .entries
        .iter()
        .filter(|entry| entry.exported != "default")
        .map(|entry| {
            let exported = if *entry.local.sym == *entry.exported {
                None
            } else {
                Some(export_name(&entry.exported))
            };
            ast::ExportSpecifier::Named(ast::ExportNamedSpecifier {
                span: DUMMY_SP,
                orig: ast::ModuleExportName::Ident(entry.local.clone()),
                exported,
                is_type_only: false,
            })
        })
        .collect();

    let mut items = Vec::with_capacity(2);
    let default_span = if specifiers.is_empty() { span } else { DUMMY_SP };
    if !specifiers.is_empty() {
        items.push(ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportNamed(
            ast::NamedExport {
                span,
                specifiers,
                src: None,
                type_only: false,
                with: None,
            },
        )));
    }
    items.push(ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultExpr(
        ast::ExportDefaultExpr {
            span: default_span,
            expr: Box::new(ast::Expr::Object(object)),
        },
    )));
    items
}
