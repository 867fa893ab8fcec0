//! Single-pass CommonJS → ESM rewrite of a parsed module.
//!
//! The visitor walks the module once:
//! - top-level `var/let/const` declarations with static `require` calls are
//!   lowered into imports inserted in place of (or before) the declaration,
//! - a top-level `module.exports = { ... }` is lowered into exports,
//! - nested or dynamic `require` calls are annotated and left alone,
//! - references to `__dirname` / `__filename` that no local scope shadows,
//!   and helper-name bindings, are recorded for the polyfill injector, which
//!   runs after the walk.
//!
//! Only the top-level item being visited is ever replaced or removed, and
//! new items are only inserted before it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ce_ast::{TransformOptions, TransformStats};
use swc_common::comments::{Comment, CommentKind, Comments};
use swc_common::{BytePos, Span, DUMMY_SP};
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::classify::{binding_target, classify, is_lowerable};
use crate::declaration::lower_declarator;
use crate::exports::{export_map, lower_exports, module_exports_object};
use crate::names::{block_names, bound_names, pat_names, top_level_names};
use crate::polyfill::{polyfill_items, PolyfillState};
use crate::resolve::{resolve, FileSystem};
use crate::util::import_item;

/// Text of the comment attached to `require` calls left in place.
pub const UNTOUCHED_MARKER: &str = " cjs2esm: require() left as-is, evaluated at runtime ";

/// What a transform learned about the unit besides the rewritten tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Local specifiers after completion, in source order.
    pub local_modules: Vec<String>,
    pub stats: TransformStats,
}

/// Rewrite `module` in place.
///
/// `base_dir` is the directory of the source file; local specifiers are
/// resolved against it through `fs`.
pub fn transform_module(
    module: &mut ast::Module,
    comments: Option<&dyn Comments>,
    base_dir: &Path,
    options: &TransformOptions,
    fs: &dyn FileSystem,
) -> TransformReport {
    let mut visitor = CjsToEsm {
        base_dir: base_dir.to_path_buf(),
        options,
        fs,
        comments,
        bound: bound_names(module),
        polyfill: PolyfillState::default(),
        report: TransformReport::default(),
    };
    module.visit_mut_with(&mut visitor);
    visitor.report
}

/// Per-unit state threaded through the traversal. Dropped with the unit.
struct CjsToEsm<'a> {
    base_dir: PathBuf,
    options: &'a TransformOptions,
    fs: &'a dyn FileSystem,
    comments: Option<&'a dyn Comments>,
    /// Every name bound in the unit, plus names synthesised so far.
    bound: HashSet<String>,
    polyfill: PolyfillState,
    report: TransformReport,
}

impl CjsToEsm<'_> {
    fn rewrite_top_level(&mut self, item: ast::ModuleItem, out: &mut Vec<ast::ModuleItem>) {
        let start = out.len();
        match item {
            ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var))) => {
                self.rewrite_var_decl(var, out);
            }
            ast::ModuleItem::Stmt(ast::Stmt::Expr(stmt))
                if self.options.exports && self.is_lowerable_export(&stmt) =>
            {
                self.rewrite_exports(stmt, out);
            }
            mut other => {
                other.visit_mut_with(self);
                out.push(other);
            }
        }

        for item in &out[start..] {
            for name in top_level_names(item) {
                self.polyfill.note_top_level_binding(&name);
            }
        }
    }

    fn rewrite_var_decl(&mut self, mut var: Box<ast::VarDecl>, out: &mut Vec<ast::ModuleItem>) {
        let mut imports = Vec::new();
        let mut kept = Vec::with_capacity(var.decls.len());
        let mut dynamic = 0;

        for mut declarator in std::mem::take(&mut var.decls) {
            let Some(call) = declarator.init.as_deref().and_then(classify) else {
                kept.push(declarator);
                continue;
            };
            let Some(src) = call.specifier() else {
                dynamic += 1;
                kept.push(declarator);
                continue;
            };
            let Some(binding) = binding_target(&declarator.name) else {
                kept.push(declarator);
                continue;
            };
            if !is_lowerable(&call, &binding) {
                kept.push(declarator);
                continue;
            }

            let resolved = resolve(&self.base_dir, src, self.options.extension(), self.fs);
            if resolved.is_local {
                self.report.local_modules.push(resolved.path.clone());
            }
            tracing::debug!(specifier = src, resolved = %resolved.path, "lowering require");

            let Some(lowered) = lower_declarator(
                call,
                binding,
                &resolved.path,
                &self.options.factory_suffix,
                &mut self.bound,
            ) else {
                kept.push(declarator);
                continue;
            };
            match lowered.init {
                Some(init) => {
                    imports.push((lowered.import, None));
                    declarator.init = Some(init);
                    kept.push(declarator);
                }
                None => imports.push((lowered.import, Some(declarator.span))),
            }
        }

        self.report.stats.imports += imports.len();
        let lowered_any = !imports.is_empty();
        for (i, (mut import, removed)) in imports.into_iter().enumerate() {
            // The first import takes over the declaration's leading comments,
            // the others keep the position of the declarator they replace.
            if i == 0 {
                import.span = var.span;
            } else if let Some(span) = removed {
                import.span = span;
            }
            if let Some(span) = removed {
                self.move_leading_comments(span.lo, import.span.lo);
            }
            out.push(import_item(import));
        }

        if kept.is_empty() {
            return;
        }
        if lowered_any {
            // Comments left at the old start belong to the first import.
            var.span = Span::new(kept[0].span.lo, var.span.hi);
        }
        if dynamic > 0 {
            self.report.stats.untouched += dynamic;
            self.annotate(var.span.lo);
        }
        var.decls = kept;
        for declarator in &mut var.decls {
            declarator.visit_mut_with(self);
        }
        out.push(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var))));
    }

    fn is_lowerable_export(&self, stmt: &ast::ExprStmt) -> bool {
        module_exports_object(stmt).and_then(export_map).is_some()
    }

    fn rewrite_exports(&mut self, stmt: ast::ExprStmt, out: &mut Vec<ast::ModuleItem>) {
        let span = stmt.span;
        let ast::Expr::Assign(assign) = *stmt.expr else {
            return;
        };
        let ast::Expr::Object(mut object) = *assign.right else {
            return;
        };
        let Some(map) = export_map(&object) else {
            return;
        };

        object.visit_mut_with(self);
        tracing::debug!(entries = map.entries.len(), "lowering module.exports");
        self.report.stats.exports += 1;
        out.extend(lower_exports(&map, object, span));
    }

    fn move_leading_comments(&self, from: BytePos, to: BytePos) {
        if from == to || to.0 == 0 {
            return;
        }
        let Some(comments) = self.comments else {
            return;
        };
        if let Some(moved) = comments.take_leading(from) {
            comments.add_leading_comments(to, moved);
        }
    }

    /// Run `visit` inside a local scope binding `names`.
    fn scoped(&mut self, names: &[String], visit: impl FnOnce(&mut Self)) {
        let shadow = self.polyfill.enter_scope(names);
        visit(self);
        self.polyfill.exit_scope(shadow);
    }

    fn annotate(&mut self, pos: BytePos) {
        if !self.options.annotate || pos.0 == 0 {
            return;
        }
        let Some(comments) = self.comments else {
            return;
        };
        let already = comments
            .get_leading(pos)
            .is_some_and(|list| list.iter().any(|c| &*c.text == UNTOUCHED_MARKER));
        if !already {
            comments.add_leading(
                pos,
                Comment {
                    kind: CommentKind::Block,
                    span: DUMMY_SP,
                    text: UNTOUCHED_MARKER.into(),
                },
            );
        }
    }
}

impl VisitMut for CjsToEsm<'_> {
    fn visit_mut_module(&mut self, module: &mut ast::Module) {
        let items = std::mem::take(&mut module.body);
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            self.rewrite_top_level(item, &mut out);
        }

        if self.options.polyfill {
            let polyfill = polyfill_items(&self.polyfill);
            if !polyfill.is_empty() {
                tracing::debug!(statements = polyfill.len(), "injecting polyfill");
                self.report.stats.polyfills = polyfill.len();
                out.splice(0..0, polyfill);
            }
        }

        module.body = out;
    }

    /// Any declaration reached here is nested in a function or block.
    fn visit_mut_var_decl(&mut self, var: &mut ast::VarDecl) {
        let loaders = var
            .decls
            .iter()
            .filter(|d| d.init.as_deref().and_then(classify).is_some())
            .count();
        if loaders > 0 {
            tracing::debug!(count = loaders, "leaving nested require in place");
            self.report.stats.untouched += loaders;
            self.annotate(var.span.lo);
        }
        var.visit_mut_children_with(self);
    }

    fn visit_mut_function(&mut self, f: &mut ast::Function) {
        let mut names = Vec::new();
        for param in &f.params {
            pat_names(&param.pat, &mut names);
        }
        self.scoped(&names, |v| f.visit_mut_children_with(v));
    }

    fn visit_mut_constructor(&mut self, c: &mut ast::Constructor) {
        let mut names = Vec::new();
        for param in &c.params {
            if let ast::ParamOrTsParamProp::Param(param) = param {
                pat_names(&param.pat, &mut names);
            }
        }
        self.scoped(&names, |v| c.visit_mut_children_with(v));
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ast::ArrowExpr) {
        let mut names = Vec::new();
        for param in &arrow.params {
            pat_names(param, &mut names);
        }
        self.scoped(&names, |v| arrow.visit_mut_children_with(v));
    }

    fn visit_mut_catch_clause(&mut self, clause: &mut ast::CatchClause) {
        let mut names = Vec::new();
        if let Some(param) = &clause.param {
            pat_names(param, &mut names);
        }
        self.scoped(&names, |v| clause.visit_mut_children_with(v));
    }

    fn visit_mut_block_stmt(&mut self, block: &mut ast::BlockStmt) {
        let names = block_names(&block.stmts);
        self.scoped(&names, |v| block.visit_mut_children_with(v));
    }

    fn visit_mut_ident(&mut self, ident: &mut ast::Ident) {
        self.polyfill.note_reference(&ident.sym);
    }

    fn visit_mut_binding_ident(&mut self, binding: &mut ast::BindingIdent) {
        self.polyfill.note_binding(&binding.id.sym);
        binding.visit_mut_children_with(self);
    }

    fn visit_mut_fn_decl(&mut self, f: &mut ast::FnDecl) {
        self.polyfill.note_binding(&f.ident.sym);
        f.visit_mut_children_with(self);
    }

    fn visit_mut_class_decl(&mut self, c: &mut ast::ClassDecl) {
        self.polyfill.note_binding(&c.ident.sym);
        c.visit_mut_children_with(self);
    }
}
