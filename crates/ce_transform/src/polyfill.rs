//! Replacements for the CommonJS `__dirname` / `__filename` globals.
//!
//! ES modules only know their own URL, so both values are derived from
//! `import.meta.url`:
//!
//! ```js
//! import { fileURLToPath } from "node:url";
//! import { dirname } from "node:path";
//! const __dirname = dirname(fileURLToPath(import.meta.url));
//! const __filename = fileURLToPath(import.meta.url);
//! ```
//!
//! Only the statements a unit actually needs are emitted.

use swc_ecma_ast as ast;

use crate::util::{
    arg, call, const_decl, ident, import_decl, import_item, import_meta_url, named_specifier,
};

pub const DIRNAME: &str = "__dirname";
pub const FILENAME: &str = "__filename";

const URL_HELPER: &str = "fileURLToPath";
const URL_HELPER_ALIAS: &str = "__esm_fileURLToPath";
const URL_MODULE: &str = "node:url";
const PATH_HELPER: &str = "dirname";
const PATH_HELPER_ALIAS: &str = "__esm_dirname";
const PATH_MODULE: &str = "node:path";

/// What a unit references and binds, collected during the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolyfillState {
    pub dirname_used: bool,
    pub filename_used: bool,
    /// The unit declares its own top-level `__dirname`.
    pub dirname_declared: bool,
    /// The unit declares its own top-level `__filename`.
    pub filename_declared: bool,
    /// Some binding in the unit is already called `fileURLToPath`.
    pub url_helper_bound: bool,
    /// Some binding in the unit is already called `dirname`.
    pub path_helper_bound: bool,
    /// Enclosing local scopes that bind `__dirname`.
    pub dirname_shadowed: u32,
    /// Enclosing local scopes that bind `__filename`.
    pub filename_shadowed: u32,
}

/// Which globals a local scope shadows; returned by
/// [`PolyfillState::enter_scope`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shadow {
    dirname: bool,
    filename: bool,
}

impl PolyfillState {
    /// A reference, unless a local scope binds the same name.
    pub fn note_reference(&mut self, name: &str) {
        match name {
            DIRNAME if self.dirname_shadowed == 0 => self.dirname_used = true,
            FILENAME if self.filename_shadowed == 0 => self.filename_used = true,
            _ => {}
        }
    }

    /// Enter a local scope binding `names`.
    pub fn enter_scope(&mut self, names: &[String]) -> Shadow {
        let shadow = Shadow {
            dirname: names.iter().any(|n| n == DIRNAME),
            filename: names.iter().any(|n| n == FILENAME),
        };
        self.dirname_shadowed += u32::from(shadow.dirname);
        self.filename_shadowed += u32::from(shadow.filename);
        shadow
    }

    pub fn exit_scope(&mut self, shadow: Shadow) {
        self.dirname_shadowed -= u32::from(shadow.dirname);
        self.filename_shadowed -= u32::from(shadow.filename);
    }

    /// A binding anywhere in the unit.
    pub fn note_binding(&mut self, name: &str) {
        match name {
            URL_HELPER => self.url_helper_bound = true,
            PATH_HELPER => self.path_helper_bound = true,
            _ => {}
        }
    }

    /// A binding in the module scope.
    pub fn note_top_level_binding(&mut self, name: &str) {
        match name {
            DIRNAME => self.dirname_declared = true,
            FILENAME => self.filename_declared = true,
            _ => self.note_binding(name),
        }
    }

    pub fn needs_dirname(&self) -> bool {
        self.dirname_used && !self.dirname_declared
    }

    pub fn needs_filename(&self) -> bool {
        self.filename_used && !self.filename_declared
    }
}

/// Statements to prepend to the unit, in order. Empty if nothing is needed.
pub fn polyfill_items(state: &PolyfillState) -> Vec<ast::ModuleItem> {
    let dirname = state.needs_dirname();
    let filename = state.needs_filename();
    if !dirname && !filename {
        return Vec::new();
    }

    let url_local = if state.url_helper_bound {
        URL_HELPER_ALIAS
    } else {
        URL_HELPER
    };
    let path_local = if state.path_helper_bound {
        PATH_HELPER_ALIAS
    } else {
        PATH_HELPER
    };

    let mut items = Vec::with_capacity(4);
    items.push(import_item(import_decl(
        vec![named_specifier(URL_HELPER, ident(url_local))],
        URL_MODULE,
    )));
    if dirname {
        items.push(import_item(import_decl(
            vec![named_specifier(PATH_HELPER, ident(path_local))],
            PATH_MODULE,
        )));
        items.push(const_decl(
            DIRNAME,
            call(
                ast::Expr::Ident(ident(path_local)),
                vec![arg(file_path(url_local))],
            ),
        ));
    }
    if filename {
        items.push(const_decl(FILENAME, file_path(url_local)));
    }
    items
}

/// `fileURLToPath(import.meta.url)`
fn file_path(url_local: &str) -> ast::Expr {
    call(
        ast::Expr::Ident(ident(url_local)),
        vec![arg(import_meta_url())],
    )
}
