//! ECMAScript AST for cjs2esm.
//!
//! Re-exports the standard SWC AST and adds the domain types shared by the
//! parser, the transform and the CLI:
//! - [`LoaderCall`] / [`LoaderShape`]: a classified `require(...)` expression
//! - [`BindingTarget`]: the left-hand side a loader call is bound to
//! - [`ResolvedSpecifier`]: a module specifier after path completion
//! - [`ExportMap`]: the plain shape of `module.exports = { ... }`
//! - [`TransformOptions`] / [`TransformStats`]

pub use swc_ecma_ast::*;

use serde::{Deserialize, Serialize};

/// Name of the CommonJS loader function.
pub const LOADER: &str = "require";

/// Specifier argument of a loader call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderTarget {
    /// `require("x")`: resolvable at transform time.
    Static(String),
    /// `require(name)`: computed at runtime, never rewritten.
    Dynamic,
}

/// The syntactic shape a loader call was found in.
///
/// Decided once by the classifier and consumed by exhaustive matches in the
/// declaration rewriter.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderShape {
    /// `require("x")`
    Plain,
    /// `require("x")(args...)`; the trailing arguments are replayed verbatim.
    Factory { args: Vec<ExprOrSpread> },
    /// `require("x").property`
    Member { property: String },
}

/// A recognised `require(...)` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderCall {
    pub target: LoaderTarget,
    pub shape: LoaderShape,
}

impl LoaderCall {
    /// The literal specifier, if the call is static.
    pub fn specifier(&self) -> Option<&str> {
        match &self.target {
            LoaderTarget::Static(specifier) => Some(specifier),
            LoaderTarget::Dynamic => None,
        }
    }
}

/// One `key: local` entry of a destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    /// Property read off the module (the imported name).
    pub imported: String,
    /// Local binding introduced by the pattern.
    pub local: Ident,
}

/// Left-hand side of a declarator initialised with a loader call.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingTarget {
    /// `const name = ...`
    Name(Ident),
    /// `const { a, b: c } = ...`, in pattern order.
    Object(Vec<ImportBinding>),
}

/// A module specifier after path completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpecifier {
    pub path: String,
    /// `true` for `.`, `./...` and `../...` specifiers.
    pub is_local: bool,
}

/// One `exported: local` entry of a `module.exports` object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    pub exported: String,
    pub local: Ident,
}

/// Ordered entries of `module.exports = { ... }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportMap {
    pub entries: Vec<ExportEntry>,
}

impl ExportMap {
    /// Insert an entry, replacing an earlier one with the same exported name
    /// (later object keys win, as they do at runtime).
    pub fn insert(&mut self, exported: String, local: Ident) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.exported == exported) {
            entry.local = local;
        } else {
            self.entries.push(ExportEntry { exported, local });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options controlling which rewrites are active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Extension probed and appended when completing local specifiers.
    pub extension: String,
    /// Inject `__dirname` / `__filename` replacements.
    pub polyfill: bool,
    /// Lower `module.exports = { ... }`.
    pub exports: bool,
    /// Attach a marker comment to loader calls left in place.
    pub annotate: bool,
    /// Suffix of the import synthesised for `require("x")(...)`.
    pub factory_suffix: String,
    /// Produce a source map alongside the output.
    pub source_map: bool,
}

impl TransformOptions {
    /// Extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            extension: "js".to_string(),
            polyfill: true,
            exports: true,
            annotate: true,
            factory_suffix: "Factory".to_string(),
            source_map: false,
        }
    }
}

/// Counters reported for one transformed unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Import declarations emitted for loader calls.
    pub imports: usize,
    /// `module.exports` assignments lowered.
    pub exports: usize,
    /// Loader calls left in place (dynamic or not at top level).
    pub untouched: usize,
    /// Statements prepended by the polyfill injector.
    pub polyfills: usize,
}
