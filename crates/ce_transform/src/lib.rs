//! CommonJS → ES module rewriting on the SWC AST.
//!
//! Transforms:
//! - `const x = require("m")`         → `import x from "m"`
//! - `const { a, b: c } = require("m")` → `import { a, b as c } from "m"`
//! - `const x = require("m").p`       → `import { p as x } from "m"`
//! - `const x = require("m")(args)`   → `import xFactory from "m"; const x = xFactory(args)`
//! - `module.exports = { a, b: c }`   → `export { a, c as b }; export default { a, b: c }`
//! - `__dirname` / `__filename`       → derived from `import.meta.url`
//!
//! Relative specifiers are completed against the filesystem (`./lib` →
//! `./lib.js` or `./lib/index.js`).

pub mod classify;
pub mod declaration;
pub mod emit;
pub mod error;
pub mod exports;
pub mod names;
pub mod polyfill;
pub mod resolve;
pub mod transform;
mod util;

pub use emit::{emit_module, transform_file, transform_source, TransformOutput};
pub use error::{Result, TransformError};
pub use resolve::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use transform::{transform_module, TransformReport};
