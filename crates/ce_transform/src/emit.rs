//! Entry points: parse → transform → codegen.

use std::path::Path;

use ce_ast::{TransformOptions, TransformStats};
use ce_parser::parse_commonjs;
use swc_common::comments::Comments;
use swc_common::source_map::DefaultSourceMapGenConfig;
use swc_common::{sync::Lrc, SourceMap};
use swc_ecma_ast as ast;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use crate::error::{Result, TransformError};
use crate::resolve::{FileSystem, OsFileSystem};
use crate::transform::transform_module;

/// Rewritten code for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Source map JSON, when requested.
    pub source_map: Option<String>,
    /// Local specifiers the unit imports, after completion.
    pub local_modules: Vec<String>,
    pub stats: TransformStats,
}

/// Transform source text. `path` names the unit and is the base for
/// resolving local specifiers.
pub fn transform_source(
    source: &str,
    path: &Path,
    options: &TransformOptions,
    fs: &dyn FileSystem,
) -> Result<TransformOutput> {
    let filename = path.display().to_string();
    let _span = tracing::debug_span!("transform", file = %filename).entered();

    let parsed = parse_commonjs(source, &filename)?;
    let mut module = parsed.module;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let report = transform_module(
        &mut module,
        Some(&parsed.comments),
        base_dir,
        options,
        fs,
    );

    let (code, source_map) = emit_module(
        &module,
        Some(&parsed.comments),
        parsed.source_map,
        options.source_map,
    )?;

    Ok(TransformOutput {
        code,
        source_map,
        local_modules: report.local_modules,
        stats: report.stats,
    })
}

/// Read `path` and transform it against the real filesystem.
pub fn transform_file(path: &Path, options: &TransformOptions) -> Result<TransformOutput> {
    let source = std::fs::read_to_string(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    transform_source(&source, path, options, &OsFileSystem)
}

/// Print a module, keeping comments. Returns the code and, if asked for,
/// the source map JSON.
pub fn emit_module(
    module: &ast::Module,
    comments: Option<&dyn Comments>,
    source_map: Lrc<SourceMap>,
    with_source_map: bool,
) -> Result<(String, Option<String>)> {
    let mut buf = Vec::new();
    let mut srcmap_buf = if with_source_map { Some(vec![]) } else { None };
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, srcmap_buf.as_mut());
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(ast::EsVersion::latest()),
            cm: source_map.clone(),
            comments,
            wr: writer,
        };
        module.emit_with(&mut emitter).map_err(TransformError::Emit)?;
    }

    let code = String::from_utf8(buf)?;

    let map = match srcmap_buf {
        Some(srcmap_data) => {
            let srcmap = source_map.build_source_map(&srcmap_data, None, DefaultSourceMapGenConfig);
            let mut json = vec![];
            srcmap
                .to_writer(&mut json)
                .map_err(|e| TransformError::SourceMap(e.to_string()))?;
            Some(String::from_utf8(json)?)
        }
        None => None,
    };

    Ok((code, map))
}
