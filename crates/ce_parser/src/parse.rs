use swc_common::{
    comments::SingleThreadedComments, sync::Lrc, FileName, SourceMap, Span, Spanned,
};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{error::Error, EsSyntax, Syntax, TsSyntax};

use crate::ParseError;

/// Result of parsing one source unit.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Pick the SWC syntax from the file extension.
///
/// `.ts`/`.cts`/`.mts`/`.tsx` parse as TypeScript, everything else as
/// ECMAScript with JSX enabled for `.jsx`.
pub fn syntax_for(filename: &str) -> Syntax {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "ts" | "cts" | "mts" | "tsx" => Syntax::Typescript(TsSyntax {
            tsx: ext == "tsx",
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: ext == "jsx",
            ..Default::default()
        }),
    }
}

/// Parse a source unit as a module.
///
/// Recoverable errors reported by SWC are treated as fatal too: the unit
/// either parses cleanly or produces no output.
pub fn parse_commonjs(source: &str, filename: &str) -> Result<ParseResult, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax_for(filename),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| to_parse_error(&source_map, filename, &e))?;

    if let Some(first) = recovered.first() {
        return Err(to_parse_error(&source_map, filename, first));
    }

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}

fn to_parse_error(source_map: &SourceMap, filename: &str, error: &Error) -> ParseError {
    ParseError {
        path: filename.to_string(),
        line: line_of(source_map, error.span()),
        message: error.kind().msg().into_owned(),
    }
}

fn line_of(source_map: &SourceMap, span: Span) -> usize {
    if span.is_dummy() {
        return 0;
    }
    source_map.lookup_char_pos(span.lo).line
}
