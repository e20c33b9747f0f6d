//! Parse → rewrite → emit for a single module

use std::path::{Path, PathBuf};

use serde_json::json;
use swc_core::base::config::Options;
use swc_core::base::{try_with_handler, Compiler, HandlerOpts};
use swc_core::common::sync::Lrc;
use swc_core::common::{FilePathMapping, Globals, SourceFile, SourceMap, Spanned, GLOBALS};
use swc_core::ecma::ast::{EsVersion, Module, Program};
use swc_core::ecma::parser::{parse_file_as_module, Syntax, TsSyntax};
use tracing::debug;
use tsmirror_rewrite::{rewrite_module, InclusionSet, ModuleReference};

use crate::error::{CompileError, CompileResult, ParseDiagnostic};
use crate::platform::Platform;

/// Everything needed to compile one file.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Absolute path of the TypeScript source
    pub source: &'a Path,
    /// Absolute path the compiled file will be written to
    pub output: &'a Path,
    pub inclusion: &'a InclusionSet,
    /// Suffix `.ts` references are rewritten to
    pub ext: &'a str,
    pub platform: Platform,
}

/// Result of compiling one module.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub code: String,
    pub source_map: Option<String>,
    pub references: Vec<ModuleReference>,
}

/// Wraps the swc compiler. One instance is shared by every file of a build.
pub struct ModuleCompiler {
    cm: Lrc<SourceMap>,
    compiler: Compiler,
    globals: Globals,
}

impl Default for ModuleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleCompiler {
    pub fn new() -> Self {
        let cm: Lrc<SourceMap> = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let compiler = Compiler::new(cm.clone());

        Self {
            cm,
            compiler,
            globals: Globals::new(),
        }
    }

    /// Compile a single module.
    ///
    /// The module is parsed as TypeScript, its in-build references are
    /// rewritten, and JavaScript plus a source map are generated. The map's
    /// source path is relative to the directory of `request.output`.
    pub fn compile(&self, request: &CompileRequest<'_>) -> CompileResult<CompiledModule> {
        GLOBALS.set(&self.globals, || self.compile_in_scope(request))
    }

    fn compile_in_scope(&self, request: &CompileRequest<'_>) -> CompileResult<CompiledModule> {
        let fm = self
            .cm
            .load_file(request.source)
            .map_err(|source| CompileError::Read {
                path: request.source.to_path_buf(),
                source,
            })?;

        let mut module = parse_module(&fm, request.source)?;
        let references = rewrite_module(&mut module, request.source, request.inclusion, request.ext);

        let options = codegen_options(request)?;
        let output = try_with_handler(self.cm.clone(), HandlerOpts::default(), |handler| {
            self.compiler
                .process_js(handler, Program::Module(module), &options)
        })
        .map_err(|err: anyhow::Error| CompileError::Emit {
            path: request.source.to_path_buf(),
            message: format!("{err:#}"),
        })?;

        let mut code = output.code;
        if output.map.is_some() {
            append_source_map_url(&mut code, request.output);
        }

        debug!(
            source = %request.source.display(),
            references = references.len(),
            bytes = code.len(),
            "compiled module"
        );

        Ok(CompiledModule {
            code,
            source_map: output.map,
            references,
        })
    }
}

fn parse_module(fm: &SourceFile, path: &Path) -> CompileResult<Module> {
    let name = path.to_string_lossy();
    let syntax = Syntax::Typescript(TsSyntax {
        decorators: true,
        disallow_ambiguous_jsx_like: name.ends_with(".mts") || name.ends_with(".cts"),
        ..Default::default()
    });

    let mut recovered = Vec::new();
    let module = parse_file_as_module(fm, syntax, EsVersion::Es2022, None, &mut recovered)
        .map_err(|err| diagnostic(fm, path, &err))?;

    // recovered errors are still syntax errors
    if let Some(err) = recovered.first() {
        return Err(diagnostic(fm, path, err).into());
    }

    Ok(module)
}

fn diagnostic(
    fm: &SourceFile,
    path: &Path,
    err: &swc_core::ecma::parser::error::Error,
) -> Box<ParseDiagnostic> {
    let span = err.span();
    let start = span.lo.0.saturating_sub(fm.start_pos.0) as usize;
    let end = (span.hi.0.saturating_sub(fm.start_pos.0) as usize).max(start);

    Box::new(ParseDiagnostic {
        path: path.to_path_buf(),
        message: err.kind().msg().to_string(),
        range: start..end,
        source_text: fm.src.to_string(),
    })
}

/// Path of `source` as seen from the directory `output` will live in.
pub fn source_map_origin(source: &Path, output: &Path) -> String {
    let output_dir = output.parent().unwrap_or_else(|| Path::new(""));
    let relative: PathBuf =
        pathdiff::diff_paths(source, output_dir).unwrap_or_else(|| source.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

fn codegen_options(request: &CompileRequest<'_>) -> CompileResult<Options> {
    let config = json!({
        "filename": request.source.to_string_lossy(),
        "sourceFileName": source_map_origin(request.source, request.output),
        "sourceMaps": true,
        "inputSourceMap": false,
        "swcrc": false,
        "module": { "type": request.platform.module_type() },
        "jsc": {
            "target": "es2022",
            "keepClassNames": true,
            "parser": { "syntax": "typescript", "decorators": true },
        },
    });

    serde_json::from_value(config).map_err(|source| CompileError::Options {
        path: request.source.to_path_buf(),
        source,
    })
}

fn append_source_map_url(code: &mut String, output: &Path) {
    if code.contains("//# sourceMappingURL=") {
        return;
    }
    let Some(name) = output.file_name() else {
        return;
    };

    if !code.is_empty() && !code.ends_with('\n') {
        code.push('\n');
    }
    code.push_str(&format!("//# sourceMappingURL={}.map\n", name.to_string_lossy()));
}
