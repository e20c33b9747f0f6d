//! Build orchestration: resolve → compile/copy → clean → write

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;
use tsmirror_compiler::{CompileRequest, ModuleCompiler};

use crate::artifact::Artifact;
use crate::classify::{classify, ArtifactKind};
use crate::context::BuildContext;
use crate::error::{BuildError, BuildResult};
use crate::options::BuildOptions;
use crate::output::{clear_output, write_artifacts};

/// What a finished build produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub compiled: usize,
    pub copied: usize,
}

/// Run a complete build.
///
/// Every compile target is compiled before the output directory is touched,
/// so a parse error leaves the previous output in place.
pub fn build(options: &BuildOptions) -> BuildResult<BuildSummary> {
    let ctx = BuildContext::from_options(options)?;
    build_with_context(&ctx)
}

pub fn build_with_context(ctx: &BuildContext) -> BuildResult<BuildSummary> {
    info!("Starting build...");
    let artifacts = plan_artifacts(ctx)?;

    let shown = pathdiff::diff_paths(ctx.output(), ctx.root())
        .unwrap_or_else(|| ctx.output().to_path_buf());
    info!("Cleaning output directory: {}", shown.display());
    clear_output(ctx.output())?;
    write_artifacts(ctx.output(), &artifacts)?;

    let compiled = artifacts.iter().filter(|a| a.is_compiled()).count();
    let summary = BuildSummary {
        compiled,
        copied: artifacts.len() - compiled,
    };
    info!(compiled = summary.compiled, copied = summary.copied, "Build completed!");
    Ok(summary)
}

/// Compute the artifact set without writing anything.
pub fn plan_artifacts(ctx: &BuildContext) -> BuildResult<Vec<Artifact>> {
    let compiler = ModuleCompiler::new();
    let mut artifacts: Vec<Artifact> = Vec::with_capacity(ctx.entries().len());
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for entry in ctx.entries() {
        let artifact = match classify(&entry.relative, ctx.exclude()) {
            ArtifactKind::PassThrough => Artifact::pass_through(entry),
            ArtifactKind::Compile => {
                let path = ctx.compiled_name(&entry.relative);
                let output = ctx.output().join(&path);
                let module = compiler.compile(&CompileRequest {
                    source: &entry.absolute,
                    output: &output,
                    inclusion: ctx.inclusion(),
                    ext: ctx.ext(),
                    platform: ctx.platform(),
                })?;
                Artifact::compiled(path, &entry.absolute, module)
            }
        };

        // a.ts and a.js would both land on a.js
        if let Some(first) = claimed.insert(artifact.path.clone(), entry.relative.clone()) {
            return Err(BuildError::OutputCollision {
                output: artifact.path,
                first,
                second: entry.relative.clone(),
            });
        }
        artifacts.push(artifact);
    }

    Ok(artifacts)
}
