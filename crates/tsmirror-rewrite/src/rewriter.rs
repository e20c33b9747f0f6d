//! Rewrites module specifiers that point at other files of the same build

use std::fmt;
use std::path::Path;

use swc_core::ecma::ast::{
    CallExpr, Callee, Expr, Lit, Module, ModuleDecl, NamedExport, Str, Tpl, TsExternalModuleRef,
    TsModuleRef,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::debug;

use crate::specifier::{is_declaration, is_relative, with_runtime_suffix, InclusionSet};

/// The syntactic shape a module reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `import x from "..."`
    Import,
    /// `export * from "..."`
    ExportAll,
    /// `export { x } from "..."`
    ExportNamed,
    /// `import x = require("...")`
    ImportEquals,
    /// `import("...")`
    DynamicImport,
    /// `` import(`...`) `` without interpolation
    DynamicTemplate,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Import => "import",
            ReferenceKind::ExportAll => "export *",
            ReferenceKind::ExportNamed => "export {}",
            ReferenceKind::ImportEquals => "import =",
            ReferenceKind::DynamicImport => "import()",
            ReferenceKind::DynamicTemplate => "import(``)",
        };
        f.write_str(name)
    }
}

/// A statically known module reference inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    pub kind: ReferenceKind,
    /// Specifier as written in the source
    pub specifier: String,
    /// Replacement specifier, if the reference was rewritten
    pub rewritten: Option<String>,
}

/// Visitor that rewrites in-build relative specifiers of one file.
pub struct ReferenceRewriter<'a> {
    file: &'a Path,
    inclusion: &'a InclusionSet,
    ext: &'a str,
    references: Vec<ModuleReference>,
}

impl<'a> ReferenceRewriter<'a> {
    /// `file` is the absolute path of the module being rewritten, `ext` the
    /// suffix `.ts` references are rewritten to.
    pub fn new(file: &'a Path, inclusion: &'a InclusionSet, ext: &'a str) -> Self {
        Self {
            file,
            inclusion,
            ext,
            references: Vec::new(),
        }
    }

    /// Rewrite `module` in place and return every reference that was seen.
    pub fn rewrite(mut self, module: &mut Module) -> Vec<ModuleReference> {
        module.visit_mut_with(&mut self);
        self.references
    }

    fn resolve(&self, specifier: &str) -> Option<String> {
        if !is_relative(specifier) || is_declaration(specifier) {
            return None;
        }
        if !self.inclusion.resolves(specifier, self.file) {
            return None;
        }
        with_runtime_suffix(specifier, self.ext)
    }

    fn record(&mut self, kind: ReferenceKind, specifier: String, rewritten: Option<String>) {
        if let Some(ref to) = rewritten {
            debug!(file = %self.file.display(), %kind, from = %specifier, %to, "rewrote reference");
        }
        self.references.push(ModuleReference {
            kind,
            specifier,
            rewritten,
        });
    }

    fn rewrite_str(&mut self, kind: ReferenceKind, src: &mut Str) {
        let specifier = src.value.to_string();
        let rewritten = self.resolve(&specifier);

        if let Some(ref value) = rewritten {
            src.value = value.as_str().into();
            // force the printer to quote the new value instead of echoing the old token
            src.raw = None;
        }

        self.record(kind, specifier, rewritten);
    }

    fn rewrite_template(&mut self, tpl: &mut Tpl) {
        if !tpl.exprs.is_empty() {
            return;
        }
        let [quasi] = tpl.quasis.as_mut_slice() else {
            return;
        };
        let Some(specifier) = quasi.cooked.as_ref().map(|cooked| cooked.to_string()) else {
            return;
        };

        let rewritten = self.resolve(&specifier);
        if let Some(ref value) = rewritten {
            quasi.cooked = Some(value.as_str().into());
            quasi.raw = value.as_str().into();
        }

        self.record(ReferenceKind::DynamicTemplate, specifier, rewritten);
    }
}

impl VisitMut for ReferenceRewriter<'_> {
    fn visit_mut_module_decl(&mut self, decl: &mut ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.rewrite_str(ReferenceKind::Import, &mut import.src),
            ModuleDecl::ExportAll(export) => {
                self.rewrite_str(ReferenceKind::ExportAll, &mut export.src)
            }
            ModuleDecl::ExportNamed(NamedExport { src: Some(src), .. }) => {
                self.rewrite_str(ReferenceKind::ExportNamed, src)
            }
            ModuleDecl::TsImportEquals(import) => {
                if let TsModuleRef::TsExternalModuleRef(TsExternalModuleRef { expr, .. }) =
                    &mut import.module_ref
                {
                    self.rewrite_str(ReferenceKind::ImportEquals, expr);
                }
            }
            _ => {}
        }

        // exported functions and classes may contain dynamic imports
        decl.visit_mut_children_with(self);
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.visit_mut_children_with(self);

        if !matches!(call.callee, Callee::Import(_)) {
            return;
        }
        let [arg] = call.args.as_mut_slice() else {
            return;
        };
        if arg.spread.is_some() {
            return;
        }

        match &mut *arg.expr {
            Expr::Lit(Lit::Str(src)) => self.rewrite_str(ReferenceKind::DynamicImport, src),
            Expr::Tpl(tpl) => self.rewrite_template(tpl),
            _ => {}
        }
    }
}

/// Rewrite the in-build references of `module`, which lives at `file`.
pub fn rewrite_module(
    module: &mut Module,
    file: &Path,
    inclusion: &InclusionSet,
    ext: &str,
) -> Vec<ModuleReference> {
    ReferenceRewriter::new(file, inclusion, ext).rewrite(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use swc_core::common::BytePos;
    use swc_core::ecma::ast::{EsVersion, TplElement};
    use swc_core::ecma::parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
    use swc_core::ecma::visit::{Visit, VisitWith};

    const FILE: &str = "/project/src/a.ts";

    fn parse(src: &str) -> Module {
        let input = StringInput::new(src, BytePos(1), BytePos(1 + src.len() as u32));
        let lexer = Lexer::new(
            Syntax::Typescript(TsSyntax::default()),
            EsVersion::Es2022,
            input,
            None,
        );
        Parser::new_from(lexer)
            .parse_module()
            .expect("test source should parse")
    }

    fn inclusion() -> InclusionSet {
        InclusionSet::new([
            PathBuf::from("/project/src/a.ts"),
            PathBuf::from("/project/src/b.ts"),
            PathBuf::from("/project/src/esm.mts"),
            PathBuf::from("/project/src/types.d.ts"),
            PathBuf::from("/project/lib/c.ts"),
        ])
    }

    fn rewrite(src: &str) -> (Module, Vec<ModuleReference>) {
        let mut module = parse(src);
        let refs = rewrite_module(&mut module, Path::new(FILE), &inclusion(), ".js");
        (module, refs)
    }

    /// Collects every string literal and template element after rewriting.
    #[derive(Default)]
    struct Literals {
        strs: Vec<(String, Option<String>)>,
        quasis: Vec<(Option<String>, String)>,
    }

    impl Visit for Literals {
        fn visit_str(&mut self, s: &Str) {
            self.strs
                .push((s.value.to_string(), s.raw.as_ref().map(|r| r.to_string())));
        }

        fn visit_tpl_element(&mut self, e: &TplElement) {
            self.quasis
                .push((e.cooked.as_ref().map(|c| c.to_string()), e.raw.to_string()));
        }
    }

    fn literals(module: &Module) -> Literals {
        let mut literals = Literals::default();
        module.visit_with(&mut literals);
        literals
    }

    #[test]
    fn test_static_import_in_build_is_rewritten() {
        let (module, refs) = rewrite("import { b } from './b.ts';\nconsole.log(b);");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::Import);
        assert_eq!(refs[0].specifier, "./b.ts");
        assert_eq!(refs[0].rewritten.as_deref(), Some("./b.js"));

        let lits = literals(&module);
        assert_eq!(lits.strs, vec![("./b.js".to_string(), None)]);
    }

    #[test]
    fn test_reference_outside_build_is_untouched() {
        let (module, refs) = rewrite("import { x } from './missing.ts';");

        assert_eq!(refs[0].rewritten, None);
        let lits = literals(&module);
        assert_eq!(
            lits.strs,
            vec![("./missing.ts".to_string(), Some("'./missing.ts'".to_string()))]
        );
    }

    #[test]
    fn test_bare_and_declaration_specifiers_are_untouched() {
        let (_, refs) = rewrite(
            "import React from 'react';\nimport type { T } from './types.d.ts';\nimport fs from 'node:fs';",
        );

        assert_eq!(refs.len(), 3);
        assert!(refs.iter().all(|r| r.rewritten.is_none()));
    }

    #[test]
    fn test_reexports_are_rewritten() {
        let (_, refs) = rewrite(
            "export * from './b.ts';\nexport { c } from '../lib/c.ts';\nexport * as ns from './esm.mts';",
        );

        let rewritten: Vec<_> = refs
            .iter()
            .map(|r| (r.kind, r.rewritten.as_deref()))
            .collect();
        assert_eq!(
            rewritten,
            vec![
                (ReferenceKind::ExportAll, Some("./b.js")),
                (ReferenceKind::ExportNamed, Some("../lib/c.js")),
                (ReferenceKind::ExportNamed, Some("./esm.mjs")),
            ]
        );
    }

    #[test]
    fn test_local_named_export_has_no_reference() {
        let (_, refs) = rewrite("const x = 1;\nexport { x };");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_import_equals_is_rewritten() {
        let (_, refs) = rewrite("import b = require('./b.ts');");
        assert_eq!(refs[0].kind, ReferenceKind::ImportEquals);
        assert_eq!(refs[0].rewritten.as_deref(), Some("./b.js"));
    }

    #[test]
    fn test_dynamic_string_import_is_rewritten() {
        let (module, refs) = rewrite("export async function load() { return import('./b.ts'); }");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::DynamicImport);
        assert_eq!(literals(&module).strs, vec![("./b.js".to_string(), None)]);
    }

    #[test]
    fn test_dynamic_template_import_keeps_cooked_and_raw_in_sync() {
        let (module, refs) = rewrite("const m = import(`./b.ts`);");

        assert_eq!(refs[0].kind, ReferenceKind::DynamicTemplate);
        assert_eq!(refs[0].rewritten.as_deref(), Some("./b.js"));
        assert_eq!(
            literals(&module).quasis,
            vec![(Some("./b.js".to_string()), "./b.js".to_string())]
        );
    }

    #[test]
    fn test_unresolvable_dynamic_imports_are_untouched() {
        let src = "const name = 'b';\n\
                   const a = import(`./${name}.ts`);\n\
                   const b = import('./b.ts', { with: { type: 'json' } });\n\
                   const c = import(name);";
        let (module, refs) = rewrite(src);

        assert!(refs.is_empty());
        let lits = literals(&module);
        assert!(lits.strs.iter().any(|(value, _)| value == "./b.ts"));
        assert!(lits.quasis.iter().any(|(_, raw)| raw == "./"));
    }

    #[test]
    fn test_nested_dynamic_import_in_arguments() {
        let (_, refs) = rewrite("Promise.all([import('./b.ts'), import('../lib/c.ts')]);");
        let rewritten: Vec<_> = refs.iter().filter_map(|r| r.rewritten.clone()).collect();
        assert_eq!(rewritten, vec!["./b.js", "../lib/c.js"]);
    }

    #[test]
    fn test_output_extension_override() {
        let mut module = parse("import './b.ts';");
        let refs = rewrite_module(&mut module, Path::new(FILE), &inclusion(), ".mjs");
        assert_eq!(refs[0].rewritten.as_deref(), Some("./b.mjs"));
    }
}
