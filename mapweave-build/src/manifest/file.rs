use std::path::{Path, PathBuf};

use mapweave_core::{TypeKey, TypePair};
use toml::Spanned;

use super::{Manifest, ManifestError, ResolveError, Result, SourceContext, TypeCatalog};
use crate::{Assembly, BuildOptions};

/// A build manifest with both its raw content and the parsed form.
pub struct ManifestFile {
    path: PathBuf,
    ctx: SourceContext,
    manifest: Manifest,
}

impl ManifestFile {
    /// Open and parse a manifest file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content =
            std::fs::read_to_string(&path).map_err(|e| ManifestError::io(path.clone(), e))?;
        let filename = path.display().to_string();
        let mut file = Self::parse(content, filename)?;
        file.path = path;
        Ok(file)
    }

    /// Parse manifest text that did not come from disk.
    pub fn parse(content: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let manifest = Manifest::from_str_with_filename(ctx.src(), ctx.filename())?;
        Ok(Self {
            path: PathBuf::from(ctx.filename()),
            ctx,
            manifest,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        self.ctx.src()
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The assemblies the manifest asks to scan, in file order.
    pub fn assemblies(&self) -> Vec<Assembly> {
        self.manifest
            .build
            .assemblies
            .iter()
            .map(|name| Assembly::named(name.get_ref().clone()))
            .collect()
    }

    /// Resolve every `[[precompile]]` entry against `catalog`.
    ///
    /// # Errors
    ///
    /// The first name that is unknown or ambiguous, pointing at its span.
    pub fn pairs(&self, catalog: &TypeCatalog) -> Result<Vec<TypePair>> {
        self.manifest
            .precompile
            .iter()
            .map(|entry| -> Result<TypePair> {
                let source = self.resolve(catalog, &entry.source)?;
                let destination = self.resolve(catalog, &entry.destination)?;
                Ok(TypePair::new(source, destination))
            })
            .collect()
    }

    /// Copy the manifest's settings into `options`.
    ///
    /// Every type name is resolved before `options` is touched, so a bad
    /// name leaves the options as they were.
    pub fn apply(&self, catalog: &TypeCatalog, options: &mut BuildOptions) -> Result<()> {
        let pairs = self.pairs(catalog)?;

        for assembly in self.assemblies() {
            if assembly.units().next().is_none() {
                tracing::warn!(%assembly, "manifest names an assembly with no linked units");
            }
            options.scan(assembly);
        }
        for pair in pairs {
            options.precompile_pair(pair);
        }
        options.freeze_configuration = self.manifest.build.freeze;
        options.mapper = self.manifest.build.mapper;
        Ok(())
    }

    fn resolve(&self, catalog: &TypeCatalog, name: &Spanned<String>) -> Result<TypeKey> {
        catalog.resolve(name.get_ref()).map_err(|err| match err {
            ResolveError::Unknown => self.ctx.unknown_type(name.get_ref(), name.span()),
            ResolveError::Ambiguous(candidates) => {
                self.ctx
                    .ambiguous_type(name.get_ref(), &candidates, name.span())
            }
        })
    }
}
