use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Search roots for model references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModelLocations {
    /// User-writable documents directory, checked first.
    pub documents_dir: Option<PathBuf>,
    /// Read-only application bundle, checked second.
    pub bundle_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    Documents,
    Bundle,
    LiteralPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    pub path: PathBuf,
    pub origin: ModelOrigin,
}

#[derive(Debug, Clone, Default)]
pub struct ModelResolver {
    locations: ModelLocations,
}

impl ModelResolver {
    pub fn new(locations: ModelLocations) -> Self {
        Self { locations }
    }

    /// Resolves a model name or path to a single file location.
    ///
    /// The documents directory is searched for the identifier's file name, the bundle
    /// for the identifier as given. Absolute identifiers and ones that climb out with
    /// `..` never resolve inside the bundle. When neither holds the file, the identifier
    /// is used as a literal path, whether or not it exists.
    pub fn resolve(&self, identifier: &str) -> ResolvedModel {
        let identifier = strip_file_scheme(identifier);

        if let (Some(documents), Some(file_name)) =
            (&self.locations.documents_dir, Path::new(identifier).file_name())
        {
            let candidate = documents.join(file_name);
            if candidate.is_file() {
                log::debug!("Resolved {identifier} in documents: {}", candidate.display());
                return ResolvedModel {
                    path: candidate,
                    origin: ModelOrigin::Documents,
                };
            }
        }

        if let Some(bundle) = self
            .locations
            .bundle_dir
            .as_ref()
            .filter(|_| is_bundle_relative(identifier))
        {
            let candidate = bundle.join(identifier);
            if candidate.is_file() {
                log::debug!("Resolved {identifier} in bundle: {}", candidate.display());
                return ResolvedModel {
                    path: candidate,
                    origin: ModelOrigin::Bundle,
                };
            }
        }

        log::debug!("Resolved {identifier} as a literal path");
        ResolvedModel {
            path: PathBuf::from(identifier),
            origin: ModelOrigin::LiteralPath,
        }
    }
}

fn is_bundle_relative(identifier: &str) -> bool {
    Path::new(identifier)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

fn strip_file_scheme(identifier: &str) -> &str {
    identifier.strip_prefix("file://").unwrap_or(identifier)
}

/// True when the file name carries a `.gltf` or `.glb` extension, in any case.
pub fn is_gltf_file(file_name: impl AsRef<Path>) -> bool {
    file_name
        .as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("gltf") || extension.eq_ignore_ascii_case("glb")
        })
}
