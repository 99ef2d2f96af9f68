//! Repo-local lint that keeps the content client's layers apart.
//!
//! `content_client` is split into `domain` (data model, services and ports),
//! `inbound` (the CLI) and `outbound` (HTTP and filesystem adapters). This
//! crate parses every source file under those directories and reports:
//!
//! - `domain` code reaching for an adapter module or for transport,
//!   filesystem, CLI or configuration crates
//! - `inbound` code importing `outbound` or the crates only adapters may use
//! - `outbound` code importing `inbound` or the CLI crate
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use syn::visit::Visit;

/// Name the client crate is imported under from its own binaries and tests.
pub const CLIENT_CRATE: &str = "content_client";

const LAYERS: [&str; 3] = ["domain", "inbound", "outbound"];

/// One forbidden dependency found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Rule that was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse {
        /// File path relative to `client/src`.
        file: Utf8PathBuf,
        /// Parser or placement failure.
        message: String,
    },
    /// At least one boundary was crossed.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read client sources: {err}"),
            Self::Parse { file, message } => write!(f, "failed to lint {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "layer boundary violations in {CLIENT_CRATE}:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Lint the client crate sources on disk.
///
/// `client_dir` is the `client/` directory at the workspace root.
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] when the tree cannot be read or parsed,
/// or when any file crosses a boundary.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let sources = collect_lint_sources(&client_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// # Errors
///
/// As for [`lint_client_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(layer.check(&source.file, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Source text.
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(relative_path: &Utf8Path) -> Option<Self> {
        match relative_path.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    const fn forbidden_layers(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["reqwest", "cap_std", "clap", "ortho_config", "wiremock"],
            Self::Inbound => &["reqwest", "cap_std"],
            Self::Outbound => &["clap"],
        }
    }

    fn check(self, file: &Utf8Path, parsed: &syn::File) -> Vec<Violation> {
        let mut collector = PathCollector::default();
        collector.visit_file(parsed);

        let mut messages = BTreeSet::new();
        for segments in &collector.paths {
            if let Some(root) = internal_layer(segments)
                .filter(|root| self.forbidden_layers().contains(root))
            {
                messages.insert(format!(
                    "{} code must not depend on crate::{root}",
                    self.name()
                ));
            }
            if let Some(root) =
                external_crate(segments).filter(|root| self.forbidden_crates().contains(root))
            {
                messages.insert(format!(
                    "{} code must not depend on external crate `{root}`",
                    self.name()
                ));
            }
        }

        messages
            .into_iter()
            .map(|message| Violation {
                file: file.to_owned(),
                message,
            })
            .collect()
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Layer named by a path, whether written `crate::x`, `super::x`,
/// `content_client::x` or bare `x`.
fn internal_layer(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let layer = if is_relative(first) {
        segments.iter().find(|segment| !is_relative(segment))?.as_str()
    } else if first == CLIENT_CRATE {
        segments.get(1)?.as_str()
    } else {
        first
    };
    LAYERS.contains(&layer).then_some(layer)
}

fn external_crate(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative(root) && root != CLIENT_CRATE).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(src_dir: &Utf8Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let root = Dir::open_ambient_dir(src_dir, ambient_authority())?;
    let mut sources = Vec::new();
    for layer in LAYERS {
        let dir = match root.open_dir(layer) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };
        collect_sources_under(&dir, Utf8Path::new(layer), &mut sources)?;
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

fn collect_sources_under(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for listed in dir.entries()? {
        let entry = listed?;
        let raw_name = entry.file_name();
        let Some(name) = raw_name.to_str() else {
            return Err(ArchitectureLintError::Parse {
                file: relative.to_owned(),
                message: "directory entry is not valid UTF-8".to_owned(),
            });
        };
        let path = relative.join(name);
        if entry.file_type()?.is_dir() {
            collect_sources_under(&dir.open_dir(name)?, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(name)?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}
