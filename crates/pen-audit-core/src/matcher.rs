//! Reconciles open screen features against a web app's page files.
//!
//! For each open screen, strategies are tried in order until one finds a
//! page: the route manifest, an exact slug, the last path segment, and a
//! loose alphanumeric comparison. A found page is either real work or a
//! stub; only real pages flip the feature to implemented.

use crate::config::MatcherConfig;
use crate::error::{PenAuditError, Result};
use crate::paths;
use crate::state::State;
use crate::types::{Category, FeatureStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static NON_SLUG_RE: OnceLock<Regex> = OnceLock::new();
static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
static DASHES_RE: OnceLock<Regex> = OnceLock::new();

/// `"Food Log"` -> `"food-log"`. Output holds only `[a-z0-9-]` with no
/// leading, trailing or doubled hyphens.
pub fn slugify(name: &str) -> String {
    let non_slug = NON_SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
    let separator = SEPARATOR_RE.get_or_init(|| Regex::new(r"[\s_]+").unwrap());
    let dashes = DASHES_RE.get_or_init(|| Regex::new(r"-+").unwrap());

    let lower = name.trim().to_lowercase();
    let kept = non_slug.replace_all(&lower, "");
    let hyphenated = separator.replace_all(&kept, "-");
    let collapsed = dashes.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Lowercase alphanumerics only, for loose comparison.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Route slug -> page file, e.g. `settings/profile` -> `app/(main)/settings/profile/page.tsx`.
///
/// Route groups `(name)` and dynamic segments `[id]` are dropped from the
/// slug; the root page has an empty slug and is skipped.
pub fn find_page_files(app_dir: &Path, page_file: &str) -> BTreeMap<String, PathBuf> {
    let mut pages = BTreeMap::new();
    let walker = WalkDir::new(app_dir).sort_by_file_name().into_iter();

    for entry in walker.filter_map(std::result::Result::ok) {
        if !entry.file_type().is_file() || entry.file_name() != page_file {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        let Ok(rel) = parent.strip_prefix(app_dir) else {
            continue;
        };
        let slug = rel
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .filter(|seg| !seg.starts_with('(') && !seg.starts_with('['))
            .collect::<Vec<_>>()
            .join("/");
        if !slug.is_empty() {
            pages.entry(slug).or_insert_with(|| entry.path().to_path_buf());
        }
    }
    pages
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub path: String,
}

/// Routes from the first readable manifest: either a bare list or an object
/// with a `routes` list. Malformed entries are skipped.
pub fn load_routes(project: &Path) -> Vec<Route> {
    for candidate in paths::route_manifest_candidates(project) {
        if !candidate.exists() {
            continue;
        }
        let parsed = std::fs::read_to_string(&candidate)
            .map_err(PenAuditError::from)
            .and_then(|data| serde_json::from_str::<Value>(&data).map_err(PenAuditError::from));
        let value = match parsed {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("skipping route manifest {}: {e}", candidate.display());
                continue;
            }
        };
        let list = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("routes") {
                Some(Value::Array(items)) => items,
                _ => continue,
            },
            _ => continue,
        };
        return list
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Route>(item).ok())
            .collect();
    }
    Vec::new()
}

/// True when a page is a placeholder rather than an implementation.
/// The minimum counts non-blank lines; the "coming soon" cap counts every
/// line of the trimmed file. Unreadable pages count as stubs.
pub fn is_stub(page: &Path, cfg: &MatcherConfig) -> bool {
    let content = match std::fs::read(page) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => return true,
    };
    let non_blank = content.lines().filter(|l| !l.trim().is_empty()).count();
    if non_blank < cfg.stub_min_lines {
        return true;
    }
    let total = content.trim().lines().count();
    content.to_lowercase().contains("coming soon") && total < cfg.placeholder_max_lines
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    #[serde(rename = "routes.json")]
    RouteManifest,
    #[serde(rename = "exact_slug")]
    ExactSlug,
    #[serde(rename = "last_segment")]
    LastSegment,
    #[serde(rename = "normalized")]
    Normalized,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::RouteManifest => "routes.json",
            MatchStrategy::ExactSlug => "exact_slug",
            MatchStrategy::LastSegment => "last_segment",
            MatchStrategy::Normalized => "normalized",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPage {
    pub feature_id: String,
    pub screen_name: String,
    pub page_path: String,
    pub matched_via: MatchStrategy,
    pub has_route: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubPage {
    pub feature_id: String,
    pub screen_name: String,
    pub page_path: String,
    pub matched_via: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPage {
    pub feature_id: String,
    pub screen_name: String,
    pub expected_slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matched: Vec<MatchedPage>,
    pub stub: Vec<StubPage>,
    pub missing: Vec<MissingPage>,
    pub total_matched: usize,
    pub total_stub: usize,
    pub total_missing: usize,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

struct PageIndex {
    pages: BTreeMap<String, PathBuf>,
    /// normalize(screen_name) -> route path, last entry wins.
    routes: BTreeMap<String, String>,
}

impl PageIndex {
    fn via_route(&self, norm_name: &str) -> Option<&PathBuf> {
        let rpath = self.routes.get(norm_name)?.trim_matches('/');
        if rpath.is_empty() {
            return None;
        }
        let last = rpath.rsplit('/').next().unwrap_or(rpath);
        self.pages
            .iter()
            .find(|(slug, _)| rpath == slug.as_str() || rpath.ends_with(slug.as_str()) || slug.ends_with(last))
            .map(|(_, path)| path)
    }

    fn via_exact_slug(&self, slug: &str) -> Option<&PathBuf> {
        let prefixed = format!("app/{slug}");
        self.pages
            .iter()
            .find(|(page, _)| page.as_str() == slug || **page == prefixed)
            .map(|(_, path)| path)
    }

    fn via_last_segment(&self, slug: &str) -> Option<&PathBuf> {
        self.pages
            .iter()
            .find(|(page, _)| page.rsplit('/').next() == Some(slug))
            .map(|(_, path)| path)
    }

    fn via_normalized(&self, norm_name: &str) -> Option<&PathBuf> {
        self.pages
            .iter()
            .find(|(page, _)| normalize(page) == norm_name)
            .map(|(_, path)| path)
    }

    fn locate(&self, name: &str) -> Option<(&PathBuf, MatchStrategy)> {
        let slug = slugify(name);
        let norm_name = normalize(name);
        self.via_route(&norm_name)
            .map(|p| (p, MatchStrategy::RouteManifest))
            .or_else(|| self.via_exact_slug(&slug).map(|p| (p, MatchStrategy::ExactSlug)))
            .or_else(|| self.via_last_segment(&slug).map(|p| (p, MatchStrategy::LastSegment)))
            .or_else(|| self.via_normalized(&norm_name).map(|p| (p, MatchStrategy::Normalized)))
    }
}

/// Match every open screen feature in `state` against the app under
/// `project`. Unless `dry_run`, implemented matches are written back onto
/// the features; the caller persists the state.
pub fn match_codebase(
    state: &mut State,
    project: &Path,
    cfg: &MatcherConfig,
    dry_run: bool,
) -> Result<MatchReport> {
    let app_dir = paths::app_dir(project, &cfg.app_subdir);
    if !app_dir.is_dir() {
        return Err(PenAuditError::AppDirNotFound(app_dir));
    }

    let mut routes = BTreeMap::new();
    for route in load_routes(project) {
        if !route.screen_name.is_empty() {
            routes.insert(normalize(&route.screen_name), route.path);
        }
    }
    let index = PageIndex {
        pages: find_page_files(&app_dir, &cfg.page_file),
        routes,
    };
    tracing::debug!(
        "matching against {} pages and {} routes in {}",
        index.pages.len(),
        index.routes.len(),
        app_dir.display()
    );

    let mut report = MatchReport::default();
    for (id, feature) in state.features.iter_mut() {
        if feature.category != Category::Screen || !feature.is_open() {
            continue;
        }
        let name = feature.name.clone();

        match index.locate(&name) {
            Some((page, via)) if !is_stub(page, cfg) => {
                tracing::debug!("{id}: implemented at {} via {via}", page.display());
                report.matched.push(MatchedPage {
                    feature_id: id.clone(),
                    screen_name: name.clone(),
                    page_path: page.display().to_string(),
                    matched_via: via,
                    has_route: index.routes.contains_key(&normalize(&name)),
                });
                if !dry_run {
                    feature.status = FeatureStatus::Implemented;
                }
            }
            Some((page, via)) => report.stub.push(StubPage {
                feature_id: id.clone(),
                screen_name: name,
                page_path: page.display().to_string(),
                matched_via: via,
            }),
            None => report.missing.push(MissingPage {
                feature_id: id.clone(),
                expected_slug: slugify(&name),
                screen_name: name,
            }),
        }
    }

    report.total_matched = report.matched.len();
    report.total_stub = report.stub.len();
    report.total_missing = report.missing.len();
    if !dry_run && report.total_matched > 0 {
        state.recompute_stats();
    }
    Ok(report)
}
