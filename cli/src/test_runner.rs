use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use renderer::{MalformedPolicy, RenderError, RenderOptions};

/// File name suffix of render fixtures.
pub const FIXTURE_SUFFIX: &str = ".test.blocks";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the malformed block's record must start on this 1-based line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FixtureConfig {
    /// Human-readable fixture description.
    #[serde(default)]
    pub description: Option<String>,

    /// Abort on the first malformed block instead of rendering a placeholder.
    #[serde(default)]
    pub strict: bool,

    /// Print a `Block Type:` line before each block.
    #[serde(default)]
    pub annotate: bool,

    /// Expected exact rendered output (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Expected render error; its Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If true, the fixture expects parsing to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// Expected warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

impl FixtureConfig {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            policy: if self.strict {
                MalformedPolicy::Abort
            } else {
                MalformedPolicy::Placeholder
            },
            annotate_kinds: self.annotate,
        }
    }
}

/// Split a fixture into its TOML frontmatter config and JSON block document.
fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum FixtureOutcome {
    Pass,
    Fail(String),
}

pub struct FixtureResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: FixtureOutcome,
}

impl FixtureResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_fixture(path: &Path) -> FixtureResult {
    let fail = |description: Option<String>, reason: String| FixtureResult {
        path: path.to_path_buf(),
        description,
        outcome: FixtureOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_fixture(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let parse_result = blockview::parser::Parser::new(source.to_string(), 0).parse();

    if config.expect_parse_error {
        return FixtureResult {
            path: path.to_path_buf(),
            description,
            outcome: match parse_result {
                Err(_) => FixtureOutcome::Pass,
                Ok(_) => FixtureOutcome::Fail("expected parse error, but parsing succeeded".into()),
            },
        };
    }

    let list = match parse_result {
        Ok(list) => list,
        Err(errs) => {
            let msgs: Vec<String> = errs.iter().map(|e| e.message.clone()).collect();
            return fail(
                description,
                format!("unexpected parse error: {}", msgs.join("; ")),
            );
        }
    };

    let render_result = renderer::render_with(&list.blocks, &config.render_options());

    let mismatch = match (&config.expect_error, &config.expect_output, &render_result) {
        (Some(expected_err), _, Err(err)) => {
            let err_str = err.to_string();
            (!err_str.contains(expected_err.as_str())).then(|| {
                format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err_str
                )
            })
        }
        (Some(expected_err), _, Ok(_)) => Some(format!(
            "expected error containing \"{}\", but rendering succeeded",
            expected_err
        )),
        (None, _, Err(err)) => Some(format!("unexpected render error: {}", err)),
        (None, Some(expected_output), Ok(rendering)) => {
            let actual = rendering.to_string();
            let actual = actual.trim();
            let expected = expected_output.trim();
            (actual != expected).then(|| {
                format!(
                    "output mismatch\n  expected:\n{}\n  actual:\n{}",
                    indent(expected),
                    indent(actual)
                )
            })
        }
        (None, None, Ok(_)) => None,
    };

    if let Some(reason) = mismatch {
        return fail(description, reason);
    }

    if let (Some(expected), Ok(rendering)) = (&config.expect_warnings, &render_result) {
        if let Some(reason) = check_warnings(source, &rendering.warnings, expected) {
            return fail(description, reason);
        }
    }

    FixtureResult {
        path: path.to_path_buf(),
        description,
        outcome: FixtureOutcome::Pass,
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    warnings: &[RenderError],
    expected: &[ExpectedWarning],
) -> Option<String> {
    if warnings.len() != expected.len() {
        let actual_msgs: Vec<String> = warnings.iter().map(|w| format!("    - {}", w)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        let msg = actual.to_string();
        if !msg.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }

        let Some(expected_line) = expected.line else {
            continue;
        };
        match actual.span() {
            Some(span) => {
                let actual_line = byte_offset_to_line(source, span.start);
                if actual_line != expected_line {
                    return Some(format!(
                        "warning[{}]: expected on line {}, but block starts on line {}",
                        i, expected_line, actual_line
                    ));
                }
            }
            None => {
                return Some(format!(
                    "warning[{}]: expected on line {}, but warning has no span",
                    i, expected_line
                ));
            }
        }
    }

    None
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "skipping unreadable directory");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fixtures(&path, root, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(FIXTURE_SUFFIX))
        {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

/// List available categories for the given fixture path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} fixtures)", label, files.len());
    }
}

fn paint(s: &str, code: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    }
}

fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut selected = BTreeMap::new();
    for requested in requested {
        let req = requested.trim_matches('/');
        let prefix = format!("{}/", req);
        let mut found = false;
        for (cat, files) in all {
            if cat == req || cat.starts_with(&prefix) {
                selected.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

/// Run all fixtures under `path` (or a single fixture file).
/// If `categories` is non-empty, only fixtures in those categories run.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let mut results = Vec::new();

    if path.is_file() {
        let result = run_fixture(path);
        report(&result, no_color);
        results.push(result);
    } else {
        let all_categories = discover_categorized(path);
        if all_categories.is_empty() {
            eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
            return 1;
        }

        let selected = select_categories(&all_categories, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }

        for (cat, files) in &selected {
            let header = if cat.is_empty() { "(root)" } else { *cat };
            eprintln!();
            eprintln!("{}", paint(header, "1", no_color));

            for file in *files {
                let result = run_fixture(file);
                report(&result, no_color);
                results.push(result);
            }
        }
    }

    summarize(&results, no_color)
}

fn report(result: &FixtureResult, no_color: bool) {
    let status = match result.outcome {
        FixtureOutcome::Pass => paint("PASS", "32", no_color),
        FixtureOutcome::Fail(_) => paint("FAIL", "31", no_color),
    };
    eprintln!("  {}  {}", status, result.label());
}

fn summarize(results: &[FixtureResult], no_color: bool) -> i32 {
    let failures: Vec<&FixtureResult> = results
        .iter()
        .filter(|r| matches!(r.outcome, FixtureOutcome::Fail(_)))
        .collect();
    let passed = results.len() - failures.len();

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let FixtureOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failures.len(),
            results.len()
        );
        1
    }
}
