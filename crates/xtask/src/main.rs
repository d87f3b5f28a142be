use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
    workspace_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

/// Crates each layer must not depend on (dev-dependencies excluded).
const LAYER_RULES: &[(&str, &[&str])] = &[
    (
        "trailhunt-domain",
        &[
            "tokio",
            "reqwest",
            "async-trait",
            "tracing",
            "trailhunt-shared",
            "trailhunt-player",
        ],
    ),
    ("trailhunt-shared", &["tokio", "reqwest", "trailhunt-player"]),
];

/// Source directories that must stay free of I/O.
const PURE_SOURCE_DIRS: &[&str] = &["crates/domain/src", "crates/shared/src"];

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = dependency_violations(&metadata.packages);
    for dir in PURE_SOURCE_DIRS {
        violations.extend(source_violations(&metadata.workspace_root.join(dir))?);
    }

    if violations.is_empty() {
        println!("arch-check: ok");
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

fn dependency_violations(packages: &[Package]) -> Vec<String> {
    let mut violations = Vec::new();
    for (crate_name, forbidden) in LAYER_RULES {
        let Some(package) = packages.iter().find(|p| p.name == *crate_name) else {
            continue;
        };
        for dep in &package.dependencies {
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            if forbidden.contains(&dep.name.as_str()) {
                violations.push(format!("{crate_name} must not depend on {}", dep.name));
            }
        }
    }
    violations
}

fn source_violations(dir: &Path) -> anyhow::Result<Vec<String>> {
    let forbidden = regex_lite::Regex::new(r"\b(tokio|reqwest|std::fs|std::net)\b")
        .context("compiling source pattern")?;

    let mut violations = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            violations.extend(scan_source(&forbidden, &path, &source));
        }
    }
    Ok(violations)
}

fn scan_source(forbidden: &regex_lite::Regex, path: &Path, source: &str) -> Vec<String> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter_map(|(i, line)| {
            forbidden
                .find(line)
                .map(|m| format!("{}:{} uses {}", path.display(), i + 1, m.as_str()))
        })
        .collect()
}
