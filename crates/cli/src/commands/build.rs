use crate::project::Project;
use anyhow::{Context, Result};
use blogkit_generator::{GeneratedSite, Theme, generate_site};
use std::fs;
use std::path::{Path, PathBuf};

/// Build static site
pub async fn run(path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());

    let project = Project::load(&path)?;
    let output = output.unwrap_or_else(|| project.output_dir());
    println!("   Output: {}", output.display());
    println!();

    println!("✓ Loaded: {}", project.config.site.name);
    println!("  Items: {}", project.content.items.len());
    println!("  Pages: {}", project.content.pages.len());
    println!();

    println!("📄 Rendering pages...");
    let written = build_into(&project, &output, &project.theme)?;
    println!("   ✓ Wrote {} pages", written);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   blogkit preview {}", path.display());
    println!();

    Ok(())
}

/// Render the project and replace the contents of `output` with the result.
/// Returns the number of pages written.
pub fn build_into(project: &Project, output: &Path, theme: &Theme) -> Result<usize> {
    let generated = generate_site(&project.config.site, &project.content, theme);
    clean_output(project, output)?;
    write_site(&generated, output)?;
    Ok(generated.pages.len())
}

/// Remove a previous build. Refuses to delete the project itself or any
/// directory holding its content or stylesheet.
fn clean_output(project: &Project, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    let output = output
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", output.display()))?;
    let root = project.root.canonicalize()?;
    let content = root.join(&project.config.build.content_dir);
    let stylesheet = project.config.theme.stylesheet.as_ref().map(|s| root.join(s));
    if root.starts_with(&output)
        || content.starts_with(&output)
        || stylesheet.is_some_and(|s| s.starts_with(&output))
    {
        anyhow::bail!(
            "Refusing to clean output directory {}: it contains the blog sources",
            output.display()
        );
    }

    tracing::debug!(path = %output.display(), "removing previous build");
    fs::remove_dir_all(&output)
        .with_context(|| format!("Failed to clean {}", output.display()))?;
    Ok(())
}

/// Write every generated page and asset below `output`
pub fn write_site(generated: &GeneratedSite, output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let files = generated
        .pages
        .iter()
        .map(|(path, html)| (path, html.as_bytes()))
        .chain(
            generated
                .assets
                .iter()
                .map(|(path, data)| (path, data.as_slice())),
        );

    for (relative, data) in files {
        let target = output.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, data)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::debug!(path = %target.display(), "written");
    }

    Ok(())
}
