use crate::project::Project;
use blogkit_core::Context;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating blog at: {}", path.display());

    let project = Project::load(&path)?;
    let site = &project.config.site;
    let context = Context::new(&project.content.items);

    println!("✓ blog.toml valid");
    println!("  Site: {} ({})", site.name, site.base_url);
    println!("  Language: {}", site.language);
    println!("✓ content valid");
    for section in &project.content.sections {
        println!(
            "  Section {}: {} item(s)",
            section.id,
            context.items_in_section(&section.id).len()
        );
    }
    println!("  Pages: {}", project.content.pages.len());
    println!("  Tags: {}", context.all_tags().len());

    Ok(())
}
