//! Build command - generates the API and writes it to disk

use std::{fs, path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr, eyre};
use restful_generator::{ApiGenerator, Resource, resource::API_ROOT};

use super::{Inputs, output_path};

/// Run the build command.
///
/// Generates every resource and writes it below `output`. With `clean`, a
/// previous `api/` tree is removed first.
pub fn run(inputs: &Inputs, output: &Path, clean: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?inputs, ?output, clean, "Starting build");

    let config = inputs.load_config()?;
    let content = inputs.load_content()?;

    let generator = ApiGenerator::new(config).wrap_err("Invalid restful configuration")?;
    tracing::debug!(restful = ?generator.restful(), "Resolved restful configuration");

    let api = generator.build(&content).wrap_err("Generation failed")?;

    if clean {
        let api_dir = output.join(API_ROOT);
        if api_dir.exists() {
            tracing::debug!(dir = %api_dir.display(), "cleaning previous api output");
            fs::remove_dir_all(&api_dir)
                .wrap_err_with(|| format!("Failed to remove {}", api_dir.display()))?;
        }
    }

    let written = write_resources(output, &api.resources)?;
    let duration = start.elapsed();
    let stats = &api.stats;

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:      {}", stats.posts);
    println!("  Pages:      {}", stats.post_pages);
    println!("  Categories: {}", stats.categories);
    println!("  Tags:       {}", stats.tags);
    println!("  Articles:   {}", stats.articles);
    println!("  Files:      {written}");
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Write each resource to `root/{path}`, creating parent directories.
///
/// Returns the number of files written.
pub fn write_resources(root: &Path, resources: &[Resource]) -> Result<usize> {
    for resource in resources {
        let path = output_path(root, &resource.path).ok_or_else(|| {
            eyre!(
                "Refusing to write outside the output directory: {}",
                resource.path
            )
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, &resource.data)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(path = %path.display(), bytes = resource.data.len(), "wrote resource");
    }

    Ok(resources.len())
}
