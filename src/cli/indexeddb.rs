use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::cli::commands::IndexeddbArgs;
use crate::discovery::{
    discover_all_origins, discover_origins, discover_profiles, find_profile, origin_from_path,
};
use crate::indexeddb::{DecodeBackend, ExtractOptions, extract_origin, list_database_names};
use crate::models::{OriginExtraction, OriginStore};
use crate::output::{render_origins, write_output};
use crate::utils::{format_path_with_tilde, get_default_chrome_dir};

/// Run the `indexeddb` subcommand against a decode backend
pub fn run(args: &IndexeddbArgs, backend: &dyn DecodeBackend) -> Result<()> {
    if let Some(path) = &args.path {
        let store = origin_from_path(path)
            .with_context(|| format!("Cannot extract {}", path.display()))?;
        let result = extract_one(&store, backend, &extract_options(args));
        return emit(args, &[result]);
    }

    let root = chrome_root(args)?;
    if let Some(profile) = &args.profile
        && find_profile(&root, profile).is_none()
    {
        bail!("Profile not found: {} (in {})", profile, root.display());
    }

    if args.list_profiles {
        list_profiles(&root);
    } else if args.list {
        let origins = discover_all_origins(&root, args.profile.as_deref());
        list_origins(&origins, backend, &extract_options(args));
    } else {
        let origins = discover_all_origins(&root, args.profile.as_deref());
        if origins.is_empty() {
            eprintln!("No IndexedDB origins found under {}", format_path_with_tilde(&root));
        }
        let options = extract_options(args);
        let results: Vec<OriginExtraction> =
            origins.iter().map(|store| extract_one(store, backend, &options)).collect();
        print_summary(&results);
        emit(args, &results)?;
    }

    Ok(())
}

fn chrome_root(args: &IndexeddbArgs) -> Result<PathBuf> {
    match &args.chrome_path {
        Some(path) => Ok(path.clone()),
        None => get_default_chrome_dir(),
    }
}

fn extract_options(args: &IndexeddbArgs) -> ExtractOptions {
    ExtractOptions {
        safe_copy: args.safe_copy,
        include_deleted: args.include_deleted,
        temp_root: args.temp_dir.clone(),
    }
}

fn extract_one(
    store: &OriginStore,
    backend: &dyn DecodeBackend,
    options: &ExtractOptions,
) -> OriginExtraction {
    eprintln!("Extracting: {}", describe(store));
    let result = extract_origin(store, backend, options);
    if let Some(error) = &result.error {
        eprintln!("  failed: {}", error);
    }
    result
}

fn describe(store: &OriginStore) -> String {
    match &store.profile {
        Some(profile) => format!("[{}] {}", profile, store.origin),
        None => store.origin.clone(),
    }
}

fn list_profiles(root: &Path) {
    let mut profiles = discover_profiles(root);
    if profiles.is_empty() {
        eprintln!("No profiles found under {}", format_path_with_tilde(root));
        return;
    }
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    for profile in &profiles {
        println!("{}\t{} origin(s)", profile.name, discover_origins(profile).len());
    }
}

fn list_origins(origins: &[OriginStore], backend: &dyn DecodeBackend, options: &ExtractOptions) {
    if origins.is_empty() {
        eprintln!("No IndexedDB origins found");
        return;
    }
    for store in origins {
        println!("{}", describe(store));
        println!("  path: {}", format_path_with_tilde(&store.path));
        match list_database_names(store, backend, options) {
            Ok(names) if names.is_empty() => println!("  databases: (none)"),
            Ok(names) => println!("  databases: {}", names.join(", ")),
            Err(e) => println!("  error: {}", e),
        }
    }
}

fn print_summary(results: &[OriginExtraction]) {
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let skipped: usize = results.iter().map(OriginExtraction::skipped_count).sum();
    eprintln!(
        "Extracted {} origin(s): {} ok, {} failed, {} record(s) skipped",
        results.len(),
        results.len() - failed,
        failed,
        skipped
    );
}

fn emit(args: &IndexeddbArgs, results: &[OriginExtraction]) -> Result<()> {
    let rendered = render_origins(results, args.pretty)?;
    write_output(&rendered, args.output.as_deref())?;
    if let Some(output) = &args.output {
        let databases: usize = results.iter().map(|r| r.databases.len()).sum();
        eprintln!(
            "Wrote {} database(s) from {} origin(s) to {}",
            databases,
            results.len(),
            output.display()
        );
    }
    Ok(())
}
