//! What each migration kind does when applied

use std::path::{Path, PathBuf};
use wm_core::{format_template, resolve_path, PathKind, TemplateVars};
use wm_fs::{FileSystem, Transfer};

use crate::decision::UserDecisionGate;
use crate::descriptor::MigrationKind;
use crate::error::{MigrateError, MigrateResult};
use crate::prompt::{Prompt, PromptKind};
use crate::store::StateStore;

/// Collaborators handed to a migration run.
///
/// The runner holds no state of its own; everything it reads or writes goes
/// through these references.
#[derive(Clone, Copy)]
pub struct MigrationContext<'a> {
    pub store: &'a dyn StateStore,
    pub prompt: &'a dyn Prompt,
    pub fs: &'a dyn FileSystem,
    pub transfer: &'a dyn Transfer,
    /// Substituted for `{userdata}` in path templates
    pub user_data: &'a str,
}

impl MigrationContext<'_> {
    fn template_vars(&self) -> TemplateVars {
        TemplateVars::new().with("userdata", self.user_data)
    }
}

/// Apply one migration kind
pub async fn apply(kind: MigrationKind, ctx: &MigrationContext<'_>) -> MigrateResult<()> {
    match kind {
        MigrationKind::MoveDownloads => move_downloads(ctx).await,
        MigrationKind::UpdateInstallPaths => update_install_paths(ctx).await,
        MigrationKind::Noop => Ok(()),
    }
}

/// Ask for a new download root and move each game's downloads below it
async fn move_downloads(ctx: &MigrationContext<'_>) -> MigrateResult<()> {
    let state = ctx.store.read().await?;
    let gate = UserDecisionGate::new(ctx.prompt);
    log::info!("importing downloads from the pre-0.16.0 layout");

    gate.notify(
        PromptKind::Info,
        "Moving Downloads",
        "On the next screen, please select an empty directory where all your downloads \
         will be placed",
        "Next",
    )
    .await?;

    let current_root = format_template(&state.settings.downloads.path, &ctx.template_vars());
    let download_root = select_empty_directory(ctx, &gate, Path::new(&current_root)).await?;
    ctx.store
        .set_download_path(&download_root.to_string_lossy())
        .await?;

    for game in &state.settings.games {
        let target = download_root.join(game.as_str());
        ctx.fs.ensure_dir(&target).await?;
        let source = resolve_path(
            PathKind::Download,
            &state.settings.mods.paths,
            game,
            ctx.user_data,
        );
        let report = ctx.transfer.transfer(Path::new(&source), &target).await?;
        log::info!(
            "downloads for {game}: {} entries moved to {}",
            report.moved(),
            target.display()
        );
    }
    Ok(())
}

/// Keep asking until the operator picks an empty (or new) directory
async fn select_empty_directory(
    ctx: &MigrationContext<'_>,
    gate: &UserDecisionGate<'_>,
    default: &Path,
) -> MigrateResult<PathBuf> {
    loop {
        let selected = gate
            .select_directory("Select empty directory to store downloads", default)
            .await?
            .ok_or(MigrateError::Cancelled)?;

        let entries = match ctx.fs.list_entries(&selected).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                ctx.fs.ensure_dir(&selected).await?;
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        if entries.is_empty() {
            return Ok(selected);
        }

        gate.notify(
            PromptKind::Error,
            "Invalid path selected",
            "The directory needs to be empty",
            "OK",
        )
        .await?;
    }
}

/// Store each game's install path with its base directory resolved
async fn update_install_paths(ctx: &MigrationContext<'_>) -> MigrateResult<()> {
    let state = ctx.store.read().await?;
    let paths = &state.settings.mods.paths;

    for game in paths.keys() {
        let install = resolve_path(PathKind::Install, paths, game, ctx.user_data);
        log::info!("set install path for {game}: {install}");
        ctx.store.set_install_path(game, &install).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
