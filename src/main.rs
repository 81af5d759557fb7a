use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use scriptboard::chunking::word_count;
use scriptboard::cli::{Cli, Command, CopyArgs, EditArgs, ExportArgs, RestyleArgs, SplitArgs};
use scriptboard::clipboard::{copy_to_clipboard, DisplayServer};
use scriptboard::config::AppConfig;
use scriptboard::export::{self, ExportKind, SCENE_FILE_NAME};
use scriptboard::pipeline::{self, RunController, RunStatus, Storyboard};
use scriptboard::provider::build_strategy;
use scriptboard::{RunRequest, Scene};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Split(args) => handle_split(&args, config).await,
        Command::Styles => handle_styles(&config),
        Command::Edit(args) => handle_edit(&args),
        Command::Restyle(args) => handle_restyle(&args, &config),
        Command::Export(args) => handle_export(&args),
        Command::Copy(args) => handle_copy(&args),
    }
}

async fn handle_split(args: &SplitArgs, mut config: AppConfig) -> Result<()> {
    args.apply(&mut config);

    let script = args.input.read()?;
    let request = RunRequest::new(&script, config.language, config.style.clone())?;
    let synthesizer = config.synthesizer();
    if !synthesizer.catalog().contains(&request.style) {
        warn!(style = %request.style, "unknown style; prompts use the default fragment");
    }
    let strategy = build_strategy(&config).context(pipeline::PROVIDER_FAILURE_HINT)?;

    if !args.json {
        println!("Scriptboard - 8 second storyboard");
        println!(
            "Language: {} | Style: {} | Mode: {}",
            request.language,
            request.style,
            strategy.name()
        );
        println!("Words: {}", word_count(request.script()));
    }

    let controller = Arc::new(RunController::new());
    let signal = controller.begin();
    let interrupt = Arc::clone(&controller);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.stop();
        }
    });

    let quiet = args.json;
    let state = pipeline::run(
        Storyboard::new(),
        &request,
        strategy.as_ref(),
        &synthesizer,
        &signal,
        |scene| {
            if !quiet {
                print_scene(scene);
            }
        },
    )
    .await;

    if state.status == RunStatus::Failed {
        bail!(state
            .error
            .unwrap_or_else(|| pipeline::PROVIDER_FAILURE_HINT.to_string()));
    }
    if let Some(line) = summary_line(&state, quiet) {
        println!("{}", line);
    }

    if let Some(dir) = &args.output_dir {
        write_batch(dir, &state.scenes)?;
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.scenes)?);
    }
    Ok(())
}

/// Closing stdout line of a run; none when stdout carries JSON
fn summary_line(state: &Storyboard, quiet: bool) -> Option<String> {
    if quiet {
        return None;
    }
    let line = match state.status {
        RunStatus::Stopped => format!("\nStopped; keeping {} scene(s)", state.scenes.len()),
        _ => format!("\n✓ {} scenes generated", state.scenes.len()),
    };
    Some(line)
}

fn print_scene(scene: &Scene) {
    println!("\n#{:02}  [{}]", scene.id, scene.time_range);
    println!("   Voice:  {}", scene.voice_text);
    println!("   Prompt: {}", scene.video_prompt);
}

fn write_batch(dir: &Path, scenes: &[Scene]) -> Result<()> {
    let scene_file = dir.join(SCENE_FILE_NAME);
    export::save_scenes(&scene_file, scenes)
        .with_context(|| format!("Failed to write scene file {:?}", scene_file))?;
    println!("Wrote {:?}", scene_file);
    for kind in ExportKind::ALL {
        let path = export::write_export(dir, kind, scenes)
            .with_context(|| format!("Failed to write {} under {:?}", kind.file_name(), dir))?;
        println!("Wrote {:?}", path);
    }
    Ok(())
}

fn handle_styles(config: &AppConfig) -> Result<()> {
    let catalog = config.style_catalog();
    for entry in catalog.iter() {
        println!("{:<16} {:<28} {}", entry.id, entry.label, entry.description);
    }
    Ok(())
}

fn load_board(path: &Path) -> Result<Storyboard> {
    let scenes = export::load_scenes(path)
        .with_context(|| format!("Failed to load scene file {:?}", path))?;
    Ok(Storyboard::from_scenes(scenes))
}

fn save_board(path: &Path, board: &Storyboard) -> Result<()> {
    export::save_scenes(path, &board.scenes)
        .with_context(|| format!("Failed to save scene file {:?}", path))
}

fn handle_edit(args: &EditArgs) -> Result<()> {
    let mut board = load_board(&args.file.scenes)?;
    board.edit_prompt(args.scene, args.prompt.clone())?;
    save_board(&args.file.scenes, &board)?;
    println!("Scene {} prompt updated", args.scene);
    Ok(())
}

fn handle_restyle(args: &RestyleArgs, config: &AppConfig) -> Result<()> {
    let mut board = load_board(&args.file.scenes)?;
    let synthesizer = config.synthesizer();
    if !synthesizer.catalog().contains(&args.style) {
        warn!(style = %args.style, "unknown style; prompts use the default fragment");
    }
    let updated = synthesizer.resynthesize(&mut board.scenes, &args.style);
    save_board(&args.file.scenes, &board)?;
    println!(
        "Re-synthesized {} prompt(s); {} edited prompt(s) kept",
        updated,
        board.scenes.len() - updated
    );
    Ok(())
}

fn handle_export(args: &ExportArgs) -> Result<()> {
    let board = load_board(&args.file.scenes)?;
    for kind in args.kinds() {
        let path = export::write_export(&args.output_dir, kind, &board.scenes)
            .with_context(|| format!("Failed to write {}", kind.file_name()))?;
        println!("Wrote {:?}", path);
    }
    Ok(())
}

fn handle_copy(args: &CopyArgs) -> Result<()> {
    let board = load_board(&args.file.scenes)?;
    let scene = board.scene(args.scene)?;
    copy_to_clipboard(&scene.video_prompt, DisplayServer::detect())
        .context("Failed to copy prompt")?;
    println!("Copied prompt of scene {} to clipboard", scene.id);
    Ok(())
}
