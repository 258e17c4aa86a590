use argh::FromArgs;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use dataug::{
    augment::{config::AugmentationConfig, sink::FolderSink, Augmenter},
    io::annotation::resolve_inputs,
};

#[derive(FromArgs)]
/// Generate randomly warped, noised and blurred samples of labeled image regions
struct Args {
    /// an image, a folder of images or an annotation file
    #[argh(positional)]
    input: PathBuf,

    /// the folder receiving the generated images
    #[argh(positional)]
    output_folder: PathBuf,

    /// path to the configuration, JSON for a .json file and key=value lines otherwise
    #[argh(option, short = 'c', default = "PathBuf::from(\"config.json\")")]
    config: PathBuf,

    /// path to the annotation file the labels are appended to
    #[argh(option, short = 'a', default = "PathBuf::from(\"annotation.txt\")")]
    annotation: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let config = AugmentationConfig::from_file(&args.config)?;
    log::info!("Loaded configuration {}", args.config.display());

    // stop after the current image on Ctrl-C
    let cancel_token = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::warn!("Received Ctrl-C signal, stopping after the current image");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    std::fs::create_dir_all(&args.output_folder)?;

    let entries = resolve_inputs(&args.input)?;
    log::info!("Found {} input images", entries.len());

    let mut sink = FolderSink::new(&args.output_folder, &args.annotation);
    let summary = Augmenter::new(config)?.run_until(&entries, &mut sink, &cancel_token);

    log::info!(
        "Done: {} images loaded, {} skipped, {} samples saved, {} failed",
        summary.images_loaded,
        summary.images_skipped,
        summary.samples_saved,
        summary.samples_failed
    );

    Ok(())
}
