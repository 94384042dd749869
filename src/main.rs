use anyhow::Context;
use clap::Parser;
use mydocs::cli::{Args, Commands};
use mydocs::constants::{FAILURE_PREFIX, INFO_PREFIX, SKIP_PREFIX, SUCCESS_PREFIX, SUMMARY_PREFIX};
use mydocs::{
    collect_input_files, error, info, logger, verbose, warn, ConsoleSink, Dispatcher, EncodeOptions, Operation,
    PdfiumRasterizer, Processor, ProcessorConfig,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::configure(args.quiet, args.verbose);

    match args.command {
        Commands::Run {
            inputs,
            operations,
            all,
            separate_folders,
            output_root,
            recursive,
            optimize_png,
            dpi,
        } => {
            let operations = if all {
                info!("*** Running in 'Compress and Convert All' Mode ***");
                Operation::master_selection()
            } else {
                operations
            };

            let files = collect_input_files(&inputs, recursive)?;
            if files.is_empty() {
                warn!("No convertible files found in {:?}", inputs);
            }

            let rasterizer = PdfiumRasterizer::new(dpi)?;
            verbose!("PDF pages render at {} DPI", rasterizer.dpi());
            let options = EncodeOptions {
                optimize_png,
                ..EncodeOptions::default()
            };
            let config = ProcessorConfig::new(output_root, separate_folders);

            let processor = Processor::new(config, Dispatcher::new(Box::new(rasterizer), options))
                .context("cannot prepare the output folder")?;
            info!("{} Output root: {}", INFO_PREFIX, processor.output_root().display());

            let mut sink = ConsoleSink::new();
            let summary = processor.run_all(&files, &operations, &mut sink);

            if summary.files > 0 {
                info!(
                    "{} {} files: {} {} written, {} {} skipped, {} {} failed",
                    SUMMARY_PREFIX,
                    summary.files,
                    SUCCESS_PREFIX,
                    summary.succeeded,
                    SKIP_PREFIX,
                    summary.skipped,
                    FAILURE_PREFIX,
                    summary.failed
                );
            }
            if summary.failed > 0 {
                error!("{} operation(s) failed, see the log above", summary.failed);
            }
        }
        Commands::Menu => print_menu(),
    }

    Ok(())
}

fn print_menu() {
    info!("File Conversions:");
    for operation in Operation::CATALOG.iter().filter(|op| op.code().starts_with('A')) {
        info!("  {}   [{}]", operation.label(), operation.slug());
    }
    info!("");
    info!("JPG/JPEG Compression:");
    for operation in Operation::CATALOG.iter().filter(|op| op.code().starts_with('B')) {
        info!("  {}   [{}]", operation.label(), operation.slug());
    }
}
